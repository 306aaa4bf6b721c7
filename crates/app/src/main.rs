//! Herald - interactive host shell for the notification engine
//!
//! Stands in for an embedding client: it feeds activity and visibility
//! events into the engine from stdin and prints unread-count updates as
//! the poll loop publishes them.

mod repl;

use std::sync::Arc;

use anyhow::Context;
use herald_infra::{Engine, NullNotifier};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::repl::Flow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the logger so HERALD_LOG from the file is honored.
    let dotenv = dotenvy::dotenv();

    init_logging();

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let config = herald_infra::config::load().context("Failed to load configuration")?;
    info!(
        base_url = %config.api.base_url,
        fid = config.api.fid,
        base_interval = config.poll.base_interval_seconds,
        "Herald starting"
    );

    // The shell counts as a visible view; the first poll happens right away.
    let headless = std::env::args().any(|arg| arg == "--headless");
    let mut engine = if headless {
        info!("Running headless; device alerts are logged, not shown");
        Engine::with_notifier(&config, true, Arc::new(NullNotifier))?
    } else {
        Engine::build(&config, true)?
    };
    let handle = engine.start().await?;

    let mut unread = handle.subscribe_unread();
    let printer = tokio::spawn(async move {
        while unread.changed().await.is_ok() {
            let snapshot = *unread.borrow_and_update();
            match snapshot.increase() {
                Some(n) => println!("unread: {} (+{})", snapshot.count, n),
                None => println!("unread: {}", snapshot.count),
            }
        }
    });

    println!("herald {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                info!("Interrupted; shutting down");
                break;
            }
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if repl::dispatch(&line, &engine, &handle).await == Flow::Quit {
                            break;
                        }
                    }
                    // EOF quits like an interactive shell would.
                    None => break,
                }
            }
        }
    }

    printer.abort();
    engine.stop().await?;
    info!("Herald stopped");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HERALD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}
