//! Shell command parsing and dispatch

use herald_infra::{Engine, SchedulerHandle};

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input,
    Show,
    Hide,
    Seen,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse a trimmed line. `None` for anything unrecognized.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        match line.to_ascii_lowercase().as_str() {
            "input" | "i" => Some(Self::Input),
            "show" => Some(Self::Show),
            "hide" => Some(Self::Hide),
            "seen" => Some(Self::Seen),
            "status" => Some(Self::Status),
            "help" | "?" => Some(Self::Help),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Run one shell line against the engine.
pub async fn dispatch(line: &str, engine: &Engine, handle: &SchedulerHandle) -> Flow {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Flow::Continue;
    }
    let Some(command) = Command::parse(trimmed) else {
        println!("unknown command: {trimmed} (try 'help')");
        return Flow::Continue;
    };

    match command {
        Command::Input => {
            handle.record_input();
            println!("input recorded");
        }
        Command::Show => {
            handle.set_visibility(true);
            println!("view shown");
        }
        Command::Hide => {
            handle.set_visibility(false);
            println!("view hidden");
        }
        Command::Seen => match engine.mark_all_seen().await {
            Ok(()) => println!("all notifications marked seen"),
            Err(e) => println!("mark-seen failed: {e}"),
        },
        Command::Status => {
            let snapshot = engine.unread();
            println!(
                "running: {}  unread: {} (previous {})",
                engine.is_running(),
                snapshot.count,
                snapshot.previous
            );
        }
        Command::Help => print_help(),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn print_help() {
    println!("commands:");
    println!("  input | i   simulate user input (resets the idle clock)");
    println!("  show        mark the view visible");
    println!("  hide        mark the view hidden (suspends polling)");
    println!("  seen        mark all notifications seen server-side");
    println!("  status      print engine state and unread counts");
    println!("  help        this text");
    println!("  quit | q    stop the engine and exit");
}
