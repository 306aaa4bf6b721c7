//! Scheduling infrastructure for the adaptive poll loop
//!
//! The scheduler follows explicit lifecycle rules:
//! - start/stop with join handles for spawned tasks
//! - cancellation token support
//! - polls run inline in the loop, so at most one is ever in flight

pub mod error;
pub mod poll_scheduler;
pub mod timer;

pub use error::{SchedulerError, SchedulerResult};
pub use poll_scheduler::{EngineEvent, PollScheduler, SchedulerConfig, SchedulerHandle};
pub use timer::Alarm;
