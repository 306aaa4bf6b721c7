//! Poll cadence decisions and the per-poll unit of work
//!
//! [`PollState`] and [`Backoff`] are pure decision logic: the driver feeds
//! them clock readings and executes the directives they return.
//! [`PollRunner`] performs one poll against the ports.

mod backoff;
mod runner;
mod state;

pub use backoff::Backoff;
pub use runner::{PollReport, PollRunner};
pub use state::{PollDirective, PollPhase, PollState};
