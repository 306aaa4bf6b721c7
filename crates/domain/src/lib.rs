//! # Herald Domain
//!
//! Business domain types and models for Herald.
//!
//! This crate contains:
//! - Notification data types (NotificationKind, NotificationRecord, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Herald crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures; no IO, no async

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
