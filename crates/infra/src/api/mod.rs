//! HTTP adapter for the remote notification API

pub mod client;

pub use client::{ApiClient, ApiClientConfig};
