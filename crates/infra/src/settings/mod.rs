//! Persisted notification settings

pub mod store;

pub use store::FileSettingsStore;
