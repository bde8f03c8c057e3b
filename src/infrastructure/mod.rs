//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! the REST banking API client and the TOML config file store.

pub mod banking;
pub mod config;

// Re-export adapters
pub use banking::BankingSession;
pub use config::XdgConfigStore;
