//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod banking;
pub mod config;

// Re-export common types
pub use banking::{AccessGrant, AuthError, BankingApi, RegistrationResult, SessionError};
pub use config::ConfigStore;
