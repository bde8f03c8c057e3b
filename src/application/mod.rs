//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod accounts;
pub mod ports;
pub mod transfer;

// Re-export use cases
pub use accounts::{AccountStore, AccountStoreError};
pub use transfer::{DraftDetails, OrchestratorError, TransferOrchestrator};
