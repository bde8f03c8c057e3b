//! Domain layer - Core business logic
//!
//! Contains value objects, entities, the transfer state machine, and
//! domain errors. This layer has no dependencies on external systems.

pub mod account;
pub mod config;
pub mod error;
pub mod session;
pub mod transfer;
pub mod voice;

// Re-export common types
pub use account::Account;
pub use config::AppConfig;
pub use error::*;
pub use session::{AccessToken, Session};
pub use transfer::{
    Amount, TransferExtractor, TransferRequest, TransferResult, TransferState,
};
pub use voice::{AudioData, AudioMimeType, VoiceEvidence};
