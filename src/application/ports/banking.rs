//! Banking API port interface

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::account::Account;
use crate::domain::transfer::{TransferRequest, TransferResult};
use crate::domain::voice::{AudioData, VoiceEvidence};

/// Login errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Login rejected: {0}")]
    Rejected(String),

    #[error("Login request failed: {0}")]
    Network(String),
}

/// Errors from authenticated calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session expired. Please log in again.")]
    Expired,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Request failed: {0}")]
    Network(String),
}

/// What a successful login returns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub user_id: u64,
    pub username: String,
}

/// Outcome of a voice profile upload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationResult {
    pub success: bool,
    pub message: String,
}

/// Port for the remote banking API.
///
/// Implementations own the bearer token: it is set on login, cleared on
/// logout or on any 401, and never retried silently.
#[async_trait]
pub trait BankingApi: Send + Sync {
    /// Authenticate and hold the issued token.
    async fn login(&self, username: &str, password: &str) -> Result<AccessGrant, AuthError>;

    /// Drop the held token.
    async fn logout(&self);

    /// Whether a token is currently held.
    async fn is_authenticated(&self) -> bool;

    /// Fetch the user's accounts.
    async fn fetch_accounts(&self) -> Result<Vec<Account>, SessionError>;

    /// Submit a confirmed draft together with the voice evidence.
    ///
    /// # Returns
    /// The bank's result for this single attempt
    async fn execute_transfer(
        &self,
        draft: &TransferRequest,
        evidence: &VoiceEvidence,
    ) -> Result<TransferResult, SessionError>;

    /// Upload a voice sample as the user's reference profile.
    async fn register_voice_profile(
        &self,
        audio: &AudioData,
    ) -> Result<RegistrationResult, SessionError>;
}
