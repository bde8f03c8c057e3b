//! Account cache use case

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::account::Account;

use super::ports::{BankingApi, SessionError};

/// Errors from the account store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountStoreError {
    /// The session is gone; distinct from an empty account list
    #[error("Authentication required. Please log in.")]
    AuthenticationRequired,

    #[error(transparent)]
    Session(SessionError),
}

impl From<SessionError> for AccountStoreError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Expired => Self::AuthenticationRequired,
            other => Self::Session(other),
        }
    }
}

/// Last-fetched account list with forced refresh
pub struct AccountStore<B: BankingApi> {
    banking: Arc<B>,
    accounts: RwLock<Vec<Account>>,
}

impl<B: BankingApi> AccountStore<B> {
    pub fn new(banking: Arc<B>) -> Self {
        Self {
            banking,
            accounts: RwLock::new(Vec::new()),
        }
    }

    /// Return cached accounts, fetching only if the cache is empty
    pub async fn load(&self) -> Result<Vec<Account>, AccountStoreError> {
        {
            let cached = self.accounts.read().await;
            if !cached.is_empty() {
                debug!(count = cached.len(), "serving cached accounts");
                return Ok(cached.clone());
            }
        }
        self.refresh().await
    }

    /// Always re-fetch and replace the cache
    pub async fn refresh(&self) -> Result<Vec<Account>, AccountStoreError> {
        match self.banking.fetch_accounts().await {
            Ok(accounts) => {
                debug!(count = accounts.len(), "account cache refreshed");
                *self.accounts.write().await = accounts.clone();
                Ok(accounts)
            }
            Err(SessionError::Expired) => {
                warn!("session expired while fetching accounts");
                self.accounts.write().await.clear();
                Err(AccountStoreError::AuthenticationRequired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Snapshot of the cache without touching the network
    pub async fn cached(&self) -> Vec<Account> {
        self.accounts.read().await.clone()
    }

    /// First active account, used when a draft names no source account
    pub async fn primary(&self) -> Result<Option<Account>, AccountStoreError> {
        let accounts = self.load().await?;
        Ok(accounts.into_iter().find(|a| a.is_active))
    }

    /// Forget cached accounts (e.g. on logout)
    pub async fn clear(&self) {
        self.accounts.write().await.clear();
    }
}
