//! Draft transfer request

use serde::{Deserialize, Serialize};

use super::amount::Amount;

/// Unconfirmed transfer instruction produced by the extractor.
///
/// Drafts are never mutated once handed to the orchestrator; a re-parse
/// produces a new draft that replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    recipient_name: String,
    amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    from_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
}

impl TransferRequest {
    /// Create a draft drawing from the primary account
    pub fn new(recipient_name: impl Into<String>, amount: Amount) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            amount,
            from_account: None,
            memo: None,
        }
    }

    /// Draw from a specific source account
    pub fn with_source_account(mut self, account: impl Into<String>) -> Self {
        self.from_account = Some(account.into());
        self
    }

    /// Attach a free-text memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn recipient_name(&self) -> &str {
        &self.recipient_name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Source account, `None` meaning the primary account
    pub fn from_account(&self) -> Option<&str> {
        self.from_account.as_deref()
    }

    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }
}
