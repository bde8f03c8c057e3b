//! Transfer execution result

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Non-empty identifier the bank assigns to a completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create an identifier, rejecting blank input
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of exactly one execution attempt.
///
/// A successful result always carries a transaction identifier and a
/// failed one never does; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferResult {
    success: bool,
    message: String,
    transaction_id: Option<TransactionId>,
    amount: Option<u64>,
    fee: Option<u64>,
    timestamp: DateTime<Utc>,
}

impl TransferResult {
    /// A completed transfer
    pub fn succeeded(
        transaction_id: TransactionId,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            success: true,
            message: message.into(),
            transaction_id: Some(transaction_id),
            amount: None,
            fee: None,
            timestamp,
        }
    }

    /// A transfer the bank declined
    pub fn failed(message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: false,
            message: message.into(),
            transaction_id: None,
            amount: None,
            fee: None,
            timestamp,
        }
    }

    /// Record what was actually charged
    pub fn with_charges(mut self, amount: Option<u64>, fee: Option<u64>) -> Self {
        self.amount = amount;
        self.fee = fee;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    pub fn amount(&self) -> Option<u64> {
        self.amount
    }

    pub fn fee(&self) -> Option<u64> {
        self.fee
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_transaction_id_rejected() {
        assert!(TransactionId::new("").is_none());
        assert!(TransactionId::new("   ").is_none());
        assert_eq!(TransactionId::new("TXN1").unwrap().as_str(), "TXN1");
    }

    #[test]
    fn success_carries_id() {
        let id = TransactionId::new("TXN123456").unwrap();
        let result = TransferResult::succeeded(id, "완료", Utc::now()).with_charges(Some(100_000), Some(1_500));
        assert!(result.is_success());
        assert_eq!(result.transaction_id().map(|t| t.as_str()), Some("TXN123456"));
        assert_eq!(result.amount(), Some(100_000));
        assert_eq!(result.fee(), Some(1_500));
    }

    #[test]
    fn failure_has_no_id() {
        let result = TransferResult::failed("잔액 부족", Utc::now());
        assert!(!result.is_success());
        assert!(result.transaction_id().is_none());
        assert_eq!(result.message(), "잔액 부족");
    }
}
