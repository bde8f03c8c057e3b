//! Transfer amount value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Multiplier for the `만` unit word
pub const MAN: u64 = 10_000;

/// Multiplier for the `천` unit word
pub const CHEON: u64 = 1_000;

/// Value object representing a positive amount in whole won.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Amount(u64);

impl Amount {
    /// Create an amount, rejecting zero
    pub const fn new(won: u64) -> Option<Self> {
        if won == 0 {
            None
        } else {
            Some(Self(won))
        }
    }

    /// Get the amount in won
    pub const fn won(&self) -> u64 {
        self.0
    }

    /// Fee the bank charges for a transfer of this size
    pub const fn estimated_fee(&self) -> u64 {
        if self.0 <= 10_000 {
            500
        } else if self.0 <= 100_000 {
            1_000
        } else {
            1_500
        }
    }
}

impl TryFrom<u64> for Amount {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "amount must be positive".to_string())
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}원", group_thousands(self.0))
    }
}

/// Format an integer with `,` thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert!(Amount::new(0).is_none());
        assert!(Amount::try_from(0).is_err());
    }

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Amount::new(100_000).unwrap().to_string(), "100,000원");
        assert_eq!(Amount::new(1_234_567).unwrap().to_string(), "1,234,567원");
        assert_eq!(Amount::new(500).unwrap().to_string(), "500원");
    }

    #[test]
    fn group_thousands_boundaries() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(10_000), "10,000");
    }

    #[test]
    fn fee_schedule() {
        assert_eq!(Amount::new(10_000).unwrap().estimated_fee(), 500);
        assert_eq!(Amount::new(10_001).unwrap().estimated_fee(), 1_000);
        assert_eq!(Amount::new(100_000).unwrap().estimated_fee(), 1_000);
        assert_eq!(Amount::new(100_001).unwrap().estimated_fee(), 1_500);
    }

    #[test]
    fn serializes_as_number() {
        let amount = Amount::new(30_000).unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "30000");
        let parsed: Amount = serde_json::from_str("30000").unwrap();
        assert_eq!(parsed, amount);
        assert!(serde_json::from_str::<Amount>("0").is_err());
    }
}
