//! Bank account entity

use serde::{Deserialize, Serialize};

use super::transfer::group_thousands;

fn active_by_default() -> bool {
    true
}

/// Account as returned by the banking API.
/// Immutable once fetched; a refresh replaces the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub account_number: String,
    #[serde(rename = "accountTypeName", alias = "displayName", alias = "accountName")]
    pub display_name: String,
    /// Balance in whole won
    pub balance: i64,
    pub bank_code: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

impl Account {
    /// Account number with the middle digits hidden (`1234****3456`)
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.account_number.chars().collect();
        if digits.len() < 8 {
            return self.account_number.clone();
        }
        let head: String = digits[..4].iter().collect();
        let tail: String = digits[digits.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    }

    /// Balance formatted as `1,000,000원`
    pub fn formatted_balance(&self) -> String {
        let sign = if self.balance < 0 { "-" } else { "" };
        format!("{}{}원", sign, group_thousands(self.balance.unsigned_abs()))
    }
}
