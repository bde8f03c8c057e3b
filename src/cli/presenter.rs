//! CLI presenter for output formatting

use colored::*;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::account::Account;
use crate::domain::transfer::{group_thousands, TransferFailure, TransferRequest, TransferResult};

/// Presenter for CLI output formatting.
///
/// Status lines go to stderr; results meant for pipes go to stdout.
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print a parsed draft to stdout
    pub fn draft(&self, draft: &TransferRequest) {
        for line in format_draft(draft) {
            self.output(&line);
        }
    }

    /// Print a finished transfer to stdout
    pub fn transfer_result(&self, result: &TransferResult) {
        if result.is_success() {
            let id = result
                .transaction_id()
                .map(|id| id.to_string())
                .unwrap_or_default();
            self.output(&format!("{} {} ({})", "✓".green(), result.message(), id));
            if let Some(amount) = result.amount() {
                let fee = result.fee().unwrap_or(0);
                self.output(&format!(
                    "  amount: {}원, fee: {}원",
                    group_thousands(amount),
                    group_thousands(fee)
                ));
            }
        } else {
            self.output(&format!("{} {}", "✗".red(), result.message()));
        }
    }

    /// Print a failed attempt to stderr
    pub fn transfer_failure(&self, failure: &TransferFailure) {
        self.error(&format!("Transfer failed ({:?}): {}", failure.kind(), failure.message()));
    }

    /// Print an account table to stdout
    pub fn accounts(&self, accounts: &[Account]) {
        if accounts.is_empty() {
            self.info("No accounts");
            return;
        }
        for account in accounts {
            self.output(&format_account(account));
        }
    }

    /// Ask a yes/no question on the terminal; the default is no
    pub fn confirm(&self, question: &str) -> Result<bool, String> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| format!("Failed to read answer: {}", e))
    }

    /// Read a password from the terminal without echo
    pub fn password(&self, prompt: &str) -> Result<String, String> {
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact()
            .map_err(|e| format!("Failed to read password: {}", e))
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Draft lines: recipient, amount with fee estimate, optional details
pub fn format_draft(draft: &TransferRequest) -> Vec<String> {
    let amount = draft.amount();
    let mut lines = vec![
        format!("recipient: {}", draft.recipient_name()),
        format!(
            "amount:    {} (estimated fee {}원)",
            amount,
            group_thousands(amount.estimated_fee())
        ),
    ];
    if let Some(account) = draft.from_account() {
        lines.push(format!("from:      {}", account));
    }
    if let Some(memo) = draft.memo() {
        lines.push(format!("memo:      {}", memo));
    }
    lines
}

/// One account row: masked number, name, balance, inactive marker
pub fn format_account(account: &Account) -> String {
    let status = if account.is_active { "" } else { " (inactive)" };
    format!(
        "{}  {}  {}{}",
        account.masked_number(),
        account.display_name,
        account.formatted_balance(),
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transfer::Amount;

    #[test]
    fn draft_lines_include_fee() {
        let draft = TransferRequest::new("김철수", Amount::new(50_000).unwrap());
        let lines = format_draft(&draft);
        assert_eq!(lines[0], "recipient: 김철수");
        assert_eq!(lines[1], "amount:    50,000원 (estimated fee 1,000원)");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn draft_lines_include_details() {
        let draft = TransferRequest::new("엄마", Amount::new(5_000).unwrap())
            .with_source_account("1234567890123456")
            .with_memo("용돈");
        let lines = format_draft(&draft);
        assert_eq!(lines.len(), 4);
        assert!(lines[3].ends_with("용돈"));
    }

    #[test]
    fn inactive_account_is_marked() {
        let account = Account {
            id: 1,
            account_number: "1234567890123456".to_string(),
            display_name: "입출금".to_string(),
            balance: 10_000,
            bank_code: "SH".to_string(),
            is_active: false,
            bank_name: None,
            owner_name: None,
        };
        let row = format_account(&account);
        assert!(row.starts_with(&account.masked_number()));
        assert!(row.ends_with("(inactive)"));
    }
}
