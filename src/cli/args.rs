//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Voice Transfer - speak a transfer, confirm it, send it
#[derive(Parser, Debug)]
#[command(name = "voice-transfer")]
#[command(version)]
#[command(about = "Voice-driven money transfers against a banking API")]
#[command(long_about = None)]
pub struct Cli {
    /// Banking API base URL (overrides config and VOICE_TRANSFER_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Login username (overrides config and VOICE_TRANSFER_USERNAME)
    #[arg(short = 'u', long, global = true, value_name = "NAME")]
    pub username: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. debug, voice_transfer=trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract a transfer draft from text without contacting the server
    Parse {
        /// Transcribed utterance, e.g. "김철수에게 5만원 보내줘"
        text: String,
    },
    /// List the logged-in user's accounts
    Accounts {
        /// Bypass the account cache
        #[arg(long)]
        refresh: bool,
    },
    /// Extract, confirm, and execute a voice transfer
    Transfer {
        /// Transcribed utterance
        text: String,

        /// Recording of the utterance (m4a, wav, mp3, aac)
        #[arg(short = 'a', long, value_name = "FILE")]
        audio: PathBuf,

        /// Source account number (defaults to the first active account)
        #[arg(short = 'f', long, value_name = "ACCOUNT")]
        from: Option<String>,

        /// Memo attached to the transfer
        #[arg(short = 'm', long)]
        memo: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Upload a voice profile recording
    RegisterVoice {
        /// Voice sample (m4a, wav, mp3, aac)
        #[arg(short = 'a', long, value_name = "FILE")]
        audio: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "base_url",
    "username",
    "password",
    "timeout_secs",
    "log_level",
];

/// Log levels accepted by `config set log_level`
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_parse() {
        let cli = Cli::parse_from(["voice-transfer", "parse", "엄마에게 3만원 보내줘"]);
        assert!(cli.base_url.is_none());
        if let Commands::Parse { text } = cli.command {
            assert_eq!(text, "엄마에게 3만원 보내줘");
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn cli_parses_accounts_refresh() {
        let cli = Cli::parse_from(["voice-transfer", "accounts", "--refresh"]);
        assert!(matches!(cli.command, Commands::Accounts { refresh: true }));
    }

    #[test]
    fn cli_parses_transfer() {
        let cli = Cli::parse_from([
            "voice-transfer",
            "transfer",
            "김철수에게 5만원 보내줘",
            "--audio",
            "voice.m4a",
            "--from",
            "1234567890",
            "-y",
        ]);
        if let Commands::Transfer {
            text,
            audio,
            from,
            memo,
            yes,
        } = cli.command
        {
            assert_eq!(text, "김철수에게 5만원 보내줘");
            assert_eq!(audio, PathBuf::from("voice.m4a"));
            assert_eq!(from.as_deref(), Some("1234567890"));
            assert!(memo.is_none());
            assert!(yes);
        } else {
            panic!("Expected Transfer command");
        }
    }

    #[test]
    fn transfer_requires_audio() {
        let result = Cli::try_parse_from(["voice-transfer", "transfer", "엄마에게 1만원"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "voice-transfer",
            "accounts",
            "--base-url",
            "http://bank.test/api",
            "-u",
            "kim",
        ]);
        assert_eq!(cli.base_url.as_deref(), Some("http://bank.test/api"));
        assert_eq!(cli.username.as_deref(), Some("kim"));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voice-transfer", "config", "set", "timeout_secs", "10"]);
        if let Commands::Config {
            action: ConfigAction::Set { key, value },
        } = cli.command
        {
            assert_eq!(key, "timeout_secs");
            assert_eq!(value, "10");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("base_url"));
        assert!(is_valid_config_key("password"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
