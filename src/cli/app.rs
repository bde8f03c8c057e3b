//! Command runners

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{BankingApi, ConfigStore};
use crate::application::{AccountStore, AccountStoreError, DraftDetails, TransferOrchestrator};
use crate::domain::config::AppConfig;
use crate::domain::transfer::{TransferExtractor, TransferState};
use crate::domain::voice::{AudioData, AudioMimeType, VoiceEvidence};
use crate::infrastructure::BankingSession;

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variables read into the config layer
pub const ENV_BASE_URL: &str = "VOICE_TRANSFER_BASE_URL";
pub const ENV_USERNAME: &str = "VOICE_TRANSFER_USERNAME";
pub const ENV_PASSWORD: &str = "VOICE_TRANSFER_PASSWORD";

/// Options for `transfer`
#[derive(Debug, Clone)]
pub struct TransferOptions {
    pub text: String,
    pub audio: PathBuf,
    pub from_account: Option<String>,
    pub memo: Option<String>,
    pub assume_yes: bool,
}

/// Load and merge configuration: defaults < file < env < cli.
///
/// Runs before logging is set up, so an unreadable file is reported
/// through the presenter.
pub async fn load_merged_config<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    cli_config: AppConfig,
) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            presenter.warn(&format!(
                "Ignoring config file {}: {}",
                store.path().display(),
                e
            ));
            AppConfig::empty()
        }
    };

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

fn env_config() -> AppConfig {
    let var = |name: &str| env::var(name).ok().filter(|s| !s.is_empty());
    AppConfig {
        base_url: var(ENV_BASE_URL),
        username: var(ENV_USERNAME),
        password: var(ENV_PASSWORD),
        ..Default::default()
    }
}

/// `parse`: offline extraction
pub fn run_parse(text: &str) -> ExitCode {
    let presenter = Presenter::new();

    match TransferExtractor::new().extract(text) {
        Ok(draft) => {
            presenter.draft(&draft);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `accounts`: login and list accounts
pub async fn run_accounts(config: &AppConfig, refresh: bool) -> ExitCode {
    let mut presenter = Presenter::new();

    let session = match connect(config, &mut presenter).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let store = AccountStore::new(session);

    presenter.start_spinner("Fetching accounts...");
    let result = if refresh {
        store.refresh().await
    } else {
        store.load().await
    };

    match result {
        Ok(accounts) => {
            presenter.stop_spinner();
            presenter.accounts(&accounts);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `register-voice`: upload a voice profile sample
pub async fn run_register_voice(config: &AppConfig, audio: &Path) -> ExitCode {
    let mut presenter = Presenter::new();

    let audio = match read_audio(audio).await {
        Ok(audio) => audio,
        Err(e) => return e.report(&presenter),
    };

    let session = match connect(config, &mut presenter).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.start_spinner(&format!(
        "Uploading voice profile ({})...",
        audio.human_readable_size()
    ));
    match session.register_voice_profile(&audio).await {
        Ok(result) if result.success => {
            presenter.spinner_success(&result.message);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(result) => {
            presenter.spinner_fail(&result.message);
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `transfer`: extract, confirm, execute, and offer retry on failure
pub async fn run_transfer(config: &AppConfig, options: TransferOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let audio = match read_audio(&options.audio).await {
        Ok(audio) => audio,
        Err(e) => return e.report(&presenter),
    };

    let session = match connect(config, &mut presenter).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let details = DraftDetails {
        from_account: options.from_account,
        memo: options.memo,
    };

    let orchestrator = TransferOrchestrator::new(Arc::clone(&session));
    let evidence = VoiceEvidence::new(audio, options.text);

    let mut draft = match orchestrator.submit(evidence, details) {
        Ok(draft) => draft,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if draft.from_account().is_none() {
        match primary_account(&session).await {
            Ok(Some(account)) => {
                let details = DraftDetails {
                    from_account: Some(account),
                    memo: None,
                };
                draft = match orchestrator.amend(details) {
                    Ok(draft) => draft,
                    Err(e) => {
                        presenter.error(&e.to_string());
                        return ExitCode::from(EXIT_ERROR);
                    }
                };
            }
            Ok(None) => presenter.warn("No active account found; the bank picks the source account"),
            Err(AccountStoreError::AuthenticationRequired) => {
                let _ = orchestrator.cancel();
                presenter.error(&AccountStoreError::AuthenticationRequired.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            Err(e) => presenter.warn(&format!("Could not resolve a source account: {}", e)),
        }
    }

    presenter.draft(&draft);
    if !options.assume_yes {
        match presenter.confirm("Send this transfer?") {
            Ok(true) => {}
            Ok(false) => {
                let _ = orchestrator.cancel();
                presenter.info("Transfer cancelled");
                return ExitCode::from(EXIT_SUCCESS);
            }
            Err(e) => {
                let _ = orchestrator.cancel();
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    let mut first_attempt = true;
    loop {
        presenter.start_spinner("Sending transfer...");
        let outcome = if first_attempt {
            orchestrator.confirm().await
        } else {
            orchestrator.retry().await
        };
        first_attempt = false;

        let state = match outcome {
            Ok(state) => state,
            Err(e) => {
                presenter.spinner_fail(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        };

        match state {
            TransferState::Succeeded(result) => {
                presenter.stop_spinner();
                presenter.transfer_result(&result);
                let _ = orchestrator.reset();
                return ExitCode::from(EXIT_SUCCESS);
            }
            TransferState::Failed(_, failure) => {
                presenter.stop_spinner();
                presenter.transfer_failure(&failure);

                let retry = !options.assume_yes
                    && match presenter.confirm("Retry the same transfer?") {
                        Ok(answer) => answer,
                        Err(e) => {
                            presenter.error(&e);
                            false
                        }
                    };
                if !retry {
                    let _ = orchestrator.cancel();
                    return ExitCode::from(EXIT_ERROR);
                }

                if failure.requires_reauthentication() {
                    if let Err(e) = login(session.as_ref(), config, &mut presenter).await {
                        presenter.error(&e);
                        let _ = orchestrator.cancel();
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            }
            other => {
                presenter.spinner_fail(&format!("Unexpected state: {}", other));
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }
}

/// Errors reading an audio file
#[derive(Debug)]
enum AudioReadError {
    Unsupported(String),
    Io(String),
}

impl AudioReadError {
    fn report(self, presenter: &Presenter) -> ExitCode {
        match self {
            Self::Unsupported(msg) => {
                presenter.error(&msg);
                ExitCode::from(EXIT_USAGE_ERROR)
            }
            Self::Io(msg) => {
                presenter.error(&msg);
                ExitCode::from(EXIT_ERROR)
            }
        }
    }
}

/// Read an audio file, deriving the MIME type from its extension
async fn read_audio(path: &Path) -> Result<AudioData, AudioReadError> {
    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(AudioMimeType::from_extension)
        .ok_or_else(|| {
            AudioReadError::Unsupported(format!(
                "Unsupported audio file '{}'. Use .m4a, .wav, .mp3 or .aac",
                path.display()
            ))
        })?;

    let data = tokio::fs::read(path)
        .await
        .map_err(|e| AudioReadError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;

    debug!(path = %path.display(), bytes = data.len(), mime = %mime_type, "audio loaded");
    Ok(AudioData::new(data, mime_type))
}

/// Build the HTTP session and log in
async fn connect(
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<Arc<BankingSession>, String> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout_or_default())
        .build()
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
    let session = Arc::new(BankingSession::with_client(
        config.base_url_or_default(),
        client,
    ));

    login(session.as_ref(), config, presenter).await?;
    Ok(session)
}

/// Log in with configured credentials, prompting for a missing password
/// without echo
async fn login<B: BankingApi>(
    banking: &B,
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<(), String> {
    let username = config.username.as_deref().filter(|u| !u.is_empty()).ok_or_else(|| {
        format!(
            "Missing username. Set {} or run 'voice-transfer config set username <name>'",
            ENV_USERNAME
        )
    })?;

    let password = match config.password.clone() {
        Some(password) => password,
        None => presenter.password(&format!("Password for {}", username))?,
    };

    presenter.start_spinner(&format!("Logging in as {}...", username));
    match banking.login(username, &password).await {
        Ok(grant) => {
            presenter.spinner_success(&format!("Logged in as {}", grant.username));
            Ok(())
        }
        Err(e) => {
            presenter.spinner_fail("Login failed");
            Err(e.to_string())
        }
    }
}

/// Number of the first active account
async fn primary_account(
    session: &Arc<BankingSession>,
) -> Result<Option<String>, AccountStoreError> {
    let store = AccountStore::new(Arc::clone(session));
    let account = store.primary().await?;
    debug!(found = account.is_some(), "primary account resolved");
    Ok(account.map(|a| a.account_number))
}
