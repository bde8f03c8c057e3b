//! REST banking API adapter

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::application::ports::{
    AccessGrant, AuthError, BankingApi, RegistrationResult, SessionError,
};
use crate::domain::account::Account;
use crate::domain::session::{AccessToken, Session};
use crate::domain::transfer::{TransactionId, TransferRequest, TransferResult};
use crate::domain::voice::{AudioData, VoiceEvidence};

use super::multipart::MultipartForm;

const LOGIN_PATH: &str = "/auth/login";
const ACCOUNTS_PATH: &str = "/accounts";
const VOICE_TRANSFER_PATH: &str = "/transfer/voice";
const VOICE_REGISTER_PATH: &str = "/voice/register";

// Request/response types for the banking API

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    user_id: u64,
    username: String,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<Account>,
    #[allow(dead_code)]
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Transaction identifiers arrive as strings or numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(u64),
}

impl IdRepr {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TransferResultBody {
    #[serde(alias = "isSuccess")]
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default, alias = "transactionId")]
    transaction_id: Option<IdRepr>,
    #[serde(default)]
    amount: Option<u64>,
    #[serde(default)]
    fee: Option<u64>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl TransferResultBody {
    fn into_result(self) -> Result<TransferResult, SessionError> {
        let timestamp = self.timestamp.unwrap_or_else(Utc::now);

        let result = if self.success {
            let id = self
                .transaction_id
                .and_then(|id| TransactionId::new(id.into_string()))
                .ok_or_else(|| {
                    SessionError::Server("successful transfer without a transaction id".into())
                })?;
            TransferResult::succeeded(id, self.message, timestamp)
        } else {
            TransferResult::failed(self.message, timestamp)
        };

        Ok(result.with_charges(self.amount, self.fee))
    }
}

/// Authenticated connection to the banking API.
///
/// Holds at most one bearer token. Any endpoint answering 401 clears it;
/// callers must log in again before the next authenticated call.
pub struct BankingSession {
    base_url: String,
    client: reqwest::Client,
    session: RwLock<Session>,
}

impl BankingSession {
    /// Create a session against `base_url` with a default HTTP client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a session with a preconfigured HTTP client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            session: RwLock::new(Session::new()),
        }
    }

    /// Build an endpoint URL
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Username the current token was issued for
    pub async fn username(&self) -> Option<String> {
        self.session.read().await.username().map(str::to_string)
    }

    /// The held token, or `Expired` when there is none
    async fn bearer(&self) -> Result<AccessToken, SessionError> {
        self.session
            .read()
            .await
            .token()
            .cloned()
            .ok_or(SessionError::Expired)
    }

    /// Map a non-success response, invalidating the token on 401
    async fn reject(&self, token: &AccessToken, response: Response) -> SessionError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            if self.session.write().await.clear_if_current(token) {
                warn!("server rejected the session token; cleared");
            }
            return SessionError::Expired;
        }
        SessionError::Server(error_message(response).await)
    }

    /// Send an authenticated multipart request
    async fn post_multipart(
        &self,
        path: &str,
        form: MultipartForm,
    ) -> Result<(AccessToken, Response), SessionError> {
        let token = self.bearer().await?;
        debug!(path, boundary = form.boundary(), "POST multipart");

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token.expose())
            .header(reqwest::header::CONTENT_TYPE, form.content_type())
            .body(form.into_body())
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        Ok((token, response))
    }
}

/// Pull `error` (or `message`) out of an error body
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .unwrap_or_else(|| format!("HTTP {}", status))
}

#[async_trait]
impl BankingApi for BankingSession {
    async fn login(&self, username: &str, password: &str) -> Result<AccessGrant, AuthError> {
        debug!(username, "POST {}", LOGIN_PATH);

        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.status() != StatusCode::OK {
            let message = error_message(response).await;
            warn!(username, "login rejected: {}", message);
            return Err(AuthError::Rejected(message));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Rejected(format!("invalid login response: {}", e)))?;

        self.session
            .write()
            .await
            .establish(AccessToken::new(body.access_token), body.username.clone());
        info!(user_id = body.user_id, username = %body.username, "logged in");

        Ok(AccessGrant {
            user_id: body.user_id,
            username: body.username,
        })
    }

    async fn logout(&self) {
        self.session.write().await.clear();
        debug!("logged out");
    }

    async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_active()
    }

    async fn fetch_accounts(&self) -> Result<Vec<Account>, SessionError> {
        let token = self.bearer().await?;
        debug!("GET {}", ACCOUNTS_PATH);

        let response = self
            .client
            .get(self.url(ACCOUNTS_PATH))
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(self.reject(&token, response).await);
        }

        let body: AccountsResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Server(format!("invalid accounts response: {}", e)))?;

        Ok(body.accounts)
    }

    async fn execute_transfer(
        &self,
        draft: &TransferRequest,
        evidence: &VoiceEvidence,
    ) -> Result<TransferResult, SessionError> {
        let audio = evidence.audio();
        let mut form = MultipartForm::new()
            .file(
                "audio",
                audio.file_name(),
                audio.mime_type().as_str(),
                audio.data(),
            )
            .text("text", evidence.transcript())
            .text("recipient_name", draft.recipient_name())
            .text("amount", draft.amount().won().to_string());
        if let Some(account) = draft.from_account() {
            form = form.text("from_account", account);
        }
        if let Some(memo) = draft.memo() {
            form = form.text("memo", memo);
        }

        let (token, response) = self.post_multipart(VOICE_TRANSFER_PATH, form).await?;

        if response.status() != StatusCode::OK {
            return Err(self.reject(&token, response).await);
        }

        let body: TransferResultBody = response
            .json()
            .await
            .map_err(|e| SessionError::Server(format!("invalid transfer response: {}", e)))?;

        body.into_result()
    }

    async fn register_voice_profile(
        &self,
        audio: &AudioData,
    ) -> Result<RegistrationResult, SessionError> {
        let form = MultipartForm::new().file(
            "audio",
            audio.file_name(),
            audio.mime_type().as_str(),
            audio.data(),
        );

        let (token, response) = self.post_multipart(VOICE_REGISTER_PATH, form).await?;

        if response.status() != StatusCode::OK {
            return Err(self.reject(&token, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| SessionError::Server(format!("invalid registration response: {}", e)))
    }
}
