use std::env;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use practice_core::AnswerRecord;

use crate::error::RemoteError;

/// Remote table that receives answered-question rows.
pub const QUESTION_LOGS_TABLE: &str = "question_logs";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

//
// ─── IDENTITY ──────────────────────────────────────────────────────────────────
//

/// Opaque authenticated-user handle issued by the remote collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
    access_token: String,
}

impl Identity {
    #[must_use]
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

//
// ─── CONTRACT ──────────────────────────────────────────────────────────────────
//

/// The opaque remote store: one batch insert plus the auth sub-interface.
///
/// No retry policy of its own; callers decide what a failure means.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Insert the rows as one batch, tagged with the identity.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the store is unconfigured, the request
    /// fails in transit, or the insert is rejected.
    async fn insert_answers(
        &self,
        rows: &[AnswerRecord],
        identity: &Identity,
    ) -> Result<(), RemoteError>;

    /// Register a new account; confirmation happens out of band.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Auth` when the backend rejects the sign-up.
    async fn sign_up(&self, email: &str, password: &str) -> Result<(), RemoteError>;

    /// Exchange credentials for an identity.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Auth` when the credentials are rejected.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, RemoteError>;

    /// Invalidate the identity's session.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the backend rejects the sign-out.
    async fn sign_out(&self, identity: &Identity) -> Result<(), RemoteError>;

    /// The identity of an existing session, if the client holds one.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` when the session state cannot be read.
    async fn get_session(&self) -> Result<Option<Identity>, RemoteError>;
}

//
// ─── HTTP CLIENT ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteConfig {
    /// Reads the backend endpoint from `PRACTICE_SYNC_URL` /
    /// `PRACTICE_SYNC_KEY`; `None` (disabled mode) when either is unset or
    /// blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("PRACTICE_SYNC_URL").ok()?;
        let api_key = env::var("PRACTICE_SYNC_KEY").ok()?;
        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            return None;
        }
        Some(Self { base_url, api_key })
    }
}

/// `RemoteStore` over the backend's REST interface.
///
/// Holds the last signed-in identity so `get_session` can hand it back
/// without a network round trip.
pub struct HttpRemoteStore {
    client: Client,
    config: Option<RemoteConfig>,
    session: Mutex<Option<Identity>>,
}

impl HttpRemoteStore {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(RemoteConfig::from_env())
    }

    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized (should not happen
    /// with the default configuration).
    #[must_use]
    pub fn new(config: Option<RemoteConfig>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("HTTP client construction with default settings should not fail");
        Self {
            client,
            config,
            session: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    fn config(&self) -> Result<&RemoteConfig, RemoteError> {
        self.config.as_ref().ok_or(RemoteError::Disabled)
    }

    fn endpoint(&self, path: &str) -> Result<String, RemoteError> {
        let config = self.config()?;
        Ok(format!("{}/{path}", config.base_url.trim_end_matches('/')))
    }

    fn remember_session(&self, identity: Option<Identity>) {
        if let Ok(mut session) = self.session.lock() {
            *session = identity;
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn insert_answers(
        &self,
        rows: &[AnswerRecord],
        identity: &Identity,
    ) -> Result<(), RemoteError> {
        let config = self.config()?;
        let url = self.endpoint(&format!("rest/v1/{QUESTION_LOGS_TABLE}"))?;
        let payload: Vec<QuestionLogRow<'_>> = rows
            .iter()
            .map(|record| QuestionLogRow::new(record, identity.user_id()))
            .collect();

        let response = self
            .client
            .post(url)
            .header("apikey", &config.api_key)
            .bearer_auth(identity.access_token())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Insert(format!(
                "status {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), RemoteError> {
        let config = self.config()?;
        let url = self.endpoint("auth/v1/signup")?;

        let response = self
            .client
            .post(url)
            .header("apikey", &config.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Auth(auth_failure_message(response).await));
        }

        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, RemoteError> {
        let config = self.config()?;
        let url = self.endpoint("auth/v1/token?grant_type=password")?;

        let response = self
            .client
            .post(url)
            .header("apikey", &config.api_key)
            .json(&Credentials { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Auth(auth_failure_message(response).await));
        }

        let body: SignInResponse = response.json().await?;
        let identity = Identity::new(body.user.id, body.access_token);
        self.remember_session(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self, identity: &Identity) -> Result<(), RemoteError> {
        let config = self.config()?;
        let url = self.endpoint("auth/v1/logout")?;

        let response = self
            .client
            .post(url)
            .header("apikey", &config.api_key)
            .bearer_auth(identity.access_token())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RemoteError::Auth(auth_failure_message(response).await));
        }

        self.remember_session(None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Identity>, RemoteError> {
        Ok(self
            .session
            .lock()
            .map(|session| session.clone())
            .unwrap_or(None))
    }
}

/// Best-effort human-readable message from an auth error response.
async fn auth_failure_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<AuthErrorBody>().await {
        Ok(body) => body
            .msg
            .or(body.error_description)
            .unwrap_or_else(|| format!("status {status}")),
        Err(_) => format!("status {status}"),
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct QuestionLogRow<'a> {
    user_id: &'a str,
    num1: u8,
    num2: u8,
    user_answer: Option<u32>,
    is_correct: bool,
    time_taken: f64,
    hint_used: bool,
}

impl<'a> QuestionLogRow<'a> {
    fn new(record: &AnswerRecord, user_id: &'a str) -> Self {
        Self {
            user_id,
            num1: record.num1(),
            num2: record.num2(),
            user_answer: record.user_answer(),
            is_correct: record.correct(),
            time_taken: record.time_taken_secs(),
            hint_used: record.used_hint(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
}
