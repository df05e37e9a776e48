use crate::io_struct::{CompletionReqInput, CompletionResponse, ErrorReply};
use crate::transcript::{SessionStore, Turn};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

// No Debug derive: the config carries the provider credential and must not
// end up in log output.
#[derive(Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub provider_url: String,
    pub api_key: String,
    pub system_prompt: String,
    pub allowed_origin: String,
    pub timeout: u64,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Fixed per-kind message returned to the caller; the wrapped detail
    /// string goes to the log only.
    fn public_message(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "user_input must be a non-empty string.",
            RelayError::Provider(_) => "The completion provider could not be reached.",
            RelayError::Internal(_) => "An error occurred while processing the request.",
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Provider(_) => StatusCode::BAD_GATEWAY,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("request failed: {}", self);
        HttpResponse::build(self.status_code()).json(ErrorReply {
            error: self.public_message().to_string(),
        })
    }
}

#[derive(Clone)]
pub struct RelayState {
    pub sessions: SessionStore,
    client: reqwest::Client,
    model: String,
    provider_url: String,
    api_key: String,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(RelayState {
            sessions: SessionStore::new(&config.system_prompt),
            client,
            model: config.model.clone(),
            provider_url: config.provider_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Appends the user turn, submits the whole transcript to the provider,
    /// and appends the reply. The session lock is held across the provider
    /// call so the three steps are atomic per session. On provider failure
    /// the user turn stays in place and no assistant turn is appended.
    pub async fn chat(
        &self,
        session_id: Option<&str>,
        user_input: &str,
    ) -> Result<String, RelayError> {
        if user_input.trim().is_empty() {
            return Err(RelayError::Validation(
                "empty user_input in request body".to_string(),
            ));
        }
        let transcript = self.sessions.get_or_create(session_id);
        let mut transcript = transcript.lock().await;
        transcript.push_user(user_input);
        let reply = self.complete(transcript.turns()).await?;
        transcript.push_assistant(reply.clone());
        Ok(reply)
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, RelayError> {
        let request = CompletionReqInput {
            model: &self.model,
            messages: turns,
        };
        let resp = self
            .client
            .post(&self.provider_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::Provider(format!("request failed: {}", e)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::Provider(format!(
                "provider returned status {}",
                status
            )));
        }
        let response: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| RelayError::Provider(format!("malformed response body: {}", e)))?;
        response
            .into_reply_text()
            .ok_or_else(|| RelayError::Provider("response contained no choices".to_string()))
    }
}
