use crate::transcript::Turn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ChatReqInput {
    pub user_input: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: String,
}

/// Outbound body for the completion provider. `messages` carries the full
/// transcript accumulated so far, including the current user turn.
#[derive(Debug, Serialize)]
pub struct CompletionReqInput<'a> {
    pub model: &'a str,
    pub messages: &'a [Turn],
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,

    #[serde(flatten)]
    pub other: Value,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: String,
}

impl CompletionResponse {
    pub fn into_reply_text(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}
