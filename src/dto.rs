use serde::{Deserialize, Serialize};

/// Body of `POST /send` on the ADSMedia API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub from_name: String,
}

/// Envelope returned by the ADSMedia API. Missing or `null` fields count as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendEmailResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<SendEmailData>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendEmailData {
    #[serde(default)]
    pub message_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Form payload the chat platform posts when a user runs the slash command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlashCommandRequest {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub channel_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only visible to the invoking user.
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub response_type: ResponseType,
    pub text: String,
}

impl CommandResponse {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}
