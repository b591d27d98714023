//! Maps command outcomes to the text shown to the invoking user.

use crate::{
    client::{DispatchError, SentEmail},
    command::ParseError,
    dto::CommandResponse,
};

pub const USAGE: &str = "Usage: /email [to@example.com] [subject] [message]";
pub const MISSING_API_KEY: &str = "Error: ADSMedia API key not configured";

/// Everything that can stop a command from sending. `Display` is the reply text.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{}", USAGE)]
    Usage(#[from] ParseError),

    #[error("{}", MISSING_API_KEY)]
    MissingApiKey,

    #[error("Error: {0}")]
    Dispatch(#[from] DispatchError),
}

pub fn format_reply(to: &str, outcome: &Result<SentEmail, CommandError>) -> CommandResponse {
    match outcome {
        Ok(sent) => CommandResponse::ephemeral(format!(
            "✅ Email sent to {}! Message ID: {}",
            to, sent.message_id
        )),
        Err(e) => CommandResponse::ephemeral(e.to_string()),
    }
}
