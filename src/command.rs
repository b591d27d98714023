//! Parsing of `/email [to] [subject] [message]`.

pub const TRIGGER: &str = "email";
pub const AUTOCOMPLETE_DESC: &str = "Send email via ADSMedia";
pub const AUTOCOMPLETE_HINT: &str = "[to] [subject] [message]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCommand {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected 4 segments (trigger, recipient, subject, message), got {found}")]
pub struct ParseError {
    pub found: usize,
}

impl EmailCommand {
    /// Splits `raw` at its first three whitespace characters.
    ///
    /// Each whitespace character is a boundary, so repeated separators yield
    /// empty segments. Everything after the third boundary is the body,
    /// kept verbatim. The trigger segment is not checked and the recipient
    /// is not validated.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let parts: Vec<&str> = raw.splitn(4, char::is_whitespace).collect();
        let [_trigger, recipient, subject, body] = parts[..] else {
            return Err(ParseError { found: parts.len() });
        };

        Ok(Self {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }
}
