use crate::{
    client::{AdsMediaClient, DispatchError, SentEmail},
    command::EmailCommand,
    config::{Config, ConfigurationHolder},
    dto::CommandResponse,
    reply::{CommandError, format_reply},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum PingError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Runs `/email` invocations from start to reply.
pub struct EmailService {
    configuration: Arc<ConfigurationHolder>,
    client: AdsMediaClient,
    command_token: Option<String>,
}

impl EmailService {
    pub fn new(
        config: &Config,
        configuration: Arc<ConfigurationHolder>,
    ) -> Result<Self, reqwest::Error> {
        Ok(EmailService {
            configuration,
            client: AdsMediaClient::new(&config.api_base_url, config.request_timeout)?,
            command_token: config.command_token.clone(),
        })
    }

    /// True when no token is configured or `token` matches it.
    pub fn verify_token(&self, token: &str) -> bool {
        self.command_token
            .as_deref()
            .is_none_or(|expected| expected == token)
    }

    /// Handles one raw command string such as
    /// `/email bob@example.com Hello the body`. Always produces a reply.
    pub async fn on_invoke(&self, raw: &str) -> CommandResponse {
        match EmailCommand::parse(raw) {
            Ok(command) => {
                let outcome = self.send(&command).await;
                format_reply(&command.recipient, &outcome)
            }
            Err(e) => {
                tracing::debug!("Rejected command: {e}");
                format_reply("", &Err(e.into()))
            }
        }
    }

    async fn send(&self, command: &EmailCommand) -> Result<SentEmail, CommandError> {
        let config = self.configuration.get().await;
        if config.api_key.is_empty() {
            tracing::warn!("Email command invoked but no ADSMedia API key is configured");
            return Err(CommandError::MissingApiKey);
        }

        tracing::info!(
            "Sending email to '{}' with subject '{}'",
            command.recipient,
            command.subject
        );

        match self
            .client
            .send_email(&config, &command.recipient, &command.subject, &command.body)
            .await
        {
            Ok(sent) => {
                tracing::info!(
                    "Message to {} accepted with id {}",
                    command.recipient,
                    sent.message_id
                );
                Ok(sent)
            }
            Err(e) => {
                tracing::error!("Failed to send email to {}: {e}", command.recipient);
                Err(e.into())
            }
        }
    }

    pub async fn ping(&self) -> Result<(), PingError> {
        let config = self.configuration.get().await;
        if config.api_key.is_empty() {
            return Err(PingError::MissingApiKey);
        }
        self.client.ping(&config).await?;
        Ok(())
    }
}
