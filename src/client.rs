use crate::{
    config::Configuration,
    dto::{SendEmailRequest, SendEmailResponse},
};

use reqwest::StatusCode;

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response from ADSMedia API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),

    #[error("ADSMedia API responded with status {0}")]
    Status(StatusCode),
}

/// Result of an accepted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub message_id: String,
}

/// Client for the ADSMedia transactional email API.
#[derive(Clone)]
pub struct AdsMediaClient {
    base_url: String,
    client: reqwest::Client,
}

impl AdsMediaClient {
    /// Builds the client. Without a timeout, reqwest's default (none) applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(AdsMediaClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn get_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Sends one email. The caller must have checked that an API key is set.
    ///
    /// The response body is decoded whatever the HTTP status; a non-2xx
    /// status only shows up through the envelope's `success` flag.
    pub async fn send_email(
        &self,
        config: &Configuration,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<SentEmail, DispatchError> {
        let payload = SendEmailRequest {
            to: to.to_string(),
            subject: subject.to_string(),
            html: format!("<p>{}</p>", body),
            from_name: config.default_from_name.clone(),
        };

        let url = self.get_url("/send");
        tracing::debug!("Posting email for '{}' to {}", to, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("ADSMedia API responded with status {}", status);
        }

        let bytes = response.bytes().await?;
        let result: SendEmailResponse = serde_json::from_slice(&bytes)?;

        if !result.success {
            return Err(DispatchError::Api(
                result.error.unwrap_or_default().message,
            ));
        }

        Ok(SentEmail {
            message_id: result.data.unwrap_or_default().message_id,
        })
    }

    /// Checks that the API is reachable and accepts the key.
    pub async fn ping(&self, config: &Configuration) -> Result<(), DispatchError> {
        let response = self
            .client
            .get(self.get_url("/ping"))
            .bearer_auth(&config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status));
        }
        Ok(())
    }
}
