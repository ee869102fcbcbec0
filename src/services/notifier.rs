//! Push notification delivery.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const PUSHOVER_ENDPOINT: &str = "https://api.pushover.net/1/messages.json";

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("push delivery failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("push endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Delivery of a titled text message to the push endpoint. Failures are
/// reported to the caller, which logs and moves on — no retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, message: &str) -> Result<(), NotifyError>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Pushover delivery over HTTPS POST.
pub struct PushoverNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    user: String,
}

impl PushoverNotifier {
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        Self::with_endpoint(PUSHOVER_ENDPOINT, token, user)
    }

    /// Point delivery at a different endpoint (mock servers in tests).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
            user: user.into(),
        }
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("token", self.token.as_str()),
                ("user", self.user.as_str()),
                ("title", title),
                ("message", message),
                ("priority", "0"),
            ])
            .timeout(DELIVERY_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Status(status))
        }
    }
}

/// Stands in when push credentials are not configured; the engine keeps
/// running with alerts disabled.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, title: &str, _message: &str) -> Result<(), NotifyError> {
        debug!(title, "notifications disabled, dropping message");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
