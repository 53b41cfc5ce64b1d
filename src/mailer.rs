use async_trait::async_trait;
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::{error, info, instrument, warn};

use crate::{config::AppConfig, errors::ServiceError};

/// A rendered outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Delivery seam for transactional mail.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), ServiceError>;
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Posts mail as JSON to an HTTP relay (Resend / Postmark style APIs).
pub struct HttpMailRelay {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailRelay {
    pub fn new(url: String, api_key: Option<String>, from: String) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build mail relay client");
                ServiceError::InternalError("Failed to build mail relay client".to_string())
            })?;

        Ok(Self {
            client,
            url,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailRelay {
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send(&self, message: MailMessage) -> Result<(), ServiceError> {
        let payload = RelayPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                info!("Mail accepted by relay");
                Ok(())
            }
            Ok(response) => {
                warn!(status = %response.status(), "Mail relay rejected message");
                Err(ServiceError::ExternalServiceError(format!(
                    "Mail relay responded with {}",
                    response.status()
                )))
            }
            Err(e) => {
                warn!(error = %e, "Mail relay unreachable");
                Err(ServiceError::ExternalServiceError(e.to_string()))
            }
        }
    }
}

/// Writes mail to the log instead of sending it. Used when no relay is configured.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: MailMessage) -> Result<(), ServiceError> {
        info!(to = %message.to, subject = %message.subject, "Mail relay not configured; logging message");
        Ok(())
    }
}

pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Mailer>, ServiceError> {
    match &config.mail_relay_url {
        Some(url) => Ok(Arc::new(HttpMailRelay::new(
            url.clone(),
            config.mail_api_key.clone(),
            config.mail_from.clone(),
        )?)),
        None => Ok(Arc::new(LogMailer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let message = MailMessage {
            to: "a@b.co".into(),
            subject: "Hi".into(),
            html: "<p>Hi</p>".into(),
            text: "Hi".into(),
        };
        assert!(LogMailer.send(message).await.is_ok());
    }

    #[tokio::test]
    async fn unreachable_relay_is_an_external_error() {
        let relay = HttpMailRelay::new("http://127.0.0.1:9/send".into(), None, "shop@x.co".into())
            .unwrap();
        let result = relay
            .send(MailMessage {
                to: "a@b.co".into(),
                subject: "Hi".into(),
                html: String::new(),
                text: String::new(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::ExternalServiceError(_))));
    }
}
