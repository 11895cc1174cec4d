use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::MailConfig;

/// Outbound transactional mail. The SMTP transport is an external
/// collaborator; tests swap in [`MockMailer`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, to: &str, token: &str) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    verify_base_url: String,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let transport = if !config.smtp_username.is_empty() {
            let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                .credentials(creds)
                .port(config.smtp_port)
                .build()
        } else {
            // No auth (Mailpit/Mailhog)
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        };

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_email).parse()?;

        Ok(Self {
            transport,
            from,
            verify_base_url: config.verify_base_url.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification(&self, to: &str, token: &str) -> anyhow::Result<()> {
        let name = to.split('@').next().unwrap_or(to);
        let url = format!("{}/auth/verify-email?token={}", self.verify_base_url, token);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject("Welcome to our app! Please confirm your email")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Hi {name},\n\nPlease confirm your email address by opening the link below:\n\n{url}\n\nIf you did not sign up, you can ignore this message.\n"
            ))?;

        self.transport.send(message).await?;
        info!(%to, "verification email sent");
        Ok(())
    }
}

/// Capturing mailer for unit tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: std::sync::Arc<tokio::sync::Mutex<Vec<(String, String)>>>,
}

#[cfg(test)]
impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(to, token)` pairs captured so far.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent.lock().await.iter().any(|(to, _)| to == email)
    }
}

#[cfg(test)]
#[async_trait]
impl Mailer for MockMailer {
    async fn send_verification(&self, to: &str, token: &str) -> anyhow::Result<()> {
        self.sent.lock().await.push((to.to_string(), token.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_mailer_captures_sends() {
        let mailer = MockMailer::new();
        mailer
            .send_verification("user@example.com", "123456")
            .await
            .unwrap();

        assert_eq!(mailer.sent_count().await, 1);
        assert!(mailer.was_sent_to("user@example.com").await);
        assert!(!mailer.was_sent_to("other@example.com").await);

        let sent = mailer.sent().await;
        assert_eq!(sent[0].1, "123456");
    }

    #[test]
    fn smtp_mailer_builds_without_credentials() {
        let config = MailConfig {
            smtp_host: "localhost".into(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@localhost".into(),
            from_name: "Linkstash".into(),
            verify_base_url: "http://localhost:8080".into(),
        };
        assert!(SmtpMailer::new(&config).is_ok());
    }
}
