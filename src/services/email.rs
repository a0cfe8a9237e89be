use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use log::debug;
use thiserror::Error;

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid {field} address: {reason}")]
    InvalidAddress { field: &'static str, reason: String },
    #[error("Failed to build email: {0}")]
    Build(String),
    #[error("{0}")]
    Smtp(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// Opens one session per message.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn MailSession>, MailerError>;
}

/// One message's worth of access to the relay. Callers close it on every path;
/// dropping it releases it as well.
#[async_trait::async_trait]
pub trait MailSession: Send {
    async fn send(&mut self, email: &OutgoingEmail) -> Result<(), MailerError>;
    async fn close(&mut self);
}

pub struct SmtpTransport {
    config: SmtpConfig,
}

impl SmtpTransport {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpTransport {
    async fn connect(&self) -> Result<Box<dyn MailSession>, MailerError> {
        // Implicit TLS. No socket is opened here: without the pool feature
        // lettre connects, authenticates and quits inside each send.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|e| MailerError::Smtp(e.to_string()))?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();
        debug!("SMTP session prepared for {}:{}", self.config.host, self.config.port);
        Ok(Box::new(SmtpSession { transport }))
    }
}

struct SmtpSession {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait::async_trait]
impl MailSession for SmtpSession {
    async fn send(&mut self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let message = build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Smtp(e.to_string()))?;
        Ok(())
    }

    // The connection was already closed by `send`; the transport itself
    // goes when the session is dropped.
    async fn close(&mut self) {
        debug!("SMTP session released");
    }
}

fn parse_mailbox(field: &'static str, value: &str) -> Result<Mailbox, MailerError> {
    value.parse().map_err(|e: lettre::address::AddressError| MailerError::InvalidAddress {
        field,
        reason: e.to_string(),
    })
}

/// Plain-text and HTML alternatives both carry the rendered HTML.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailerError> {
    Message::builder()
        .from(parse_mailbox("from", &email.from)?)
        .to(parse_mailbox("recipient", &email.to)?)
        .subject(email.subject.as_str())
        .multipart(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(email.html_body.clone()))
                .singlepart(SinglePart::html(email.html_body.clone())),
        )
        .map_err(|e| MailerError::Build(e.to_string()))
}
