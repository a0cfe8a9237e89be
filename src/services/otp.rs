use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::{
    models::{OtpRequest, Purpose},
    templates,
};

use super::email::{MailTransport, MailerError, OutgoingEmail};

pub const ALLOWED_DOMAIN: &str = "@plv.edu.ph";

#[derive(Debug, Error)]
pub enum OtpServiceError {
    #[error("Missing required fields: email, code, purpose")]
    MissingFields,
    #[error("Only PLV email addresses are allowed")]
    DomainNotAllowed,
    #[error("{0}")]
    Template(#[from] askama::Error),
    #[error("{0}")]
    Mail(#[from] MailerError),
}

impl OtpServiceError {
    /// Caller mistakes, as opposed to failures while producing or delivering mail.
    pub fn is_validation(&self) -> bool {
        matches!(self, OtpServiceError::MissingFields | OtpServiceError::DomainNotAllowed)
    }
}

pub struct OtpService {
    transport: Arc<dyn MailTransport>,
    from_address: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl OtpService {
    pub fn new(transport: Arc<dyn MailTransport>, from_address: String) -> Self {
        Self { transport, from_address }
    }

    /// Validates the request, renders the template for its purpose and sends
    /// exactly one email. No retry, no de-duplication.
    pub async fn send_otp(&self, request: &OtpRequest) -> Result<(), OtpServiceError> {
        let (Some(email), Some(code), Some(label)) = (
            present(&request.email),
            present(&request.code),
            present(&request.purpose),
        ) else {
            debug!("Rejected OTP request with missing fields");
            return Err(OtpServiceError::MissingFields);
        };

        if !email.ends_with(ALLOWED_DOMAIN) {
            debug!("Rejected OTP request for non-PLV address {}", email);
            return Err(OtpServiceError::DomainNotAllowed);
        }

        let purpose = Purpose::from_label(label);
        let template = templates::render(purpose, code)?;
        let outgoing = OutgoingEmail {
            from: self.from_address.clone(),
            to: email.to_string(),
            subject: template.subject.to_string(),
            html_body: template.html_body,
        };

        let mut session = self.transport.connect().await?;
        let result = session.send(&outgoing).await;
        session.close().await;
        result?;

        info!("Sent {} OTP email to {}", purpose.label(), email);
        Ok(())
    }
}
