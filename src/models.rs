use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct OtpRequest {
    pub email: Option<String>,
    pub code: Option<String>,
    pub purpose: Option<String>,
}

impl OtpRequest {
    /// Fields that are absent, null or not strings are left as `None`, so they
    /// surface as missing fields rather than parse errors.
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            email: field("email"),
            code: field("code"),
            purpose: field("purpose"),
        }
    }
}

#[cfg(test)]
impl OtpRequest {
    pub fn new(email: &str, code: &str, purpose: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            code: Some(code.to_string()),
            purpose: Some(purpose.to_string()),
        }
    }
}

/// Why a code was issued. Picks the email template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Signup,
    ResetPassword,
    ClaimVerification,
}

impl Purpose {
    /// Unknown labels resolve to `Signup` so a sendable email always exists.
    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_else(|| {
            warn!("Unknown purpose '{}', using the signup template", label);
            Purpose::Signup
        })
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "signup" => Some(Purpose::Signup),
            "reset_password" => Some(Purpose::ResetPassword),
            "claim_verification" => Some(Purpose::ClaimVerification),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Purpose::Signup => "signup",
            Purpose::ResetPassword => "reset_password",
            Purpose::ClaimVerification => "claim_verification",
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuccessBody {
    pub success: bool,
    pub message: String,
}

impl SuccessBody {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "OTP sent successfully".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
