use askama::Template;

use crate::models::Purpose;

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupEmail<'a> {
    code: &'a str,
}

#[derive(Template)]
#[template(path = "reset_password.html")]
struct ResetPasswordEmail<'a> {
    code: &'a str,
}

#[derive(Template)]
#[template(path = "claim_verification.html")]
struct ClaimVerificationEmail<'a> {
    code: &'a str,
}

/// A rendered email, ready to hand to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: &'static str,
    pub html_body: String,
}

impl Purpose {
    pub fn subject(&self) -> &'static str {
        match self {
            Purpose::Signup => "Verify your PLV Lost and Found account",
            Purpose::ResetPassword => "Reset your PLV Lost and Found password",
            Purpose::ClaimVerification => "Confirm your PLV Lost and Found item claim",
        }
    }
}

/// The code is inserted as-is; templates mark the slot `safe`.
pub fn render(purpose: Purpose, code: &str) -> Result<EmailTemplate, askama::Error> {
    let html_body = match purpose {
        Purpose::Signup => SignupEmail { code }.render()?,
        Purpose::ResetPassword => ResetPasswordEmail { code }.render()?,
        Purpose::ClaimVerification => ClaimVerificationEmail { code }.render()?,
    };
    Ok(EmailTemplate {
        subject: purpose.subject(),
        html_body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "483920";

    #[test]
    fn each_purpose_gets_its_subject_and_one_code_slot() {
        for purpose in [Purpose::Signup, Purpose::ResetPassword, Purpose::ClaimVerification] {
            let email = render(purpose, CODE).unwrap();
            assert_eq!(email.subject, purpose.subject());
            assert_eq!(email.html_body.matches(CODE).count(), 1, "{}", purpose.label());
        }
    }

    #[test]
    fn subjects_are_distinct() {
        assert_ne!(Purpose::Signup.subject(), Purpose::ResetPassword.subject());
        assert_ne!(Purpose::Signup.subject(), Purpose::ClaimVerification.subject());
        assert_ne!(Purpose::ResetPassword.subject(), Purpose::ClaimVerification.subject());
    }

    #[test]
    fn unknown_purpose_renders_signup_template() {
        let fallback = render(Purpose::from_label("bogus"), CODE).unwrap();
        let signup = render(Purpose::Signup, CODE).unwrap();
        assert_eq!(fallback, signup);
    }

    #[test]
    fn code_is_not_escaped() {
        let email = render(Purpose::Signup, "A&B<1>").unwrap();
        assert!(email.html_body.contains("A&B<1>"));
    }
}
