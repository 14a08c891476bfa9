use std::sync::Arc;

use tracing::debug;

use api::{AuthApi, TokenStore};
use quiz_core::model::{Registration, User, UserRole};

use crate::error::AuthError;

/// Seconds a learner must wait before asking for the OTP again.
pub const OTP_RESEND_WINDOW_SECS: u32 = 30;

/// The registration form as typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
    pub role: Option<UserRole>,
}

impl RegistrationForm {
    /// Validates the form into a request-ready registration.
    ///
    /// Mirrors the backend's acceptance rules so the learner sees field
    /// errors before any request goes out: name present, plausible email,
    /// password of at least 6 characters, mobile of exactly 10 digits.
    ///
    /// # Errors
    ///
    /// Returns the first failing field's `AuthError`.
    pub fn validate(&self) -> Result<Registration, AuthError> {
        if self.name.trim().is_empty() {
            return Err(AuthError::EmptyName);
        }
        if !email_looks_valid(&self.email) {
            return Err(AuthError::InvalidEmail);
        }
        if self.password.len() < 6 {
            return Err(AuthError::PasswordTooShort);
        }
        if self.mobile.len() != 10 || !self.mobile.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::InvalidMobile);
        }

        Ok(Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: self.mobile.clone(),
            password: self.password.clone(),
            role: self.role.unwrap_or(UserRole::Student),
        })
    }
}

fn email_looks_valid(email: &str) -> bool {
    let email = email.trim();
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Login, registration, OTP verification, and token custody.
///
/// The token store is the only state: a stored token means logged in, and
/// every backend request picks it up from there.
#[derive(Clone)]
pub struct AuthService {
    auth: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { auth, tokens }
    }

    /// True while a token is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.tokens.token().is_some()
    }

    /// Exchanges credentials for a token and stores it.
    ///
    /// # Errors
    ///
    /// Returns validation errors for blank fields, `AuthError::Api` for
    /// rejected credentials, and `AuthError::Token` if the token cannot be
    /// persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if !email_looks_valid(email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let token = self.auth.login(email.trim(), password).await?;
        self.tokens.store(&token)?;
        debug!("login succeeded, token stored");
        Ok(())
    }

    /// Forgets the stored token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the stored token cannot be removed.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.tokens.clear()?;
        Ok(())
    }

    /// The profile behind the stored token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` (401) when not logged in.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        Ok(self.auth.me().await?)
    }

    /// Emails a one-time code to the address.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed address and
    /// `AuthError::Api` on backend failure.
    pub async fn send_otp(&self, email: &str) -> Result<(), AuthError> {
        if !email_looks_valid(email) {
            return Err(AuthError::InvalidEmail);
        }
        Ok(self.auth.send_otp(email.trim()).await?)
    }

    /// Confirms the one-time code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyOtp` for a blank code and `AuthError::Api`
    /// for an invalid or expired one.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<(), AuthError> {
        if otp.trim().is_empty() {
            return Err(AuthError::EmptyOtp);
        }
        Ok(self.auth.verify_otp(email.trim(), otp.trim()).await?)
    }

    /// Creates the account. The email must have been OTP-verified first;
    /// the backend enforces that, this just relays it.
    ///
    /// # Errors
    ///
    /// Returns field validation errors or `AuthError::Api`.
    pub async fn register(&self, form: &RegistrationForm) -> Result<(), AuthError> {
        let registration = form.validate()?;
        Ok(self.auth.register(&registration).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Priya Patel".into(),
            email: "priya@example.com".into(),
            password: "secret123".into(),
            mobile: "9876543210".into(),
            role: Some(UserRole::Student),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn form_rejects_bad_fields() {
        let mut f = form();
        f.name = " ".into();
        assert!(matches!(f.validate(), Err(AuthError::EmptyName)));

        let mut f = form();
        f.email = "not-an-email".into();
        assert!(matches!(f.validate(), Err(AuthError::InvalidEmail)));

        let mut f = form();
        f.password = "short".into();
        assert!(matches!(f.validate(), Err(AuthError::PasswordTooShort)));

        let mut f = form();
        f.mobile = "12345".into();
        assert!(matches!(f.validate(), Err(AuthError::InvalidMobile)));

        let mut f = form();
        f.mobile = "987654321a".into();
        assert!(matches!(f.validate(), Err(AuthError::InvalidMobile)));
    }

    #[test]
    fn missing_role_defaults_to_student() {
        let mut f = form();
        f.role = None;
        assert_eq!(f.validate().unwrap().role, UserRole::Student);
    }

    #[test]
    fn email_validation_matches_form_rules() {
        assert!(email_looks_valid("a@b.co"));
        assert!(email_looks_valid(" padded@example.com "));
        assert!(!email_looks_valid("a@b"));
        assert!(!email_looks_valid("@b.co"));
        assert!(!email_looks_valid("a b@c.co"));
        assert!(!email_looks_valid("a@.co"));
        assert!(!email_looks_valid(""));
    }
}
