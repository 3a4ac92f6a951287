//! Login form.

use crate::api::ApiError;
use crate::form::validation;
use crate::session::Session;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const LOGIN_INVALID: &str = "Please fix the errors in the form.";
pub const LOGIN_FAILED: &str = "Invalid email or password. Please try again.";
pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const LOGIN_IN_PROGRESS: &str = "Login already in progress.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
}

impl LoginField {
    pub fn label(self) -> &'static str {
        match self {
            LoginField::Email => "Enter Email",
            LoginField::Password => "Password",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    errors: BTreeMap<LoginField, &'static str>,
    submitting: bool,
}

impl LoginForm {
    pub fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    pub fn push_char(&mut self, field: LoginField, c: char) {
        match field {
            LoginField::Email => self.email.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    pub fn pop_char(&mut self, field: LoginField) {
        match field {
            LoginField::Email => self.email.pop(),
            LoginField::Password => self.password.pop(),
        };
    }

    pub fn error(&self, field: LoginField) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Check both fields at once, replacing previous errors.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        if let Some(message) = validation::validate_login_email(&self.email) {
            self.errors.insert(LoginField::Email, message);
        }
        if let Some(message) = validation::validate_password(&self.password) {
            self.errors.insert(LoginField::Password, message);
        }
        self.errors.is_empty()
    }

    /// Validate and enter the submitting state.
    ///
    /// # Returns
    /// * `Ok((email, password))` - Credentials to send
    /// * `Err(message)` - Aggregate message to show instead
    pub fn begin_login(&mut self) -> Result<(String, String), &'static str> {
        if self.submitting {
            return Err(LOGIN_IN_PROGRESS);
        }
        if !self.validate() {
            return Err(LOGIN_INVALID);
        }
        self.submitting = true;
        Ok((self.email.clone(), self.password.clone()))
    }

    /// Apply the login outcome, storing the token in the session on success.
    pub fn finish_login(
        &mut self,
        outcome: Result<String, ApiError>,
        session: &mut Session,
    ) -> Result<&'static str, &'static str> {
        self.submitting = false;
        match outcome {
            Ok(token) => {
                session.update(token, &self.email);
                info!("logged in");
                self.password.clear();
                Ok(LOGIN_SUCCESS)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                Err(LOGIN_FAILED)
            }
        }
    }

    /// Validate, call the backend and apply the outcome.
    #[cfg(test)]
    pub async fn login(
        &mut self,
        client: &crate::api::ApiClient,
        session: &mut Session,
    ) -> Result<&'static str, &'static str> {
        let (email, password) = self.begin_login()?;
        let outcome = client.login(&email, &password).await;
        self.finish_login(outcome, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::api::client::tests::test_config;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            ..LoginForm::default()
        }
    }

    #[test]
    fn test_validate_reports_both_fields() {
        let mut login = form("", "123");
        assert!(!login.validate());
        assert_eq!(login.error(LoginField::Email), Some(validation::EMAIL_REQUIRED));
        assert_eq!(login.error(LoginField::Password), Some(validation::PASSWORD_TOO_SHORT));

        login.email = "a@b.co".to_string();
        login.password = "123456".to_string();
        assert!(login.validate());
        assert_eq!(login.error(LoginField::Email), None);
    }

    #[test]
    fn test_begin_login_rejects_invalid_input() {
        let mut login = form("nope", "123456");
        assert_eq!(login.begin_login(), Err(LOGIN_INVALID));
        assert!(!login.is_submitting());
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({"email": "a@b.co", "password": "secret1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "t-9"})))
            .expect(1)
            .mount(&server)
            .await;
        let client = ApiClient::new(&test_config(&server), &Session::default()).unwrap();

        let mut session = Session::default();
        let mut login = form("a@b.co", "secret1");
        assert_eq!(login.login(&client, &mut session).await, Ok(LOGIN_SUCCESS));
        assert_eq!(session.token(), Some("t-9"));
        assert!(login.password.is_empty());
        assert!(!login.is_submitting());
    }

    #[tokio::test]
    async fn test_rejected_credentials_leave_session_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let client = ApiClient::new(&test_config(&server), &Session::default()).unwrap();

        let mut session = Session::default();
        let mut login = form("a@b.co", "secret1");
        assert_eq!(login.login(&client, &mut session).await, Err(LOGIN_FAILED));
        assert!(!session.is_authenticated());
    }
}
