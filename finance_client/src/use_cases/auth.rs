use std::time::Duration;

use crate::domain::errors::{AuthError, ClientError};
use crate::domain::session::{Route, Session};
use crate::interface_adapters::api::{AuthResponse, FinanceApi};
use crate::use_cases::session_store::SessionStore;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
const FALLBACK_USER_NAME: &str = "User";

/// Login, registration and session resumption for the auth page.
#[derive(Clone)]
pub struct AuthService {
    api: FinanceApi,
    session: SessionStore,
    min_password_length: usize,
    // Pause between a successful sign-in and the redirect, so the notice can be read.
    redirect_delay: Duration,
}

impl AuthService {
    pub fn new(api: FinanceApi, session: SessionStore) -> Self {
        Self {
            api,
            session,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            redirect_delay: Duration::ZERO,
        }
    }

    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    #[tracing::instrument(name = "login", skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        self.validate_credentials(email, password)?;

        let response = self
            .api
            .login(email, password)
            .await
            .map_err(|err| friendly(err, login_message))?;

        let name = display_name(&response);
        Ok(self.sign_in(&response.token, email, &name).await)
    }

    #[tracing::instrument(name = "register", skip_all, fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Session, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AuthError::Validation(
                "Please enter your full name".to_string(),
            ));
        }
        self.validate_credentials(email, password)?;
        if password != confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        let response = self
            .api
            .register(name, email, password)
            .await
            .map_err(|err| friendly(err, register_message))?;

        Ok(self.sign_in(&response.token, email, name).await)
    }

    /// On the auth page: a cached, still-valid token skips straight to the dashboard.
    pub async fn resume_session(&self) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        if self.api.verify_token().await {
            tracing::info!("resuming stored session");
            self.session.navigate(Route::Dashboard);
            true
        } else {
            tracing::info!("stored session is no longer valid");
            self.api.client().handle_token_expired();
            false
        }
    }

    /// Checks backend availability; never requires a session.
    pub async fn health(&self) -> bool {
        match self.api.health().await {
            Ok(status) => {
                tracing::info!(%status, "backend is reachable");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "backend health check failed");
                false
            }
        }
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    fn validate_credentials(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if !is_valid_email(email) {
            return Err(AuthError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }
        if password.chars().count() < self.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters long",
                self.min_password_length
            )));
        }
        Ok(())
    }

    async fn sign_in(&self, token: &str, email: &str, name: &str) -> Session {
        self.session.set_session(token, email, name);
        tracing::info!("signed in");
        if !self.redirect_delay.is_zero() {
            tokio::time::sleep(self.redirect_delay).await;
        }
        self.session.navigate(Route::Dashboard);
        Session {
            token: token.to_string(),
            user_email: email.to_string(),
            user_name: name.to_string(),
        }
    }
}

fn display_name(response: &AuthResponse) -> String {
    [&response.name, &response.user_name]
        .into_iter()
        .flatten()
        .find(|name| !name.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_string())
}

/// `local@domain.tld` with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn friendly(err: ClientError, by_status: fn(u16, &str) -> String) -> AuthError {
    match err {
        ClientError::Api { status, message } => AuthError::Client(ClientError::Api {
            status,
            message: by_status(status, &message),
        }),
        other => AuthError::Client(other),
    }
}

fn login_message(status: u16, backend: &str) -> String {
    if !backend.is_empty() {
        return backend.to_string();
    }
    match status {
        401 => "Invalid email or password. Please check your credentials.",
        400 => "Invalid request. Please check your input.",
        404 => "Login service not found. Please contact support.",
        500 => "Server error. Please try again later.",
        _ => "Login failed. Please try again.",
    }
    .to_string()
}

fn register_message(status: u16, backend: &str) -> String {
    if status == 400 && backend.contains("already exists") {
        return "A user with this email already exists. Please use a different email or try logging in."
            .to_string();
    }
    if !backend.is_empty() {
        return backend.to_string();
    }
    match status {
        400 => "Invalid registration data. Please check your input.",
        401 => "Unauthorized. Please check your credentials.",
        404 => "Registration service not found. Please contact support.",
        500 => "Server error. Please try again later.",
        _ => "Registration failed. Please try again.",
    }
    .to_string()
}
