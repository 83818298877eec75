//! # Account Flows
//!
//! Login, registration, account activation, password reset and profile
//! lookup against the FURIA backend. The access token returned by login is
//! kept in the key-value store and installed on the transport.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{
    ApiResponse, HttpTransport, Method, ACTIVATE_PATH, LOGIN_PATH, PROFILE_PATH, REGISTER_PATH,
    RESET_PASSWORD_PATH,
};
use crate::error::{FuriaError, Result};
use crate::storage::{KeyValueStore, ACCESS_TOKEN_KEY, PENDING_EMAIL_KEY};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid e-mail or password.";
const REGISTERED_MESSAGE: &str =
    "Registration complete. Check your e-mail to confirm the account before logging in.";
const PASSWORD_CHANGED_MESSAGE: &str = "Password changed successfully.";

/// Profile returned by `auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub created_at: DateTime<FixedOffset>,
}

pub struct AuthService {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn KeyValueStore>,
}

impl AuthService {
    pub fn new(transport: Arc<dyn HttpTransport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { transport, store }
    }

    /// Log in and keep the access token. Returns the token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(FuriaError::invalid_input("Please fill in e-mail and password."));
        }

        let response = self
            .transport
            .request(
                Method::POST,
                LOGIN_PATH,
                Some(json!({ "login": email, "password": password })),
            )
            .await?;

        let token = match (response.status, response.field_str("accessToken")) {
            (200, Some(token)) if !token.is_empty() => token.to_string(),
            _ => {
                warn!(status = response.status, "Login rejected");
                return Err(api_error(&response, INVALID_CREDENTIALS_MESSAGE));
            }
        };

        self.store.set(ACCESS_TOKEN_KEY, &token).await?;
        self.transport.set_auth_token(Some(&token));
        info!(email = %email, "Logged in");
        Ok(token)
    }

    /// Create an account. The backend mails an activation link.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(FuriaError::invalid_input("Please fill in all fields."));
        }

        let response = self
            .transport
            .request(
                Method::POST,
                REGISTER_PATH,
                Some(json!({ "name": name, "login": email, "password": password })),
            )
            .await?;

        match response.status {
            200 | 201 => {
                info!(email = %email, "Account registered");
                Ok(REGISTERED_MESSAGE.to_string())
            }
            _ => Err(api_error(&response, "Registration failed.")),
        }
    }

    /// Ask the backend to re-send the account activation link
    pub async fn request_activation(&self, email: &str) -> Result<String> {
        let email = email.trim();
        if email.is_empty() {
            return Err(FuriaError::invalid_input("Please enter a valid e-mail."));
        }

        let response = self
            .transport
            .request(Method::POST, ACTIVATE_PATH, Some(json!({ "email": email })))
            .await?;

        if !response.is_success() {
            return Err(api_error(&response, "Could not send the activation link."));
        }
        Ok(response
            .message()
            .unwrap_or("Activation link sent.")
            .to_string())
    }

    /// Set a new password for the e-mail confirmed by the recovery workflow.
    ///
    /// Clears the pending recovery e-mail on success.
    pub async fn reset_password(&self, password: &str, confirmation: &str) -> Result<String> {
        if password.is_empty() || confirmation.is_empty() {
            return Err(FuriaError::invalid_input("Please fill in all fields."));
        }
        if password != confirmation {
            return Err(FuriaError::invalid_input("Passwords do not match."));
        }

        let email = self.store.get(PENDING_EMAIL_KEY).await?.ok_or_else(|| {
            FuriaError::invalid_input("No password recovery is pending. Request a reset link first.")
        })?;

        let response = self
            .transport
            .request(
                Method::POST,
                RESET_PASSWORD_PATH,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;

        if !response.is_success() {
            return Err(api_error(&response, "Could not change the password."));
        }

        self.store.delete(PENDING_EMAIL_KEY).await?;
        info!(email = %email, "Password reset completed");
        Ok(response
            .message()
            .unwrap_or(PASSWORD_CHANGED_MESSAGE)
            .to_string())
    }

    /// Profile of the logged-in user
    pub async fn profile(&self) -> Result<Profile> {
        let token = self
            .store
            .get(ACCESS_TOKEN_KEY)
            .await?
            .ok_or_else(|| FuriaError::unauthenticated("Log in to see your profile."))?;

        let response = self
            .transport
            .request(Method::POST, PROFILE_PATH, Some(json!({ "accessToken": token })))
            .await?;

        if !response.is_success() {
            return Err(api_error(&response, "Could not load the profile."));
        }
        Ok(serde_json::from_value(response.data)?)
    }

    /// Reinstall a persisted token on the transport. Returns whether one was found.
    pub async fn restore_session(&self) -> Result<bool> {
        match self.store.get(ACCESS_TOKEN_KEY).await? {
            Some(token) => {
                self.transport.set_auth_token(Some(&token));
                debug!("Session restored");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.store.delete(ACCESS_TOKEN_KEY).await?;
        self.transport.set_auth_token(None);
        info!("Logged out");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.store.exists(ACCESS_TOKEN_KEY).await?)
    }
}

fn api_error(response: &ApiResponse, fallback: &str) -> FuriaError {
    let message = response
        .message()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(fallback);
    FuriaError::api(response.status, message)
}
