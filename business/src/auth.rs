//! Client for the hosted auth provider (Supabase GoTrue).
//!
//! Credential checks, password hashing and rate limiting all happen on the
//! provider side. This module only moves the email/password pair over the wire
//! and turns the reply into either a [`Session`] or an [`AuthFailure`] whose
//! message can be shown to the user as-is.

use std::fmt;

use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SupabaseConfig;

/// Email/password pair read from the login form.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The signed-in user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session payload issued on a successful sign-in.
///
/// The login flow does not look inside it; it is kept typed so callers that
/// do care (and tests) can.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: String,
    pub user: User,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// A failed sign-in attempt.
///
/// Invalid credentials, unconfirmed accounts, throttling and network errors
/// all end up here; only the human-readable message is kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The hosted auth provider as seen by the login form.
#[async_trait(?Send)]
pub trait AuthService {
    async fn sign_in_with_password(&self, credentials: &Credentials)
    -> Result<Session, AuthFailure>;
}

/// GoTrue password grant over HTTP.
#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    client: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl AuthService for SupabaseAuth {
    async fn sign_in_with_password(
        &self,
        credentials: &Credentials,
    ) -> Result<Session, AuthFailure> {
        let url = format!("{}/token", self.config.auth_url());
        let anon_key = self.config.anon_key();

        let response = self
            .client
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", anon_key)
            .bearer_auth(anon_key)
            .json(credentials)
            .send()
            .await
            .map_err(|e| {
                error!("SupabaseAuth: request to {url} failed: {e}");
                AuthFailure::new(e.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("SupabaseAuth: failed to read response body: {e}");
            AuthFailure::new(e.to_string())
        })?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            debug!("SupabaseAuth: sign-in rejected with status {status}: {message}");
            return Err(AuthFailure::new(message));
        }

        serde_json::from_slice::<Session>(&body).map_err(|e| {
            error!("SupabaseAuth: failed to parse session payload: {e}");
            AuthFailure::new(format!("Invalid session payload: {e}"))
        })
    }
}

/// Picks the user-facing message out of a GoTrue error body.
///
/// Newer servers send `msg`, older ones the OAuth-style `error_description`.
fn error_message(status: u16, body: &[u8]) -> String {
    const FIELDS: [&str; 4] = ["msg", "message", "error_description", "error"];

    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        let found = FIELDS
            .iter()
            .filter_map(|field| map.get(*field))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            });
        if let Some(message) = found {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials::new("admin@example.com", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("admin@example.com"));
        assert!(!rendered.contains("hunter2"), "password leaked: {rendered}");
    }

    #[test]
    fn credentials_serialize_as_password_grant_body() {
        let credentials = Credentials::new("admin@example.com", "hunter2");
        let json = serde_json::to_value(&credentials).expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({"email": "admin@example.com", "password": "hunter2"})
        );
    }

    #[test]
    fn session_deserializes_from_gotrue_reply() {
        let json = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700000000,
            "refresh_token": "refresh",
            "user": {"id": "b5c1", "email": "admin@example.com", "role": "authenticated"}
        }"#;
        let session: Session = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.expires_in, 3600);
        assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
        assert!(!format!("{session:?}").contains("jwt"));
    }

    #[test]
    fn error_message_prefers_msg_field() {
        let body = br#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_eq!(error_message(400, body), "Invalid login credentials");
    }

    #[test]
    fn error_message_falls_back_to_error_description() {
        let body = br#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
        assert_eq!(error_message(400, body), "Email not confirmed");
    }

    #[test]
    fn error_message_uses_error_when_alone() {
        let body = br#"{"error":"over_request_rate_limit"}"#;
        assert_eq!(error_message(429, body), "over_request_rate_limit");
    }

    #[test]
    fn error_message_uses_raw_text_or_status() {
        assert_eq!(error_message(502, b"Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(500, b""), "HTTP 500");
    }
}
