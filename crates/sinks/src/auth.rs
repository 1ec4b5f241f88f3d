// FILE: crates/sinks/src/auth.rs
//! One-time acquisition of a user access token
//!
//! Only used when the session config has no token yet. The steady-state
//! sync path never touches this module.

use crate::mastodon::{build_client, read_success, transport_error};
use scrobblecast_core::{SinkError, SinkResult};
use serde::{Deserialize, Serialize};

/// Asks the operator for their login
pub trait CredentialPrompt {
    /// Returns `(username, password)` for `instance`
    fn ask(&self, instance: &str) -> std::io::Result<(String, String)>;
}

/// Produces a user access token for the timeline
pub trait Authorizer {
    fn acquire_token(&self) -> SinkResult<String>;
}

/// OAuth password grant against a Mastodon-compatible instance
pub struct PasswordLogin<P> {
    instance: String,
    client_id: String,
    client_secret: String,
    scope: String,
    prompt: P,
}

impl<P: CredentialPrompt> PasswordLogin<P> {
    pub fn new(
        instance: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        prompt: P,
    ) -> Self {
        Self {
            instance: instance.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scope: "read write".to_string(),
            prompt,
        }
    }
}

impl<P: CredentialPrompt> Authorizer for PasswordLogin<P> {
    fn acquire_token(&self) -> SinkResult<String> {
        log::info!("Logging into {}...", self.instance);
        let (username, password) = self
            .prompt
            .ask(&self.instance)
            .map_err(|e| SinkError::Unavailable(format!("Could not read login: {}", e)))?;

        let client = build_client()?;
        let response = client
            .post(format!("{}/oauth/token", self.instance))
            .form(&TokenRequest {
                grant_type: "password",
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                username: &username,
                password: &password,
                scope: &self.scope,
            })
            .send()
            .map_err(transport_error)?;

        // A refused login is never a per-item problem
        let body = read_success(response).map_err(|e| match e {
            SinkError::Rejected(msg) => SinkError::Unavailable(format!("Login refused: {}", msg)),
            other => other,
        })?;

        parse_token(&body)
    }
}

/// Extracts the access token from an OAuth token response
pub fn parse_token(body: &str) -> SinkResult<String> {
    let token: TokenResponse = serde_json::from_str(body)
        .map_err(|e| SinkError::Parse(format!("token response: {}", e)))?;
    if token.access_token.trim().is_empty() {
        return Err(SinkError::Parse("empty access token".to_string()));
    }
    Ok(token.access_token)
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    username: &'a str,
    password: &'a str,
    scope: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}
