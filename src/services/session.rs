// Session service seam: credential and OAuth sign-in

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credentials submitted from the login form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful sign-in payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// Rejected by the server; carries the server-supplied message verbatim
    #[error("{0}")]
    Rejected(String),
    #[error("Session service unavailable: {0}")]
    Unavailable(String),
}

/// Issues access tokens
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn sign_in_with_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<SignInResponse, SessionError>;

    /// Starts a redirect-based provider flow; completion happens out of band
    fn sign_in_with_provider(&self, provider: OAuthProvider);
}
