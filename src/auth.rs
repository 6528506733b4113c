//! Credential lookup
//!
//! The client never owns the user's token. Whatever produces and stores it
//! hands the client a [`CredentialProvider`] at construction, and the client
//! asks it for the current token each time it builds a request or opens the
//! event stream.

use async_trait::async_trait;

/// Source of the current bearer token
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return the token to attach to the next call, if a user is signed in
    async fn bearer_token(&self) -> Option<String>;
}

/// Provider for anonymous clients; only the static API key (if any) is used
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Provider that always returns the same token
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

#[async_trait]
impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    async fn bearer_token(&self) -> Option<String> {
        self()
    }
}

/// Pick the token for the `Authorization` header
///
/// A per-request token from the provider wins over the static API key.
/// Empty tokens count as absent.
pub async fn resolve_bearer(
    provider: &dyn CredentialProvider,
    api_key: Option<&str>,
) -> Option<String> {
    match provider.bearer_token().await {
        Some(token) if !token.is_empty() => Some(token),
        _ => api_key.map(|key| key.to_string()),
    }
}
