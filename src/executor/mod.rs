//! Resilient request executor
//!
//! Performs one logical operation as one or more physical HTTP attempts.
//! Each attempt is bounded by the configured timeout, carries the current
//! credentials, and is decoded through the response envelope. Failed
//! attempts are retried with exponential backoff until the attempt budget
//! is spent, then the last failure is returned.

pub mod envelope;
pub mod request;
pub mod retry;

pub use envelope::{decode_response, Envelope};
pub use request::{segment, ApiRequest};
pub use retry::RetryPolicy;

use crate::auth::{resolve_bearer, CredentialProvider};
use crate::config::ClientConfig;
use crate::error::ClientError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Header carrying the per-operation request id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Executes [`ApiRequest`]s against the agent server
///
/// Cloning is cheap; clones share the HTTP connection pool and hold no
/// per-call state, so concurrent operations never interfere.
#[derive(Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    credentials: Arc<dyn CredentialProvider>,
    policy: RetryPolicy,
}

impl RequestExecutor {
    /// Create an executor with a fresh HTTP client
    pub fn new(config: Arc<ClientConfig>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_http_client(reqwest::Client::new(), config, credentials)
    }

    /// Create an executor that reuses an existing HTTP client
    pub fn with_http_client(
        http: reqwest::Client,
        config: Arc<ClientConfig>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let policy = RetryPolicy::from_config(&config);
        Self {
            http,
            config,
            credentials,
            policy,
        }
    }

    /// Configuration this executor was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Retry policy in effect
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run a logical operation and decode the envelope's `data` as `T`
    ///
    /// # Returns
    /// * `Ok(T)` - The decoded payload of the first successful attempt
    /// * `Err(ClientError)` - The failure of the last attempt made
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        let mut attempt: u32 = 0;

        loop {
            debug!(
                request_id = %request_id,
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                max_attempts = self.policy.max_attempts,
                "Sending request to agent server"
            );

            let error = match self.attempt::<T>(&request, &request_id).await {
                Ok(value) => {
                    debug!(
                        request_id = %request_id,
                        attempt = attempt + 1,
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !self.policy.should_retry(attempt, &error) {
                error!(
                    request_id = %request_id,
                    method = %request.method,
                    path = %request.path,
                    attempts = attempt + 1,
                    error = %error,
                    "Request failed"
                );
                return Err(error);
            }

            let delay = self.policy.backoff_delay(attempt);
            warn!(
                request_id = %request_id,
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Request attempt failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// One physical attempt, bounded by the configured timeout
    async fn attempt<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        request_id: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.config.base_url(), request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        // One value per header: caller headers replace the JSON default and
        // a resolved bearer replaces any caller Authorization
        let mut headers = HeaderMap::new();
        if request.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        for (name, value) in &request.headers {
            headers.insert(header_name(name)?, header_value(value)?);
        }
        headers.insert(header_name(REQUEST_ID_HEADER)?, header_value(request_id)?);
        // Looked up per attempt so a token refreshed during backoff is picked up
        if let Some(token) =
            resolve_bearer(self.credentials.as_ref(), self.config.api_key()).await
        {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        }
        builder = builder.headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let limit = self.config.timeout();
        let (status, body) = timeout(limit, async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await
        .map_err(|_| ClientError::Timeout(limit))??;

        debug!(
            request_id = %request_id,
            status = status.as_u16(),
            body_len = body.len(),
            "Received response from agent server"
        );

        decode_response(status, &body)
    }

    /// Total time an always-failing operation spends waiting between attempts
    pub fn worst_case_backoff(&self) -> Duration {
        self.policy.schedule().into_iter().sum()
    }
}

fn header_name(name: &str) -> Result<HeaderName, ClientError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| ClientError::InvalidConfig(format!("invalid header name: {}", name)))
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|_| ClientError::InvalidConfig("header value contains invalid characters".to_string()))
}
