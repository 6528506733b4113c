//! Request description
//!
//! One logical operation against the resource API, independent of how many
//! physical attempts it ends up taking.

use crate::error::ClientError;
use reqwest::Method;
use serde::Serialize;

/// A logical HTTP operation: method, path, query, body and extra headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, starting with `/`
    pub path: String,
    /// Query pairs appended to the URL
    pub query: Vec<(String, String)>,
    /// Body, already serialized as JSON
    pub body: Option<String>,
    /// Extra headers sent on every attempt
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request with no query, body or extra headers
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// `GET path`
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PATCH path`
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE path`
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Serialize `body` as the JSON request body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Use an already-serialized body
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append query pairs
    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Set an extra header
    ///
    /// A later value for the same name replaces an earlier one, a caller
    /// `Content-Type` replaces the JSON default, and a resolved bearer
    /// credential replaces a caller `Authorization`.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Percent-encode an opaque identifier for use as one path segment
pub fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_is_serialized_up_front() {
        let request = ApiRequest::post("/tools")
            .json(&json!({"name": "calc"}))
            .unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_deref(), Some(r#"{"name":"calc"}"#));
    }

    #[test]
    fn test_segment_escapes_reserved_characters() {
        assert_eq!(segment("agent-123"), "agent-123");
        assert_eq!(segment("a/b?c"), "a%2Fb%3Fc");
    }
}
