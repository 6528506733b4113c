//! Agent Service Client Library
//!
//! Typed access to a remote stateful-agent server: a retrying HTTP request
//! executor for the resource API and a multiplexed event stream over the
//! server's WebSocket endpoint.
//! The `agent-watch` binary is in `src/main.rs`.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod stream;

pub use api::{AgentApi, AgentServiceClient};
pub use auth::{CredentialProvider, NoCredentials, StaticToken};
pub use config::{ClientConfig, RetryMode};
pub use error::ClientError;
pub use stream::{ConnectionState, EventStream, StreamFrame, Subscription};
