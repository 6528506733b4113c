//! Server statistics and health records

use serde::{Deserialize, Serialize};

/// Aggregate statistics reported by `GET /stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStats {
    /// Number of agents on the server
    #[serde(default)]
    pub total_agents: u64,
    /// Number of agents in the active state
    #[serde(default)]
    pub active_agents: u64,
    /// Number of stored messages
    #[serde(default)]
    pub total_messages: u64,
    /// Number of registered users
    #[serde(default)]
    pub total_users: u64,
    /// Server uptime as reported (seconds)
    #[serde(default)]
    pub server_uptime: f64,
    /// Memory usage as reported
    #[serde(default)]
    pub memory_usage: f64,
    /// CPU usage as reported
    #[serde(default)]
    pub cpu_usage: f64,
}

/// Health verdict from `GET /health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Server is serving normally
    Healthy,
    /// Server reports a problem
    Unhealthy,
    /// Any verdict this client does not recognize (e.g. "degraded")
    #[serde(other)]
    Unknown,
}

/// Body of a health probe response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    /// Health verdict
    pub status: HealthStatus,
    /// Server-formatted timestamp of the probe
    #[serde(default)]
    pub timestamp: String,
}

impl HealthReport {
    /// Whether the server reported itself healthy; unrecognized verdicts
    /// count as not healthy
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
