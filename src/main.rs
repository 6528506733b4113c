//! agent-watch
//!
//! Operator tool for an agent server: probes health, prints server stats
//! and the agent count, then follows the event stream and logs every event
//! until interrupted.

use agent_service_client::models::AgentListFilter;
use agent_service_client::stream::{connection_status, events, ConnectionStatus};
use agent_service_client::{AgentServiceClient, ClientConfig, CredentialProvider};
use serde_json::Value;
use std::env;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = ClientConfig::from_env();
    info!(
        base_url = %config.base_url(),
        timeout_secs = config.timeout().as_secs(),
        retry_attempts = config.retry_attempts(),
        retry_mode = ?config.retry_mode(),
        "Configuration loaded"
    );

    // Token is re-read on every call so an external refresher can rotate it
    let credentials: Arc<dyn CredentialProvider> =
        Arc::new(|| env::var("AGENT_TOKEN").ok().filter(|t| !t.is_empty()));
    let client = AgentServiceClient::with_credentials(config, credentials);

    let health = client
        .health_check()
        .await
        .map_err(|e| anyhow::anyhow!("Health check failed: {}", e))?;
    info!(status = ?health.status, timestamp = %health.timestamp, "Server health");

    match client.get_server_stats().await {
        Ok(stats) => info!(
            total_agents = stats.total_agents,
            active_agents = stats.active_agents,
            total_messages = stats.total_messages,
            total_users = stats.total_users,
            uptime_secs = stats.server_uptime,
            "Server stats"
        ),
        Err(e) => warn!(error = %e, "Failed to fetch server stats"),
    }

    match client.list_agents(&AgentListFilter::default()).await {
        Ok(agents) => info!(count = agents.len(), "Agents on server"),
        Err(e) => warn!(error = %e, "Failed to list agents"),
    }

    let stream = client.event_stream();
    stream.on(events::CONNECTION, |data: &Value| match connection_status(data) {
        Some(ConnectionStatus::Connected) => info!("Event stream connected"),
        Some(ConnectionStatus::Disconnected) => warn!("Event stream disconnected"),
        None => warn!(payload = %data, "Unrecognized connection event"),
    });
    stream.on(events::ERROR, |data: &Value| error!(payload = %data, "Stream error"));
    for event_type in [events::MESSAGE, events::AGENT_UPDATE, events::HEARTBEAT] {
        stream.on(event_type, move |data: &Value| {
            info!(event_type = event_type, payload = %data, "Stream event");
        });
    }

    let session_id = env::var("AGENT_SESSION_ID").ok();
    stream.connect(session_id.as_deref()).await?;

    shutdown_signal().await;
    stream.disconnect();

    info!("agent-watch stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
}
