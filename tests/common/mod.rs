//! Shared fixtures for integration tests
//!
//! In-process axum servers standing in for the agent server: a WebSocket
//! endpoint the test can drive frame by frame, and an HTTP endpoint whose
//! answer depends on how many times it has been hit.

#![allow(dead_code)]

use agent_service_client::ClientConfig;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// How long a test waits for anything asynchronous before failing
pub const WAIT: Duration = Duration::from_secs(5);

/// Config with a short backoff so retry tests finish quickly
pub fn fast_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(base_url).with_backoff_unit(Duration::from_millis(10))
}

/// Bind an ephemeral port and serve `app` on it, returning `http://host:port`
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// ============================================================================
// WebSocket server
// ============================================================================

/// Server side of one accepted stream connection
pub struct ServerConn {
    /// Query parameters of the upgrade request
    pub query: HashMap<String, String>,
    /// Authorization header of the upgrade request
    pub authorization: Option<String>,
    outbound: mpsc::UnboundedSender<Message>,
    inbound: mpsc::UnboundedReceiver<String>,
}

impl ServerConn {
    /// Push a text frame to the client; ignored once the connection is gone
    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.outbound.send(Message::Text(text.into()));
    }

    /// Push a JSON frame to the client
    pub fn send_json(&self, value: &Value) {
        self.send_text(value.to_string());
    }

    /// Close the connection from the server side
    pub fn close(&self) {
        let _ = self.outbound.send(Message::Close(None));
    }

    /// Next text frame sent by the client
    pub async fn next_text(&mut self) -> String {
        tokio::time::timeout(WAIT, self.inbound.recv())
            .await
            .expect("timed out waiting for a client frame")
            .expect("connection closed")
    }
}

/// WebSocket endpoint at `/ws`
pub struct WsServer {
    /// `http://` base URL of the server
    pub base_url: String,
    connections: mpsc::UnboundedReceiver<ServerConn>,
}

impl WsServer {
    /// Start a server on an ephemeral port
    pub async fn start() -> Self {
        let (tx, connections) = mpsc::unbounded_channel();
        let app = Router::new().route("/ws", get(ws_handler)).with_state(tx);
        let base_url = serve(app).await;
        Self {
            base_url,
            connections,
        }
    }

    /// Wait for the next client to complete the upgrade
    pub async fn accept(&mut self) -> ServerConn {
        tokio::time::timeout(WAIT, self.connections.recv())
            .await
            .expect("timed out waiting for a client connection")
            .expect("server stopped")
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    State(connections): State<mpsc::UnboundedSender<ServerConn>>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ws.on_upgrade(move |socket| serve_socket(socket, query, authorization, connections))
}

async fn serve_socket(
    socket: WebSocket,
    query: HashMap<String, String>,
    authorization: Option<String>,
    connections: mpsc::UnboundedSender<ServerConn>,
) {
    let (outbound, mut outbound_rx) = mpsc::unbounded_channel();
    let (inbound_tx, inbound) = mpsc::unbounded_channel();
    let _ = connections.send(ServerConn {
        query,
        authorization,
        outbound,
        inbound,
    });

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            message = outbound_rx.recv() => match message {
                Some(Message::Close(frame)) => {
                    let _ = sink.send(Message::Close(frame)).await;
                    break;
                }
                Some(message) => {
                    if sink.send(message).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let _ = inbound_tx.send(text);
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }
}

// ============================================================================
// Scripted HTTP server
// ============================================================================

type Script = Arc<dyn Fn(usize) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// HTTP endpoint whose response to the n-th hit (1-based) is chosen by a script
pub struct ScriptedServer {
    /// `http://` base URL of the server
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl ScriptedServer {
    /// Serve `script` for every method on `path`
    pub async fn start<F, Fut>(path: &str, script: F) -> Self
    where
        F: Fn(usize) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let hits = Arc::new(AtomicUsize::new(0));
        let script: Script = Arc::new(move |n| Box::pin(script(n)));
        let counter = hits.clone();
        let handler = move || {
            let script = script.clone();
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                script(n).await
            }
        };
        let app = Router::new().route(path, axum::routing::any(handler));
        let base_url = serve(app).await;
        Self { base_url, hits }
    }

    /// Number of requests received so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// A `200` response carrying `body` as JSON
pub fn json_response(body: Value) -> Response {
    (
        StatusCode::OK,
        [("content-type", "application/json")],
        body.to_string(),
    )
        .into_response()
}

/// A response with the given status and JSON body
pub fn status_response(status: StatusCode, body: Value) -> Response {
    (status, [("content-type", "application/json")], body.to_string()).into_response()
}
