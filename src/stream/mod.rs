//! Event stream multiplexer
//!
//! Owns at most one WebSocket connection to the agent server and fans
//! inbound frames out to per-type subscribers. Connection lifecycle is
//! reported through synthesized `connection` and `error` events on the same
//! dispatch path.
//!
//! There is no automatic reconnect. A dropped connection folds back to
//! [`ConnectionState::Disconnected`]; the owner decides whether to call
//! [`EventStream::connect`] again.

pub mod frame;
pub mod listeners;

pub use frame::{connection_status, events, ConnectionStatus, StreamFrame};
pub use listeners::{Callback, ListenerRegistry, Subscription};

use crate::auth::{resolve_bearer, CredentialProvider};
use crate::config::ClientConfig;
use crate::error::ClientError;
use frame::{connection_payload, error_payload};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

/// Lifecycle of the stream connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// No connection (initial, closed, failed or explicitly disconnected)
    Disconnected,
    /// Handshake in progress
    Connecting,
    /// Frames flow in both directions
    Open,
}

/// Connection bookkeeping guarded by one lock
struct Link {
    state: ConnectionState,
    /// Bumped by every `connect`; a task only acts while its generation is current
    generation: u64,
    /// Writer half of the live connection; dropping it closes the connection
    outbound: Option<mpsc::UnboundedSender<WsMessage>>,
}

struct Shared {
    link: Mutex<Link>,
    listeners: Arc<ListenerRegistry>,
}

impl Shared {
    fn link(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_open(&self, generation: u64) -> bool {
        let link = self.link();
        link.generation == generation && link.state == ConnectionState::Open
    }

    /// Connecting -> Open for the current generation
    fn mark_open(&self, generation: u64) -> bool {
        let mut link = self.link();
        if link.generation != generation || link.state != ConnectionState::Connecting {
            return false;
        }
        link.state = ConnectionState::Open;
        true
    }

    /// Transport error on the current generation's connection
    fn report_error(&self, generation: u64, message: &str) {
        let live = {
            let link = self.link();
            link.generation == generation && link.state != ConnectionState::Disconnected
        };
        if live {
            self.listeners.dispatch(events::ERROR, &error_payload(message));
        }
    }

    /// Fold back to Disconnected once the connection task is done
    fn finish(&self, generation: u64) {
        {
            let mut link = self.link();
            if link.generation != generation {
                return;
            }
            link.state = ConnectionState::Disconnected;
            link.outbound = None;
        }
        self.listeners.dispatch(
            events::CONNECTION,
            &connection_payload(ConnectionStatus::Disconnected),
        );
    }

    fn handle_text(&self, generation: u64, text: &str) {
        if !self.is_open(generation) {
            return;
        }
        match StreamFrame::decode(text) {
            Ok(frame) => {
                let invoked = self.listeners.dispatch(&frame.event_type, &frame.data);
                debug!(
                    event_type = %frame.event_type,
                    subscribers = invoked,
                    "Dispatched stream frame"
                );
            }
            Err(e) => {
                warn!(error = %e, frame_len = text.len(), "Dropping malformed stream frame");
            }
        }
    }
}

/// Multiplexed event stream for one agent server
pub struct EventStream {
    config: ClientConfig,
    credentials: Arc<dyn CredentialProvider>,
    shared: Arc<Shared>,
}

impl EventStream {
    /// Create a disconnected stream for the given server and credentials
    pub fn new(config: ClientConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            credentials,
            shared: Arc::new(Shared {
                link: Mutex::new(Link {
                    state: ConnectionState::Disconnected,
                    generation: 0,
                    outbound: None,
                }),
                listeners: Arc::new(ListenerRegistry::new()),
            }),
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.shared.link().state
    }

    /// Open the stream, optionally scoped to a chat session
    ///
    /// Returns once the handshake has been started; completion is reported
    /// as a `connection` event with status `connected`, failure as an
    /// `error` event followed by `connection` / `disconnected`. A live
    /// connection is closed first.
    ///
    /// # Errors
    /// * `ClientError::InvalidConfig` - the base URL has no HTTP(S) or WS(S)
    ///   scheme, or the credential is not a valid header value
    /// * `ClientError::WebSocket` - the stream URL is not a valid request URI
    pub async fn connect(&self, session_id: Option<&str>) -> Result<(), ClientError> {
        let url = stream_url(self.config.base_url(), session_id)?;
        let bearer = resolve_bearer(self.credentials.as_ref(), self.config.api_key()).await;
        let request = handshake_request(&url, bearer.as_deref())?;

        let (tx, rx) = mpsc::unbounded_channel();
        let generation = {
            let mut link = self.shared.link();
            if link.state != ConnectionState::Disconnected {
                info!(url = %url, "Replacing existing stream connection");
            }
            link.generation += 1;
            link.state = ConnectionState::Connecting;
            // Dropping the previous sender closes the previous connection
            link.outbound = Some(tx);
            link.generation
        };

        info!(url = %url, generation = generation, "Connecting to agent server event stream");
        tokio::spawn(run_connection(self.shared.clone(), request, generation, rx));
        Ok(())
    }

    /// Close the live connection, if any
    ///
    /// The state is `Disconnected` and subscribers have seen `connection` /
    /// `disconnected` when this returns, so a `connect` issued right after
    /// cannot swallow the event. The closing connection task is retired and
    /// reports nothing further. Calling this while already disconnected does
    /// nothing.
    pub fn disconnect(&self) {
        let was_live = {
            let mut link = self.shared.link();
            let was_live = link.state != ConnectionState::Disconnected;
            if was_live {
                info!(generation = link.generation, "Disconnecting from agent server event stream");
                link.generation += 1;
            }
            // Dropping the sender closes the socket
            link.outbound = None;
            link.state = ConnectionState::Disconnected;
            was_live
        };
        if was_live {
            self.shared.listeners.dispatch(
                events::CONNECTION,
                &connection_payload(ConnectionStatus::Disconnected),
            );
        }
    }

    /// Serialize `message` as JSON and send it
    ///
    /// Nothing is queued: sending before the `connected` event, or after a
    /// disconnect, fails immediately.
    ///
    /// # Errors
    /// * `ClientError::NotConnected` - the stream is not open
    /// * `ClientError::Serialization` - `message` could not be encoded
    pub fn send<T: Serialize + ?Sized>(&self, message: &T) -> Result<(), ClientError> {
        let sender = {
            let link = self.shared.link();
            match (&link.outbound, link.state) {
                (Some(sender), ConnectionState::Open) => sender.clone(),
                _ => return Err(ClientError::NotConnected),
            }
        };
        let text = serde_json::to_string(message)?;
        sender
            .send(WsMessage::Text(text))
            .map_err(|_| ClientError::NotConnected)
    }

    /// Make `callback` the only listener for `event_type`
    ///
    /// Any callback previously registered for the type, through `on` or
    /// `subscribe`, is dropped.
    pub fn on<F>(&self, event_type: &str, callback: F)
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.shared.listeners.replace(event_type, Arc::new(callback));
    }

    /// Add a listener for `event_type` alongside any existing ones
    pub fn subscribe<F>(&self, event_type: &str, callback: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.shared.listeners.add(event_type, Arc::new(callback));
        Subscription::new(event_type, id, &self.shared.listeners)
    }

    /// Remove every listener for `event_type`
    pub fn off(&self, event_type: &str) {
        self.shared.listeners.remove_all(event_type);
    }

    /// Number of listeners registered for `event_type`
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.shared.listeners.count(event_type)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.disconnect();
        self.shared.listeners.clear();
    }
}

/// Derive the stream URL from the HTTP base URL
///
/// `http` becomes `ws` and `https` becomes `wss`; the path `/ws` is
/// appended, then `?session_id=<id>` when a session is given.
pub fn stream_url(base_url: &str, session_id: Option<&str>) -> Result<String, ClientError> {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if base.starts_with("ws://") || base.starts_with("wss://") {
        base.to_string()
    } else {
        return Err(ClientError::InvalidConfig(format!(
            "base URL must start with http:// or https://: {}",
            base_url
        )));
    };

    let mut url = format!("{}/ws", ws_base);
    if let Some(session_id) = session_id.filter(|s| !s.is_empty()) {
        url.push_str("?session_id=");
        url.push_str(&urlencoding::encode(session_id));
    }
    Ok(url)
}

fn handshake_request(url: &str, bearer: Option<&str>) -> Result<Request, ClientError> {
    let mut request = url.into_client_request()?;
    if let Some(token) = bearer {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::InvalidConfig("token is not a valid header value".to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }
    Ok(request)
}

/// Drive one connection: handshake, then pump inbound frames to listeners
/// and outbound messages to the socket until either side closes
async fn run_connection(
    shared: Arc<Shared>,
    request: Request,
    generation: u64,
    mut outbound: mpsc::UnboundedReceiver<WsMessage>,
) {
    let socket = match tokio_tungstenite::connect_async(request).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            error!(generation = generation, error = %e, "Event stream connection failed");
            shared.report_error(generation, "WebSocket connection error");
            shared.finish(generation);
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    if !shared.mark_open(generation) {
        // Disconnected or superseded while the handshake was in flight
        let _ = sink.close().await;
        shared.finish(generation);
        return;
    }
    info!(generation = generation, "Connected to agent server event stream");
    shared.listeners.dispatch(
        events::CONNECTION,
        &connection_payload(ConnectionStatus::Connected),
    );

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(WsMessage::Text(text))) => shared.handle_text(generation, &text),
                Some(Ok(WsMessage::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                    Ok(text) => shared.handle_text(generation, text),
                    Err(_) => warn!(frame_len = bytes.len(), "Dropping non-UTF-8 binary frame"),
                },
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!(generation = generation, "Event stream closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(generation = generation, error = %e, "Event stream transport error");
                    shared.report_error(generation, "WebSocket connection error");
                    break;
                }
            },
            message = outbound.recv() => match message {
                Some(message) => {
                    if let Err(e) = sink.send(message).await {
                        error!(generation = generation, error = %e, "Failed to send stream message");
                        shared.report_error(generation, "WebSocket connection error");
                        break;
                    }
                }
                None => {
                    // Sender dropped by disconnect() or a newer connect()
                    let _ = sink.close().await;
                    break;
                }
            },
        }
    }

    info!(generation = generation, "Event stream connection closed");
    shared.finish(generation);
}
