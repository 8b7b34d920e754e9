//! Realtime connection state and the client that drives it.
//!
//! SYSTEM CONTEXT
//! ==============
//! The websocket test page mounts one [`RealtimeClient`] per visit. The client
//! owns a reactive [`RealtimeState`] and an injected [`SocketTransport`]; the
//! browser transport lives in `net::socket`, tests use a recording fake.
//!
//! DESIGN
//! ======
//! Transport callbacks arrive as [`TransportEvent`]s and are folded into the
//! state by [`RealtimeState::apply`]. The state machine is
//! `disconnected -> connecting -> connected -> disconnected`, with
//! `connecting -> disconnected` once the transport gives up. While the
//! transport is between reconnection attempts the status stays `connecting`.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Missing credentials, sends while offline, connect
//! failures, server disconnects and server `errorMessage` events all land in
//! `last_error` as a [`RealtimeError`] for the status line.

#[cfg(test)]
#[path = "realtime_test.rs"]
mod realtime_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::net::types::{OutgoingMessage, ReceivedMessage, ServerErrorMessage};

/// Client → server chat event.
pub const SEND_MESSAGE_EVENT: &str = "sendMessage";
/// Server → client chat event.
pub const RECEIVE_MESSAGE_EVENT: &str = "receiveMessage";
/// Server → client error notification.
pub const ERROR_MESSAGE_EVENT: &str = "errorMessage";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// User-visible realtime failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RealtimeError {
    #[error("Authentication token not found.")]
    AuthenticationMissing,
    #[error("Not connected to WebSocket server.")]
    NotConnected,
    #[error("Connection Failed: {0}")]
    ConnectionFailed(String),
    #[error("Server disconnected.")]
    ServerDisconnected,
    #[error("Server Error: {0}")]
    ServerMessage(String),
}

/// Why an established or pending connection ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisconnectReason {
    /// `disconnect()` was called locally.
    ClientRequested,
    /// The server sent a namespace disconnect.
    ServerRequested,
    /// The socket dropped and no reconnection attempts remain.
    TransportClosed,
}

/// Callback surface of a [`SocketTransport`].
#[derive(Clone, Debug, PartialEq)]
pub enum TransportEvent {
    Connected { socket_id: String },
    /// A connection attempt failed. `will_retry` is true while the transport
    /// still has reconnection attempts left.
    ConnectError { message: String, will_retry: bool },
    /// An established connection dropped and attempt `attempt` is scheduled.
    Reconnecting { attempt: u32 },
    Disconnected(DisconnectReason),
    Event { name: String, data: serde_json::Value },
}

/// Sink the transport calls for every [`TransportEvent`].
pub type EventSink = Arc<dyn Fn(TransportEvent) + Send + Sync>;

/// One realtime connection to the server.
pub trait SocketTransport: Clone + Send + Sync + 'static {
    /// Start connecting to `url`, presenting `token` in the connect handshake.
    /// Outcomes are reported through `events` until the connection is closed.
    fn open(&self, url: &str, token: &str, events: EventSink);

    /// Queue an event for the open connection. Returns `false` when nothing is
    /// connected.
    fn emit(&self, event: &str, payload: serde_json::Value) -> bool;

    /// Close the connection and cancel pending reconnection attempts.
    fn close(&self);
}

/// Connection status, last error and received messages for one page mount.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealtimeState {
    pub status: ConnectionStatus,
    pub last_error: Option<RealtimeError>,
    /// Identifier the server assigned to this connection.
    pub socket_id: Option<String>,
    /// Received messages, newest first.
    pub messages: Vec<ReceivedMessage>,
    message_cap: Option<usize>,
}

impl RealtimeState {
    /// Keep at most `cap` messages, dropping the oldest.
    #[must_use]
    pub fn with_message_cap(mut self, cap: usize) -> Self {
        self.message_cap = Some(cap);
        self.messages.truncate(cap);
        self
    }

    pub fn begin_connect(&mut self) {
        self.status = ConnectionStatus::Connecting;
        self.last_error = None;
    }

    pub fn report(&mut self, error: RealtimeError) {
        self.last_error = Some(error);
    }

    /// Prepend a message, applying the optional cap.
    pub fn receive_message(&mut self, message: ReceivedMessage) {
        self.messages.insert(0, message);
        if let Some(cap) = self.message_cap {
            self.messages.truncate(cap);
        }
    }

    /// Fold one transport event into the state.
    pub fn apply(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected { socket_id } => {
                self.status = ConnectionStatus::Connected;
                self.last_error = None;
                self.socket_id = Some(socket_id);
            }
            TransportEvent::ConnectError { message, will_retry } => {
                self.status = if will_retry { ConnectionStatus::Connecting } else { ConnectionStatus::Disconnected };
                self.socket_id = None;
                self.last_error = Some(RealtimeError::ConnectionFailed(message));
            }
            TransportEvent::Reconnecting { .. } => {
                self.status = ConnectionStatus::Connecting;
                self.socket_id = None;
            }
            TransportEvent::Disconnected(reason) => {
                self.status = ConnectionStatus::Disconnected;
                self.socket_id = None;
                if reason == DisconnectReason::ServerRequested {
                    self.last_error = Some(RealtimeError::ServerDisconnected);
                }
            }
            TransportEvent::Event { name, data } => self.apply_server_event(&name, data),
        }
    }

    fn apply_server_event(&mut self, name: &str, data: serde_json::Value) {
        match name {
            RECEIVE_MESSAGE_EVENT => match serde_json::from_value::<ReceivedMessage>(data) {
                Ok(message) => self.receive_message(message),
                Err(e) => leptos::logging::warn!("realtime: malformed {RECEIVE_MESSAGE_EVENT} payload: {e}"),
            },
            ERROR_MESSAGE_EVENT => {
                let error = serde_json::from_value::<ServerErrorMessage>(data)
                    .map(|m| m.error)
                    .unwrap_or_else(|_| "Unknown error".to_owned());
                leptos::logging::warn!("realtime: server error: {error}");
                self.last_error = Some(RealtimeError::ServerMessage(error));
            }
            other => leptos::logging::log!("realtime: ignoring event {other}"),
        }
    }
}

/// Realtime session for one consumer: connect, send, tear down.
#[derive(Clone)]
pub struct RealtimeClient<T> {
    state: RwSignal<RealtimeState>,
    transport: T,
    endpoint: String,
}

impl<T: SocketTransport> RealtimeClient<T> {
    /// Create a disconnected client for the websocket `endpoint`.
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self { state: RwSignal::new(RealtimeState::default()), transport, endpoint: endpoint.into() }
    }

    #[must_use]
    pub fn with_message_cap(self, cap: usize) -> Self {
        self.state.update(|s| *s = std::mem::take(s).with_message_cap(cap));
        self
    }

    pub fn state(&self) -> ReadSignal<RealtimeState> {
        self.state.read_only()
    }

    pub fn snapshot(&self) -> RealtimeState {
        self.state.get_untracked()
    }

    /// Open the connection unless one is already pending or open.
    ///
    /// Without a token nothing is opened and
    /// [`RealtimeError::AuthenticationMissing`] is reported.
    pub fn connect(&self, token: Option<&str>) {
        if self.state.with_untracked(|s| s.status != ConnectionStatus::Disconnected) {
            return;
        }
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            leptos::logging::warn!("realtime connect: no token");
            self.state.update(|s| s.report(RealtimeError::AuthenticationMissing));
            return;
        };

        self.state.update(RealtimeState::begin_connect);
        let state = self.state;
        let sink: EventSink = Arc::new(move |event: TransportEvent| {
            match &event {
                TransportEvent::ConnectError { message, will_retry } => {
                    leptos::logging::warn!("realtime connect error (retry={will_retry}): {message}");
                }
                TransportEvent::Disconnected(reason) => {
                    leptos::logging::log!("realtime disconnected: {reason:?}");
                }
                _ => {}
            }
            state.update(|s| s.apply(event));
        });
        leptos::logging::log!("realtime connect: {}", self.endpoint);
        self.transport.open(&self.endpoint, token, sink);
    }

    /// Fire-and-forget `sendMessage` to `recipient_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::NotConnected`] (also recorded in the state)
    /// unless the connection is established.
    pub fn send_message(&self, text: &str, recipient_id: &str) -> Result<(), RealtimeError> {
        let connected = self.state.with_untracked(|s| s.status == ConnectionStatus::Connected);
        let payload = OutgoingMessage { recipient_id: recipient_id.to_owned(), message: text.to_owned() };
        let sent = connected
            && serde_json::to_value(&payload)
                .map(|value| self.transport.emit(SEND_MESSAGE_EVENT, value))
                .unwrap_or(false);
        if sent {
            return Ok(());
        }
        leptos::logging::warn!("realtime send: not connected");
        self.state.update(|s| s.report(RealtimeError::NotConnected));
        Err(RealtimeError::NotConnected)
    }

    /// Close the connection. Safe to call in any state.
    pub fn disconnect(&self) {
        self.transport.close();
        if self.state.with_untracked(|s| s.status != ConnectionStatus::Disconnected) {
            self.state.update(|s| s.apply(TransportEvent::Disconnected(DisconnectReason::ClientRequested)));
        }
    }
}
