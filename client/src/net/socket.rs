//! Socket.IO client over a raw browser websocket.
//!
//! SYSTEM CONTEXT
//! ==============
//! Implements [`SocketTransport`] for the realtime client. The server speaks
//! Socket.IO v5 on Engine.IO v4; this module performs the handshake itself
//! (`transport=websocket`, no long-polling) using the `packets` codec.
//!
//! DESIGN
//! ======
//! [`ProtocolSession`] is the pure per-connection handshake: it consumes
//! websocket text and produces packets to send plus [`SessionOutput`]s. The
//! browser transport (`hydrate` only) owns the websocket, an outbound command
//! channel and the bounded reconnection loop, mapping session outputs onto
//! [`TransportEvent`]s.
//!
//! ERROR HANDLING
//! ==============
//! Undecodable packets are logged and skipped. A rejected handshake, a
//! server-initiated disconnect and an explicit `close()` end the loop without
//! retry; dropped sockets, failed opens and missed heartbeats retry per
//! [`ReconnectPolicy`]. A connection with no server ping within
//! `pingInterval + pingTimeout` counts as dropped.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use std::sync::{Arc, Mutex, PoisonError};

use packets::{DEFAULT_NAMESPACE, EnginePacket, PacketKind, SocketPacket};

use crate::config::ReconnectPolicy;
#[cfg(feature = "hydrate")]
use crate::state::realtime::DisconnectReason;
use crate::state::realtime::{EventSink, SocketTransport, TransportEvent};

/// Handshake progress of one websocket connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the Engine.IO `open` packet.
    AwaitingOpen,
    /// `CONNECT` sent, waiting for the server's acknowledgement.
    AwaitingConnect,
    Connected,
    Closed,
}

/// Result of feeding one websocket message to a [`ProtocolSession`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionOutput {
    /// Text to write to the websocket.
    Send(String),
    Connected { socket_id: String },
    /// The server refused the namespace connection (`44`).
    ConnectRejected(String),
    /// The server disconnected the namespace (`41`).
    ServerDisconnect,
    /// The Engine.IO session was closed (`1`).
    EngineClosed,
    /// Server liveness seen (`open` or ping); restart the read deadline.
    Heartbeat,
    Event { name: String, data: serde_json::Value },
}

/// Read deadline before the Engine.IO `open` packet arrives.
pub const HANDSHAKE_TIMEOUT_MS: u64 = 20_000;

/// Socket.IO handshake state for a single websocket.
#[derive(Clone, Debug)]
pub struct ProtocolSession {
    phase: Phase,
    token: String,
    /// `pingInterval + pingTimeout` from the open handshake.
    heartbeat_ms: Option<u64>,
}

impl ProtocolSession {
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self { phase: Phase::AwaitingOpen, token: token.to_owned(), heartbeat_ms: None }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How long the transport may wait for the next heartbeat before treating
    /// the connection as dropped.
    #[must_use]
    pub fn read_timeout_ms(&self) -> u64 {
        self.heartbeat_ms.unwrap_or(HANDSHAKE_TIMEOUT_MS)
    }

    /// Consume one websocket text message.
    pub fn receive(&mut self, text: &str) -> Vec<SessionOutput> {
        if self.phase == Phase::Closed {
            return Vec::new();
        }
        let packet = match EnginePacket::decode(text) {
            Ok(packet) => packet,
            Err(e) => {
                leptos::logging::warn!("socket: dropping engine packet: {e}");
                return Vec::new();
            }
        };
        match packet {
            EnginePacket::Open(handshake) if self.phase == Phase::AwaitingOpen => {
                self.phase = Phase::AwaitingConnect;
                self.heartbeat_ms = Some(handshake.ping_interval.saturating_add(handshake.ping_timeout));
                let auth = serde_json::json!({ "token": self.token });
                vec![SessionOutput::Heartbeat, SessionOutput::Send(SocketPacket::connect(auth).to_engine_text())]
            }
            EnginePacket::Ping(data) => {
                vec![SessionOutput::Heartbeat, SessionOutput::Send(EnginePacket::Pong(data).encode())]
            }
            EnginePacket::Close => {
                self.phase = Phase::Closed;
                vec![SessionOutput::EngineClosed]
            }
            EnginePacket::Message(payload) => self.receive_socket_packet(&payload),
            EnginePacket::Open(_) | EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => Vec::new(),
        }
    }

    fn receive_socket_packet(&mut self, payload: &str) -> Vec<SessionOutput> {
        let packet = match SocketPacket::decode(payload) {
            Ok(packet) => packet,
            Err(e) => {
                leptos::logging::warn!("socket: dropping socket packet: {e}");
                return Vec::new();
            }
        };
        if packet.namespace != DEFAULT_NAMESPACE {
            return Vec::new();
        }

        match (packet.kind, self.phase) {
            (PacketKind::Connect, Phase::AwaitingConnect) => {
                let socket_id = field(packet.data.as_ref(), "sid").unwrap_or_default();
                self.phase = Phase::Connected;
                vec![SessionOutput::Connected { socket_id }]
            }
            (PacketKind::ConnectError, _) => {
                self.phase = Phase::Closed;
                let message = field(packet.data.as_ref(), "message")
                    .or_else(|| packet.data.as_ref().and_then(|d| d.as_str().map(str::to_owned)))
                    .unwrap_or_else(|| "Connection refused".to_owned());
                vec![SessionOutput::ConnectRejected(message)]
            }
            (PacketKind::Disconnect, _) => {
                self.phase = Phase::Closed;
                vec![SessionOutput::ServerDisconnect]
            }
            (PacketKind::Event, Phase::Connected) => match packet.event_parts() {
                Ok((name, data)) => vec![SessionOutput::Event { name: name.to_owned(), data: data.clone() }],
                Err(e) => {
                    leptos::logging::warn!("socket: dropping event: {e}");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Encoded event, or `None` before the handshake completes.
    #[must_use]
    pub fn emit(&self, name: &str, payload: serde_json::Value) -> Option<String> {
        (self.phase == Phase::Connected).then(|| encode_event(name, payload))
    }

    /// Move to `Closed`; returns the disconnect packet if the server should be told.
    pub fn close(&mut self) -> Option<String> {
        let notify = matches!(self.phase, Phase::AwaitingConnect | Phase::Connected);
        self.phase = Phase::Closed;
        notify.then(|| SocketPacket::disconnect().to_engine_text())
    }
}

fn field(data: Option<&serde_json::Value>, key: &str) -> Option<String> {
    data?.get(key)?.as_str().map(str::to_owned)
}

fn encode_event(name: &str, payload: serde_json::Value) -> String {
    SocketPacket::event(name, payload).to_engine_text()
}

#[cfg(feature = "hydrate")]
enum Outbound {
    Text(String),
    Close,
}

#[derive(Default)]
struct Shared {
    /// Bumped by every `open`/`close`; loops from older generations stop.
    generation: u64,
    connected: bool,
    #[cfg(feature = "hydrate")]
    outbound: Option<futures::channel::mpsc::UnboundedSender<Outbound>>,
}

/// Browser websocket transport with bounded reconnection.
#[derive(Clone, Default)]
pub struct BrowserSocket {
    policy: ReconnectPolicy,
    shared: Arc<Mutex<Shared>>,
}

impl BrowserSocket {
    #[must_use]
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, shared: Arc::default() }
    }

    fn with_shared<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut shared)
    }

    #[cfg(feature = "hydrate")]
    fn is_current(&self, generation: u64) -> bool {
        self.with_shared(|s| s.generation == generation)
    }
}

impl SocketTransport for BrowserSocket {
    fn open(&self, url: &str, token: &str, events: EventSink) {
        let generation = self.with_shared(|s| {
            s.generation += 1;
            s.connected = false;
            s.generation
        });
        #[cfg(feature = "hydrate")]
        {
            leptos::task::spawn_local(run_socket(self.clone(), url.to_owned(), token.to_owned(), events, generation));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, token, generation);
            events(TransportEvent::ConnectError {
                message: "websocket transport requires a browser".to_owned(),
                will_retry: false,
            });
        }
    }

    fn emit(&self, event: &str, payload: serde_json::Value) -> bool {
        self.with_shared(|s| {
            if !s.connected {
                return false;
            }
            #[cfg(feature = "hydrate")]
            {
                let text = encode_event(event, payload);
                s.outbound
                    .as_ref()
                    .is_some_and(|tx| tx.unbounded_send(Outbound::Text(text)).is_ok())
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (event, payload);
                false
            }
        })
    }

    fn close(&self) {
        self.with_shared(|s| {
            s.generation += 1;
            s.connected = false;
            #[cfg(feature = "hydrate")]
            {
                if let Some(tx) = s.outbound.take() {
                    let _ = tx.unbounded_send(Outbound::Text(SocketPacket::disconnect().to_engine_text()));
                    let _ = tx.unbounded_send(Outbound::Close);
                }
            }
        });
    }
}

#[cfg(feature = "hydrate")]
enum RunOutcome {
    /// Ended for good: client close, server disconnect or rejected handshake.
    Finished,
    /// The websocket could not be opened or closed before the handshake.
    Failed(String),
    /// An established connection dropped.
    Dropped,
}

/// Connection loop: one websocket at a time, reconnecting per policy.
#[cfg(feature = "hydrate")]
async fn run_socket(socket: BrowserSocket, url: String, token: String, events: EventSink, generation: u64) {
    let policy = socket.policy;
    let mut attempt: u32 = 0;

    loop {
        if !socket.is_current(generation) {
            return;
        }

        let outcome = connect_once(&socket, &url, &token, &events, generation).await;
        socket.with_shared(|s| {
            if s.generation == generation {
                s.connected = false;
                s.outbound = None;
            }
        });
        if !socket.is_current(generation) {
            return;
        }

        match outcome {
            RunOutcome::Finished => return,
            RunOutcome::Failed(message) => {
                let will_retry = policy.allows_retry(attempt + 1);
                events(TransportEvent::ConnectError { message, will_retry });
                if !will_retry {
                    return;
                }
                attempt += 1;
            }
            RunOutcome::Dropped => {
                if !policy.allows_retry(1) {
                    events(TransportEvent::Disconnected(DisconnectReason::TransportClosed));
                    return;
                }
                attempt = 1;
                events(TransportEvent::Reconnecting { attempt });
            }
        }

        let delay = policy.delay_ms(attempt);
        leptos::logging::log!("socket: reconnect attempt {attempt} in {delay}ms");
        gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(delay))).await;
    }
}

/// Open one websocket and run it until it ends.
#[cfg(feature = "hydrate")]
async fn connect_once(
    socket: &BrowserSocket,
    url: &str,
    token: &str,
    events: &EventSink,
    generation: u64,
) -> RunOutcome {
    use std::cell::Cell;

    use futures::channel::mpsc;
    use futures::future::{Either, select};
    use futures::{SinkExt, StreamExt};
    use gloo_timers::future::sleep;
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;

    let ws = match WebSocket::open(url) {
        Ok(ws) => ws,
        Err(e) => return RunOutcome::Failed(e.to_string()),
    };
    let (mut ws_write, mut ws_read) = ws.split();
    let (tx, mut rx) = mpsc::unbounded::<Outbound>();
    socket.with_shared(|s| {
        if s.generation == generation {
            s.outbound = Some(tx.clone());
        }
    });

    let notify = |event: TransportEvent| {
        if socket.is_current(generation) {
            events(event);
        }
    };
    let was_connected = Cell::new(false);
    let mut session = ProtocolSession::new(token);

    let send_task = async {
        while let Some(cmd) = rx.next().await {
            match cmd {
                Outbound::Text(text) => {
                    if ws_write.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = ws_write.close().await;
                    break;
                }
            }
        }
    };

    let recv_task = async {
        let heartbeat = |ms: u64| Box::pin(sleep(std::time::Duration::from_millis(ms)));
        let mut deadline = heartbeat(session.read_timeout_ms());
        'recv: loop {
            let msg = match select(ws_read.next(), &mut deadline).await {
                Either::Left((Some(msg), _)) => msg,
                Either::Left((None, _)) => break,
                Either::Right(((), _)) => {
                    leptos::logging::warn!("socket: no heartbeat within {}ms", session.read_timeout_ms());
                    return if was_connected.get() {
                        RunOutcome::Dropped
                    } else {
                        RunOutcome::Failed("handshake timed out".to_owned())
                    };
                }
            };
            let text = match msg {
                Ok(Message::Text(text)) => text,
                Ok(Message::Bytes(_)) => continue,
                Err(e) => {
                    leptos::logging::warn!("socket: recv error: {e}");
                    break;
                }
            };
            for output in session.receive(&text) {
                match output {
                    SessionOutput::Send(text) => {
                        let _ = tx.unbounded_send(Outbound::Text(text));
                    }
                    SessionOutput::Connected { socket_id } => {
                        was_connected.set(true);
                        socket.with_shared(|s| {
                            if s.generation == generation {
                                s.connected = true;
                            }
                        });
                        notify(TransportEvent::Connected { socket_id });
                    }
                    SessionOutput::ConnectRejected(message) => {
                        notify(TransportEvent::ConnectError { message, will_retry: false });
                        return RunOutcome::Finished;
                    }
                    SessionOutput::ServerDisconnect => {
                        notify(TransportEvent::Disconnected(DisconnectReason::ServerRequested));
                        return RunOutcome::Finished;
                    }
                    SessionOutput::EngineClosed => break 'recv,
                    SessionOutput::Heartbeat => deadline = heartbeat(session.read_timeout_ms()),
                    SessionOutput::Event { name, data } => notify(TransportEvent::Event { name, data }),
                }
            }
        }
        if was_connected.get() {
            RunOutcome::Dropped
        } else {
            RunOutcome::Failed("websocket closed before the handshake completed".to_owned())
        }
    };

    match select(Box::pin(send_task), Box::pin(recv_task)).await {
        Either::Left(((), _)) => {
            if was_connected.get() {
                RunOutcome::Dropped
            } else {
                RunOutcome::Failed("websocket write failed".to_owned())
            }
        }
        Either::Right((outcome, _)) => outcome,
    }
}
