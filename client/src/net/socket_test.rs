use super::*;

const OPEN: &str = r#"0{"sid":"eng-1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

fn handshaken(token: &str) -> ProtocolSession {
    let mut session = ProtocolSession::new(token);
    session.receive(OPEN);
    session
}

fn connected() -> ProtocolSession {
    let mut session = handshaken("jwt");
    session.receive(r#"40{"sid":"sock-1"}"#);
    session
}

// =============================================================
// Handshake
// =============================================================

#[test]
fn open_sends_connect_with_token_auth() {
    let mut session = ProtocolSession::new("jwt");
    let out = session.receive(OPEN);
    assert_eq!(
        out,
        vec![SessionOutput::Heartbeat, SessionOutput::Send(r#"40{"token":"jwt"}"#.to_owned())]
    );
    assert_eq!(session.phase(), Phase::AwaitingConnect);
}

#[test]
fn read_timeout_uses_handshake_default_before_open() {
    assert_eq!(ProtocolSession::new("jwt").read_timeout_ms(), HANDSHAKE_TIMEOUT_MS);
}

#[test]
fn read_timeout_is_ping_interval_plus_ping_timeout() {
    let session = handshaken("jwt");
    assert_eq!(session.read_timeout_ms(), 45_000);
}

#[test]
fn read_timeout_follows_server_timings() {
    let mut session = ProtocolSession::new("jwt");
    session.receive(r#"0{"sid":"e","upgrades":[],"pingInterval":300,"pingTimeout":200}"#);
    assert_eq!(session.read_timeout_ms(), 500);
}

#[test]
fn connect_ack_reports_socket_id() {
    let mut session = handshaken("jwt");
    let out = session.receive(r#"40{"sid":"sock-1"}"#);
    assert_eq!(out, vec![SessionOutput::Connected { socket_id: "sock-1".to_owned() }]);
    assert_eq!(session.phase(), Phase::Connected);
}

#[test]
fn connect_error_carries_server_message() {
    let mut session = handshaken("bad");
    let out = session.receive(r#"44{"message":"Authentication error: Invalid token"}"#);
    assert_eq!(out, vec![SessionOutput::ConnectRejected("Authentication error: Invalid token".to_owned())]);
    assert_eq!(session.phase(), Phase::Closed);
}

#[test]
fn second_open_is_ignored() {
    let mut session = handshaken("jwt");
    assert!(session.receive(OPEN).is_empty());
}

// =============================================================
// Steady state
// =============================================================

#[test]
fn ping_is_answered_with_pong() {
    let mut session = connected();
    assert_eq!(session.receive("2"), vec![SessionOutput::Heartbeat, SessionOutput::Send("3".to_owned())]);
    assert_eq!(
        session.receive("2probe"),
        vec![SessionOutput::Heartbeat, SessionOutput::Send("3probe".to_owned())]
    );
}

#[test]
fn only_pings_restart_the_heartbeat() {
    let mut session = connected();
    let out = session.receive(r#"42["receiveMessage",{"senderId":"a","message":"m","timestamp":"t"}]"#);
    assert!(!out.contains(&SessionOutput::Heartbeat));
    assert!(session.receive("3").is_empty());
    assert!(session.receive("6").is_empty());
}

#[test]
fn noop_and_garbage_are_ignored() {
    let mut session = connected();
    assert!(session.receive("6").is_empty());
    assert!(session.receive("").is_empty());
    assert!(session.receive("9zzz").is_empty());
    assert!(session.receive("42not json").is_empty());
    assert_eq!(session.phase(), Phase::Connected);
}

#[test]
fn event_is_surfaced_with_first_argument() {
    let mut session = connected();
    let out = session.receive(r#"42["receiveMessage",{"senderId":"abc","message":"hi","timestamp":"t"}]"#);
    assert_eq!(
        out,
        vec![SessionOutput::Event {
            name: "receiveMessage".to_owned(),
            data: serde_json::json!({"senderId": "abc", "message": "hi", "timestamp": "t"}),
        }]
    );
}

#[test]
fn events_before_connect_ack_are_dropped() {
    let mut session = handshaken("jwt");
    assert!(session.receive(r#"42["receiveMessage",{}]"#).is_empty());
}

#[test]
fn other_namespaces_are_ignored() {
    let mut session = connected();
    assert!(session.receive(r#"42/admin,["receiveMessage",{}]"#).is_empty());
}

#[test]
fn server_disconnect_closes_session() {
    let mut session = connected();
    assert_eq!(session.receive("41"), vec![SessionOutput::ServerDisconnect]);
    assert_eq!(session.phase(), Phase::Closed);
    assert!(session.receive("2").is_empty());
}

#[test]
fn engine_close_is_reported() {
    let mut session = connected();
    assert_eq!(session.receive("1"), vec![SessionOutput::EngineClosed]);
}

// =============================================================
// Outbound
// =============================================================

#[test]
fn emit_requires_connected_phase() {
    let payload = serde_json::json!({"recipientId": "u1", "message": "hello"});
    assert!(handshaken("jwt").emit("sendMessage", payload.clone()).is_none());

    let text = connected().emit("sendMessage", payload).unwrap();
    assert!(text.starts_with(r#"42["sendMessage","#));
    let packet = SocketPacket::decode(&text[1..]).unwrap();
    let (name, data) = packet.event_parts().unwrap();
    assert_eq!(name, "sendMessage");
    assert_eq!(data["recipientId"], "u1");
}

#[test]
fn close_notifies_server_only_after_connect_was_sent() {
    assert_eq!(ProtocolSession::new("jwt").close(), None);
    let mut session = connected();
    assert_eq!(session.close().as_deref(), Some("41"));
    assert_eq!(session.phase(), Phase::Closed);
}

// =============================================================
// BrowserSocket outside the browser
// =============================================================

#[test]
fn browser_socket_refuses_emit_before_connect() {
    let socket = BrowserSocket::new(ReconnectPolicy::default());
    assert!(!socket.emit("sendMessage", serde_json::json!({})));
    socket.close();
}

#[test]
fn browser_socket_reports_unavailable_natively() {
    #[cfg(not(feature = "hydrate"))]
    {
        let seen: Arc<Mutex<Vec<TransportEvent>>> = Arc::default();
        let sink_seen = Arc::clone(&seen);
        let sink: EventSink = Arc::new(move |event| sink_seen.lock().unwrap().push(event));
        BrowserSocket::default().open("ws://localhost:5001/socket.io/", "jwt", sink);
        let events = seen.lock().unwrap().clone();
        assert!(matches!(events.as_slice(), [TransportEvent::ConnectError { will_retry: false, .. }]));
    }
}
