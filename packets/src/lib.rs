//! Engine.IO v4 / Socket.IO v5 text packet codec for the realtime transport.
//!
//! The browser client speaks the Socket.IO protocol directly over a raw
//! websocket (`transport=websocket`, no long-polling upgrade). Every websocket
//! text message is one Engine.IO packet; Engine `message` packets carry one
//! Socket.IO packet. Binary attachments are not used by the messaging events
//! and are rejected on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Namespace used when a packet does not name one.
pub const DEFAULT_NAMESPACE: &str = "/";

/// Error returned by the decoders in this crate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text was empty.
    #[error("empty packet")]
    Empty,
    /// The leading Engine.IO type digit is not one of `0`..=`6`.
    #[error("unknown engine packet type: {0:?}")]
    UnknownEngineType(char),
    /// The leading Socket.IO type digit is not one of `0`..=`6`.
    #[error("unknown socket packet type: {0:?}")]
    UnknownSocketType(char),
    /// Binary event/ack packets need attachment frames this codec does not carry.
    #[error("binary socket packets are not supported")]
    UnsupportedBinary,
    /// The JSON payload could not be parsed.
    #[error("invalid packet payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The ack id digits do not fit in a `u64`.
    #[error("invalid ack id")]
    InvalidAckId,
    /// An event packet whose payload is not `["name", ...args]`.
    #[error("malformed event payload")]
    MalformedEvent,
}

/// Handshake payload carried by the Engine.IO `open` packet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHandshake {
    /// Engine-level session id (distinct from the Socket.IO socket id).
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Interval between server pings, in milliseconds.
    pub ping_interval: u64,
    /// Time the server waits for a pong, in milliseconds.
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

/// One Engine.IO packet in its text form.
#[derive(Clone, Debug, PartialEq)]
pub enum EnginePacket {
    Open(OpenHandshake),
    Close,
    Ping(Option<String>),
    Pong(Option<String>),
    /// Carries an encoded Socket.IO packet.
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    /// Encode into websocket text.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Open(handshake) => {
                let body = serde_json::to_string(handshake).unwrap_or_default();
                format!("0{body}")
            }
            Self::Close => "1".to_owned(),
            Self::Ping(data) => format!("2{}", data.as_deref().unwrap_or_default()),
            Self::Pong(data) => format!("3{}", data.as_deref().unwrap_or_default()),
            Self::Message(data) => format!("4{data}"),
            Self::Upgrade => "5".to_owned(),
            Self::Noop => "6".to_owned(),
        }
    }

    /// Decode websocket text into an Engine.IO packet.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Empty`], [`CodecError::UnknownEngineType`], or
    /// [`CodecError::InvalidJson`] for a malformed `open` body.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let mut chars = raw.chars();
        let kind = chars.next().ok_or(CodecError::Empty)?;
        let rest = chars.as_str();
        match kind {
            '0' => Ok(Self::Open(serde_json::from_str(rest)?)),
            '1' => Ok(Self::Close),
            '2' => Ok(Self::Ping(non_empty(rest))),
            '3' => Ok(Self::Pong(non_empty(rest))),
            '4' => Ok(Self::Message(rest.to_owned())),
            '5' => Ok(Self::Upgrade),
            '6' => Ok(Self::Noop),
            other => Err(CodecError::UnknownEngineType(other)),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() { None } else { Some(raw.to_owned()) }
}

/// Socket.IO packet type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketKind {
    Connect,
    Disconnect,
    Event,
    Ack,
    ConnectError,
    BinaryEvent,
    BinaryAck,
}

impl PacketKind {
    /// Wire digit for this packet type.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Connect => '0',
            Self::Disconnect => '1',
            Self::Event => '2',
            Self::Ack => '3',
            Self::ConnectError => '4',
            Self::BinaryEvent => '5',
            Self::BinaryAck => '6',
        }
    }

    fn from_char(value: char) -> Result<Self, CodecError> {
        match value {
            '0' => Ok(Self::Connect),
            '1' => Ok(Self::Disconnect),
            '2' => Ok(Self::Event),
            '3' => Ok(Self::Ack),
            '4' => Ok(Self::ConnectError),
            '5' => Ok(Self::BinaryEvent),
            '6' => Ok(Self::BinaryAck),
            other => Err(CodecError::UnknownSocketType(other)),
        }
    }
}

/// A Socket.IO packet: `<type>[<nsp>,][<ack id>][<json>]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SocketPacket {
    pub kind: PacketKind,
    pub namespace: String,
    pub ack_id: Option<u64>,
    pub data: Option<Value>,
}

impl SocketPacket {
    /// `CONNECT` to the default namespace with an auth payload.
    #[must_use]
    pub fn connect(auth: Value) -> Self {
        Self { kind: PacketKind::Connect, namespace: DEFAULT_NAMESPACE.to_owned(), ack_id: None, data: Some(auth) }
    }

    /// `DISCONNECT` from the default namespace.
    #[must_use]
    pub fn disconnect() -> Self {
        Self { kind: PacketKind::Disconnect, namespace: DEFAULT_NAMESPACE.to_owned(), ack_id: None, data: None }
    }

    /// `EVENT` with a single argument, e.g. `42["sendMessage",{...}]`.
    #[must_use]
    pub fn event(name: &str, payload: Value) -> Self {
        Self {
            kind: PacketKind::Event,
            namespace: DEFAULT_NAMESPACE.to_owned(),
            ack_id: None,
            data: Some(Value::Array(vec![Value::String(name.to_owned()), payload])),
        }
    }

    /// Event name and first argument (`Null` when the event has none).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedEvent`] when this is not an event packet
    /// or its payload is not an array led by a string.
    pub fn event_parts(&self) -> Result<(&str, &Value), CodecError> {
        static NULL: Value = Value::Null;
        if self.kind != PacketKind::Event {
            return Err(CodecError::MalformedEvent);
        }
        let items = self
            .data
            .as_ref()
            .and_then(Value::as_array)
            .ok_or(CodecError::MalformedEvent)?;
        let name = items
            .first()
            .and_then(Value::as_str)
            .ok_or(CodecError::MalformedEvent)?;
        Ok((name, items.get(1).unwrap_or(&NULL)))
    }

    /// Encode into the payload of an Engine.IO `message` packet.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(self.kind.as_char());
        if !self.namespace.is_empty() && self.namespace != DEFAULT_NAMESPACE {
            out.push_str(&self.namespace);
            out.push(',');
        }
        if let Some(id) = self.ack_id {
            out.push_str(&id.to_string());
        }
        if let Some(data) = &self.data {
            out.push_str(&data.to_string());
        }
        out
    }

    /// Decode the payload of an Engine.IO `message` packet.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] for empty input, unknown or binary packet
    /// types, oversized ack ids, or invalid JSON data.
    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let mut chars = raw.chars();
        let kind = PacketKind::from_char(chars.next().ok_or(CodecError::Empty)?)?;
        if matches!(kind, PacketKind::BinaryEvent | PacketKind::BinaryAck) {
            return Err(CodecError::UnsupportedBinary);
        }
        let mut rest = chars.as_str();

        let mut namespace = DEFAULT_NAMESPACE.to_owned();
        if rest.starts_with('/') {
            let end = rest.find(',').unwrap_or(rest.len());
            namespace = rest[..end].to_owned();
            rest = rest.get(end + 1..).unwrap_or_default();
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack_id = if digits == 0 {
            None
        } else {
            Some(rest[..digits].parse::<u64>().map_err(|_| CodecError::InvalidAckId)?)
        };
        rest = &rest[digits..];

        let data = if rest.is_empty() { None } else { Some(serde_json::from_str(rest)?) };
        Ok(Self { kind, namespace, ack_id, data })
    }

    /// Wrap into an Engine.IO `message` packet and encode to websocket text.
    #[must_use]
    pub fn to_engine_text(&self) -> String {
        EnginePacket::Message(self.encode()).encode()
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
