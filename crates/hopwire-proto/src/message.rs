//! The inner application message: the JSON payload carried, AEAD-encrypted,
//! inside a Data packet's payload field.

use serde::{Deserialize, Serialize};

/// Sentinel `session_id` value used by server replies, which identify
/// themselves by the session's key rather than by quoting the id back.
pub const SERVER_REPLY_SESSION_ID: &str = "server-reply";

/// Decrypted, JSON-encoded application message carried by a Data packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMessage {
    pub session_id: String,

    #[serde(with = "crate::base64_field")]
    pub message: Vec<u8>,

    pub next_port: u16,
    pub seq: u64,
    pub ack_seq: u64,
    pub return_addr: String,
}

impl DataMessage {
    /// Serialize to the JSON bytes that are encrypted as a packet's payload.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Parse from decrypted JSON bytes.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_preserves_all_fields() {
        let msg = DataMessage {
            session_id: "abc123".to_string(),
            message: b"hello hopwire".to_vec(),
            next_port: 41234,
            seq: 7,
            ack_seq: 6,
            return_addr: "127.0.0.1:9000".to_string(),
        };
        let bytes = msg.to_json().unwrap();
        let parsed = DataMessage::from_json(&bytes).unwrap();
        assert_eq!(msg, parsed);
    }

    #[test]
    fn empty_message_is_valid_ack() {
        let msg = DataMessage {
            session_id: SERVER_REPLY_SESSION_ID.to_string(),
            message: Vec::new(),
            next_port: 0,
            seq: 0,
            ack_seq: 0,
            return_addr: String::new(),
        };
        let bytes = msg.to_json().unwrap();
        let parsed = DataMessage::from_json(&bytes).unwrap();
        assert!(parsed.message.is_empty());
    }

    #[test]
    fn message_field_is_base64_in_json() {
        let msg = DataMessage {
            session_id: "s".to_string(),
            message: vec![0, 1, 2, 255],
            next_port: 1,
            seq: 0,
            ack_seq: 0,
            return_addr: String::new(),
        };
        let value: serde_json::Value = serde_json::from_slice(&msg.to_json().unwrap()).unwrap();
        assert!(value["message"].is_string());
    }
}
