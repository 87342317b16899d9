//! Reply envelope shared by every request/reply exchange on the bus.
//!
//! The wire shape follows JSend:
//!
//! ```json
//! {"status": "success", "data": {...}}
//! {"status": "fail", "message": "..."}
//! {"status": "error", "message": "..."}
//! ```
//!
//! `fail` means the caller sent something that cannot be honoured (bad input,
//! missing resource, conflict). `error` means the system could not complete an
//! otherwise valid request.

use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Last-resort reply used when even an `error` envelope cannot be encoded.
const ENCODE_FAILURE_REPLY: &[u8] = br#"{"status":"error","message":"failed to encode reply"}"#;

/// Three-state reply wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T = Value> {
    Success { data: T },
    Fail { message: String },
    Error { message: String },
}

/// Status discriminant of an [`Envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Fail,
    Error,
}

impl EnvelopeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeStatus::Success => "success",
            EnvelopeStatus::Fail => "fail",
            EnvelopeStatus::Error => "error",
        }
    }

    /// Read only the `status` field of an encoded envelope.
    ///
    /// The payload is left untouched so callers can forward the original
    /// bytes. Unknown status values are rejected.
    pub fn from_reply(payload: &[u8]) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Probe {
            status: EnvelopeStatus,
        }

        serde_json::from_slice::<Probe>(payload).map(|probe| probe.status)
    }
}

impl fmt::Display for EnvelopeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Envelope::Success { data }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Envelope::Fail {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> EnvelopeStatus {
        match self {
            Envelope::Success { .. } => EnvelopeStatus::Success,
            Envelope::Fail { .. } => EnvelopeStatus::Fail,
            Envelope::Error { .. } => EnvelopeStatus::Error,
        }
    }

    /// Message carried by `fail` and `error` envelopes.
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Fail { message } | Envelope::Error { message } => Some(message),
        }
    }
}

impl Envelope<Value> {
    /// Wrap any serializable value as a `success` envelope.
    ///
    /// A value that cannot be represented as JSON becomes an `error` envelope:
    /// the request was valid, the system failed to answer it.
    pub fn success_from<S: Serialize>(data: &S) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Envelope::Success { data: value },
            Err(e) => Envelope::error(format!("failed to encode reply data: {}", e)),
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn encode(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(self).map(Bytes::from)
    }

    /// Encode for publishing. Never fails: an encoding problem is reported as
    /// an `error` envelope so a reply is always produced.
    pub fn to_reply(&self) -> Bytes {
        match self.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode reply envelope");
                Envelope::<()>::error(format!("failed to encode reply: {}", e))
                    .encode()
                    .unwrap_or_else(|_| Bytes::from_static(ENCODE_FAILURE_REPLY))
            }
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shapes() {
        let success = Envelope::success(json!({"id": 1, "name": "Widget"}));
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({"status": "success", "data": {"id": 1, "name": "Widget"}})
        );

        let fail: Envelope = Envelope::fail("Product with id 999 does not exist");
        assert_eq!(
            serde_json::to_value(&fail).unwrap(),
            json!({"status": "fail", "message": "Product with id 999 does not exist"})
        );

        let error: Envelope = Envelope::error("database unavailable");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({"status": "error", "message": "database unavailable"})
        );
    }

    #[test]
    fn test_empty_success_carries_null_data() {
        let envelope = Envelope::success_from(&());
        assert_eq!(
            envelope.encode().unwrap(),
            Bytes::from_static(br#"{"status":"success","data":null}"#)
        );
    }

    #[test]
    fn test_from_reply_ignores_payload() {
        let reply = br#"{"status":"fail","message":"bad","extra":[1,2,3]}"#;
        assert_eq!(
            EnvelopeStatus::from_reply(reply).unwrap(),
            EnvelopeStatus::Fail
        );
    }

    #[test]
    fn test_from_reply_rejects_unknown_or_missing_status() {
        assert!(EnvelopeStatus::from_reply(br#"{"status":"maybe"}"#).is_err());
        assert!(EnvelopeStatus::from_reply(br#"{"data":1}"#).is_err());
        assert!(EnvelopeStatus::from_reply(b"not json").is_err());
    }

    #[test]
    fn test_decode_typed_payload() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Item {
            id: u64,
        }

        let envelope: Envelope<Item> =
            Envelope::decode(br#"{"status":"success","data":{"id":7}}"#).unwrap();
        assert_eq!(envelope, Envelope::Success { data: Item { id: 7 } });
        assert_eq!(envelope.message(), None);
    }

    #[test]
    fn test_success_from_unrepresentable_value_is_error() {
        use std::collections::HashMap;

        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);

        let envelope = Envelope::success_from(&map);
        assert_eq!(envelope.status(), EnvelopeStatus::Error);
        assert!(envelope.message().unwrap().contains("encode"));
    }
}
