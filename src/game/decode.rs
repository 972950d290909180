//! Event Decoding
//!
//! Raw bytes → structured event, with a phase-only fallback for input that
//! is not valid JSON.

use serde_json::Value;
use tracing::debug;

use crate::game::events::RawEvent;
use crate::game::recovery::extract_type_label;
use crate::game::state::PhaseTag;

/// Result of decoding one raw event blob.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeOutcome {
    /// Valid JSON, split into tag and payload
    Decoded(RawEvent),
    /// Invalid JSON, but a type label was salvaged
    Recovered(PhaseTag),
    /// Invalid JSON with no salvageable label
    Unrecoverable,
}

/// Decode a raw event blob.
///
/// Pure: the caller decides what to do with a recovered phase.
pub fn decode(bytes: &[u8]) -> DecodeOutcome {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => DecodeOutcome::Decoded(RawEvent::from_value(value)),
        Err(err) => {
            debug!("JSON decoding error: {}", err);
            let text = String::from_utf8_lossy(bytes);
            match extract_type_label(&text) {
                Some(label) => DecodeOutcome::Recovered(PhaseTag::new(label)),
                None => DecodeOutcome::Unrecoverable,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::{EventKind, EventTag};
    use serde_json::json;

    #[test]
    fn test_decodes_valid_event() {
        let outcome = decode(br#"{"type": "MATCH_END", "payload": {}}"#);
        assert_eq!(
            outcome,
            DecodeOutcome::Decoded(RawEvent::new(EventKind::MatchEnd, json!({})))
        );
    }

    #[test]
    fn test_valid_json_with_unknown_type_is_decoded() {
        let DecodeOutcome::Decoded(raw) = decode(br#"{"type": "PAUSE", "payload": {}}"#) else {
            panic!("expected decoded outcome");
        };
        assert_eq!(raw.tag, EventTag::Unrecognized("PAUSE".into()));
    }

    #[test]
    fn test_recovers_label_from_broken_json() {
        let outcome = decode(br#"{"type": "PLAYER_KILL", "payload": {"killerID": }"#);
        assert_eq!(outcome, DecodeOutcome::Recovered(PhaseTag::new("PLAYER_KILL")));
    }

    #[test]
    fn test_unrecoverable() {
        assert_eq!(decode(b"\xff\xfe not json"), DecodeOutcome::Unrecoverable);
        assert_eq!(decode(b""), DecodeOutcome::Unrecoverable);
    }
}
