//! Phase Recovery
//!
//! Best-effort salvage for event files that fail JSON decoding. Only the
//! event type label is recovered; payload data is never guessed at.

use crate::game::state::{MatchState, PhaseTag};

const TYPE_KEY: &str = "\"type\"";

/// Find the first `"type": "<label>"` pair in `text`.
///
/// Whitespace is allowed around the colon. The label runs to the next double
/// quote and must be non-empty; an occurrence that does not fit the pattern
/// is skipped and scanning continues.
pub fn extract_type_label(text: &str) -> Option<&str> {
    text.match_indices(TYPE_KEY)
        .find_map(|(start, _)| label_after_key(&text[start + TYPE_KEY.len()..]))
}

fn label_after_key(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix(':')?;
    let rest = rest.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    if end == 0 {
        return None;
    }
    Some(&rest[..end])
}

/// Recover the phase from undecodable text.
///
/// Sets the phase when a label is found; registries are never touched.
pub fn recover(state: &mut MatchState, text: &str) -> Option<PhaseTag> {
    let tag = PhaseTag::new(extract_type_label(text)?);
    state.set_phase(tag.clone());
    Some(tag)
}
