//! Match Replay
//!
//! Drives a single match: decode each blob, apply it or salvage its phase,
//! and keep per-outcome counters. Nothing here aborts; every failure is local
//! to the event that caused it.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AfterEnd;
use crate::game::apply::{apply_event, Applied, ApplyError};
use crate::game::decode::{decode, DecodeOutcome};
use crate::game::events::{EventKind, RawEvent};
use crate::game::report::WinnerReport;
use crate::game::state::{MatchState, PhaseTag, PlayerRegistry, TeamRegistry};
use crate::source::EventSource;

/// Outcome of ingesting one blob.
#[derive(Debug)]
pub enum IngestOutcome {
    /// Recognized event applied
    Applied(EventKind),
    /// Decoded, but the type is not recognized
    Ignored(String),
    /// Decoded, but rejected (phase may still have been recorded)
    Rejected(ApplyError),
    /// Undecodable; phase recovered from the text
    Recovered(PhaseTag),
    /// Undecodable and nothing salvageable (or unreadable)
    Unrecoverable,
}

/// Per-outcome counters for a replay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Recognized events applied
    pub applied: u64,
    /// Decoded events rejected
    pub rejected: u64,
    /// Unrecognized event types
    pub ignored: u64,
    /// Undecodable blobs with a recovered phase
    pub recovered: u64,
    /// Undecodable or unreadable blobs
    pub unrecoverable: u64,
}

impl IngestStats {
    /// Total blobs seen.
    pub fn total(&self) -> u64 {
        self.applied + self.rejected + self.ignored + self.recovered + self.unrecoverable
    }

    fn record(&mut self, outcome: &IngestOutcome) {
        match outcome {
            IngestOutcome::Applied(_) => self.applied += 1,
            IngestOutcome::Ignored(_) => self.ignored += 1,
            IngestOutcome::Rejected(_) => self.rejected += 1,
            IngestOutcome::Recovered(_) => self.recovered += 1,
            IngestOutcome::Unrecoverable => self.unrecoverable += 1,
        }
    }
}

/// Serializable end-of-run view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary<'a> {
    /// Last game state
    pub phase: Option<&'a PhaseTag>,
    /// Match still running?
    pub match_active: bool,
    /// Players in registry order
    pub players: &'a PlayerRegistry,
    /// Teams in roster order
    pub teams: &'a TeamRegistry,
    /// Leaderboard extremes
    pub winner: WinnerReport,
    /// Ingest counters
    pub stats: &'a IngestStats,
    /// Hex SHA-256 of the final state
    pub state_hash: String,
}

/// Replays one match from an ordered stream of raw events.
#[derive(Debug, Default)]
pub struct MatchReplay {
    state: MatchState,
    after_end: AfterEnd,
    stats: IngestStats,
}

impl MatchReplay {
    /// Create a replay over an empty state.
    pub fn new(after_end: AfterEnd) -> Self {
        Self {
            state: MatchState::new(),
            after_end,
            stats: IngestStats::default(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Counters so far.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Ingest one raw blob.
    pub fn ingest(&mut self, label: &str, bytes: &[u8]) -> IngestOutcome {
        let outcome = match decode(bytes) {
            DecodeOutcome::Decoded(raw) => self.apply_raw(&raw),
            DecodeOutcome::Recovered(tag) => self.recover(tag),
            DecodeOutcome::Unrecoverable => IngestOutcome::Unrecoverable,
        };
        self.log_outcome(label, &outcome);
        self.stats.record(&outcome);
        outcome
    }

    /// Ingest an already decoded event.
    pub fn ingest_event(&mut self, label: &str, raw: &RawEvent) -> IngestOutcome {
        let outcome = self.apply_raw(raw);
        self.log_outcome(label, &outcome);
        self.stats.record(&outcome);
        outcome
    }

    /// Drain a source in order.
    pub fn replay_source<S: EventSource + ?Sized>(&mut self, source: &mut S) {
        while let Some(item) = source.next_item() {
            match item.bytes {
                Ok(bytes) => {
                    self.ingest(&item.label, &bytes);
                }
                Err(err) => {
                    warn!("Skipping {}: {}", item.label, err);
                    self.stats.record(&IngestOutcome::Unrecoverable);
                }
            }
        }
        info!(
            "Replay finished: {} events ({} applied, {} rejected, {} ignored, {} recovered, {} unrecoverable)",
            self.stats.total(),
            self.stats.applied,
            self.stats.rejected,
            self.stats.ignored,
            self.stats.recovered,
            self.stats.unrecoverable,
        );
    }

    /// Leaderboard extremes of the current state.
    pub fn winner(&self) -> WinnerReport {
        WinnerReport::compute(&self.state)
    }

    /// End-of-run summary.
    pub fn summary(&self) -> ReplaySummary<'_> {
        ReplaySummary {
            phase: self.state.phase(),
            match_active: self.state.is_active(),
            players: self.state.players(),
            teams: self.state.teams(),
            winner: self.winner(),
            stats: &self.stats,
            state_hash: hex::encode(self.state.compute_hash()),
        }
    }

    fn ignoring_after_end(&self) -> bool {
        self.after_end == AfterEnd::Ignore && self.state.has_ended()
    }

    fn apply_raw(&mut self, raw: &RawEvent) -> IngestOutcome {
        let kind = raw.kind();
        if kind.is_some() && kind != Some(EventKind::MatchStart) && self.ignoring_after_end() {
            return IngestOutcome::Rejected(ApplyError::MatchEnded {
                tag: raw.tag.to_string(),
            });
        }

        match apply_event(&mut self.state, raw) {
            Ok(Applied::Event(kind)) => IngestOutcome::Applied(kind),
            Ok(Applied::Ignored(tag)) => IngestOutcome::Ignored(tag),
            Err(err) => IngestOutcome::Rejected(err),
        }
    }

    // Under Ignore every fragment after MATCH_END is rejected, MATCH_START
    // labels included.
    fn recover(&mut self, tag: PhaseTag) -> IngestOutcome {
        if self.ignoring_after_end() {
            return IngestOutcome::Rejected(ApplyError::MatchEnded {
                tag: tag.to_string(),
            });
        }
        self.state.set_phase(tag.clone());
        IngestOutcome::Recovered(tag)
    }

    fn log_outcome(&self, label: &str, outcome: &IngestOutcome) {
        match outcome {
            IngestOutcome::Applied(kind) => debug!("{}: applied {}", label, kind),
            IngestOutcome::Ignored(tag) => debug!("{}: ignored event type {:?}", label, tag),
            IngestOutcome::Rejected(err) => warn!("{}: {}", label, err),
            IngestOutcome::Recovered(tag) => {
                warn!("{}: undecodable, recovered phase {}", label, tag)
            }
            IngestOutcome::Unrecoverable => warn!("{}: undecodable, nothing recovered", label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::PlayerId;
    use crate::source::VecSource;

    const START: &str = r#"{"type": "MATCH_START", "payload": {"teams": [
        {"teamID": "t1", "players": [{"playerID": "p1"}, {"playerID": "p2"}]},
        {"teamID": "t2", "players": [{"playerID": "q1"}]}
    ]}}"#;
    const END: &str = r#"{"type": "MATCH_END", "payload": {}}"#;
    const MINION: &str = r#"{"type": "MINION_KILL", "payload": {"playerID": "p1", "goldGranted": 20}}"#;

    fn phase(replay: &MatchReplay) -> Option<&str> {
        replay.state().phase().map(PhaseTag::as_str)
    }

    #[test]
    fn test_replay_source_counts_outcomes() {
        let mut replay = MatchReplay::default();
        let mut source = VecSource::new([
            START,
            MINION,
            r#"{"type": "DRAGON_KILL", "payload": {"killerID": "#,
            r#"{"type": "PAUSE", "payload": {}}"#,
            r#"{"type": "PLAYER_KILL", "payload": {"killerID": "p1"}}"#,
            "%%%",
            END,
        ]);

        replay.replay_source(&mut source);

        assert_eq!(
            replay.stats(),
            &IngestStats {
                applied: 3,
                rejected: 1,
                ignored: 1,
                recovered: 1,
                unrecoverable: 1,
            }
        );
        assert_eq!(phase(&replay), Some("MATCH_END"));
        assert!(!replay.state().is_active());
        assert_eq!(replay.state().get_player(&PlayerId::new("p1")).unwrap().gold, 20);
    }

    #[test]
    fn test_recovered_phase_is_visible() {
        let mut replay = MatchReplay::default();
        replay.ingest("1.json", START.as_bytes());
        let outcome = replay.ingest("2.json", br#"{"type": "DRAGON_KILL", "payload": {"#);

        assert!(matches!(outcome, IngestOutcome::Recovered(ref t) if t.as_str() == "DRAGON_KILL"));
        assert_eq!(phase(&replay), Some("DRAGON_KILL"));
        assert_eq!(replay.state().players().len(), 3);
    }

    #[test]
    fn test_after_end_apply_policy() {
        let mut replay = MatchReplay::new(AfterEnd::Apply);
        for blob in [START, END, MINION] {
            replay.ingest("e", blob.as_bytes());
        }

        assert_eq!(phase(&replay), Some("MINION_KILL"));
        assert_eq!(replay.state().get_player(&PlayerId::new("p1")).unwrap().gold, 20);
    }

    #[test]
    fn test_after_end_ignore_policy() {
        let mut replay = MatchReplay::new(AfterEnd::Ignore);
        for blob in [START, END] {
            replay.ingest("e", blob.as_bytes());
        }

        let outcome = replay.ingest("late", MINION.as_bytes());
        assert!(matches!(outcome, IngestOutcome::Rejected(ApplyError::MatchEnded { .. })));

        let outcome = replay.ingest("late", br#"{"type": "DRAGON_KILL", "#);
        assert!(matches!(outcome, IngestOutcome::Rejected(ApplyError::MatchEnded { .. })));

        assert_eq!(phase(&replay), Some("MATCH_END"));
        assert_eq!(replay.state().get_player(&PlayerId::new("p1")).unwrap().gold, 0);

        // A new match is still accepted
        let outcome = replay.ingest("next", START.as_bytes());
        assert!(matches!(outcome, IngestOutcome::Applied(EventKind::MatchStart)));
        let outcome = replay.ingest("next", MINION.as_bytes());
        assert!(matches!(outcome, IngestOutcome::Applied(EventKind::MinionKill)));
    }

    #[test]
    fn test_after_end_ignore_rejects_recovered_match_start() {
        let mut replay = MatchReplay::new(AfterEnd::Ignore);
        for blob in [START, END] {
            replay.ingest("e", blob.as_bytes());
        }

        let outcome = replay.ingest("late", br#"{"type": "MATCH_START", "payload": {"teams": ["#);
        assert!(matches!(
            outcome,
            IngestOutcome::Rejected(ApplyError::MatchEnded { ref tag }) if tag == "MATCH_START"
        ));
        assert_eq!(phase(&replay), Some("MATCH_END"));
        assert!(replay.state().has_ended());
    }

    #[test]
    fn test_ingest_event() {
        let mut replay = MatchReplay::new(AfterEnd::Ignore);
        let start: serde_json::Value = serde_json::from_str(START).unwrap();
        let minion: serde_json::Value = serde_json::from_str(MINION).unwrap();
        let minion = RawEvent::from_value(minion);

        let outcome = replay.ingest_event("start", &RawEvent::from_value(start));
        assert!(matches!(outcome, IngestOutcome::Applied(EventKind::MatchStart)));
        let outcome = replay.ingest_event("minion", &minion);
        assert!(matches!(outcome, IngestOutcome::Applied(EventKind::MinionKill)));
        let outcome = replay.ingest_event(
            "pause",
            &RawEvent::from_value(serde_json::json!({"type": "PAUSE", "payload": {}})),
        );
        assert!(matches!(outcome, IngestOutcome::Ignored(ref t) if t == "PAUSE"));
        let outcome = replay.ingest_event(
            "end",
            &RawEvent::new(EventKind::MatchEnd, serde_json::json!({})),
        );
        assert!(matches!(outcome, IngestOutcome::Applied(EventKind::MatchEnd)));

        // Policy applies to pre-decoded events too
        let outcome = replay.ingest_event("late", &minion);
        assert!(matches!(outcome, IngestOutcome::Rejected(ApplyError::MatchEnded { .. })));

        assert_eq!(
            replay.stats(),
            &IngestStats {
                applied: 3,
                rejected: 1,
                ignored: 1,
                recovered: 0,
                unrecoverable: 0,
            }
        );
        assert_eq!(replay.state().get_player(&PlayerId::new("p1")).unwrap().gold, 20);
    }

    #[test]
    fn test_replays_are_deterministic() {
        let blobs = [START, MINION, MINION, END];

        let mut a = MatchReplay::default();
        let mut b = MatchReplay::default();
        a.replay_source(&mut VecSource::new(blobs));
        b.replay_source(&mut VecSource::new(blobs));

        assert_eq!(a.state().compute_hash(), b.state().compute_hash());
        assert_eq!(a.summary().state_hash, b.summary().state_hash);
    }

    #[test]
    fn test_summary_json() {
        let mut replay = MatchReplay::default();
        for blob in [START, MINION, END] {
            replay.ingest("e", blob.as_bytes());
        }

        let json = serde_json::to_value(replay.summary()).unwrap();
        assert_eq!(json["phase"], "MATCH_END");
        assert_eq!(json["matchActive"], false);
        assert_eq!(json["players"][0]["playerID"], "p1");
        assert_eq!(json["teams"][1]["teamID"], "t2");
        assert_eq!(json["winner"][0]["Highest gold player"], "p1");
        assert_eq!(json["stats"]["applied"], 3);
        assert_eq!(json["stateHash"].as_str().unwrap().len(), 64);
    }
}
