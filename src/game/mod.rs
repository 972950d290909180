//! Match Replay Logic
//!
//! Everything that turns raw telemetry into match state. Deterministic: the
//! same ordered input always produces the same state and report.
//!
//! ## Module Structure
//!
//! - `events`: Event kinds, envelopes and typed payloads
//! - `decode`: Raw bytes to envelope, with phase recovery fallback
//! - `recovery`: Type-label salvage from malformed text
//! - `state`: Player/team registries, phase and lifecycle flags
//! - `apply`: Per-kind event handlers
//! - `report`: Leaderboard extremes
//! - `replay`: Ingest driver with per-outcome counters

pub mod apply;
pub mod decode;
pub mod events;
pub mod recovery;
pub mod replay;
pub mod report;
pub mod state;

// Re-export key types
pub use apply::{apply_event, Applied, ApplyError};
pub use decode::{decode, DecodeOutcome};
pub use events::{EventKind, EventTag, MatchEvent, PayloadError, RawEvent, NO_ACTOR};
pub use replay::{IngestOutcome, IngestStats, MatchReplay, ReplaySummary};
pub use report::{LeaderRecord, Metric, WinnerReport};
pub use state::{
    MatchState, PhaseTag, PlayerId, PlayerSeed, PlayerState, StateError, TeamId, TeamSeed,
    TeamState,
};
