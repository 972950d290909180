//! # Match Replay
//!
//! Rebuilds the state of a MOBA match from an ordered stream of telemetry
//! events and reports the end-of-match leaderboard extremes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       MATCH REPLAY                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                │
//! │  └── hash.rs      - State hashing for verification          │
//! │                                                             │
//! │  game/            - Replay logic (deterministic)            │
//! │  ├── events.rs    - Event kinds and typed payloads          │
//! │  ├── decode.rs    - Bytes to envelope, recovery fallback    │
//! │  ├── recovery.rs  - Type-label salvage                      │
//! │  ├── state.rs     - Player and team registries              │
//! │  ├── apply.rs     - Per-kind event handlers                 │
//! │  ├── report.rs    - Winner report                           │
//! │  └── replay.rs    - Ingest driver and counters              │
//! │                                                             │
//! │  source/          - Event providers (I/O)                   │
//! │  └── directory.rs - Numbered *.json files                   │
//! │                                                             │
//! │  config.rs        - Defaults, env vars                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are deterministic:
//! - No HashMap (registries keep insertion order)
//! - No system time dependencies
//! - No I/O; sources are the only place files are read
//!
//! Replaying the same ordered events yields the same state hash.
//!
//! ## Example
//!
//! ```
//! use match_replay::{AfterEnd, MatchReplay, Metric, VecSource};
//!
//! let mut replay = MatchReplay::new(AfterEnd::Apply);
//! replay.replay_source(&mut VecSource::new([
//!     r#"{"type": "MATCH_START", "payload": {"teams": [
//!         {"teamID": "blue", "players": [{"playerID": "p1"}]}
//!     ]}}"#,
//!     r#"{"type": "MINION_KILL", "payload": {"playerID": "p1", "goldGranted": 21}}"#,
//!     r#"{"type": "MATCH_END", "payload": {}}"#,
//! ]));
//!
//! let gold = replay.winner().get(Metric::Gold).clone();
//! assert_eq!(gold.value, 21);
//! assert_eq!(gold.leader.unwrap().as_str(), "p1");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod source;

// Re-export commonly used types
pub use config::{AfterEnd, ConfigError, ReplayConfig};
pub use game::apply::{apply_event, ApplyError};
pub use game::events::{EventKind, RawEvent};
pub use game::replay::{IngestOutcome, IngestStats, MatchReplay};
pub use game::report::{Metric, WinnerReport};
pub use game::state::{MatchState, PhaseTag, PlayerId, PlayerState, TeamId, TeamState};
pub use source::{DirectorySource, EventSource, VecSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
