//! Core primitives.
//!
//! Deterministic helpers shared by the replay engine.

pub mod hash;

// Re-export core types
pub use hash::{compute_state_hash, StateHash, StateHasher};
