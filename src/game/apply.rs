//! Event Application
//!
//! Folds one event into the match state. Each recognized kind has its own
//! handler; unknown tags fall through without touching state.
//!
//! ## Failure model
//!
//! - The phase is recorded before the payload is validated, so a rejected
//!   event still shows up as the current phase.
//! - Payload validation completes before any counter changes: an invalid
//!   event applies nothing beyond the phase.
//! - A missing team skips only that team's effects; player rewards from the
//!   same event still land.

use tracing::debug;

use crate::game::events::{
    DragonKillPayload, EventKind, EventTag, MatchEvent, MatchStartPayload, MinionKillPayload,
    PayloadError, PlayerKillPayload, RawEvent, TurretDestroyPayload,
};
use crate::game::state::{MatchState, PhaseTag, StateError, TeamId};

/// Result of a successfully processed raw event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// A recognized event was applied
    Event(EventKind),
    /// Unrecognized tag, no state change
    Ignored(String),
}

/// Per-event application errors. None of them abort a replay.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    /// Envelope has no payload member.
    #[error("{0} event has no payload")]
    MissingPayload(EventKind),

    /// Payload failed validation.
    #[error("invalid {kind} payload: {source}")]
    InvalidPayload {
        /// Event kind
        kind: EventKind,
        /// Underlying parse failure
        #[source]
        source: PayloadError,
    },

    /// Referenced team is not in the roster.
    #[error("{kind} references unknown team {team}")]
    TeamNotFound {
        /// Event kind
        kind: EventKind,
        /// Missing team
        team: TeamId,
    },

    /// Event arrived after MATCH_END under a terminal policy.
    #[error("{tag} received after match end")]
    MatchEnded {
        /// Tag of the rejected event
        tag: String,
    },
}

impl ApplyError {
    fn team_not_found(kind: EventKind, err: StateError) -> Self {
        match err {
            StateError::TeamNotFound(team) => ApplyError::TeamNotFound { kind, team },
        }
    }
}

/// Apply a structurally decoded event.
///
/// Records the phase, validates the payload, then dispatches.
pub fn apply_event(state: &mut MatchState, raw: &RawEvent) -> Result<Applied, ApplyError> {
    let kind = match &raw.tag {
        EventTag::Known(kind) => *kind,
        EventTag::Unrecognized(tag) => {
            debug!("Ignoring unrecognized event type {:?}", tag);
            return Ok(Applied::Ignored(tag.clone()));
        }
    };

    let payload = raw.payload.as_ref().ok_or(ApplyError::MissingPayload(kind))?;

    state.set_phase(PhaseTag::from(kind));

    let event = MatchEvent::parse(kind, payload)
        .map_err(|source| ApplyError::InvalidPayload { kind, source })?;

    apply(state, &event)?;
    Ok(Applied::Event(kind))
}

/// Apply a validated event.
pub fn apply(state: &mut MatchState, event: &MatchEvent) -> Result<(), ApplyError> {
    match event {
        MatchEvent::MatchStart(payload) => {
            apply_match_start(state, payload);
            Ok(())
        }
        MatchEvent::MinionKill(payload) => {
            apply_minion_kill(state, payload);
            Ok(())
        }
        MatchEvent::PlayerKill(payload) => {
            apply_player_kill(state, payload);
            Ok(())
        }
        MatchEvent::DragonKill(payload) => apply_dragon_kill(state, payload),
        MatchEvent::TurretDestroy(payload) => apply_turret_destroy(state, payload),
        MatchEvent::MatchEnd => {
            apply_match_end(state);
            Ok(())
        }
    }
}

/// Roster announced: replace both registries and start the match.
fn apply_match_start(state: &mut MatchState, payload: &MatchStartPayload) {
    state.set_phase(PhaseTag::from(EventKind::MatchStart));
    state.replace_roster(&payload.teams);
    state.begin_match();
}

/// Minion killed: killer gets gold and a minion kill.
fn apply_minion_kill(state: &mut MatchState, payload: &MinionKillPayload) {
    state.set_phase(PhaseTag::from(EventKind::MinionKill));

    let Some(player_id) = &payload.player_id else {
        return;
    };

    let player = state.get_or_create_player(player_id);
    player.add_gold(payload.gold_granted.unwrap_or(0));
    player.record_minion_kill();
}

/// Player killed.
///
/// The killer's own death counter also goes up, and every assistant gets the
/// full `assistGold` plus a death. Both match the recorded telemetry totals.
fn apply_player_kill(state: &mut MatchState, payload: &PlayerKillPayload) {
    state.set_phase(PhaseTag::from(EventKind::PlayerKill));

    if let Some(killer_id) = &payload.killer_id {
        let killer = state.get_or_create_player(killer_id);
        killer.add_gold(payload.gold_granted);
        killer.record_kill();
        killer.record_death();
    }

    for assistant_id in &payload.assistants {
        if payload.killer_id.as_ref() == Some(assistant_id) {
            continue;
        }
        let assistant = state.get_or_create_player(assistant_id);
        assistant.add_gold(payload.assist_gold);
        assistant.record_assist();
        assistant.record_death();
    }
}

/// Dragon killed: killer gets gold, the killing team gets a dragon.
fn apply_dragon_kill(state: &mut MatchState, payload: &DragonKillPayload) -> Result<(), ApplyError> {
    state.set_phase(PhaseTag::from(EventKind::DragonKill));

    let mut team_id = payload.killer_team_id.clone();

    if let Some(killer_id) = &payload.killer_id {
        let killer = state.get_or_create_player(killer_id);
        killer.add_gold(payload.gold_granted.unwrap_or(0));
        if team_id.is_none() {
            team_id = killer.team_id.clone();
        }
    }

    if let Some(team_id) = team_id {
        state
            .get_team_mut(&team_id)
            .map_err(|err| ApplyError::team_not_found(EventKind::DragonKill, err))?
            .record_dragon_kill();
    }

    Ok(())
}

/// Turret destroyed.
///
/// The team gets a tower kill and every member except the destroyer gets team
/// gold; the destroyer gets player gold instead. When a minion took the
/// turret there is no destroyer and the whole team is paid.
fn apply_turret_destroy(
    state: &mut MatchState,
    payload: &TurretDestroyPayload,
) -> Result<(), ApplyError> {
    state.set_phase(PhaseTag::from(EventKind::TurretDestroy));

    let team_result = match &payload.killer_team_id {
        Some(team_id) => reward_turret_team(state, team_id, payload),
        None => Ok(()),
    };

    if let Some(killer_id) = &payload.killer_id {
        state
            .get_or_create_player(killer_id)
            .add_gold(payload.player_gold_granted);
    }

    team_result.map_err(|err| ApplyError::team_not_found(EventKind::TurretDestroy, err))
}

fn reward_turret_team(
    state: &mut MatchState,
    team_id: &TeamId,
    payload: &TurretDestroyPayload,
) -> Result<(), StateError> {
    let team = state.get_team_mut(team_id)?;
    team.record_tower_kill();

    // Collect members first (separate borrow)
    let members = team.players.clone();

    for member in members
        .iter()
        .filter(|member| payload.killer_id.as_ref() != Some(*member))
    {
        state
            .get_or_create_player(member)
            .add_gold(payload.team_gold_granted);
    }

    Ok(())
}

/// Match finished.
fn apply_match_end(state: &mut MatchState) {
    state.set_phase(PhaseTag::from(EventKind::MatchEnd));
    state.end_match();
}

// =============================================================================
// TESTS
// =============================================================================
