//! Match Events
//!
//! Telemetry events as a closed tagged union. Decoding happens in two steps:
//! the envelope (`{type, payload}`) becomes a [`RawEvent`], then the applier
//! parses the payload into a typed [`MatchEvent`] once the phase is recorded.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::game::state::{IdRepr, PlayerId, TeamId, TeamSeed};

/// Literal used by telemetry to mean "no player/team performed this action".
pub const NO_ACTOR: &str = "null";

// =============================================================================
// EVENT KIND
// =============================================================================

/// The six recognized event types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    /// Roster announced, match begins
    MatchStart,
    /// A player (or nobody) killed a minion
    MinionKill,
    /// A player killed another, possibly assisted
    PlayerKill,
    /// A dragon was slain
    DragonKill,
    /// A turret was destroyed
    TurretDestroy,
    /// Match finished
    MatchEnd,
}

impl EventKind {
    /// All kinds in declaration order.
    pub const ALL: [EventKind; 6] = [
        EventKind::MatchStart,
        EventKind::MinionKill,
        EventKind::PlayerKill,
        EventKind::DragonKill,
        EventKind::TurretDestroy,
        EventKind::MatchEnd,
    ];

    /// Wire label of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::MatchStart => "MATCH_START",
            EventKind::MinionKill => "MINION_KILL",
            EventKind::PlayerKill => "PLAYER_KILL",
            EventKind::DragonKill => "DRAGON_KILL",
            EventKind::TurretDestroy => "TURRET_DESTROY",
            EventKind::MatchEnd => "MATCH_END",
        }
    }

    /// Look up a wire label. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type tag as decoded from the envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventTag {
    /// One of the six recognized kinds
    Known(EventKind),
    /// Anything else, kept verbatim for logging
    Unrecognized(String),
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTag::Known(kind) => kind.fmt(f),
            EventTag::Unrecognized(tag) => f.write_str(tag),
        }
    }
}

// =============================================================================
// RAW EVENT (ENVELOPE)
// =============================================================================

/// A structurally decoded event whose payload has not been validated yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEvent {
    /// Event type
    pub tag: EventTag,
    /// Payload member, if the envelope had one
    pub payload: Option<Value>,
}

impl RawEvent {
    /// Build a raw event from a known kind and payload.
    pub fn new(kind: EventKind, payload: Value) -> Self {
        Self {
            tag: EventTag::Known(kind),
            payload: Some(payload),
        }
    }

    /// Split a decoded JSON document into tag and payload.
    ///
    /// Documents that are not objects, or whose `type` is missing or not a
    /// string, become unrecognized events.
    pub fn from_value(value: Value) -> Self {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Self {
                    tag: EventTag::Unrecognized(other.to_string()),
                    payload: None,
                }
            }
        };

        let payload = fields.remove("payload");
        let tag = match fields.remove("type") {
            Some(Value::String(tag)) => match EventKind::from_tag(&tag) {
                Some(kind) => EventTag::Known(kind),
                None => EventTag::Unrecognized(tag),
            },
            Some(other) => EventTag::Unrecognized(other.to_string()),
            None => EventTag::Unrecognized(String::new()),
        };

        Self { tag, payload }
    }

    /// Recognized kind, if any.
    pub fn kind(&self) -> Option<EventKind> {
        match self.tag {
            EventTag::Known(kind) => Some(kind),
            EventTag::Unrecognized(_) => None,
        }
    }
}

// =============================================================================
// FIELD DECODERS
// =============================================================================

/// Errors parsing a typed payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Payload does not match the expected shape.
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),
    /// A conditionally required field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl AmountRepr {
    fn into_amount(self) -> Result<u64, String> {
        match self {
            AmountRepr::Unsigned(n) => Ok(n),
            AmountRepr::Signed(n) => Err(format!("negative amount {}", n)),
            // Fractional amounts truncate toward zero
            AmountRepr::Float(f) if f.is_finite() && f >= 0.0 => Ok(f.trunc() as u64),
            AmountRepr::Float(f) => Err(format!("invalid amount {}", f)),
            AmountRepr::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("invalid amount {:?}", s)),
        }
    }
}

/// Amount from an already decoded value, if it is a usable one.
pub(crate) fn parse_amount(value: &Value) -> Option<u64> {
    AmountRepr::deserialize(value).ok()?.into_amount().ok()
}

/// Gold amount: integer, non-negative float, or numeric string.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    AmountRepr::deserialize(deserializer)?
        .into_amount()
        .map_err(serde::de::Error::custom)
}

fn opt_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<AmountRepr>::deserialize(deserializer)? {
        Some(repr) => repr.into_amount().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn resolve_actor(raw: Option<IdRepr>) -> Option<String> {
    raw.map(IdRepr::into_string).filter(|id| id != NO_ACTOR)
}

/// Actor id (string or integer): JSON null and the `"null"` literal both
/// mean "no actor".
fn actor<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(resolve_actor(Option::<IdRepr>::deserialize(deserializer)?).map(T::from))
}

fn actor_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PlayerId>, D::Error> {
    let raw = Option::<Vec<Option<IdRepr>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(resolve_actor)
        .map(PlayerId::from)
        .collect())
}

// =============================================================================
// TYPED PAYLOADS
// =============================================================================

/// MATCH_START payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MatchStartPayload {
    /// Full roster
    pub teams: Vec<TeamSeed>,
}

/// MINION_KILL payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MinionKillPayload {
    /// Killer; the field must be present but may be the no-actor sentinel
    #[serde(rename = "playerID", deserialize_with = "actor")]
    pub player_id: Option<PlayerId>,
    /// Gold for the killer; required when there is one
    #[serde(rename = "goldGranted", default, deserialize_with = "opt_amount")]
    pub gold_granted: Option<u64>,
}

/// PLAYER_KILL payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKillPayload {
    /// Killer
    #[serde(rename = "killerID", default, deserialize_with = "actor")]
    pub killer_id: Option<PlayerId>,
    /// Assisting players
    #[serde(default, deserialize_with = "actor_list")]
    pub assistants: Vec<PlayerId>,
    /// Flat gold per assistant
    #[serde(default, deserialize_with = "amount")]
    pub assist_gold: u64,
    /// Gold for the killer
    #[serde(deserialize_with = "amount")]
    pub gold_granted: u64,
}

/// DRAGON_KILL payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DragonKillPayload {
    /// Killer
    #[serde(rename = "killerID", default, deserialize_with = "actor")]
    pub killer_id: Option<PlayerId>,
    /// Killer's team; falls back to the killer's roster team when absent
    #[serde(rename = "killerTeamID", default, deserialize_with = "actor")]
    pub killer_team_id: Option<TeamId>,
    /// Gold for the killer; required when there is one
    #[serde(rename = "goldGranted", default, deserialize_with = "opt_amount")]
    pub gold_granted: Option<u64>,
}

/// TURRET_DESTROY payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TurretDestroyPayload {
    /// Destroying player; absent when a minion took the turret
    #[serde(rename = "killerID", default, deserialize_with = "actor")]
    pub killer_id: Option<PlayerId>,
    /// Destroying team
    #[serde(rename = "killerTeamID", default, deserialize_with = "actor")]
    pub killer_team_id: Option<TeamId>,
    /// Gold for the destroying player
    #[serde(rename = "playerGoldGranted", default, deserialize_with = "amount")]
    pub player_gold_granted: u64,
    /// Gold for every other member of the team
    #[serde(rename = "teamGoldGranted", default, deserialize_with = "amount")]
    pub team_gold_granted: u64,
}

// =============================================================================
// MATCH EVENT
// =============================================================================

/// A fully validated event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchEvent {
    /// Roster replaces both registries
    MatchStart(MatchStartPayload),
    /// Minion killed
    MinionKill(MinionKillPayload),
    /// Player killed
    PlayerKill(PlayerKillPayload),
    /// Dragon killed
    DragonKill(DragonKillPayload),
    /// Turret destroyed
    TurretDestroy(TurretDestroyPayload),
    /// Match finished
    MatchEnd,
}

impl MatchEvent {
    /// Parse and validate the payload for `kind`.
    ///
    /// Nothing is mutated here; every field check happens before the applier
    /// touches state.
    pub fn parse(kind: EventKind, payload: &Value) -> Result<Self, PayloadError> {
        let event = match kind {
            EventKind::MatchStart => MatchEvent::MatchStart(MatchStartPayload::deserialize(payload)?),
            EventKind::MinionKill => {
                let parsed = MinionKillPayload::deserialize(payload)?;
                if parsed.player_id.is_some() && parsed.gold_granted.is_none() {
                    return Err(PayloadError::MissingField("goldGranted"));
                }
                MatchEvent::MinionKill(parsed)
            }
            EventKind::PlayerKill => MatchEvent::PlayerKill(PlayerKillPayload::deserialize(payload)?),
            EventKind::DragonKill => {
                let parsed = DragonKillPayload::deserialize(payload)?;
                if parsed.killer_id.is_some() && parsed.gold_granted.is_none() {
                    return Err(PayloadError::MissingField("goldGranted"));
                }
                MatchEvent::DragonKill(parsed)
            }
            EventKind::TurretDestroy => {
                MatchEvent::TurretDestroy(TurretDestroyPayload::deserialize(payload)?)
            }
            EventKind::MatchEnd => MatchEvent::MatchEnd,
        };
        Ok(event)
    }
}
