//! Match State Definitions
//!
//! The state store rebuilt by replaying telemetry events: player and team
//! registries, the phase tag and the match-active flag.
//! Registries iterate in insertion order, which the winner report relies on
//! for its first-maximum tie-break.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::core::hash::{compute_state_hash, StateHash, StateHasher};
use crate::game::events::{parse_amount, EventKind};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Wire form of an id: telemetry uses both strings and integers
/// (`"teamID": 100`). Integers are kept in their decimal string form.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum IdRepr {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl IdRepr {
    pub(crate) fn into_string(self) -> String {
        match self {
            IdRepr::Text(s) => s,
            IdRepr::Unsigned(n) => n.to_string(),
            IdRepr::Signed(n) => n.to_string(),
        }
    }
}

/// Stable player identifier as it appears in telemetry (e.g. `riot:lol:player:<uuid>`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IdRepr::deserialize(deserializer).map(|repr| Self(repr.into_string()))
    }
}

impl PlayerId {
    /// Create from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Team identifier as it appears in the match roster.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IdRepr::deserialize(deserializer).map(|repr| Self(repr.into_string()))
    }
}

impl TeamId {
    /// Create from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// PHASE TAG
// =============================================================================

/// Label of the most recently attempted event type.
///
/// Usually one of the six recognized event labels, but the recovery path can
/// set any label it salvages from malformed input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseTag(String);

impl PhaseTag {
    /// Create from an arbitrary label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<EventKind> for PhaseTag {
    fn from(kind: EventKind) -> Self {
        Self::new(kind.as_str())
    }
}

impl PartialEq<EventKind> for PhaseTag {
    fn eq(&self, other: &EventKind) -> bool {
        self.0 == other.as_str()
    }
}

impl fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ROSTER SEEDS
// =============================================================================

fn default_alive() -> bool {
    true
}

// Seed fields other than the id never invalidate a roster: unusable values
// fall back to their defaults.

fn seed_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => Some(name),
        Value::Null => None,
        other => {
            debug!("Ignoring roster name {}", other);
            None
        }
    })
}

fn seed_alive<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(alive) => alive,
        Value::Null => default_alive(),
        other => {
            debug!("Ignoring roster alive flag {}", other);
            default_alive()
        }
    })
}

fn seed_counter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(0);
    }
    Ok(parse_amount(&value).unwrap_or_else(|| {
        debug!("Ignoring roster counter {}", value);
        0
    }))
}

/// Player entry of a MATCH_START roster.
///
/// Only `playerID` is required. Unknown roster fields are ignored; missing,
/// null or malformed stat fields default to zero (alive to true).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSeed {
    /// Player identifier
    #[serde(rename = "playerID")]
    pub id: PlayerId,
    /// Display name
    #[serde(default, deserialize_with = "seed_name")]
    pub name: Option<String>,
    /// Alive flag
    #[serde(default = "default_alive", deserialize_with = "seed_alive")]
    pub alive: bool,
    /// Starting gold
    #[serde(default, deserialize_with = "seed_counter")]
    pub gold: u64,
    /// Starting minion kills
    #[serde(default, deserialize_with = "seed_counter")]
    pub minions_killed: u64,
    /// Starting kills
    #[serde(default, deserialize_with = "seed_counter")]
    pub kills: u64,
    /// Starting deaths
    #[serde(default, deserialize_with = "seed_counter")]
    pub deaths: u64,
    /// Starting assists
    #[serde(default, deserialize_with = "seed_counter")]
    pub assists: u64,
}

impl PlayerSeed {
    /// Seed with only an id; everything else at its default.
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            alive: true,
            gold: 0,
            minions_killed: 0,
            kills: 0,
            deaths: 0,
            assists: 0,
        }
    }
}

/// Team entry of a MATCH_START roster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSeed {
    /// Team identifier
    #[serde(rename = "teamID")]
    pub id: TeamId,
    /// Players listed under this team
    pub players: Vec<PlayerSeed>,
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// Aggregate stats of a single player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Unique player ID
    #[serde(rename = "playerID")]
    pub id: PlayerId,

    /// Informational alive flag
    pub alive: bool,

    /// Display name from the roster
    pub name: Option<String>,

    /// Accumulated gold
    pub gold: u64,

    /// Minions killed
    pub minions_killed: u64,

    /// Players killed
    pub kills: u64,

    /// Deaths
    pub deaths: u64,

    /// Assists
    pub assists: u64,

    /// Owning team, set from roster data only
    #[serde(rename = "teamID")]
    pub team_id: Option<TeamId>,
}

impl PlayerState {
    /// Create a zeroed player with no team.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            alive: true,
            name: None,
            gold: 0,
            minions_killed: 0,
            kills: 0,
            deaths: 0,
            assists: 0,
            team_id: None,
        }
    }

    /// Create from a roster seed, owned by `team_id`.
    pub fn from_seed(seed: &PlayerSeed, team_id: TeamId) -> Self {
        Self {
            id: seed.id.clone(),
            alive: seed.alive,
            name: seed.name.clone(),
            gold: seed.gold,
            minions_killed: seed.minions_killed,
            kills: seed.kills,
            deaths: seed.deaths,
            assists: seed.assists,
            team_id: Some(team_id),
        }
    }

    /// Add gold.
    #[inline]
    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Record a player kill.
    #[inline]
    pub fn record_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
    }

    /// Record a death.
    #[inline]
    pub fn record_death(&mut self) {
        self.deaths = self.deaths.saturating_add(1);
    }

    /// Record an assist.
    #[inline]
    pub fn record_assist(&mut self) {
        self.assists = self.assists.saturating_add(1);
    }

    /// Record a minion kill.
    #[inline]
    pub fn record_minion_kill(&mut self) {
        self.minions_killed = self.minions_killed.saturating_add(1);
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_str(self.id.as_str());
        hasher.update_bool(self.alive);
        hasher.update_opt_str(self.name.as_deref());
        hasher.update_u64(self.gold);
        hasher.update_u64(self.minions_killed);
        hasher.update_u64(self.kills);
        hasher.update_u64(self.deaths);
        hasher.update_u64(self.assists);
        hasher.update_opt_str(self.team_id.as_ref().map(TeamId::as_str));
    }
}

// =============================================================================
// TEAM STATE
// =============================================================================

/// Objective counters and membership of a team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamState {
    /// Unique team ID
    #[serde(rename = "teamID")]
    pub id: TeamId,

    /// Members in roster order. Fixed at MATCH_START.
    pub players: Vec<PlayerId>,

    /// Dragons slain
    pub dragon_kills: u64,

    /// Turrets destroyed
    pub tower_kills: u64,
}

impl TeamState {
    /// Create an empty team.
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            players: Vec::new(),
            dragon_kills: 0,
            tower_kills: 0,
        }
    }

    /// Record a dragon kill.
    #[inline]
    pub fn record_dragon_kill(&mut self) {
        self.dragon_kills = self.dragon_kills.saturating_add(1);
    }

    /// Record a destroyed turret.
    #[inline]
    pub fn record_tower_kill(&mut self) {
        self.tower_kills = self.tower_kills.saturating_add(1);
    }

    /// Hash this team's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_str(self.id.as_str());
        hasher.update_u64(self.players.len() as u64);
        for member in &self.players {
            hasher.update_str(member.as_str());
        }
        hasher.update_u64(self.dragon_kills);
        hasher.update_u64(self.tower_kills);
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Insertion-ordered registry keyed by a unique id.
///
/// Entries live in a Vec (iteration order = first insertion); a BTreeMap maps
/// ids to slots. Entries are never removed, only replaced wholesale.
#[derive(Clone, Debug)]
pub struct Registry<K, V> {
    entries: Vec<V>,
    index: BTreeMap<K, usize>,
}

impl<K: Ord + Clone, V> Registry<K, V> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get an entry by id.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Get an entry mutably by id.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.index.get(key) {
            Some(&slot) => Some(&mut self.entries[slot]),
            None => None,
        }
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot] = value,
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(value);
            }
        }
    }

    /// Get the entry for `key`, registering `make()` first if absent.
    pub fn get_or_insert_with(&mut self, key: &K, make: impl FnOnce() -> V) -> &mut V {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(make());
                self.index.insert(key.clone(), slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.entries.iter()
    }
}

impl<K: Ord + Clone, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, K: Ord + Clone, V> IntoIterator for &'a Registry<K, V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V: Serialize> Serialize for Registry<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

/// Player registry.
pub type PlayerRegistry = Registry<PlayerId, PlayerState>;

/// Team registry.
pub type TeamRegistry = Registry<TeamId, TeamState>;

// =============================================================================
// ERRORS
// =============================================================================

/// State store lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Referenced team is not in the current roster.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),
}

// =============================================================================
// MATCH STATE
// =============================================================================

/// Complete reconstructed state of one match.
///
/// Each concurrently replayed match needs its own instance; nothing here is
/// shared or global.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Label of the last attempted event
    phase: Option<PhaseTag>,

    /// Set by MATCH_START, cleared by MATCH_END
    match_active: bool,

    /// Set by MATCH_END, cleared by MATCH_START
    match_ended: bool,

    /// All players, roster order first
    players: PlayerRegistry,

    /// All teams, roster order
    teams: TeamRegistry,
}

impl MatchState {
    /// Create an empty match state (no phase, inactive, empty registries).
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a player by ID, auto-vivifying a zeroed one if absent.
    pub fn get_or_create_player(&mut self, id: &PlayerId) -> &mut PlayerState {
        self.players
            .get_or_insert_with(id, || PlayerState::new(id.clone()))
    }

    /// Get a player by ID.
    pub fn get_player(&self, id: &PlayerId) -> Option<&PlayerState> {
        self.players.get(id)
    }

    /// All players in insertion order.
    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    /// Get a team by ID.
    pub fn get_team(&self, id: &TeamId) -> Result<&TeamState, StateError> {
        self.teams
            .get(id)
            .ok_or_else(|| StateError::TeamNotFound(id.clone()))
    }

    /// Get a team mutably by ID.
    pub fn get_team_mut(&mut self, id: &TeamId) -> Result<&mut TeamState, StateError> {
        self.teams
            .get_mut(id)
            .ok_or_else(|| StateError::TeamNotFound(id.clone()))
    }

    /// All teams in roster order.
    pub fn teams(&self) -> &TeamRegistry {
        &self.teams
    }

    /// Record the label of the event being applied.
    pub fn set_phase(&mut self, tag: PhaseTag) {
        self.phase = Some(tag);
    }

    /// Current phase tag (unset until the first event).
    pub fn phase(&self) -> Option<&PhaseTag> {
        self.phase.as_ref()
    }

    /// Is a match in progress?
    pub fn is_active(&self) -> bool {
        self.match_active
    }

    /// Has a MATCH_END been applied since the last MATCH_START?
    pub fn has_ended(&self) -> bool {
        self.match_ended
    }

    /// Mark the match as started.
    pub fn begin_match(&mut self) {
        self.match_active = true;
        self.match_ended = false;
    }

    /// Mark the match as finished.
    pub fn end_match(&mut self) {
        self.match_active = false;
        self.match_ended = true;
    }

    /// Replace both registries from a roster.
    ///
    /// Every listed player gets the id of the team that lists it. A player
    /// listed by several teams ends up owned by the last one. Entries that
    /// repeat a team id are merged into that team, membership appended.
    pub fn replace_roster(&mut self, roster: &[TeamSeed]) {
        let mut players = PlayerRegistry::new();
        let mut teams = TeamRegistry::new();

        for seed in roster {
            let team = teams.get_or_insert_with(&seed.id, || TeamState::new(seed.id.clone()));
            for player_seed in &seed.players {
                team.players.push(player_seed.id.clone());
                players.insert(
                    player_seed.id.clone(),
                    PlayerState::from_seed(player_seed, seed.id.clone()),
                );
            }
        }

        self.players = players;
        self.teams = teams;
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(
            self.phase.as_ref().map(PhaseTag::as_str),
            self.match_active,
            |hasher| {
                hasher.update_bool(self.match_ended);

                hasher.update_u64(self.players.len() as u64);
                for player in &self.players {
                    player.hash_into(hasher);
                }

                hasher.update_u64(self.teams.len() as u64);
                for team in &self.teams {
                    team.hash_into(hasher);
                }
            },
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<TeamSeed> {
        vec![
            TeamSeed {
                id: TeamId::new("t1"),
                players: vec![PlayerSeed::new("p1"), PlayerSeed::new("p2")],
            },
            TeamSeed {
                id: TeamId::new("t2"),
                players: vec![PlayerSeed::new("p3")],
            },
        ]
    }

    #[test]
    fn test_get_or_create_player_zeroed() {
        let mut state = MatchState::new();
        let id = PlayerId::new("p1");

        let player = state.get_or_create_player(&id);
        assert_eq!(*player, PlayerState::new(id.clone()));
        assert!(player.alive);
        assert_eq!(player.team_id, None);

        // Second call returns the same entry
        state.get_or_create_player(&id).add_gold(5);
        assert_eq!(state.get_or_create_player(&id).gold, 5);
        assert_eq!(state.players().len(), 1);
    }

    #[test]
    fn test_replace_roster_assigns_teams() {
        let mut state = MatchState::new();
        state.replace_roster(&roster());

        assert_eq!(state.players().len(), 3);
        assert_eq!(state.teams().len(), 2);

        for team in state.teams() {
            for member in &team.players {
                let player = state.get_player(member).unwrap();
                assert_eq!(player.team_id.as_ref(), Some(&team.id));
            }
        }
    }

    #[test]
    fn test_replace_roster_discards_previous_registries() {
        let mut state = MatchState::new();
        state.get_or_create_player(&PlayerId::new("ghost")).add_gold(100);

        state.replace_roster(&roster());

        assert!(state.get_player(&PlayerId::new("ghost")).is_none());
        assert_eq!(state.players().len(), 3);
    }

    #[test]
    fn test_replace_roster_duplicate_player_last_team_wins() {
        let mut state = MatchState::new();
        let seeds = vec![
            TeamSeed {
                id: TeamId::new("t1"),
                players: vec![PlayerSeed::new("p1"), PlayerSeed::new("p2")],
            },
            TeamSeed {
                id: TeamId::new("t2"),
                players: vec![PlayerSeed::new("p1")],
            },
        ];
        state.replace_roster(&seeds);

        assert_eq!(state.players().len(), 2);
        let p1 = state.get_player(&PlayerId::new("p1")).unwrap();
        assert_eq!(p1.team_id, Some(TeamId::new("t2")));

        // p1 keeps its first position
        let order: Vec<_> = state.players().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["p1", "p2"]);
    }

    #[test]
    fn test_replace_roster_duplicate_team_merges_members() {
        let mut state = MatchState::new();
        let seeds = vec![
            TeamSeed {
                id: TeamId::new("t1"),
                players: vec![PlayerSeed::new("p1")],
            },
            TeamSeed {
                id: TeamId::new("t2"),
                players: vec![PlayerSeed::new("p2")],
            },
            TeamSeed {
                id: TeamId::new("t1"),
                players: vec![PlayerSeed::new("p3")],
            },
        ];
        state.replace_roster(&seeds);

        assert_eq!(state.teams().len(), 2);
        let t1 = state.get_team(&TeamId::new("t1")).unwrap();
        assert_eq!(t1.players, vec![PlayerId::new("p1"), PlayerId::new("p3")]);

        // Every player's team still lists it
        for player in state.players() {
            let team = state.get_team(player.team_id.as_ref().unwrap()).unwrap();
            assert!(team.players.contains(&player.id));
        }

        let order: Vec<_> = state.teams().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["t1", "t2"]);
    }

    #[test]
    fn test_numeric_ids_decode_as_strings() {
        let seed: TeamSeed = serde_json::from_value(serde_json::json!({
            "teamID": 100,
            "players": [{"playerID": 7}, {"playerID": "p2"}]
        }))
        .unwrap();

        assert_eq!(seed.id, TeamId::new("100"));
        assert_eq!(seed.players[0].id, PlayerId::new("7"));
        assert_eq!(seed.players[1].id, PlayerId::new("p2"));

        let err = serde_json::from_value::<TeamId>(serde_json::json!({"id": 1}));
        assert!(err.is_err());
    }

    #[test]
    fn test_seed_fields_fall_back_to_defaults() {
        let seed: PlayerSeed = serde_json::from_value(serde_json::json!({
            "playerID": "p1",
            "name": 42,
            "alive": null,
            "gold": "500",
            "kills": null,
            "deaths": "lots",
            "assists": 2.9,
            "rank": "gold"
        }))
        .unwrap();

        assert_eq!(seed.name, None);
        assert!(seed.alive);
        assert_eq!(seed.gold, 500);
        assert_eq!(seed.kills, 0);
        assert_eq!(seed.deaths, 0);
        assert_eq!(seed.assists, 2);
        assert_eq!(seed.minions_killed, 0);

        let seed: PlayerSeed =
            serde_json::from_value(serde_json::json!({"playerID": "p1", "alive": false})).unwrap();
        assert!(!seed.alive);

        // The id is still required
        assert!(serde_json::from_value::<PlayerSeed>(serde_json::json!({"gold": 5})).is_err());
    }

    #[test]
    fn test_get_team_not_found() {
        let state = MatchState::new();
        let err = state.get_team(&TeamId::new("t9")).unwrap_err();
        assert_eq!(err, StateError::TeamNotFound(TeamId::new("t9")));
        assert_eq!(err.to_string(), "team not found: t9");
    }

    #[test]
    fn test_registry_insertion_order() {
        let mut state = MatchState::new();
        for id in ["zed", "alpha", "mid"] {
            state.get_or_create_player(&PlayerId::new(id));
        }

        let order: Vec<_> = state.players().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["zed", "alpha", "mid"]);
    }

    #[test]
    fn test_phase_and_lifecycle_flags() {
        let mut state = MatchState::new();
        assert!(state.phase().is_none());
        assert!(!state.is_active());

        state.set_phase(PhaseTag::from(EventKind::MatchStart));
        state.begin_match();
        assert_eq!(state.phase().unwrap(), &EventKind::MatchStart);
        assert!(state.is_active());
        assert!(!state.has_ended());

        state.end_match();
        assert!(!state.is_active());
        assert!(state.has_ended());
    }

    #[test]
    fn test_hash_tracks_changes() {
        let mut state1 = MatchState::new();
        let mut state2 = MatchState::new();
        state1.replace_roster(&roster());
        state2.replace_roster(&roster());
        assert_eq!(state1.compute_hash(), state2.compute_hash());

        state2.get_or_create_player(&PlayerId::new("p1")).add_gold(1);
        assert_ne!(state1.compute_hash(), state2.compute_hash());
    }

    #[test]
    fn test_registry_serializes_as_list() {
        let mut state = MatchState::new();
        state.get_or_create_player(&PlayerId::new("p1"));

        let json = serde_json::to_value(state.players()).unwrap();
        assert_eq!(json[0]["playerID"], "p1");
        assert_eq!(json[0]["minionsKilled"], 0);
        assert!(json[0]["teamID"].is_null());
    }
}
