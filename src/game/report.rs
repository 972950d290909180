//! Winner Report
//!
//! End-of-match leaderboard extremes, derived in one pass over the player
//! registry.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::game::state::{MatchState, PlayerId, PlayerState};

/// Leaderboard metric, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Accumulated gold
    Gold,
    /// Minions killed
    MinionsKilled,
    /// Players killed
    Kills,
    /// Assists
    Assists,
    /// Deaths
    Deaths,
}

impl Metric {
    /// All metrics in report order.
    pub const ALL: [Metric; 5] = [
        Metric::Gold,
        Metric::MinionsKilled,
        Metric::Kills,
        Metric::Assists,
        Metric::Deaths,
    ];

    /// Read this metric from a player.
    pub fn value_of(self, player: &PlayerState) -> u64 {
        match self {
            Metric::Gold => player.gold,
            Metric::MinionsKilled => player.minions_killed,
            Metric::Kills => player.kills,
            Metric::Assists => player.assists,
            Metric::Deaths => player.deaths,
        }
    }

    // Report labels are part of the published output format.
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            Metric::Gold => ("Highest golds", "Highest gold player"),
            Metric::MinionsKilled => ("Highest minion kills", "Highest minion killer"),
            Metric::Kills => ("Highest player kills", "Highest player killer"),
            Metric::Assists => ("Highest_player_assists", "Highest_player_killer_assists"),
            Metric::Deaths => ("Highest player deaths", "Highest player killer deaths"),
        }
    }
}

/// Best value of one metric and the first player to reach it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderRecord {
    /// Metric
    pub metric: Metric,
    /// Highest value seen (0 when nobody scored)
    pub value: u64,
    /// First player to reach `value`; `None` when nobody scored above zero
    pub leader: Option<PlayerId>,
}

impl LeaderRecord {
    fn empty(metric: Metric) -> Self {
        Self {
            metric,
            value: 0,
            leader: None,
        }
    }

    /// Strictly-greater update: later ties never replace the leader.
    fn observe(&mut self, player: &PlayerState) {
        let value = self.metric.value_of(player);
        if value > self.value {
            self.value = value;
            self.leader = Some(player.id.clone());
        }
    }
}

/// Serialized in place of a missing leader.
#[derive(Serialize)]
struct NoLeader {}

impl Serialize for LeaderRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (value_label, leader_label) = self.metric.labels();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(value_label, &self.value)?;
        match &self.leader {
            Some(id) => map.serialize_entry(leader_label, id)?,
            None => map.serialize_entry(leader_label, &NoLeader {})?,
        }
        map.end()
    }
}

/// The five leader records of a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WinnerReport {
    records: [LeaderRecord; 5],
}

impl WinnerReport {
    /// Compute all five metrics in a single pass, in registry order.
    ///
    /// A value must be strictly greater than zero to produce a leader, so an
    /// empty or all-zero registry yields `(0, None)` for every metric.
    pub fn compute(state: &MatchState) -> Self {
        let mut records = Metric::ALL.map(LeaderRecord::empty);

        for player in state.players() {
            for record in &mut records {
                record.observe(player);
            }
        }

        Self { records }
    }

    /// Records in report order (gold, minions, kills, assists, deaths).
    pub fn records(&self) -> &[LeaderRecord; 5] {
        &self.records
    }

    /// Record for one metric.
    pub fn get(&self, metric: Metric) -> &LeaderRecord {
        // ALL and records share an order
        &self.records[metric as usize]
    }
}
