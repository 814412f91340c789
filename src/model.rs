use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A club member. `points` is signed on purpose: the zero floor only applies
/// when a training session is reverted, direct edits are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub points: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u32>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub trainings_attended: u32,
}

impl Player {
    pub fn is_unassigned(&self) -> bool {
        self.team_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u32,
    pub name: String,
}

/// One recorded practice event. Immutable once created; the only lifecycle
/// operation after creation is deletion, which reverses its recorded deltas.
///
/// Attendance and point awards are independent sets: a player may appear in
/// `points_awarded` without being in `attended_player_ids` and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: u32,
    pub date: NaiveDate,
    pub team_id: u32,
    pub attended_player_ids: BTreeSet<u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub points_awarded: BTreeMap<u32, i32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Training {
    pub fn attendance_count(&self) -> usize {
        self.attended_player_ids.len()
    }

    pub fn total_points_awarded(&self) -> i64 {
        self.points_awarded.values().map(|p| i64::from(*p)).sum()
    }
}

/// Composed read-only view of a team and its current roster. Built on demand
/// from the store accessors and never persisted, so it cannot go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamWithPlayers {
    pub team: Team,
    pub players: Vec<Player>,
    pub total_points: i64,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}
