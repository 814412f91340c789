use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::model::{Player, Team, TeamWithPlayers, Training};
use crate::persist::{self, Snapshot};

/// Single owner of the canonical player/team/training collections and the
/// on-disk file. Every mutator updates the in-memory snapshot and writes the
/// whole document back before returning (write-through, no batching).
///
/// One instance per process; construct it once at startup and hand it to the
/// presentation layer. Lookups that miss return `None` or silently do
/// nothing, never an error.
#[derive(Debug)]
pub struct Store {
    snapshot: Snapshot,
    path: Option<PathBuf>,
    // Per-kind id counters. Seeded from max+1 at load and only ever
    // incremented, so ids are never reused within a process even after the
    // highest-numbered entity is deleted.
    next_player_id: u32,
    next_team_id: u32,
    next_training_id: u32,
}

impl Store {
    /// Open the store at its well-known per-user location. Without a usable
    /// home directory the store still works, serving from memory only.
    pub fn open() -> Self {
        let path = persist::default_store_path();
        if path.is_none() {
            tracing::warn!("no usable data directory; store will not persist");
        }
        Self::from_path(path)
    }

    /// Open the store against an explicit file path.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        Self::from_path(Some(path.into()))
    }

    fn from_path(path: Option<PathBuf>) -> Self {
        let snapshot = match &path {
            Some(p) => persist::load(p),
            None => Snapshot::default(),
        };
        let next_player_id = next_id(snapshot.players.iter().map(|p| p.id));
        let next_team_id = next_id(snapshot.teams.iter().map(|t| t.id));
        let next_training_id = next_id(snapshot.trainings.iter().map(|t| t.id));
        Self {
            snapshot,
            path,
            next_player_id,
            next_team_id,
            next_training_id,
        }
    }

    fn persist(&self) {
        if let Some(path) = &self.path {
            persist::save(path, &self.snapshot);
        }
    }

    // ---- players ----

    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        points: i32,
        team_id: Option<u32>,
    ) -> Player {
        let id = self.next_player_id;
        self.next_player_id += 1;
        let player = Player {
            id,
            name: name.into(),
            points,
            team_id,
            trainings_attended: 0,
        };
        self.snapshot.players.push(player.clone());
        self.persist();
        player
    }

    pub fn get_all_players(&self) -> Vec<Player> {
        self.snapshot.players.clone()
    }

    pub fn get_players_by_team(&self, team_id: u32) -> Vec<Player> {
        self.snapshot
            .players
            .iter()
            .filter(|p| p.team_id == Some(team_id))
            .cloned()
            .collect()
    }

    pub fn get_players_without_team(&self) -> Vec<Player> {
        self.snapshot
            .players
            .iter()
            .filter(|p| p.is_unassigned())
            .cloned()
            .collect()
    }

    pub fn update_player_points(&mut self, id: u32, new_points: i32) {
        if let Some(player) = self.player_mut(id) {
            player.points = new_points;
            self.persist();
        }
    }

    /// Like `update_player_points` but each field is independently optional;
    /// omitted fields keep their prior value.
    pub fn update_player_stats(
        &mut self,
        id: u32,
        new_points: Option<i32>,
        new_trainings_attended: Option<u32>,
    ) {
        if let Some(player) = self.player_mut(id) {
            if let Some(points) = new_points {
                player.points = points;
            }
            if let Some(trainings) = new_trainings_attended {
                player.trainings_attended = trainings;
            }
            self.persist();
        }
    }

    pub fn rename_player(&mut self, id: u32, name: impl Into<String>) {
        let name = name.into();
        if let Some(player) = self.player_mut(id) {
            player.name = name;
            self.persist();
        }
    }

    /// Sets or clears the team reference. The target team is deliberately not
    /// checked for existence: team references are soft, and callers may point
    /// a player at a team id the store has never seen.
    pub fn assign_player_to_team(&mut self, player_id: u32, team_id: Option<u32>) {
        if let Some(player) = self.player_mut(player_id) {
            player.team_id = team_id;
            self.persist();
        }
    }

    pub fn increment_trainings_attended(&mut self, id: u32) {
        if let Some(player) = self.player_mut(id) {
            player.trainings_attended += 1;
            self.persist();
        }
    }

    /// Removes the player. Training records that reference this id are left
    /// untouched and keep a dangling reference.
    pub fn delete_player(&mut self, id: u32) {
        let before = self.snapshot.players.len();
        self.snapshot.players.retain(|p| p.id != id);
        if self.snapshot.players.len() != before {
            self.persist();
        }
    }

    fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.snapshot.players.iter_mut().find(|p| p.id == id)
    }

    // ---- teams ----

    pub fn add_team(&mut self, name: impl Into<String>) -> Team {
        let id = self.next_team_id;
        self.next_team_id += 1;
        let team = Team {
            id,
            name: name.into(),
        };
        self.snapshot.teams.push(team.clone());
        self.persist();
        team
    }

    pub fn get_all_teams(&self) -> Vec<Team> {
        self.snapshot.teams.clone()
    }

    pub fn rename_team(&mut self, id: u32, name: impl Into<String>) {
        let name = name.into();
        if let Some(team) = self.snapshot.teams.iter_mut().find(|t| t.id == id) {
            team.name = name;
            self.persist();
        }
    }

    pub fn get_team_with_players(&self, team_id: u32) -> Option<TeamWithPlayers> {
        let team = self
            .snapshot
            .teams
            .iter()
            .find(|t| t.id == team_id)?
            .clone();
        let players = self.get_players_by_team(team_id);
        let total_points = players.iter().map(|p| i64::from(p.points)).sum();
        Some(TeamWithPlayers {
            team,
            players,
            total_points,
        })
    }

    /// Clears the team reference on every member, then removes the team, as
    /// one persisted mutation. Players survive; training records that name
    /// this team keep their now-dangling `team_id`.
    pub fn delete_team(&mut self, id: u32) {
        let mut changed = false;
        for player in &mut self.snapshot.players {
            if player.team_id == Some(id) {
                player.team_id = None;
                changed = true;
            }
        }
        let before = self.snapshot.teams.len();
        self.snapshot.teams.retain(|t| t.id != id);
        changed |= self.snapshot.teams.len() != before;
        if changed {
            self.persist();
        }
    }

    // ---- trainings ----

    /// Applies the session to current player stats and appends the record, as
    /// one persisted mutation. Attendance and point awards are independent: a
    /// player can receive points without being marked present, and vice
    /// versa.
    pub fn record_training_session(
        &mut self,
        team_id: u32,
        attended_player_ids: BTreeSet<u32>,
        points_awarded: BTreeMap<u32, i32>,
        date: NaiveDate,
        notes: impl Into<String>,
    ) -> Training {
        for player in &mut self.snapshot.players {
            if attended_player_ids.contains(&player.id) {
                player.trainings_attended += 1;
            }
            if let Some(points) = points_awarded.get(&player.id) {
                player.points += points;
            }
        }
        let id = self.next_training_id;
        self.next_training_id += 1;
        let training = Training {
            id,
            date,
            team_id,
            attended_player_ids,
            points_awarded,
            notes: notes.into(),
        };
        self.snapshot.trainings.push(training.clone());
        self.persist();
        training
    }

    /// Reverses the session's recorded deltas against *current* player stats,
    /// floored at zero, then removes the record. This is best-effort, not a
    /// snapshot restore: stats edited after the session was recorded still
    /// have the original recorded amounts subtracted.
    pub fn delete_training(&mut self, id: u32) {
        let Some(pos) = self.snapshot.trainings.iter().position(|t| t.id == id) else {
            return;
        };
        let training = self.snapshot.trainings.remove(pos);
        for player in &mut self.snapshot.players {
            if training.attended_player_ids.contains(&player.id) {
                player.trainings_attended = player.trainings_attended.saturating_sub(1);
            }
            if let Some(points) = training.points_awarded.get(&player.id) {
                player.points = (player.points - points).max(0);
            }
        }
        self.persist();
    }

    /// All training records, newest date first.
    pub fn get_all_trainings(&self) -> Vec<Training> {
        let mut trainings = self.snapshot.trainings.clone();
        trainings.sort_by(|a, b| b.date.cmp(&a.date));
        trainings
    }

    pub fn get_trainings_by_team(&self, team_id: u32) -> Vec<Training> {
        let mut trainings: Vec<Training> = self
            .snapshot
            .trainings
            .iter()
            .filter(|t| t.team_id == team_id)
            .cloned()
            .collect();
        trainings.sort_by(|a, b| b.date.cmp(&a.date));
        trainings
    }

    pub fn get_training_by_id(&self, id: u32) -> Option<Training> {
        self.snapshot.trainings.iter().find(|t| t.id == id).cloned()
    }
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().map_or(1, |max| max + 1)
}
