//! Pure derived statistics over store snapshots. Nothing in here mutates or
//! persists; every function returns the same output for the same input, so
//! the presentation layer can re-run them on every refresh.

use std::cmp::Ordering;

use crate::model::{Player, Training};

pub fn team_total_points(players: &[Player]) -> i64 {
    players.iter().map(|p| i64::from(p.points)).sum()
}

/// Average attendees per training divided by roster size, as a percentage.
/// Zero when the team has no recorded trainings (or no players).
pub fn attendance_rate(player_count: usize, trainings: &[Training]) -> f64 {
    if trainings.is_empty() || player_count == 0 {
        return 0.0;
    }
    let attended: usize = trainings.iter().map(|t| t.attendance_count()).sum();
    let avg_attendees = attended as f64 / trainings.len() as f64;
    avg_attendees / player_count as f64 * 100.0
}

/// Current team points divided by the number of team trainings. Zero when no
/// trainings are recorded.
pub fn avg_points_per_training(players: &[Player], trainings: &[Training]) -> f64 {
    if trainings.is_empty() {
        return 0.0;
    }
    team_total_points(players) as f64 / trainings.len() as f64
}

/// Points per training attended, in percent. Undefined (`None`) for players
/// who have attended nothing; such players are excluded from the ratio
/// leaderboards rather than divided by zero.
pub fn win_rate(player: &Player) -> Option<f64> {
    if player.trainings_attended == 0 {
        return None;
    }
    Some(f64::from(player.points) / f64::from(player.trainings_attended) * 100.0)
}

/// Points descending; equal points rank the player with *fewer* trainings
/// attended higher (same haul from less attendance).
pub fn top_scorers(players: &[Player]) -> Vec<Player> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(a.trainings_attended.cmp(&b.trainings_attended))
    });
    sorted
}

/// Trainings attended descending, points descending on ties.
pub fn best_attendance(players: &[Player]) -> Vec<Player> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| {
        b.trainings_attended
            .cmp(&a.trainings_attended)
            .then(b.points.cmp(&a.points))
    });
    sorted
}

/// Points-per-training descending, restricted to players with at least one
/// training attended.
pub fn win_rate_leaderboard(players: &[Player]) -> Vec<Player> {
    let mut ranked: Vec<Player> = players
        .iter()
        .filter(|p| p.trainings_attended > 0)
        .cloned()
        .collect();
    ranked.sort_by(cmp_points_per_training);
    ranked
}

/// Same ordering as the win-rate board; the app presents it as a separate
/// leaderboard, so it stays a distinct named view.
pub fn avg_points_leaderboard(players: &[Player]) -> Vec<Player> {
    win_rate_leaderboard(players)
}

/// 1-based position of the player in the full points-descending sort, or
/// `None` if the id is not in the list.
pub fn points_rank(players: &[Player], player_id: u32) -> Option<usize> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));
    sorted
        .iter()
        .position(|p| p.id == player_id)
        .map(|idx| idx + 1)
}

/// 1-based position in the trainings-attended-descending sort.
pub fn attendance_rank(players: &[Player], player_id: u32) -> Option<usize> {
    let mut sorted = players.to_vec();
    sorted.sort_by(|a, b| b.trainings_attended.cmp(&a.trainings_attended));
    sorted
        .iter()
        .position(|p| p.id == player_id)
        .map(|idx| idx + 1)
}

/// Signed difference between the player's points and the mean points of the
/// given roster (normally the player's own team, player included).
pub fn points_vs_team_average(player: &Player, teammates: &[Player]) -> f64 {
    if teammates.is_empty() {
        return 0.0;
    }
    let mean = team_total_points(teammates) as f64 / teammates.len() as f64;
    f64::from(player.points) - mean
}

fn cmp_points_per_training(a: &Player, b: &Player) -> Ordering {
    // Cross-multiplied so the ratio compare stays exact in integers. Both
    // sides have trainings_attended > 0 here.
    let lhs = i64::from(a.points) * i64::from(b.trainings_attended);
    let rhs = i64::from(b.points) * i64::from(a.trainings_attended);
    rhs.cmp(&lhs)
        .then(b.trainings_attended.cmp(&a.trainings_attended))
        .then(b.points.cmp(&a.points))
}
