use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::model::{Player, Team, Training};

const DATA_DIR: &str = "winner_points";
const DATA_FILE: &str = "store.json";

/// The full persisted document. Every save writes the whole snapshot, never a
/// delta. Top-level lists default to empty so a file written by an earlier
/// schema revision (e.g. one without `trainings`) still loads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub trainings: Vec<Training>,
}

pub fn default_store_path() -> Option<PathBuf> {
    // Prefer XDG data dir.
    if let Ok(base) = std::env::var("XDG_DATA_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(DATA_DIR).join(DATA_FILE));
        }
    }
    // Fallback to ~/.local/share on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR)
            .join(DATA_FILE),
    )
}

/// Missing file means a fresh install; an unreadable or malformed file is
/// logged and treated the same way. Data on disk is never partially trusted.
pub fn load(path: &Path) -> Snapshot {
    if !path.exists() {
        return Snapshot::default();
    }
    match read_snapshot(path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!("failed to load store from {}: {err:#}", path.display());
            Snapshot::default()
        }
    }
}

/// Write failures are logged and swallowed; the in-memory snapshot stays the
/// source of truth and the next mutation will attempt the write again.
pub fn save(path: &Path, snapshot: &Snapshot) {
    if let Err(err) = write_snapshot(path, snapshot) {
        tracing::error!("failed to save store to {}: {err:#}", path.display());
    }
}

fn read_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(snapshot)
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let json = serde_json::to_string(snapshot).context("serializing snapshot")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
