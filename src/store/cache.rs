//! Client-side snapshot cache and its reconciliation rule.
//!
//! Views poll the authoritative store and keep a local copy for display
//! between pulls. The merge is whole-record by id with the authoritative
//! copy winning on conflict; ids known only locally (not yet confirmed by
//! the store) survive until a later pull settles them. No per-field
//! merging.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Task;

const CACHE_FILE: &str = "cache.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CachePayload {
    version: u32,
    tasks: Vec<Task>,
}

pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn open(board_dir: &Path) -> Self {
        Self {
            path: board_dir.join(CACHE_FILE),
        }
    }

    /// Last known good task list. Missing, corrupt, or wrong-version cache
    /// files read as empty rather than failing the caller.
    pub fn load(&self) -> Vec<Task> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        match serde_json::from_str::<CachePayload>(&raw) {
            Ok(payload) if payload.version == CACHE_VERSION => payload.tasks,
            _ => Vec::new(),
        }
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let payload = CachePayload {
            version: CACHE_VERSION,
            tasks: tasks.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&payload)?)?;
        Ok(())
    }

    /// Refresh the cache from an authoritative listing.
    pub fn reconcile(&self, authoritative: &[Task]) -> Result<Vec<Task>> {
        let merged = merge_tasks(&self.load(), authoritative);
        self.save(&merged)?;
        Ok(merged)
    }
}

/// Merge by id, authoritative copy wins. Local ordering is kept for ids the
/// cache already had; newly confirmed ids append in authoritative order.
pub fn merge_tasks(local: &[Task], authoritative: &[Task]) -> Vec<Task> {
    let mut merged: Vec<Task> = local.to_vec();
    for task in authoritative {
        match merged.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task.clone(),
            None => merged.push(task.clone()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnId, Priority};
    use tempfile::tempdir;

    fn task(id: &str, title: &str, updated_at: i64) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            column_id: ColumnId::Todo,
            priority: Priority::Medium,
            tags: vec![],
            xp_reward: 25,
            created_at: 0,
            updated_at,
        }
    }

    #[test]
    fn server_copy_wins_on_conflict() {
        let local = vec![task("a", "local edit", 100)];
        let server = vec![task("a", "server truth", 50)];
        let merged = merge_tasks(&local, &server);
        assert_eq!(merged.len(), 1);
        // Whole-record last-writer-wins from the authoritative side, even
        // when the local copy is newer.
        assert_eq!(merged[0].title, "server truth");
    }

    #[test]
    fn local_only_ids_survive() {
        let local = vec![task("pending", "not yet confirmed", 1)];
        let server = vec![task("a", "known", 1)];
        let merged = merge_tasks(&local, &server);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().any(|t| t.id == "pending"));
    }

    #[test]
    fn server_only_ids_are_inserted() {
        let merged = merge_tasks(&[], &[task("new", "fresh", 1)]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn cache_survives_round_trip() {
        let dir = tempdir().unwrap();
        let cache = CacheStore::open(dir.path());
        assert!(cache.load().is_empty());

        cache.save(&[task("a", "one", 1)]).unwrap();
        assert_eq!(cache.load().len(), 1);

        let merged = cache.reconcile(&[task("a", "one v2", 2), task("b", "two", 2)]).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(cache.load()[0].title, "one v2");
    }

    #[test]
    fn corrupt_cache_reads_as_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CACHE_FILE), "{not json").unwrap();
        let cache = CacheStore::open(dir.path());
        assert!(cache.load().is_empty());
    }
}
