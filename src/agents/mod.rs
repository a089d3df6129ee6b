//! Unattended maintenance agents.
//!
//! Both agents run from a scheduler, serialize against themselves with a
//! TTL lock in the board directory, and treat an unprovisioned backing
//! store as a quiet no-op so a missing board never crashes the scheduler.

pub mod auto_start;
pub mod sweeper;

use std::path::Path;

use crate::error::{MaxbanError, Result};
use crate::store::board::BoardStore;

/// Open the board for an agent run. `None` means the store is not
/// available and the run should no-op.
pub fn open_board(base: &Path) -> Result<Option<BoardStore>> {
    match BoardStore::open(base) {
        Ok(store) => Ok(Some(store)),
        Err(MaxbanError::StoreUnavailable(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// First `limit` titles joined for a one-line summary.
pub fn title_digest(titles: &[String], limit: usize) -> String {
    let shown: Vec<&str> = titles.iter().take(limit).map(String::as_str).collect();
    let mut out = shown.join(" | ");
    if titles.len() > limit {
        out.push_str(" | …");
    }
    out
}
