//! Stale sweeper: find tasks sitting in DOING past the staleness window.
//!
//! Notify mode only reports; demote mode moves each stale task back to
//! TODO with an idempotent description marker. Demotion is not a DONE
//! transition, so the score is never touched.

use std::path::Path;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::error::{MaxbanError, Result};
use crate::model::{ColumnId, Task, TaskPatch, now_ms};
use crate::store::board::BoardStore;
use crate::store::lock::TtlLock;

pub const LOCK_NAME: &str = "stale-sweep.lock";
pub const LOCK_TTL: Duration = Duration::from_secs(5 * 60);

pub const STALE_AFTER_MS: i64 = 24 * 60 * 60 * 1000;
const EXEMPT_TAGS: &[&str] = &["pinned", "wip-ok"];

const MARKER: &str = "[Max] Auto-demoted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Notify,
    Demote,
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub stale_titles: Vec<String>,
    pub demoted: usize,
}

/// Staleness: in DOING, not tag-exempt, and untouched for longer than the
/// window. Tasks with no usable `updated_at` are skipped.
pub fn is_stale(task: &Task, now: i64) -> bool {
    if task.column_id != ColumnId::Doing {
        return false;
    }
    if EXEMPT_TAGS.iter().any(|tag| task.has_tag(tag)) {
        return false;
    }
    if task.updated_at <= 0 {
        return false;
    }
    now - task.updated_at > STALE_AFTER_MS
}

/// One sweep pass against an open store.
pub fn execute(store: &mut BoardStore, mode: Mode) -> Result<SweepReport> {
    let now = now_ms();
    let stale: Vec<Task> = store
        .list()?
        .into_iter()
        .filter(|t| is_stale(t, now))
        .collect();

    let mut report = SweepReport {
        stale_titles: stale.iter().map(|t| t.title.clone()).collect(),
        demoted: 0,
    };

    if mode == Mode::Demote {
        for task in &stale {
            let description = if task.description.contains(MARKER) {
                None
            } else {
                let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
                let prepended = format!(
                    "{MARKER} (stale >24h): {stamp}\n\n{}",
                    task.description
                );
                Some(prepended.trim().to_string())
            };
            store.update(
                &task.id,
                TaskPatch {
                    column_id: Some(ColumnId::Todo),
                    description,
                    ..TaskPatch::default()
                },
            )?;
            report.demoted += 1;
        }
    }

    Ok(report)
}

/// Full agent run: lock, sweep, summarize in one line.
pub fn run(base: &Path, mode: Mode, token: Option<&str>) -> Result<String> {
    let Some(mut store) = super::open_board(base)? else {
        return Ok("stale-sweep: store unavailable, no-op".into());
    };
    store.authorize(token)?;

    let lock = match TtlLock::acquire(store.root(), LOCK_NAME, LOCK_TTL) {
        Ok(lock) => lock,
        Err(MaxbanError::Locked(_)) => {
            return Ok("stale-sweep: another run is in flight".into());
        }
        Err(e) => return Err(e),
    };

    let outcome = execute(&mut store, mode);
    lock.release()?;
    let report = outcome?;

    let summary = match mode {
        Mode::Demote if report.demoted > 0 => format!(
            "stale-sweep: demoted {} DOING task(s) to TODO: {}",
            report.demoted,
            super::title_digest(&report.stale_titles, 10)
        ),
        Mode::Demote => "stale-sweep: no stale DOING tasks".into(),
        Mode::Notify if report.stale_titles.is_empty() => {
            "stale-sweep: notify: none stale".into()
        }
        Mode::Notify => format!(
            "stale-sweep: notify: {} stale DOING task(s): {}",
            report.stale_titles.len(),
            super::title_digest(&report.stale_titles, 10)
        ),
    };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn doing(title: &str, age_ms: i64, tags: Vec<String>) -> Task {
        let now = now_ms();
        Task {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.into(),
            description: String::new(),
            column_id: ColumnId::Doing,
            priority: Priority::Medium,
            tags,
            xp_reward: 25,
            created_at: now - age_ms,
            updated_at: now - age_ms,
        }
    }

    const HOUR: i64 = 60 * 60 * 1000;

    #[test]
    fn fresh_doing_task_is_not_stale() {
        let t = doing("fresh", 2 * HOUR, vec![]);
        assert!(!is_stale(&t, now_ms()));
    }

    #[test]
    fn old_doing_task_is_stale() {
        let t = doing("old", 25 * HOUR, vec![]);
        assert!(is_stale(&t, now_ms()));
    }

    #[test]
    fn exempt_tags_never_stale() {
        let pinned = doing("pinned one", 48 * HOUR, vec!["Pinned".into()]);
        let wip = doing("wip one", 48 * HOUR, vec!["wip-ok".into()]);
        assert!(!is_stale(&pinned, now_ms()));
        assert!(!is_stale(&wip, now_ms()));
    }

    #[test]
    fn non_doing_columns_never_stale() {
        let mut t = doing("parked", 48 * HOUR, vec![]);
        t.column_id = ColumnId::Blocked;
        assert!(!is_stale(&t, now_ms()));
    }

    #[test]
    fn zero_updated_at_is_skipped() {
        let mut t = doing("no timestamp", 48 * HOUR, vec![]);
        t.updated_at = 0;
        assert!(!is_stale(&t, now_ms()));
    }
}
