//! Auto-starter: promote at most one eligible task per run into DOING.
//!
//! Tasks assigned to the agent by convention (title "Max: ..." or tags
//! `max`/`ai`) are preferred; without any, the whole BACKLOG/TODO pool is
//! considered. Within the chosen pool, highest priority wins and newer
//! tasks break ties.

use std::path::Path;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::error::{MaxbanError, Result};
use crate::model::{ColumnId, Task, TaskPatch};
use crate::store::board::BoardStore;
use crate::store::lock::TtlLock;

pub const LOCK_NAME: &str = "auto-start.lock";
pub const LOCK_TTL: Duration = Duration::from_secs(2 * 60);

const MARKER: &str = "[Max] Auto-started";

/// Assignment convention: title starts with "max:" (any case, optional
/// whitespace before the colon) or tags include `max` or `ai`.
pub fn is_assigned(task: &Task) -> bool {
    let title = task.title.trim().to_lowercase();
    if let Some(rest) = title.strip_prefix("max")
        && rest.trim_start().starts_with(':')
    {
        return true;
    }
    task.has_tag("max") || task.has_tag("ai")
}

fn can_start(task: &Task) -> bool {
    matches!(task.column_id, ColumnId::Backlog | ColumnId::Todo)
}

/// Select the single task to start, or `None` when nothing qualifies.
pub fn pick(tasks: &[Task]) -> Option<&Task> {
    let candidates: Vec<&Task> = tasks.iter().filter(|t| can_start(t)).collect();
    let assigned: Vec<&Task> = candidates
        .iter()
        .copied()
        .filter(|t| is_assigned(t))
        .collect();
    let mut pool = if assigned.is_empty() {
        candidates
    } else {
        assigned
    };
    pool.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then(b.created_at.cmp(&a.created_at))
    });
    pool.into_iter().next()
}

/// One selection-and-move pass against an open store.
pub fn execute(store: &mut BoardStore) -> Result<Option<Task>> {
    let tasks = store.list()?;
    let Some(picked) = pick(&tasks) else {
        return Ok(None);
    };

    let description = if picked.description.contains(MARKER) {
        None
    } else {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let appended = format!("{}\n\n{}: {}", picked.description, MARKER, stamp);
        Some(appended.trim().to_string())
    };

    let moved = store.update(
        &picked.id,
        TaskPatch {
            column_id: Some(ColumnId::Doing),
            description,
            ..TaskPatch::default()
        },
    )?;
    Ok(Some(moved))
}

/// Full agent run: lock, fetch, pick, move. Returns the one summary line.
pub fn run(base: &Path, token: Option<&str>) -> Result<String> {
    let Some(mut store) = super::open_board(base)? else {
        return Ok("auto-start: store unavailable, no-op".into());
    };
    store.authorize(token)?;

    let lock = match TtlLock::acquire(store.root(), LOCK_NAME, LOCK_TTL) {
        Ok(lock) => lock,
        Err(MaxbanError::Locked(_)) => {
            return Ok("auto-start: another run is in flight".into());
        }
        Err(e) => return Err(e),
    };

    let outcome = execute(&mut store);
    lock.release()?;

    match outcome? {
        Some(task) => Ok(format!("auto-start: started \"{}\" ({})", task.title, task.id)),
        None => Ok("auto-start: no matching tasks".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn task(title: &str, column: ColumnId, priority: Priority, created_at: i64) -> Task {
        Task {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.into(),
            description: String::new(),
            column_id: column,
            priority,
            tags: vec![],
            xp_reward: 25,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn title_prefix_marks_assignment() {
        assert!(is_assigned(&task("Max: fix bug", ColumnId::Todo, Priority::Low, 0)));
        assert!(is_assigned(&task("MAX : spaced colon", ColumnId::Todo, Priority::Low, 0)));
        assert!(!is_assigned(&task("Maximum effort", ColumnId::Todo, Priority::Low, 0)));
    }

    #[test]
    fn tags_mark_assignment() {
        let mut t = task("Regular", ColumnId::Todo, Priority::Low, 0);
        t.tags = vec!["AI".into()];
        assert!(is_assigned(&t));
    }

    #[test]
    fn assigned_pool_beats_raw_priority() {
        let tasks = vec![
            task("Max: fix bug", ColumnId::Backlog, Priority::Low, 1),
            task("Regular task", ColumnId::Todo, Priority::Urgent, 2),
        ];
        assert_eq!(pick(&tasks).unwrap().title, "Max: fix bug");
    }

    #[test]
    fn falls_back_to_priority_without_assignments() {
        let tasks = vec![
            task("High one", ColumnId::Todo, Priority::High, 1),
            task("Urgent one", ColumnId::Todo, Priority::Urgent, 1),
        ];
        assert_eq!(pick(&tasks).unwrap().title, "Urgent one");
    }

    #[test]
    fn newer_task_breaks_priority_tie() {
        let tasks = vec![
            task("Older", ColumnId::Todo, Priority::High, 10),
            task("Newer", ColumnId::Todo, Priority::High, 20),
        ];
        assert_eq!(pick(&tasks).unwrap().title, "Newer");
    }

    #[test]
    fn only_backlog_and_todo_qualify() {
        let tasks = vec![
            task("Max: already going", ColumnId::Doing, Priority::Urgent, 1),
            task("Max: blocked", ColumnId::Blocked, Priority::Urgent, 1),
            task("Max: finished", ColumnId::Done, Priority::Urgent, 1),
        ];
        assert!(pick(&tasks).is_none());
    }
}
