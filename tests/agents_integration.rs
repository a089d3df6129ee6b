use std::fs;

use tempfile::tempdir;

use maxban::agents::sweeper::{self, Mode};
use maxban::agents::auto_start;
use maxban::model::{ColumnId, Priority, Task, TaskSeed, now_ms};
use maxban::store::board::BoardStore;

const HOUR: i64 = 60 * 60 * 1000;

fn seed(title: &str, column: ColumnId, priority: Priority) -> TaskSeed {
    TaskSeed {
        title: title.into(),
        column_id: Some(column),
        priority: Some(priority),
        ..TaskSeed::default()
    }
}

fn raw_task(title: &str, column: ColumnId, updated_at: i64) -> Task {
    Task {
        id: title.to_lowercase().replace(' ', "-"),
        title: title.into(),
        description: String::new(),
        column_id: column,
        priority: Priority::Medium,
        tags: vec![],
        xp_reward: 25,
        created_at: updated_at,
        updated_at,
    }
}

#[test]
fn auto_start_prefers_assigned_over_priority() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    store
        .create(seed("Max: fix bug", ColumnId::Backlog, Priority::Low))
        .unwrap();
    store
        .create(seed("Regular task", ColumnId::Todo, Priority::Urgent))
        .unwrap();

    let moved = auto_start::execute(&mut store).unwrap().unwrap();
    assert_eq!(moved.title, "Max: fix bug");
    assert_eq!(moved.column_id, ColumnId::Doing);
    assert!(moved.description.contains("[Max] Auto-started"));

    // Exactly one task moved per run.
    let doing: Vec<_> = store
        .list()
        .unwrap()
        .into_iter()
        .filter(|t| t.column_id == ColumnId::Doing)
        .collect();
    assert_eq!(doing.len(), 1);
}

#[test]
fn auto_start_falls_back_to_urgent_unassigned() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    store
        .create(seed("High one", ColumnId::Todo, Priority::High))
        .unwrap();
    store
        .create(seed("Urgent one", ColumnId::Todo, Priority::Urgent))
        .unwrap();

    let moved = auto_start::execute(&mut store).unwrap().unwrap();
    assert_eq!(moved.title, "Urgent one");
}

#[test]
fn auto_start_marker_not_duplicated() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    let mut task = raw_task("Max: rerun", ColumnId::Todo, now_ms());
    task.description = "notes\n\n[Max] Auto-started: 2024-01-01T00:00:00.000Z".into();
    store.write(&task).unwrap();

    let moved = auto_start::execute(&mut store).unwrap().unwrap();
    assert_eq!(moved.column_id, ColumnId::Doing);
    assert_eq!(
        moved.description.matches("[Max] Auto-started").count(),
        1
    );
}

#[test]
fn auto_start_reports_when_nothing_matches() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();
    store
        .create(seed("Finished", ColumnId::Done, Priority::Urgent))
        .unwrap();
    assert!(auto_start::execute(&mut store).unwrap().is_none());
}

#[test]
fn auto_start_run_is_noop_without_board() {
    let dir = tempdir().unwrap();
    let summary = auto_start::run(dir.path(), None).unwrap();
    assert!(summary.contains("no-op"));
}

#[test]
fn auto_start_run_backs_off_while_lock_held() {
    let dir = tempdir().unwrap();
    let store = BoardStore::init(dir.path(), None).unwrap();
    let pending = store
        .create(seed("Max: pending", ColumnId::Todo, Priority::Medium))
        .unwrap();

    // A fresh token from a concurrent run.
    fs::write(
        store.root().join(auto_start::LOCK_NAME),
        now_ms().to_string(),
    )
    .unwrap();

    let summary = auto_start::run(dir.path(), None).unwrap();
    assert!(summary.contains("in flight"));
    assert_eq!(store.get(&pending.id).unwrap().column_id, ColumnId::Todo);
}

#[test]
fn sweeper_notify_mode_never_mutates() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    store
        .write(&raw_task("Old grind", ColumnId::Doing, now_ms() - 48 * HOUR))
        .unwrap();

    let report = sweeper::execute(&mut store, Mode::Notify).unwrap();
    assert_eq!(report.stale_titles, vec!["Old grind".to_string()]);
    assert_eq!(report.demoted, 0);

    let task = store.get("old-grind").unwrap();
    assert_eq!(task.column_id, ColumnId::Doing);
    assert!(task.description.is_empty());
}

#[test]
fn sweeper_demotes_stale_doing_tasks() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    store
        .write(&raw_task("Stuck work", ColumnId::Doing, now_ms() - 25 * HOUR))
        .unwrap();

    let report = sweeper::execute(&mut store, Mode::Demote).unwrap();
    assert_eq!(report.demoted, 1);

    let task = store.get("stuck-work").unwrap();
    assert_eq!(task.column_id, ColumnId::Todo);
    assert!(task.description.starts_with("[Max] Auto-demoted (stale >24h):"));
    // Demotion is not a completion; the score stays put.
    assert_eq!(store.stats().unwrap().xp, 0);
}

#[test]
fn sweeper_respects_exempt_tags() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    let mut pinned = raw_task("Pinned work", ColumnId::Doing, now_ms() - 48 * HOUR);
    pinned.tags = vec!["pinned".into()];
    store.write(&pinned).unwrap();

    let report = sweeper::execute(&mut store, Mode::Demote).unwrap();
    assert!(report.stale_titles.is_empty());
    assert_eq!(
        store.get("pinned-work").unwrap().column_id,
        ColumnId::Doing
    );
}

#[test]
fn sweeper_marker_applied_once_across_two_sweeps() {
    let dir = tempdir().unwrap();
    let mut store = BoardStore::init(dir.path(), None).unwrap();

    store
        .write(&raw_task("Repeat offender", ColumnId::Doing, now_ms() - 25 * HOUR))
        .unwrap();
    sweeper::execute(&mut store, Mode::Demote).unwrap();

    // Back to DOING and stale again, marker already present from round one.
    let mut task = store.get("repeat-offender").unwrap();
    task.column_id = ColumnId::Doing;
    task.updated_at = now_ms() - 25 * HOUR;
    store.write(&task).unwrap();

    sweeper::execute(&mut store, Mode::Demote).unwrap();
    let task = store.get("repeat-offender").unwrap();
    assert_eq!(task.column_id, ColumnId::Todo);
    assert_eq!(task.description.matches("[Max] Auto-demoted").count(), 1);
}

#[test]
fn sweeper_run_is_noop_without_board() {
    let dir = tempdir().unwrap();
    let summary = sweeper::run(dir.path(), Mode::Demote, None).unwrap();
    assert!(summary.contains("no-op"));
}

#[test]
fn sweeper_summary_lists_stale_titles() {
    let dir = tempdir().unwrap();
    let store = BoardStore::init(dir.path(), None).unwrap();
    store
        .write(&raw_task("Visible task", ColumnId::Doing, now_ms() - 30 * HOUR))
        .unwrap();
    drop(store);

    let summary = sweeper::run(dir.path(), Mode::Notify, None).unwrap();
    assert!(summary.contains("1 stale"));
    assert!(summary.contains("Visible task"));
}
