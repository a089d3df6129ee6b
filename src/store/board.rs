//! Authoritative task store backed by SQLite.
//!
//! All writers (CLI, inbox feed, automation agents) converge here. Column
//! moves and the score update they may trigger are applied in one
//! transaction, so the award-once invariant holds no matter which caller
//! drives the move.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{MaxbanError, Result};
use crate::gamification::{Stats, apply_done, level_for_xp};
use crate::model::{
    ColumnId, Priority, Task, TaskPatch, TaskSeed, XP_DEFAULT, clamp_title, clamp_xp, clean_tags,
    now_ms,
};

pub const BOARD_DIR: &str = ".maxban";
const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "board.db";

pub const SNAPSHOT_VERSION: u32 = 1;

/// Versioned export payload: tasks plus the score record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub tasks: Vec<Task>,
    pub stats: Stats,
}

pub struct BoardStore {
    root: PathBuf,
    conn: Connection,
    config: Config,
}

impl BoardStore {
    /// Initialize a new board directory.
    pub fn init(base: &Path, token: Option<String>) -> Result<Self> {
        let root = base.join(BOARD_DIR);
        if root.join(CONFIG_FILE).exists() {
            return Err(MaxbanError::Validation(
                "board already initialized here".into(),
            ));
        }
        fs::create_dir_all(&root)?;
        let config = Config { version: 1, token };
        config.save(&root.join(CONFIG_FILE))?;
        Self::connect(root, config)
    }

    /// Open an existing board. A missing board directory is the
    /// "backing store not configured" case.
    pub fn open(base: &Path) -> Result<Self> {
        let root = base.join(BOARD_DIR);
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(MaxbanError::StoreUnavailable(
                "board not initialized (run `maxban init`)".into(),
            ));
        }
        let config = Config::load(&config_path)?;
        Self::connect(root, config)
    }

    fn connect(root: PathBuf, config: Config) -> Result<Self> {
        let conn = Connection::open(root.join(DB_FILE))
            .map_err(|e| MaxbanError::StoreUnavailable(e.to_string()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| MaxbanError::StoreUnavailable(e.to_string()))?;
        let store = Self { root, conn, config };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                column_id TEXT NOT NULL,
                priority TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT '',
                xp_reward INTEGER NOT NULL DEFAULT 25,
                xp_awarded INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_column ON tasks(column_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_updated ON tasks(updated_at);
            CREATE TABLE IF NOT EXISTS stats (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                xp INTEGER NOT NULL DEFAULT 0,
                level INTEGER NOT NULL DEFAULT 1,
                streak INTEGER NOT NULL DEFAULT 0,
                last_done_day TEXT
            );
            CREATE TABLE IF NOT EXISTS status_kv (
                key TEXT PRIMARY KEY,
                payload TEXT NOT NULL DEFAULT '{}',
                updated_at INTEGER NOT NULL
            );",
        )?;
        self.conn
            .execute("INSERT OR IGNORE INTO stats (id) VALUES (1)", [])?;
        Ok(())
    }

    /// Board directory, also home to the agent lock tokens.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check a caller-presented credential against the configured token.
    pub fn authorize(&self, presented: Option<&str>) -> Result<()> {
        self.config.authorize(presented)
    }

    pub fn create(&self, seed: TaskSeed) -> Result<Task> {
        let title = clamp_title(&seed.title);
        if title.is_empty() {
            return Err(MaxbanError::Validation("title required".into()));
        }
        let now = now_ms();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title,
            description: seed.description.trim().to_string(),
            column_id: seed.column_id.unwrap_or_default(),
            priority: seed.priority.unwrap_or_default(),
            tags: clean_tags(&seed.tags),
            xp_reward: clamp_xp(seed.xp_reward.unwrap_or(XP_DEFAULT)),
            created_at: now,
            updated_at: now,
        };
        Self::write_row(&self.conn, &task, false)?;
        Ok(task)
    }

    /// Raw upsert preserving the given fields as-is. Used by tests that
    /// need control over timestamps. An existing row keeps its award flag.
    pub fn write(&self, task: &Task) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO tasks
                (id, title, description, column_id, priority, tags, xp_reward, xp_awarded, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7,
                     COALESCE((SELECT xp_awarded FROM tasks WHERE id = ?1), 0), ?8, ?9)",
            params![
                task.id,
                task.title,
                task.description,
                task.column_id.to_string(),
                task.priority.to_string(),
                task.tags.join(","),
                task.xp_reward,
                task.created_at,
                task.updated_at,
            ],
        )?;
        Ok(())
    }

    fn write_row(conn: &Connection, task: &Task, awarded: bool) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO tasks
                (id, title, description, column_id, priority, tags, xp_reward, xp_awarded, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                task.id,
                task.title,
                task.description,
                task.column_id.to_string(),
                task.priority.to_string(),
                task.tags.join(","),
                task.xp_reward,
                awarded,
                task.created_at,
                task.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        self.conn
            .query_row(
                "SELECT id, title, description, column_id, priority, tags, xp_reward, created_at, updated_at
                 FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?
            .ok_or_else(|| MaxbanError::TaskNotFound(id.to_string()))
    }

    /// All tasks, most recently updated first.
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, column_id, priority, tags, xp_reward, created_at, updated_at
             FROM tasks ORDER BY updated_at DESC, id ASC",
        )?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Apply a partial update. A column change goes through the same
    /// transition handling as `move_task`, so XP cannot be double-counted
    /// by mixing entry points.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<Task> {
        let tx = self.conn.transaction()?;

        let prev = tx
            .query_row(
                "SELECT id, title, description, column_id, priority, tags, xp_reward, created_at, updated_at
                 FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?
            .ok_or_else(|| MaxbanError::TaskNotFound(id.to_string()))?;
        let mut awarded: bool = tx.query_row(
            "SELECT xp_awarded FROM tasks WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;

        let mut task = prev.clone();
        if let Some(title) = patch.title {
            let title = clamp_title(&title);
            if title.is_empty() {
                return Err(MaxbanError::Validation("title required".into()));
            }
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(column_id) = patch.column_id {
            task.column_id = column_id;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(tags) = patch.tags {
            task.tags = clean_tags(&tags);
        }
        if let Some(xp) = patch.xp_reward {
            task.xp_reward = clamp_xp(xp);
        }
        task.updated_at = now_ms();

        // Award XP at most once per task lifetime, on the first transition
        // into DONE. Later DONE round trips find the flag set and pay
        // nothing; leaving DONE never revokes anything.
        if prev.column_id != ColumnId::Done && task.column_id == ColumnId::Done && !awarded {
            let stats = Self::read_stats(&tx)?;
            let next = apply_done(&stats, task.xp_reward, Utc::now());
            Self::write_stats(&tx, &next)?;
            awarded = true;
        }

        Self::write_row(&tx, &task, awarded)?;
        tx.commit()?;
        Ok(task)
    }

    /// `update` restricted to the column field.
    pub fn move_task(&mut self, id: &str, column_id: ColumnId) -> Result<Task> {
        self.update(
            id,
            TaskPatch {
                column_id: Some(column_id),
                ..TaskPatch::default()
            },
        )
    }

    /// Remove a task. Idempotent: returns whether a row existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Delete every task and reset the score to zero.
    pub fn clear_all(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        Self::write_stats(&tx, &Stats::default())?;
        tx.commit()?;
        Ok(())
    }

    pub fn stats(&self) -> Result<Stats> {
        Self::read_stats(&self.conn)
    }

    fn read_stats(conn: &Connection) -> Result<Stats> {
        let stats = conn.query_row(
            "SELECT xp, level, streak, last_done_day FROM stats WHERE id = 1",
            [],
            |row| {
                Ok(Stats {
                    xp: row.get(0)?,
                    level: row.get(1)?,
                    streak: row.get(2)?,
                    last_done_day: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }

    fn write_stats(conn: &Connection, stats: &Stats) -> Result<()> {
        conn.execute(
            "UPDATE stats SET xp = ?1, level = ?2, streak = ?3, last_done_day = ?4 WHERE id = 1",
            params![stats.xp, stats.level, stats.streak, stats.last_done_day],
        )?;
        Ok(())
    }

    /// Resolve a user-supplied id to a stored task id: exact match first,
    /// then unique prefix.
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(MaxbanError::Validation("task id cannot be empty".into()));
        }
        let mut stmt = self.conn.prepare("SELECT id FROM tasks")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if ids.iter().any(|id| id == raw) {
            return Ok(raw.to_string());
        }
        let matches: Vec<&String> = ids.iter().filter(|id| id.starts_with(raw)).collect();
        match matches.len() {
            0 => Err(MaxbanError::TaskNotFound(raw.to_string())),
            1 => Ok(matches[0].clone()),
            n => Err(MaxbanError::Validation(format!(
                "id prefix {raw} is ambiguous ({n} matches)"
            ))),
        }
    }

    pub fn export(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            version: SNAPSHOT_VERSION,
            tasks: self.list()?,
            stats: self.stats()?,
        })
    }

    /// Replace tasks and stats from a snapshot. All-or-nothing: any shape
    /// problem fails before a single row is touched.
    pub fn import(&mut self, raw: &str) -> Result<Snapshot> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| MaxbanError::InvalidFormat(e.to_string()))?;

        if value.get("version").and_then(|v| v.as_u64()) != Some(SNAPSHOT_VERSION as u64) {
            return Err(MaxbanError::InvalidFormat(format!(
                "expected version {SNAPSHOT_VERSION}"
            )));
        }
        let Some(tasks_value) = value.get("tasks").filter(|t| t.is_array()) else {
            return Err(MaxbanError::InvalidFormat("tasks must be an array".into()));
        };
        let tasks: Vec<Task> = serde_json::from_value(tasks_value.clone())
            .map_err(|e| MaxbanError::InvalidFormat(e.to_string()))?;

        let mut stats = match value.get("stats") {
            Some(s) if !s.is_null() => serde_json::from_value::<Stats>(s.clone())
                .map_err(|e| MaxbanError::InvalidFormat(e.to_string()))?,
            _ => Stats::default(),
        };
        stats.level = level_for_xp(stats.xp);

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        for task in &tasks {
            // A snapshot carries no award history; a task arriving in DONE
            // is treated as already paid out.
            Self::write_row(&tx, task, task.column_id == ColumnId::Done)?;
        }
        Self::write_stats(&tx, &stats)?;
        tx.commit()?;

        Ok(Snapshot {
            version: SNAPSHOT_VERSION,
            tasks,
            stats,
        })
    }

    /// Overwrite the single current-value status slot for a key.
    pub fn put_status(&self, key: &str, payload: &serde_json::Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO status_kv (key, payload, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![key, payload.to_string(), now_ms()],
        )?;
        Ok(())
    }

    pub fn get_status(&self, key: &str) -> Result<Option<(serde_json::Value, i64)>> {
        let row: Option<(String, i64)> = self
            .conn
            .query_row(
                "SELECT payload, updated_at FROM status_kv WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        match row {
            Some((payload, updated_at)) => {
                let value = serde_json::from_str(&payload)?;
                Ok(Some((value, updated_at)))
            }
            None => Ok(None),
        }
    }
}

/// Walk up from the current directory to find the board root, falling back
/// to the current directory when no board exists yet.
pub fn find_board_root() -> Result<PathBuf> {
    let start = std::env::current_dir().map_err(MaxbanError::Io)?;
    let mut dir = start.clone();
    loop {
        if dir.join(BOARD_DIR).exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Ok(start);
        }
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let column: String = row.get(3)?;
    let priority: String = row.get(4)?;
    let tags: String = row.get(5)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        column_id: column.parse::<ColumnId>().unwrap_or_default(),
        priority: priority.parse::<Priority>().unwrap_or_default(),
        tags: tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        xp_reward: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
