use chrono::Utc;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const TITLE_MAX: usize = 200;
pub const XP_MIN: i64 = 0;
pub const XP_MAX: i64 = 500;
pub const XP_DEFAULT: i64 = 25;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[clap(rename_all = "lower")]
pub enum ColumnId {
    Backlog,
    #[default]
    Todo,
    Doing,
    Blocked,
    Done,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[clap(rename_all = "lower")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Scheduling rank: URGENT sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl std::fmt::Display for ColumnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backlog => write!(f, "BACKLOG"),
            Self::Todo => write!(f, "TODO"),
            Self::Doing => write!(f, "DOING"),
            Self::Blocked => write!(f, "BLOCKED"),
            Self::Done => write!(f, "DONE"),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urgent => write!(f, "URGENT"),
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

impl std::str::FromStr for ColumnId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BACKLOG" => Ok(Self::Backlog),
            "TODO" => Ok(Self::Todo),
            "DOING" => Ok(Self::Doing),
            "BLOCKED" => Ok(Self::Blocked),
            "DONE" => Ok(Self::Done),
            other => Err(format!("unknown column: {other}")),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "URGENT" => Ok(Self::Urgent),
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A card on the board. Timestamps are epoch milliseconds; `updated_at`
/// advances on every field mutation including column moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub column_id: ColumnId,
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub xp_reward: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for `create`: everything optional except the title, defaults applied
/// by the store. The inbox parser produces one of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSeed {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub column_id: Option<ColumnId>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub xp_reward: Option<i64>,
}

/// Partial update: only present fields are applied.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub column_id: Option<ColumnId>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub xp_reward: Option<i64>,
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Trim and truncate a title to the storage limit.
pub fn clamp_title(s: &str) -> String {
    s.trim().chars().take(TITLE_MAX).collect()
}

pub fn clamp_xp(xp: i64) -> i64 {
    xp.clamp(XP_MIN, XP_MAX)
}

/// Trim tags and drop empties. Matching is case-insensitive elsewhere;
/// insertion order is preserved for display.
pub fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Task {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
