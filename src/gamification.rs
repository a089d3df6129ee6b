use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Board-wide score record. `level` is always derivable from `xp`; it is
/// stored alongside only for O(1) reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub xp: i64,
    pub level: i64,
    pub streak: i64,
    /// UTC calendar day (YYYY-MM-DD) of the most recent XP-awarding
    /// completion, `None` if there has not been one yet.
    pub last_done_day: Option<String>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 0,
            last_done_day: None,
        }
    }
}

/// Level 1 at 0 xp, then +100 xp per level.
pub fn level_for_xp(xp: i64) -> i64 {
    (xp / 100 + 1).max(1)
}

/// Progress within the current level, for display.
pub fn xp_to_next_level(xp: i64) -> (i64, i64, i64) {
    let level = level_for_xp(xp);
    let into = xp - (level - 1) * 100;
    (level, into, 100)
}

/// UTC calendar day key, YYYY-MM-DD.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Apply an XP-awarding completion to the score.
///
/// Streak rule, comparing `last_done_day` to today:
/// - same day: unchanged (multiple completions in one day count once)
/// - exactly one day later: +1
/// - any other gap, or no prior completion: reset to 1
pub fn apply_done(stats: &Stats, reward: i64, now: DateTime<Utc>) -> Stats {
    let today = day_key(now);

    let streak = match stats.last_done_day.as_deref() {
        Some(prev) if prev == today => stats.streak,
        Some(prev) => {
            if days_between(prev, &today) == Some(1) {
                stats.streak + 1
            } else {
                1
            }
        }
        None => 1,
    };

    let xp = stats.xp + reward;
    Stats {
        xp,
        level: level_for_xp(xp),
        streak,
        last_done_day: Some(today),
    }
}

fn days_between(from: &str, to: &str) -> Option<i64> {
    let from = NaiveDate::parse_from_str(from, "%Y-%m-%d").ok()?;
    let to = NaiveDate::parse_from_str(to, "%Y-%m-%d").ok()?;
    Some(to.signed_duration_since(from).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str) -> DateTime<Utc> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn level_curve() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(250), 3);
    }

    #[test]
    fn first_completion_starts_streak() {
        let s = apply_done(&Stats::default(), 50, at("2024-03-01"));
        assert_eq!(s.xp, 50);
        assert_eq!(s.level, 1);
        assert_eq!(s.streak, 1);
        assert_eq!(s.last_done_day.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn same_day_completion_does_not_inflate_streak() {
        let s = apply_done(&Stats::default(), 50, at("2024-03-01"));
        let s = apply_done(&s, 60, at("2024-03-01"));
        assert_eq!(s.xp, 110);
        assert_eq!(s.level, 2);
        assert_eq!(s.streak, 1);
    }

    #[test]
    fn next_day_completion_extends_streak() {
        let s = apply_done(&Stats::default(), 10, at("2024-03-01"));
        let s = apply_done(&s, 10, at("2024-03-02"));
        assert_eq!(s.streak, 2);
    }

    #[test]
    fn gap_resets_streak() {
        let mut s = apply_done(&Stats::default(), 10, at("2024-03-01"));
        s = apply_done(&s, 10, at("2024-03-02"));
        s = apply_done(&s, 10, at("2024-03-05"));
        assert_eq!(s.streak, 1);
    }

    #[test]
    fn month_boundary_counts_as_consecutive() {
        let s = apply_done(&Stats::default(), 10, at("2024-02-29"));
        let s = apply_done(&s, 10, at("2024-03-01"));
        assert_eq!(s.streak, 2);
    }

    #[test]
    fn progress_within_level() {
        assert_eq!(xp_to_next_level(0), (1, 0, 100));
        assert_eq!(xp_to_next_level(250), (3, 50, 100));
    }
}
