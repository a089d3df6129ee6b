//! Free-text inbox parsing: one line of human text in, a task seed out.
//!
//! Recognized bits: `#tag` tokens, an XP hint (`xp:50`, `xp=50`, `xp 50`,
//! `+50xp`), column-name synonyms ("doing", "in progress", "blocked", ...)
//! and priority synonyms ("urgent", "p0", ...). Whatever survives after
//! stripping command prefixes and recognized tokens becomes the title.

use crate::model::{ColumnId, Priority, TaskSeed, XP_DEFAULT, clamp_xp};

const COLUMN_ALIASES: &[(&[&str], ColumnId)] = &[
    (&["backlog"], ColumnId::Backlog),
    (&["todo", "to do"], ColumnId::Todo),
    (&["doing", "in progress", "progress"], ColumnId::Doing),
    (&["blocked", "stuck"], ColumnId::Blocked),
    (&["done", "complete", "completed"], ColumnId::Done),
];

const PRIORITY_ALIASES: &[(&[&str], Priority)] = &[
    (&["urgent", "p0"], Priority::Urgent),
    (&["high", "p1"], Priority::High),
    (&["med", "medium", "p2"], Priority::Medium),
    (&["low", "p3"], Priority::Low),
];

const COMMAND_PREFIXES: &[&str] = &["new task", "add task", "create task", "task"];

const TITLE_FALLBACK_LEN: usize = 120;

/// Parse free text into a task seed. Pure; never fails — worst case the
/// title falls back to a prefix of the raw input.
pub fn parse_task_text(text: &str) -> TaskSeed {
    let raw = text.trim();
    let lower = raw.to_lowercase();

    let tags: Vec<String> = raw
        .split_whitespace()
        .filter_map(|tok| tok.strip_prefix('#'))
        .map(tag_body)
        .filter(|t| !t.is_empty())
        .collect();

    let xp_reward = extract_xp(&lower).unwrap_or(XP_DEFAULT);

    let mut column_id = ColumnId::Todo;
    for (aliases, col) in COLUMN_ALIASES {
        if aliases.iter().any(|a| contains_word(&lower, a)) {
            column_id = *col;
            break;
        }
    }

    let mut priority = Priority::Medium;
    for (aliases, pri) in PRIORITY_ALIASES {
        if aliases.iter().any(|a| contains_word(&lower, a)) {
            priority = *pri;
            break;
        }
    }

    let title = build_title(raw);
    let title = if title.is_empty() {
        raw.chars().take(TITLE_FALLBACK_LEN).collect()
    } else {
        title
    };

    TaskSeed {
        title,
        description: String::new(),
        column_id: Some(column_id),
        priority: Some(priority),
        tags,
        xp_reward: Some(xp_reward),
    }
}

/// Lowercased tag body: leading `#` already stripped, trailing punctuation
/// dropped.
fn tag_body(tok: &str) -> String {
    tok.chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_lowercase()
}

/// Word-boundary substring match on already-lowercased text.
fn contains_word(text: &str, phrase: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = text[start..].find(phrase) {
        let at = start + pos;
        let end = at + phrase.len();
        let before_ok = at == 0
            || !text[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        let after_ok = end == text.len()
            || !text[end..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = at + 1;
    }
    false
}

/// Extract an XP hint from lowercased text, clamped to the reward bounds.
fn extract_xp(lower: &str) -> Option<i64> {
    let toks: Vec<&str> = lower.split_whitespace().collect();
    for (i, tok) in toks.iter().enumerate() {
        // "+50xp" / "+50 xp"
        if let Some(rest) = tok.strip_prefix('+') {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                let tail = &rest[digits.len()..];
                let followed_by_xp = tail == "xp"
                    || (tail.is_empty() && toks.get(i + 1).is_some_and(|t| *t == "xp"));
                if followed_by_xp {
                    return digits.parse().ok().map(clamp_xp);
                }
            }
        }
        // "xp:50" / "xp=50" / "xp 50"
        if let Some(rest) = tok.strip_prefix("xp") {
            let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('=')).unwrap_or(rest);
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return rest.parse().ok().map(clamp_xp);
            }
            if rest.is_empty()
                && let Some(next) = toks.get(i + 1)
            {
                let next = next.strip_prefix(':').or_else(|| next.strip_prefix('=')).unwrap_or(next);
                if !next.is_empty() && next.chars().all(|c| c.is_ascii_digit()) {
                    return next.parse().ok().map(clamp_xp);
                }
            }
        }
    }
    None
}

/// Title heuristic: drop a leading command phrase, then drop tag and XP
/// tokens from what remains.
fn build_title(raw: &str) -> String {
    let mut rest = raw;
    for prefix in COMMAND_PREFIXES {
        let boundary_ok = raw.len() > prefix.len()
            && raw.is_char_boundary(prefix.len())
            && !raw.as_bytes()[prefix.len()].is_ascii_alphanumeric();
        if boundary_ok && raw[..prefix.len()].eq_ignore_ascii_case(prefix) {
            let tail = raw[prefix.len()..].trim_start();
            rest = tail
                .strip_prefix(':')
                .or_else(|| tail.strip_prefix('-'))
                .unwrap_or(tail);
            break;
        }
    }

    let mut out: Vec<&str> = Vec::new();
    let toks: Vec<&str> = rest.split_whitespace().collect();
    let mut skip_next = false;
    for (i, tok) in toks.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if tok.starts_with('#') {
            continue;
        }
        if is_xp_token(tok) {
            continue;
        }
        let tl = tok.to_lowercase();
        if tl == "xp"
            && toks
                .get(i + 1)
                .is_some_and(|n| is_number_after_xp(n))
        {
            skip_next = true;
            continue;
        }
        // "+50 xp" split across two tokens
        if let Some(rest) = tl.strip_prefix('+') {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty()
                && rest[digits.len()..].is_empty()
                && toks.get(i + 1).is_some_and(|n| n.eq_ignore_ascii_case("xp"))
            {
                skip_next = true;
                continue;
            }
        }
        out.push(tok);
    }
    out.join(" ").trim().to_string()
}

fn is_xp_token(tok: &str) -> bool {
    let tl = tok.to_lowercase();
    // "xp:50" / "xp=50"
    if let Some(rest) = tl.strip_prefix("xp")
        && let Some(v) = rest.strip_prefix(':').or_else(|| rest.strip_prefix('='))
        && !v.is_empty()
        && v.chars().all(|c| c.is_ascii_digit())
    {
        return true;
    }
    // "+50xp"
    if let Some(rest) = tl.strip_prefix('+') {
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() && rest[digits.len()..] == *"xp" {
            return true;
        }
    }
    false
}

fn is_number_after_xp(tok: &str) -> bool {
    let t = tok.strip_prefix(':').or_else(|| tok.strip_prefix('=')).unwrap_or(tok);
    !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())
}
