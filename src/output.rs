use clap::ValueEnum;
use colored::Colorize;

use crate::error::Result;
use crate::gamification::{Stats, xp_to_next_level};
use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Pretty,
    Minimal,
}

pub fn print_task(task: &Task, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(&task)?),
        Format::Pretty => {
            println!(
                "[{}] {} ({})",
                short_id(&task.id),
                task.title.bold(),
                task.column_id
            );
            if !task.description.is_empty() {
                println!("  {}", task.description);
            }
            println!("  priority: {} | xp: {}", task.priority, task.xp_reward);
            if !task.tags.is_empty() {
                println!("  tags: {}", task.tags.join(", "));
            }
        }
        Format::Minimal => {
            println!(
                "{:8} {:30} {:8} {:6} {}",
                short_id(&task.id),
                truncate_title(&task.title, 30),
                task.column_id,
                task.priority,
                task.xp_reward
            );
        }
    }
    Ok(())
}

pub fn print_tasks(tasks: &[Task], format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(tasks)?),
        Format::Pretty => {
            for task in tasks {
                print_task(task, Format::Pretty)?;
                println!();
            }
        }
        Format::Minimal => {
            println!("{:8} {:30} {:8} {:6} XP", "ID", "TITLE", "COLUMN", "PRI");
            println!("{}", "-".repeat(60));
            for task in tasks {
                print_task(task, Format::Minimal)?;
            }
        }
    }
    Ok(())
}

pub fn print_stats(stats: &Stats, format: Format) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string(stats)?),
        Format::Pretty | Format::Minimal => {
            let (level, into, needed) = xp_to_next_level(stats.xp);
            println!(
                "level {} | {} xp ({}/{} into level) | streak {}",
                level.to_string().bold(),
                stats.xp,
                into,
                needed,
                stats.streak
            );
            if let Some(ref day) = stats.last_done_day {
                println!("last completion: {}", day);
            }
        }
    }
    Ok(())
}

/// First 8 characters of an opaque id, enough to eyeball.
pub fn short_id(id: &str) -> &str {
    let end = id
        .char_indices()
        .nth(8)
        .map(|(i, _)| i)
        .unwrap_or(id.len());
    &id[..end]
}

pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() > max_len {
        let truncated: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_takes_prefix() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn truncate_title_adds_ellipsis() {
        assert_eq!(truncate_title("short", 30), "short");
        let long = "a very long title that keeps going";
        let t = truncate_title(long, 10);
        assert_eq!(t.chars().count(), 10);
        assert!(t.ends_with("..."));
    }

    #[test]
    fn truncate_title_tolerates_tiny_widths() {
        assert_eq!(truncate_title("abcdef", 2), "...");
        assert_eq!(truncate_title("ab", 2), "ab");
    }
}
