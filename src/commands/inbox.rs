use std::path::Path;

use crate::error::{MaxbanError, Result};
use crate::inbox::parse_task_text;
use crate::output::{self, Format};
use crate::store::board::BoardStore;

/// Turn one line of free text into a task.
pub fn run(base: &Path, text: String, token: Option<String>, format: Format) -> Result<()> {
    if text.trim().is_empty() {
        return Err(MaxbanError::Validation("text required".into()));
    }
    let store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    let seed = parse_task_text(&text);
    let task = store.create(seed)?;
    output::print_task(&task, format)?;
    Ok(())
}
