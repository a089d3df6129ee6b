use std::path::Path;

use crate::error::Result;
use crate::model::{ColumnId, Priority, TaskSeed};
use crate::output::{self, Format};
use crate::store::board::BoardStore;

#[allow(clippy::too_many_arguments)]
pub fn run(
    base: &Path,
    title: String,
    description: Option<String>,
    column: Option<ColumnId>,
    priority: Option<Priority>,
    tags: Vec<String>,
    xp: Option<i64>,
    token: Option<String>,
    format: Format,
) -> Result<()> {
    let store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    let task = store.create(TaskSeed {
        title,
        description: description.unwrap_or_default(),
        column_id: column,
        priority,
        tags,
        xp_reward: xp,
    })?;
    output::print_task(&task, format)?;
    Ok(())
}
