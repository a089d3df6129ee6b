use std::path::Path;

use crate::error::Result;
use crate::model::{ColumnId, Priority, TaskPatch};
use crate::output::{self, Format};
use crate::store::board::BoardStore;

#[allow(clippy::too_many_arguments)]
pub fn run(
    base: &Path,
    id: String,
    title: Option<String>,
    description: Option<String>,
    column: Option<ColumnId>,
    priority: Option<Priority>,
    tags: Option<Vec<String>>,
    xp: Option<i64>,
    token: Option<String>,
    format: Format,
) -> Result<()> {
    let mut store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    let id = store.resolve_id(&id)?;
    let task = store.update(
        &id,
        TaskPatch {
            title,
            description,
            column_id: column,
            priority,
            tags,
            xp_reward: xp,
        },
    )?;
    output::print_task(&task, format)?;
    Ok(())
}
