use std::path::Path;

use crate::error::Result;
use crate::model::ColumnId;
use crate::output::{self, Format};
use crate::store::board::BoardStore;

pub fn run(
    base: &Path,
    id: String,
    column: ColumnId,
    token: Option<String>,
    format: Format,
) -> Result<()> {
    let mut store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    let id = store.resolve_id(&id)?;
    let task = store.move_task(&id, column)?;
    output::print_task(&task, format)?;
    Ok(())
}
