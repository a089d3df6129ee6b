use std::path::Path;

use crate::error::Result;
use crate::model::ColumnId;
use crate::output::{self, Format};
use crate::store::board::{BOARD_DIR, BoardStore};
use crate::store::cache::CacheStore;

pub fn run(
    base: &Path,
    column: Option<ColumnId>,
    tag: Option<String>,
    cached: bool,
    format: Format,
) -> Result<()> {
    let mut tasks = if cached {
        // Last known good snapshot; reads must work even when the
        // authoritative store is down.
        CacheStore::open(&base.join(BOARD_DIR)).load()
    } else {
        BoardStore::open(base)?.list()?
    };

    if let Some(col) = column {
        tasks.retain(|t| t.column_id == col);
    }
    if let Some(ref tag) = tag {
        tasks.retain(|t| t.has_tag(tag));
    }

    output::print_tasks(&tasks, format)?;
    Ok(())
}
