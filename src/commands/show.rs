use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::board::BoardStore;

pub fn run(base: &Path, id: String, format: Format) -> Result<()> {
    let store = BoardStore::open(base)?;
    let id = store.resolve_id(&id)?;
    let task = store.get(&id)?;
    output::print_task(&task, format)?;
    Ok(())
}
