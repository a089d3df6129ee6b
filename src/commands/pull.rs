use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::board::BoardStore;
use crate::store::cache::CacheStore;

/// Refresh the local view cache from the authoritative store.
pub fn run(base: &Path, format: Format) -> Result<()> {
    let store = BoardStore::open(base)?;
    let cache = CacheStore::open(store.root());
    let merged = cache.reconcile(&store.list()?)?;
    output::print_tasks(&merged, format)?;
    Ok(())
}
