use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::board::BoardStore;

pub fn run(base: &Path, format: Format) -> Result<()> {
    let store = BoardStore::open(base)?;
    output::print_stats(&store.stats()?, format)?;
    Ok(())
}
