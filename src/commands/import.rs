use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::board::BoardStore;

pub fn run(base: &Path, input: Option<PathBuf>, token: Option<String>) -> Result<()> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    let snapshot = store.import(&raw)?;
    println!(
        "imported {} task(s), score {} xp",
        snapshot.tasks.len(),
        snapshot.stats.xp
    );
    Ok(())
}
