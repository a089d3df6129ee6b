use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::board::BoardStore;

pub fn run(base: &Path, out: Option<PathBuf>) -> Result<()> {
    let store = BoardStore::open(base)?;
    let snapshot = store.export()?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    match out {
        Some(path) => {
            fs::write(&path, json)?;
            println!(
                "exported {} task(s) to {}",
                snapshot.tasks.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
