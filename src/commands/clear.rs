use std::path::Path;

use crate::error::{MaxbanError, Result};
use crate::store::board::BoardStore;

pub fn run(base: &Path, yes: bool, token: Option<String>) -> Result<()> {
    if !yes {
        return Err(MaxbanError::Validation(
            "clear deletes every task and resets the score; pass --yes to confirm".into(),
        ));
    }
    let mut store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    store.clear_all()?;
    println!("board cleared, score reset");
    Ok(())
}
