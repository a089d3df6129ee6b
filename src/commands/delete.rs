use std::path::Path;

use crate::error::Result;
use crate::store::board::BoardStore;

pub fn run(base: &Path, id: String, token: Option<String>) -> Result<()> {
    let store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    let id = match store.resolve_id(&id) {
        Ok(id) => id,
        // Deleting an absent id is not an error; say so and stop.
        Err(crate::error::MaxbanError::TaskNotFound(raw)) => {
            println!("no such task: {raw}");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    if store.delete(&id)? {
        println!("deleted {id}");
    } else {
        println!("no such task: {id}");
    }
    Ok(())
}
