use std::path::Path;

use crate::error::{MaxbanError, Result};
use crate::store::board::BoardStore;

const HEALTH_KEY: &str = "health";

/// Show the current health report, if any.
pub fn show(base: &Path) -> Result<()> {
    let store = BoardStore::open(base)?;
    match store.get_status(HEALTH_KEY)? {
        Some((payload, updated_at)) => {
            let mut report = payload;
            if let Some(obj) = report.as_object_mut() {
                obj.insert("updatedAt".into(), serde_json::json!(updated_at));
            }
            println!("{}", serde_json::to_string(&report)?);
        }
        None => println!("null"),
    }
    Ok(())
}

/// Overwrite the health slot with a new JSON payload.
pub fn report(base: &Path, payload: String, token: Option<String>) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| MaxbanError::Validation(format!("payload must be JSON: {e}")))?;
    let store = BoardStore::open(base)?;
    store.authorize(token.as_deref())?;
    store.put_status(HEALTH_KEY, &value)?;
    println!("health updated");
    Ok(())
}
