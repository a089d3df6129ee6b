use std::path::Path;

use crate::agents::auto_start;
use crate::error::Result;

pub fn run(base: &Path, token: Option<String>) -> Result<()> {
    let summary = auto_start::run(base, token.as_deref())?;
    println!("{summary}");
    Ok(())
}
