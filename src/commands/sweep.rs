use std::path::Path;

use crate::agents::sweeper::{self, Mode};
use crate::error::Result;

pub fn run(base: &Path, demote: bool, token: Option<String>) -> Result<()> {
    let mode = if demote { Mode::Demote } else { Mode::Notify };
    let summary = sweeper::run(base, mode, token.as_deref())?;
    println!("{summary}");
    Ok(())
}
