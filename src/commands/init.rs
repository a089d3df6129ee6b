use std::path::Path;

use crate::error::Result;
use crate::store::board::{BOARD_DIR, BoardStore};

pub fn run(base: &Path, token: Option<String>) -> Result<()> {
    let with_token = token.is_some();
    BoardStore::init(base, token)?;
    if with_token {
        println!("initialized {}/ (token required for writes)", BOARD_DIR);
    } else {
        println!("initialized {}/", BOARD_DIR);
    }
    Ok(())
}
