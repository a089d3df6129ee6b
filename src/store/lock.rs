//! Named advisory lock with a staleness TTL.
//!
//! Automation agents serialize against themselves with a lock token file
//! carrying its creation time in epoch milliseconds. A fresh token means
//! another run is in flight; a token older than the TTL is treated as
//! abandoned by a crashed run and taken over. A short-lived fs2 flock on a
//! sidecar guard file closes the race between checking and removing a stale
//! token.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs2::FileExt;

use crate::error::{MaxbanError, Result};
use crate::model::now_ms;

pub struct TtlLock {
    token_path: PathBuf,
    released: bool,
}

impl TtlLock {
    /// Acquire the named lock under `dir`, or fail with `Locked` when a
    /// live holder exists.
    pub fn acquire(dir: &Path, name: &str, ttl: Duration) -> Result<Self> {
        let token_path = dir.join(name);
        let guard_path = dir.join(format!("{name}.guard"));

        let guard = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&guard_path)?;
        guard
            .try_lock_exclusive()
            .map_err(|_| MaxbanError::Locked(token_path.display().to_string()))?;

        let result = Self::take_token(&token_path, ttl);
        let _ = fs2::FileExt::unlock(&guard);
        result
    }

    fn take_token(token_path: &Path, ttl: Duration) -> Result<Self> {
        if token_path.exists() {
            if Self::token_age_ms(token_path) <= ttl.as_millis() as i64 {
                return Err(MaxbanError::Locked(token_path.display().to_string()));
            }
            // Abandoned by a crashed run; take over.
            fs::remove_file(token_path)?;
        }

        fs::write(token_path, now_ms().to_string())?;
        Ok(Self {
            token_path: token_path.to_path_buf(),
            released: false,
        })
    }

    /// Age of an existing token. Falls back to the file mtime when the
    /// content does not parse, and to "brand new" when even that fails.
    fn token_age_ms(token_path: &Path) -> i64 {
        if let Ok(data) = fs::read_to_string(token_path)
            && let Ok(ts) = data.trim().parse::<i64>()
        {
            return now_ms() - ts;
        }
        fs::metadata(token_path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.elapsed().ok())
            .map(|e| e.as_millis() as i64)
            .unwrap_or(0)
    }

    /// Release explicitly (normally handled by Drop).
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.token_path)?;
        Ok(())
    }
}

impl Drop for TtlLock {
    fn drop(&mut self) {
        if !self.released {
            let _ = fs::remove_file(&self.token_path);
        }
    }
}
