use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MaxbanError, Result};

pub const TOKEN_ENV: &str = "MAXBAN_TOKEN";

/// Board configuration, stored as `.maxban/config.json`.
///
/// When `token` is set, every mutating operation must present a matching
/// credential. When unset all callers are accepted — the explicit
/// local-development relaxation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Check a presented credential against the configured token.
    pub fn authorize(&self, presented: Option<&str>) -> Result<()> {
        match self.token.as_deref() {
            None => Ok(()),
            Some(expected) if presented == Some(expected) => Ok(()),
            Some(_) => Err(MaxbanError::Unauthorized),
        }
    }
}

/// Credential from `--token`, falling back to the environment.
pub fn presented_token(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(TOKEN_ENV).ok().filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_token_accepts_everyone() {
        let cfg = Config {
            version: 1,
            token: None,
        };
        assert!(cfg.authorize(None).is_ok());
        assert!(cfg.authorize(Some("anything")).is_ok());
    }

    #[test]
    fn token_must_match() {
        let cfg = Config {
            version: 1,
            token: Some("s3cret".into()),
        };
        assert!(cfg.authorize(Some("s3cret")).is_ok());
        assert!(matches!(
            cfg.authorize(Some("wrong")),
            Err(MaxbanError::Unauthorized)
        ));
        assert!(matches!(cfg.authorize(None), Err(MaxbanError::Unauthorized)));
    }
}
