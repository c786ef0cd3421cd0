//! Runtime configuration sourced from the environment (and `.env`).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::parser::ParsePolicy;
use crate::records::DEFAULT_PAGE_SIZE;
use crate::store::RecordStore;

pub const DATA_DIR_VAR: &str = "BIKESHARE_DATA_DIR";
pub const SKIP_MALFORMED_VAR: &str = "BIKESHARE_SKIP_MALFORMED";
pub const PAGE_SIZE_VAR: &str = "BIKESHARE_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub policy: ParsePolicy,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
            policy: ParsePolicy::Abort,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Reads the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(SKIP_MALFORMED_VAR) {
            if parse_flag(&raw).with_context(|| format!("invalid {SKIP_MALFORMED_VAR}"))? {
                config.policy = ParsePolicy::Skip;
            }
        }

        if let Some(raw) = lookup(PAGE_SIZE_VAR) {
            let size: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {PAGE_SIZE_VAR}: {raw:?}"))?;
            if size == 0 {
                bail!("{PAGE_SIZE_VAR} must be greater than zero");
            }
            config.page_size = size;
        }

        Ok(config)
    }

    pub fn store(&self) -> RecordStore {
        RecordStore::new(&self.data_dir).with_policy(self.policy)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/bikeshare"),
            (SKIP_MALFORMED_VAR, "Yes"),
            (PAGE_SIZE_VAR, "10"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/bikeshare"));
        assert_eq!(config.policy, ParsePolicy::Skip);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.store().data_dir(), std::path::Path::new("/srv/bikeshare"));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_lookup(lookup(&[(PAGE_SIZE_VAR, "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[(PAGE_SIZE_VAR, "five")])).is_err());
        assert!(Config::from_lookup(lookup(&[(SKIP_MALFORMED_VAR, "maybe")])).is_err());
    }
}
