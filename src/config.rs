//! Reads the optional TOML configuration

use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

/// How reports are rendered and how the batch runs
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Currency label printed after every amount
    pub currency: String,
    /// Decimal separator used when printing amounts
    pub decimal_separator: char,
    /// Differences from the direct fare up to this many cents count as the same price
    pub savings_tolerance: u64,
    /// Number of artifacts analysed in parallel, 0 picks one per core
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "EUR".to_owned(),
            decimal_separator: ',',
            savings_tolerance: 0,
            jobs: 0,
        }
    }
}

impl Config {
    /// Reads a configuration from a file, in TOML format
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config file {:?}", path))
    }
}
