use anyhow::{Context, Result};
use datamodels::Config;
use datamodels_redcap::{ClientConfig, Content};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Configuration file loaded when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "datamodels.toml";

/// Default number of REDCap projects generated concurrently.
const DEFAULT_PROCS: usize = 24;

/// Settings read from a TOML configuration file.
///
/// ```toml
/// workers = 8
/// procs = 4
///
/// [redcap]
/// skip = ["event"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Maximum number of tables written concurrently
    pub workers: Option<usize>,

    /// Maximum number of REDCap projects generated concurrently
    pub procs: Option<usize>,

    pub redcap: RedcapConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedcapConfig {
    /// API content kinds answered without calling the API
    pub skip: Vec<Content>,
}

impl Default for RedcapConfig {
    fn default() -> Self {
        Self {
            skip: ClientConfig::default().skip,
        }
    }
}

impl FileConfig {
    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        contents
            .parse()
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load `path` if given, otherwise [`DEFAULT_CONFIG_FILE`] if it exists,
    /// otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Generation settings, with `workers` taking precedence over the file.
    pub fn generation(&self, workers: Option<usize>) -> Config {
        match workers.or(self.workers) {
            Some(workers) => Config::new().workers(workers),
            None => Config::new(),
        }
    }

    /// Project concurrency, with `procs` taking precedence over the file.
    pub fn procs(&self, procs: Option<usize>) -> usize {
        procs.or(self.procs).unwrap_or(DEFAULT_PROCS).max(1)
    }

    pub fn client(&self) -> ClientConfig {
        ClientConfig::new().skip(self.redcap.skip.iter().copied())
    }
}

impl FromStr for FileConfig {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: FileConfig = "".parse().unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.procs(None), 24);
        assert!(config.client().is_skipped(Content::Event));
    }

    #[test]
    fn flags_override_file() {
        let config: FileConfig = "workers = 3\nprocs = 2\n".parse().unwrap();

        assert_eq!(config.generation(None).workers, 3);
        assert_eq!(config.generation(Some(5)).workers, 5);
        assert_eq!(config.procs(None), 2);
        assert_eq!(config.procs(Some(6)), 6);
    }

    #[test]
    fn redcap_skip_list() {
        let config: FileConfig = "[redcap]\nskip = []\n".parse().unwrap();
        assert!(!config.client().is_skipped(Content::Event));

        let config: FileConfig = "[redcap]\nskip = [\"event\", \"arm\"]\n".parse().unwrap();
        assert!(config.client().is_skipped(Content::Arm));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!("threads = 4".parse::<FileConfig>().is_err());
        assert!("[redcap]\nskip = [\"bogus\"]\n".parse::<FileConfig>().is_err());
    }
}
