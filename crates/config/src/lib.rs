#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration handling for keg
//!
//! Precedence, lowest to highest: built-in defaults, config file,
//! environment variables, CLI flags (applied by the CLI itself).

mod core;

pub use self::core::{ColorChoice, GeneralConfig, NetworkConfig, PathConfig};

use keg_errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default installation prefix
pub const DEFAULT_PREFIX: &str = "/opt/keg";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))?;
        toml::from_str(&content).map_err(|e| Error::config(e.to_string()))
    }

    /// Load configuration from the given path, falling back to defaults
    /// when no path is given or the file does not exist
    ///
    /// # Errors
    /// Returns an error only if a file exists and fails to parse.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p).await,
            _ => Ok(Self::default()),
        }
    }

    /// Merge environment variables into the configuration
    ///
    /// Recognized: `KEG_PREFIX`, `KEG_FORMULAE_DIR`, `KEG_NET_TIMEOUT`,
    /// `KEG_NET_RETRIES`.
    ///
    /// # Errors
    /// Returns an error if a numeric variable fails to parse.
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(prefix) = std::env::var("KEG_PREFIX") {
            self.paths.prefix = Some(PathBuf::from(prefix));
        }
        if let Ok(dir) = std::env::var("KEG_FORMULAE_DIR") {
            self.paths.formulae_dir = Some(PathBuf::from(dir));
        }
        if let Ok(timeout) = std::env::var("KEG_NET_TIMEOUT") {
            self.network.timeout = timeout
                .parse()
                .map_err(|_| Error::config(format!("invalid KEG_NET_TIMEOUT: {timeout}")))?;
        }
        if let Ok(retries) = std::env::var("KEG_NET_RETRIES") {
            self.network.retries = retries
                .parse()
                .map_err(|_| Error::config(format!("invalid KEG_NET_RETRIES: {retries}")))?;
        }
        Ok(())
    }

    /// The installation prefix (cellar and bin live underneath)
    #[must_use]
    pub fn prefix(&self) -> PathBuf {
        self.paths
            .prefix
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFIX))
    }

    /// Directory holding formula descriptor files
    #[must_use]
    pub fn formulae_dir(&self) -> PathBuf {
        self.paths
            .formulae_dir
            .clone()
            .unwrap_or_else(|| self.prefix().join("formulae"))
    }

    /// Shared executable directory on the user's search path
    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.prefix().join("bin")
    }

    /// Cellar root holding one private directory per installed formula
    #[must_use]
    pub fn cellar_dir(&self) -> PathBuf {
        self.prefix().join("cellar")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prefix(), PathBuf::from(DEFAULT_PREFIX));
        assert_eq!(config.bin_dir(), PathBuf::from("/opt/keg/bin"));
        assert_eq!(config.cellar_dir(), PathBuf::from("/opt/keg/cellar"));
        assert_eq!(config.formulae_dir(), PathBuf::from("/opt/keg/formulae"));
        assert_eq!(config.network.timeout, 300);
        assert_eq!(config.network.retries, 3);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[paths]
prefix = "/tmp/keg-test"

[network]
timeout = 60
"#,
        )
        .unwrap();

        let config = Config::load(&path).await.unwrap();
        assert_eq!(config.prefix(), PathBuf::from("/tmp/keg-test"));
        assert_eq!(config.bin_dir(), PathBuf::from("/tmp/keg-test/bin"));
        assert_eq!(config.network.timeout, 60);
        // Unspecified sections keep defaults
        assert_eq!(config.network.retries, 3);
    }

    #[tokio::test]
    async fn test_load_or_default_missing_file() {
        let config = Config::load_or_default(Some(Path::new("/nonexistent/config.toml")))
            .await
            .unwrap();
        assert_eq!(config.prefix(), PathBuf::from(DEFAULT_PREFIX));
    }

    #[tokio::test]
    async fn test_load_rejects_bad_toml() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "not valid toml [").unwrap();
        assert!(Config::load(&path).await.is_err());
    }
}
