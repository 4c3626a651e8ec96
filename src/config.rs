//! Configuration loading and data-directory resolution
//!
//! All runtime settings live in one explicit [`Config`] constructed at
//! process start and passed by reference into the collaborators; there is no
//! module-level mutable state. Resolution priority per setting:
//! 1. Command-line argument (highest)
//! 2. Environment variable (via clap `env`)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::error::{Error, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://api.partsbox.com/api/1";
const DEFAULT_VENDOR_BASE_URL: &str = "https://www.lcsc.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Command-line interface
#[derive(Parser, Debug, Default)]
#[command(name = "partscan")]
#[command(about = "Scan component-bag QR codes and batch-upload them to PartsBox")]
pub struct Cli {
    /// TOML config file (default: <config_dir>/partscan/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the staging files
    #[arg(long, env = "PARTSCAN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PartsBox API token
    #[arg(long, env = "PARTSCAN_API_KEY")]
    pub api_key: Option<String>,

    /// PartsBox storage (location) id receiving imported stock
    #[arg(long, env = "PARTSCAN_STORAGE_ID")]
    pub storage_id: Option<String>,

    /// PartsBox API base URL
    #[arg(long, env = "PARTSCAN_BASE_URL")]
    pub base_url: Option<String>,

    /// Log filter (e.g. "info", "partscan=debug")
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Optional overrides read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub storage_id: Option<String>,
    pub base_url: Option<String>,
    pub vendor_base_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub request_timeout_secs: Option<u64>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub storage_id: String,
    pub base_url: String,
    pub vendor_base_url: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    /// Resolve configuration from CLI/env, config file, and defaults.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = load_file_config(cli.config.as_deref())?;

        Ok(Self {
            api_key: cli
                .api_key
                .clone()
                .or(file.api_key)
                .unwrap_or_default(),
            storage_id: cli
                .storage_id
                .clone()
                .or(file.storage_id)
                .unwrap_or_default(),
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            vendor_base_url: file
                .vendor_base_url
                .unwrap_or_else(|| DEFAULT_VENDOR_BASE_URL.to_string()),
            data_dir: cli
                .data_dir
                .clone()
                .or(file.data_dir)
                .unwrap_or_else(default_data_dir),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }

    /// Staging file for enriched records awaiting upload.
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("staged_parts.json")
    }

    /// Staging file for remote identifiers awaiting deletion.
    pub fn identifiers_path(&self) -> PathBuf {
        self.data_dir.join("staged_ids.json")
    }
}

/// Read the TOML config file.
///
/// An explicitly passed path must exist and parse; the default path is
/// optional and silently skipped when absent.
fn load_file_config(explicit: Option<&std::path::Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(FileConfig::default()),
        },
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let parsed = toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))?;

    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(parsed)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("partscan").join("config.toml"))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("partscan"))
        .unwrap_or_else(|| PathBuf::from("./partscan_data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn cli_values_take_priority_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"from-file\"\nstorage_id = \"s1\"\n").unwrap();

        let cli = Cli {
            config: Some(path),
            api_key: Some("from-cli".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(&cli).unwrap();

        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.storage_id, "s1");
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let dir = TempDir::new().unwrap();
        let cli = Cli {
            data_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::resolve(&cli).unwrap();

        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.vendor_base_url, DEFAULT_VENDOR_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.records_path().ends_with("staged_parts.json"));
    }

    #[test]
    fn explicit_config_path_must_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = [broken").unwrap();

        let cli = Cli {
            config: Some(path),
            ..Default::default()
        };
        assert!(Config::resolve(&cli).is_err());
    }
}
