use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::scan::InsurerPolicy;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub reportcheck: ReportcheckConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Paths and logging
#[derive(Debug, Clone, Deserialize)]
pub struct ReportcheckConfig {
    /// Root of the directory tree holding the report files.
    pub reports_root: PathBuf,
    /// JSON client roster exported from the spreadsheet.
    pub roster_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Filename matching behaviour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfig {
    /// Reject files without a recognisable insurer instead of attributing
    /// them to the first catalog entry.
    #[serde(default)]
    pub strict_insurer: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in REPORTCHECK_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("REPORTCHECK_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_file(&config_path)
    }

    /// Load and validate a specific config file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.reportcheck.reports_root.exists() {
            anyhow::bail!(
                "reports_root path does not exist: {}. Set reports_root in config.toml to your reports directory.",
                self.reportcheck.reports_root.display()
            );
        }

        if !self.reportcheck.reports_root.is_dir() {
            anyhow::bail!(
                "reports_root must be a directory, not a file: {}",
                self.reportcheck.reports_root.display()
            );
        }

        if self.reportcheck.roster_path.as_os_str().is_empty() {
            anyhow::bail!("roster_path must not be empty");
        }

        Ok(())
    }

    pub fn reports_root(&self) -> &Path {
        &self.reportcheck.reports_root
    }

    pub fn roster_path(&self) -> &Path {
        &self.reportcheck.roster_path
    }

    pub fn insurer_policy(&self) -> InsurerPolicy {
        if self.matching.strict_insurer {
            InsurerPolicy::Strict
        } else {
            InsurerPolicy::Tolerant
        }
    }
}
