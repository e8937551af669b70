//! Configuration for the ledger: where the tables live, which currency
//! labels the amount column, and how much to log.
//!
//! Values come from an optional TOML file; command-line flags override them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ledger: LedgerSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_invoice_file")]
    pub invoice_file: String,

    #[serde(default = "default_expense_file")]
    pub expense_file: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LedgerSettings {
    /// Currency code shown in the amount column header, e.g. "Amount (UGX)"
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub currency: Option<String>,
    pub log_level: Option<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_invoice_file() -> String {
    "invoices.csv".to_string()
}

fn default_expense_file() -> String {
    "expenses.csv".to_string()
}

fn default_currency() -> String {
    "UGX".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: default_data_dir(),
            invoice_file: default_invoice_file(),
            expense_file: default_expense_file(),
        }
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            currency: default_currency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig::default(),
            ledger: LedgerSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Defaults rooted at `data_dir`. Handy for tests and embedding.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let mut config = Config::default();
        config.storage.data_dir = data_dir.into();
        config
    }

    /// Load `path` if it exists (defaults otherwise), then apply overrides.
    /// A file that exists but does not parse is an error.
    pub fn load(path: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply(overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref dir) = overrides.data_dir {
            self.storage.data_dir = dir.clone();
        }
        if let Some(ref currency) = overrides.currency {
            self.ledger.currency = currency.clone();
        }
        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    pub fn invoice_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.invoice_file)
    }

    pub fn expense_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.expense_file)
    }

    pub fn currency(&self) -> &str {
        &self.ledger.currency
    }
}
