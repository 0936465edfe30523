//! # Application Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     TALLY_DB_PATH=/data/tally.db                                        │
//! │     TALLY_LOAN_RATE=15            (percent)                             │
//! │     TALLY_LOW_STOCK_THRESHOLD=5                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/tally/tally.toml (Linux)                                  │
//! │     ~/Library/Application Support/com.tally.shop/tally.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     20% loan interest, 30-day installments, low stock at 3              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/home/shop/tally.db"
//! max_connections = 5
//!
//! [ledger]
//! loanInterestBps = 2000
//! installmentIntervalDays = 30
//! lowStockThreshold = 3
//! currencySymbol = "R$"
//! shopName = "Loja da Ana"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tally_core::types::Rate;
use tally_core::LedgerConfig;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::DbConfig;

/// File name of the config file and the database inside the platform
/// directories.
const CONFIG_FILE: &str = "tally.toml";
const DATABASE_FILE: &str = "tally.db";

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file. `None` uses the platform data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: None,
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete configuration for a Tally installation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Engine settings handed to `LedgerState`.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl AppConfig {
    /// Loads configuration from defaults, then the config file, then the
    /// environment.
    pub fn load(config_path: Option<PathBuf>) -> DbResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns the default if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> DbResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Rejects settings the engine cannot work with.
    pub fn validate(&self) -> DbResult<()> {
        if self.database.max_connections == 0 {
            return Err(DbError::Config(
                "database.max_connections must be greater than 0".into(),
            ));
        }
        if self.ledger.loan_interest_bps > 10_000 {
            return Err(DbError::Config(format!(
                "loan interest of {} bps is above 100%",
                self.ledger.loan_interest_bps
            )));
        }
        if self.ledger.installment_interval_days <= 0 {
            return Err(DbError::Config(
                "installment interval must be at least one day".into(),
            ));
        }
        if self.ledger.low_stock_threshold < 0 {
            return Err(DbError::Config("low stock threshold cannot be negative".into()));
        }
        Ok(())
    }

    /// Database file to open.
    pub fn database_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("com", "tally", "shop")
                    .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            })
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path()).max_connections(self.database.max_connections)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `TALLY_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("TALLY_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(rate) = lookup("TALLY_LOAN_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => {
                    debug!(percent = pct, "Overriding loan interest from environment");
                    self.ledger.loan_interest_bps = Rate::from_percentage(pct).bps();
                }
                Err(_) => warn!(value = %rate, "Ignoring unparsable TALLY_LOAN_RATE"),
            }
        }

        if let Some(threshold) = lookup("TALLY_LOW_STOCK_THRESHOLD") {
            match threshold.trim().parse::<i64>() {
                Ok(t) => self.ledger.low_stock_threshold = t,
                Err(_) => warn!(value = %threshold, "Ignoring unparsable TALLY_LOW_STOCK_THRESHOLD"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "shop")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}
