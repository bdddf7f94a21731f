//! Ledger configuration management.

use serde::Deserialize;

use crate::types::Currency;

/// Bookkeeping rules that vary per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Maximum number of segments in an account path.
    #[serde(default = "default_max_account_depth")]
    pub max_account_depth: usize,
    /// Minimum number of positions in an entry.
    #[serde(default = "default_min_positions")]
    pub min_positions: usize,
    /// Maximum number of positions in an entry.
    #[serde(default = "default_max_positions")]
    pub max_positions: usize,
    /// How many days in the past an entry may be dated.
    #[serde(default = "default_backdate_limit_days")]
    pub backdate_limit_days: u32,
    /// Minimum length of a void reason (characters, trimmed).
    #[serde(default = "default_void_reason_min")]
    pub void_reason_min: usize,
    /// Maximum length of a void reason (characters, trimmed).
    #[serde(default = "default_void_reason_max")]
    pub void_reason_max: usize,
    /// Currency used when none is given explicitly.
    #[serde(default = "default_currency")]
    pub default_currency: Currency,
}

fn default_max_account_depth() -> usize {
    6
}

fn default_min_positions() -> usize {
    2
}

fn default_max_positions() -> usize {
    100
}

fn default_backdate_limit_days() -> u32 {
    365
}

fn default_void_reason_min() -> usize {
    5
}

fn default_void_reason_max() -> usize {
    500
}

fn default_currency() -> Currency {
    Currency::Eur
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_account_depth: default_max_account_depth(),
            min_positions: default_min_positions(),
            max_positions: default_max_positions(),
            backdate_limit_days: default_backdate_limit_days(),
            void_reason_min: default_void_reason_min(),
            void_reason_max: default_void_reason_max(),
            default_currency: default_currency(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from `.env`, config files, and environment.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `HAUPTBUCH__*` variables (e.g. `HAUPTBUCH__MAX_POSITIONS=50`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("HAUPTBUCH").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
