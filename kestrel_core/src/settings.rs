// kestrel_core/src/settings.rs

//! Configuration structures for the kestrel simulator.
//! Loads settings from JSON files and validates them.
//!
//! Monetary values (commission fees) are written as JSON strings so they are
//! parsed straight into `Decimal` from their textual form.

use anyhow::Context;

use crate::event;
use crate::commission;

/// Datetime format shared by settings, data files and the trade journal.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Kind of price source driving the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub enum PriceSourceKind {
    #[serde(rename = "tick")]
    Tick,
    #[serde(rename = "bar")]
    Bar,
}

/// Commission plan selected in settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub enum CommissionPlan {
    #[serde(rename = "Flat")]
    Flat { fee: rust_decimal::Decimal },
    #[serde(rename = "Per_Share")]
    PerShare { rate: rust_decimal::Decimal, minimum: rust_decimal::Decimal },
}

impl Default for CommissionPlan {
    fn default() -> Self {
        CommissionPlan::Flat { fee: rust_decimal_macros::dec!(1.00) }
    }
}

impl CommissionPlan {
    /// Builds the commission model configured by this plan.
    pub fn build(&self) -> Box<dyn commission::CommissionModel> {
        match self {
            CommissionPlan::Flat { fee } => {
                Box::new(commission::FlatCommission::new(*fee))
            }
            CommissionPlan::PerShare { rate, minimum } => {
                Box::new(commission::PerShareCommission::new(*rate, *minimum))
            }
        }
    }

}

/// Data settings for the price feed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSettings {
    pub source_kind: PriceSourceKind,
    pub data_path: String,
    pub symbols: Vec<String>,
}

/// Execution settings: venue label, commission plan, optional trade journal.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionSettings {
    #[serde(default = "default_exchange")]
    pub exchange: String,

    #[serde(default)]
    pub commission: CommissionPlan,

    #[serde(default)]
    pub journal_path: Option<String>,
}

fn default_exchange() -> String {
    // Placeholder venue: the naive model performs no routing.
    "ARCA".to_string()
}

/// One order intent to be emitted once the feed clock reaches `at`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderSettings {
    pub at: String,
    pub symbol: String,
    pub action: event::OrderAction,
    pub quantity: u64,
}

/// Common settings applicable to the entire run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonSettings {
    pub mode: String,
}

/// Top-level settings structure.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub common: CommonSettings,
    pub data: DataSettings,
    pub execution: ExecutionSettings,
    pub orders: Vec<OrderSettings>,
}

impl Settings {
    /// Loads settings from a JSON file.
    /// # Arguments
    /// * `settings_file_path` - Path to the JSON configuration file.
    /// # Returns
    /// * `anyhow::Result<Settings>` containing the loaded settings.
    pub fn load<P: AsRef<std::path::Path>>(
        settings_file_path: P,
    ) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(settings_file_path)?;
        let settings = Self::parse(&contents)?;

        anyhow::Ok(settings)
    }

    /// Parses and validates settings from a JSON string.
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_json::from_str(contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings JSON: {}", e))?;

        check_args(&settings)
            .map_err(|e| anyhow::anyhow!("Settings validation failed:\n{}", e))?;

        anyhow::Ok(settings)
    }

}

/// Parses a settings datetime string into UTC using [`DATETIME_FORMAT`].
pub fn parse_datetime(string: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    let dt = chrono::NaiveDateTime::parse_from_str(
        string,
        DATETIME_FORMAT,
    ).with_context(|| format!(
        "Invalid datetime '{}', expected format '{}'",
        string,
        DATETIME_FORMAT,
    ))?;

    let dt_utc = chrono::DateTime::<chrono::Utc>::from_naive_utc_and_offset(
        dt,
        chrono::Utc,
    );

    anyhow::Ok(dt_utc)
}

fn check_args(settings: &Settings) -> anyhow::Result<()> {
    // check mode
    {
        const VALID_MODES: &[&str] = &["Backtest", "Debug"];
        if !VALID_MODES.contains(&settings.common.mode.as_str()) {
            anyhow::bail!("Wrong mode setting! Use one of {:?}", VALID_MODES);
        }
    }

    // check data
    {
        if settings.data.data_path.trim().is_empty() {
            anyhow::bail!("Data path cannot be empty!");
        }

        if settings.data.symbols.is_empty() {
            anyhow::bail!("Provide symbol list!")
        }

        for symbol in &settings.data.symbols {
            if symbol.trim().is_empty() {
                anyhow::bail!("Symbol names cannot be empty!");
            }
        }
    }

    // check commission plan
    {
        match &settings.execution.commission {
            CommissionPlan::Flat { fee } => {
                if fee.is_sign_negative() {
                    anyhow::bail!("Flat commission fee cannot be negative, got {}", fee);
                }
            }
            CommissionPlan::PerShare { rate, minimum } => {
                if rate.is_sign_negative() {
                    anyhow::bail!("Per-share commission rate cannot be negative, got {}", rate);
                }
                if minimum.is_sign_negative() {
                    anyhow::bail!("Per-share commission minimum cannot be negative, got {}", minimum);
                }
            }
        }
    }

    // check exchange label
    {
        if settings.execution.exchange.trim().is_empty() {
            anyhow::bail!("Exchange label cannot be empty!");
        }
    }

    // check orders
    {
        for order in &settings.orders {
            if order.quantity == 0 {
                anyhow::bail!(
                    "Order quantity for '{}' at '{}' must be positive!",
                    order.symbol,
                    order.at,
                );
            }

            if !settings.data.symbols.contains(&order.symbol) {
                anyhow::bail!(
                    "Order symbol '{}' is not in the data symbol list {:?}",
                    order.symbol,
                    settings.data.symbols,
                );
            }

            parse_datetime(&order.at)
                .with_context(|| format!("Invalid 'at' for order on '{}'", order.symbol))?;
        }
    }

    // check journal path
    {
        if let Some(journal_path) = &settings.execution.journal_path {
            if journal_path.trim().is_empty() {
                anyhow::bail!("Journal path cannot be empty!");
            }

            let path = std::path::Path::new(journal_path);
            if path.is_dir() {
                anyhow::bail!("Journal path must be a file, got directory '{}'", journal_path);
            }

            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
    }

    anyhow::Ok(())
}
