//! Configuration for the settlement engine

use crate::overrides::UntilPaymentClearing;
use receivables_core::Currency;
use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Default settlement currency for requests built by the engine
    pub currency: Currency,

    /// Override policy
    pub overrides: OverrideConfig,

    /// Logging and metrics
    pub telemetry: TelemetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "receivables-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            currency: Currency::THB,
            overrides: OverrideConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Override configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    /// Which settlements clear an until-payment override
    pub until_payment_clearing: UntilPaymentClearing,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `tracing` filter directive (e.g. `info`, `receivables_settlement=debug`)
    pub log_filter: String,

    /// Emit JSON log lines
    pub json_logs: bool,

    /// Collect Prometheus metrics
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            json_logs: false,
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(code) = std::env::var("SETTLEMENT_CURRENCY") {
            config.currency = Currency::from_code(&code)
                .ok_or_else(|| crate::Error::Config(format!("Unknown currency: {}", code)))?;
        }

        if let Ok(filter) = std::env::var("SETTLEMENT_LOG_FILTER") {
            config.telemetry.log_filter = filter;
        }

        if let Ok(name) = std::env::var("SETTLEMENT_UNTIL_PAYMENT_CLEARING") {
            config.overrides.until_payment_clearing = UntilPaymentClearing::from_name(&name)
                .ok_or_else(|| {
                    crate::Error::Config(format!("Unknown until-payment clearing: {}", name))
                })?;
        }

        if let Ok(enabled) = std::env::var("SETTLEMENT_METRICS_ENABLED") {
            config.telemetry.metrics_enabled = enabled.parse().map_err(|_| {
                crate::Error::Config(format!("SETTLEMENT_METRICS_ENABLED not a bool: {}", enabled))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> crate::Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(crate::Error::Config("service_name is empty".to_string()));
        }

        tracing_subscriber::EnvFilter::try_new(&self.telemetry.log_filter).map_err(|e| {
            crate::Error::Config(format!(
                "Invalid log filter '{}': {}",
                self.telemetry.log_filter, e
            ))
        })?;

        Ok(())
    }
}
