use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::currency::Currency;
use crate::error::{LendSeerError, Result};
use crate::marketplace::RiskLevel;

/// User preferences driving scoring and allocation. The engines receive a
/// value snapshot per invocation; the store below owns the live copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    /// Amount available to invest, in `currency`.
    pub budget: f64,
    /// Minimum acceptable annualized return, percent.
    pub min_return: f64,
    /// Highest acceptable risk level.
    pub max_risk: RiskLevel,
    pub currency: Currency,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            budget: 200.0,
            min_return: 8.0,
            max_risk: RiskLevel::B,
            currency: Currency::Pen,
        }
    }
}

impl UserConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.budget > 0.0 && self.budget.is_finite()) {
            return Err(LendSeerError::validation_error(format!(
                "budget must be a positive number, got {}",
                self.budget
            )));
        }
        if !(self.min_return >= 0.0 && self.min_return.is_finite()) {
            return Err(LendSeerError::validation_error(format!(
                "min_return must be non-negative, got {}",
                self.min_return
            )));
        }
        Ok(())
    }
}

/// File-backed preference store with environment-variable overrides.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences: file contents if present, defaults otherwise, then
    /// environment overrides on top.
    pub fn load(&self) -> Result<UserConfig> {
        let mut config = if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            serde_json::from_str(&content)
                .map_err(|e| LendSeerError::config_error(format!(
                    "could not parse {}: {}",
                    self.path.display(),
                    e
                )))?
        } else {
            info!("No config file at {}, using defaults", self.path.display());
            UserConfig::default()
        };

        apply_env_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, config: &UserConfig) -> Result<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json)?;

        info!("Saved configuration to {}", self.path.display());
        Ok(())
    }
}

fn apply_env_overrides(config: &mut UserConfig) {
    if let Ok(budget) = env::var("LENDSEER_BUDGET") {
        match budget.parse::<f64>() {
            Ok(value) => config.budget = value,
            Err(_) => warn!("Ignoring non-numeric LENDSEER_BUDGET: {}", budget),
        }
    }

    if let Ok(min_return) = env::var("LENDSEER_MIN_RETURN") {
        match min_return.parse::<f64>() {
            Ok(value) => config.min_return = value,
            Err(_) => warn!("Ignoring non-numeric LENDSEER_MIN_RETURN: {}", min_return),
        }
    }

    if let Ok(max_risk) = env::var("LENDSEER_MAX_RISK") {
        match max_risk.parse::<RiskLevel>() {
            Ok(value) => config.max_risk = value,
            Err(e) => warn!("Ignoring LENDSEER_MAX_RISK: {}", e),
        }
    }

    if let Ok(currency) = env::var("LENDSEER_CURRENCY") {
        match currency.parse::<Currency>() {
            Ok(value) => config.currency = value,
            Err(e) => warn!("Ignoring LENDSEER_CURRENCY: {}", e),
        }
    }
}
