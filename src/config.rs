//! Configuration management for ieee80211-elems

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::wmm::{hostapd_config_wmm_ac, WmmAcParams};
use crate::{ElemsError, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElemsConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Element parser settings
    #[serde(default)]
    pub parser: ParserConfig,
    /// Regulatory settings
    #[serde(default)]
    pub regulatory: RegulatoryConfig,
    /// WMM access category overrides, keyed `wmm_ac_<ac>_<field>`
    #[serde(default)]
    pub wmm: BTreeMap<String, toml::Value>,
}

/// General configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Element parser settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Report malformed and unrecognized elements
    pub show_errors: bool,
}

/// Regulatory settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryConfig {
    /// Default country code for channel lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { show_errors: true }
    }
}

impl ElemsConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ElemsError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ElemsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check field values
    pub fn validate(&self) -> Result<()> {
        let level = self.general.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ElemsError::Config(format!(
                "Unknown log level '{}'",
                self.general.log_level
            )));
        }

        if let Some(country) = &self.regulatory.country {
            if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_alphabetic()) {
                return Err(ElemsError::Config(format!(
                    "Country code must be two letters, got '{}'",
                    country
                )));
            }
        }

        self.wmm_params().map(|_| ())
    }

    /// Default country, if configured
    pub fn country(&self) -> Option<&str> {
        self.regulatory.country.as_deref()
    }

    /// Build the per-AC parameter table from the `[wmm]` section.
    pub fn wmm_params(&self) -> Result<[WmmAcParams; 4]> {
        let mut params = [WmmAcParams::default(); 4];
        for (name, value) in &self.wmm {
            let val = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            hostapd_config_wmm_ac(&mut params, name, &val)?;
        }
        Ok(params)
    }
}
