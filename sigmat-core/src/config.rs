//! Serializable signal configuration.
//!
//! This is an optional convenience layer. Every operation takes its options
//! as plain arguments and never reads a `SignalConfig`; the bundle only exists
//! to store and fingerprint an option set. It groups the options of
//! the ranking, random placement and stop operations so a whole signal recipe
//! can live in one TOML file:
//!
//! ```toml
//! stops = [0.05, 0.1]
//!
//! [rank]
//! after_false = true
//!
//! [random]
//! n_range = [1, 2, 3]
//! min_space = 2
//!
//! [stop_loss]
//! trailing = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignalError};
use crate::random::RandomSpec;
use crate::rank::RankOptions;
use crate::stack::ConfigStack;
use crate::stop::{StopLossOptions, TakeProfitOptions};

/// Content hash of a configuration.
pub type ConfigId = String;

/// The serializable part of `RankOptions`. Reset matrices are runtime data
/// and are attached with `RankOptions::reset_by`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankSettings {
    pub after_false: bool,
    pub allow_gaps: bool,
}

impl RankSettings {
    pub fn options<'a>(&self) -> RankOptions<'a> {
        RankOptions::new()
            .after_false(self.after_false)
            .allow_gaps(self.allow_gaps)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Stop distances, one configuration each.
    pub stops: Vec<f64>,
    pub rank: RankSettings,
    pub random: Option<RandomSpec>,
    pub stop_loss: Option<StopLossOptions>,
    pub take_profit: Option<TakeProfitOptions>,
}

impl SignalConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SignalError::InvalidConfig(format!("parse signal TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| SignalError::InvalidConfig(format!("serialize signal TOML: {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(random) = &self.random {
            random
                .validate()
                .map_err(|e| SignalError::InvalidConfig(e.to_string()))?;
        }
        if let Some(bad) = self.stops.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(SignalError::InvalidConfig(format!(
                "stop distances must be finite and non-negative, got {bad}"
            )));
        }
        let needs_stops = self.stop_loss.is_some() || self.take_profit.is_some();
        if needs_stops && self.stops.is_empty() {
            return Err(SignalError::InvalidConfig(
                "stop exits configured without any stop distances".into(),
            ));
        }
        Ok(())
    }

    /// One scalar configuration per stop distance.
    pub fn stop_stack(&self) -> Result<ConfigStack> {
        ConfigStack::from_scalars(&self.stops)
    }

    /// BLAKE3 hex digest of the JSON form. Equal configurations share an id.
    pub fn fingerprint(&self) -> Result<ConfigId> {
        let json = serde_json::to_string(self)
            .map_err(|e| SignalError::InvalidConfig(format!("serialize signal config: {e}")))?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
