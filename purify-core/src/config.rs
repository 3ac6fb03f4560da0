use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::PurifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    // Always run `max_rounds` rounds.
    FixedRounds,
    // Also stop after the first round that rejects nothing.
    FixedPoint,
}

impl Default for StopPolicy {
    fn default() -> Self {
        StopPolicy::FixedRounds
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    // Values with |z| at or above this are rejected in every round.
    pub threshold: f64,
    // Upper bound on rounds. Under `fixed_rounds` this is the exact count.
    pub max_rounds: usize,
    pub stop_policy: StopPolicy,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            threshold: 3.0,
            max_rounds: 4,
            stop_policy: StopPolicy::FixedRounds,
        }
    }
}

pub fn assertion(cond: bool, err_msg: &str) -> Result<(), String> {
    if cond {
        Ok(())
    } else {
        Err(err_msg.to_string())
    }
}

impl RefinementConfig {
    pub fn validate(&self) -> Result<(), String> {
        assertion(self.threshold.is_finite(), "threshold must be finite")?;
        assertion(self.threshold > 0.0, "threshold must be greater than 0")?;
        assertion(self.max_rounds > 0, "max_rounds must be greater than 0")?;
        Ok(())
    }

    pub fn from_yaml(s: &str) -> Result<Self, PurifyError> {
        let config: RefinementConfig = parse_yaml(s)?;
        config
            .validate()
            .map_err(|e| PurifyError::InvalidConfig(format!("refinement: {}", e)))?;
        Ok(config)
    }
}

pub fn parse_yaml<T: DeserializeOwned>(s: &str) -> Result<T, PurifyError> {
    serde_yaml::from_str(s)
        .map_err(|e| PurifyError::InvalidConfig(format!("error parsing config: {}", e)))
}

pub fn from_yaml_reader<T: DeserializeOwned, R: Read>(reader: R) -> Result<T, PurifyError> {
    serde_yaml::from_reader(reader)
        .map_err(|e| PurifyError::InvalidConfig(format!("error parsing config: {}", e)))
}
