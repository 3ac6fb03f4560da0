use std::io::Read;

use serde::{Deserialize, Serialize};

use purify_core::config::assertion;
use purify_core::{PurifyError, RefinementConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub inlier_mean: f64,
    // Scale applied to standard normal draws for both populations.
    pub spread: f64,
    // Share of `samples` drawn from the outlier population.
    pub outlier_fraction: f64,
    pub outlier_mean: f64,
    // Fixed seed for reproducible runs. Unset draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 1000,
            inlier_mean: 0.0,
            spread: 1.0,
            outlier_fraction: 0.1,
            outlier_mean: 10.0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), String> {
        assertion(self.samples > 0, "samples must be greater than 0")?;
        assertion(self.spread.is_finite(), "spread must be finite")?;
        assertion(self.spread >= 0.0, "spread must be greater or equal to 0")?;
        assertion(
            self.outlier_fraction >= 0.0,
            "outlier_fraction must be greater or equal to 0",
        )?;
        assertion(
            self.outlier_fraction <= 1.0,
            "outlier_fraction must be less or equal to 1",
        )?;
        assertion(self.inlier_mean.is_finite(), "inlier_mean must be finite")?;
        assertion(self.outlier_mean.is_finite(), "outlier_mean must be finite")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub generator: GeneratorConfig,
    pub refinement: RefinementConfig,
    pub histogram_bins: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            refinement: RefinementConfig::default(),
            histogram_bins: 20,
        }
    }
}

impl RunConfig {
    fn validate(&self) -> Result<(), PurifyError> {
        self.generator
            .validate()
            .map_err(|e| invalid("generator", e))?;
        self.refinement
            .validate()
            .map_err(|e| invalid("refinement", e))?;
        assertion(self.histogram_bins > 0, "histogram_bins must be greater than 0")
            .map_err(|e| invalid("run", e))?;
        Ok(())
    }

    pub fn from_yaml(s: &str) -> Result<Self, PurifyError> {
        let config: RunConfig = match serde_yaml::from_str(s) {
            Ok(config) => Ok(config),
            Err(e) => Err(parse_error(e)),
        }?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_reader<R: Read>(reader: R) -> Result<Self, PurifyError> {
        let config: RunConfig = match serde_yaml::from_reader(reader) {
            Ok(config) => Ok(config),
            Err(e) => Err(parse_error(e)),
        }?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_error(e: serde_yaml::Error) -> PurifyError {
    PurifyError::InvalidConfig(format!("error parsing config: {}", e))
}

fn invalid(section: &str, msg: String) -> PurifyError {
    PurifyError::InvalidConfig(format!("error validating {} config: {}", section, msg))
}
