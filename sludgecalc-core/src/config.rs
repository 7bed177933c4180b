//! Scenario configuration
//!
//! A scenario is read from TOML. Every key is optional and falls back to the
//! defaults of its parameter group:
//!
//! ```toml
//! mode = "land"
//! target_biomass = 8000.0
//!
//! [mixture]
//! r_ratio = 8.0
//! ts_sludge = 1.6
//! vs_sludge = 1.2
//! ```
//!
//! Scenarios are only ever read. Nothing writes them back.

use crate::calculator::CalculatorMode;
use crate::errors::SludgeResult;
use crate::numeric::FloatValue;
use crate::parameters::{ParameterSnapshot, DEFAULT_TARGET_BIOMASS};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Calculator the scenario is meant for
    pub mode: CalculatorMode,

    /// Fish biomass for the land calculator
    /// unit: kg
    /// default: 5000.0
    pub target_biomass: FloatValue,

    #[serde(flatten)]
    pub parameters: ParameterSnapshot,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            mode: CalculatorMode::Biomass,
            target_biomass: DEFAULT_TARGET_BIOMASS,
            parameters: ParameterSnapshot::default(),
        }
    }
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> SludgeResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SludgeResult<Self> {
        let path = path.as_ref();
        debug!("Reading scenario from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SludgeError;
    use crate::parameters::{AgronomicParams, MixtureParams};

    #[test]
    fn test_empty_scenario_uses_defaults() {
        let scenario = Scenario::from_toml_str("").unwrap();
        assert_eq!(scenario, Scenario::default());
    }

    #[test]
    fn test_partial_scenario() {
        let scenario = Scenario::from_toml_str(
            r#"
mode = "land"
target_biomass = 8000.0

[mixture]
r_ratio = 8.0
ts_sludge = 1.6
"#,
        )
        .unwrap();

        assert_eq!(scenario.mode, CalculatorMode::Land);
        assert_eq!(scenario.target_biomass, 8000.0);
        assert_eq!(scenario.parameters.mixture.r_ratio, 8.0);
        assert_eq!(scenario.parameters.mixture.ts_sludge, 1.6);
        // Not derived when loaded: the file is taken as written
        assert_eq!(
            scenario.parameters.mixture.vs_sludge,
            MixtureParams::default().vs_sludge
        );
        assert_eq!(scenario.parameters.agronomic, AgronomicParams::default());
    }

    #[test]
    fn test_invalid_scenario() {
        let result = Scenario::from_toml_str("mode = \"ocean\"");
        assert!(matches!(result, Err(SludgeError::Config(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Scenario::from_path("/nonexistent/scenario.toml");
        assert!(matches!(result, Err(SludgeError::Io(_))));
    }

    #[test]
    fn test_serialised_scenario_reads_back() {
        let scenario = Scenario {
            mode: CalculatorMode::Land,
            target_biomass: 1234.0,
            parameters: ParameterSnapshot::default(),
        };
        let serialised = toml::to_string(&scenario).unwrap();
        assert_eq!(Scenario::from_toml_str(&serialised).unwrap(), scenario);
    }
}
