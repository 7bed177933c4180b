//! The calculator abstraction
//!
//! Both calculators evaluate the same nutrient mass balance, in opposite
//! directions. Biomass mode starts from the nitrogen cap on one hectare and
//! works back to the fish biomass it can absorb. Land mode starts from a fish
//! biomass and works forward to the area needed to absorb its nitrogen.
//!
//! A calculator is a pure function of a [`ParameterSnapshot`]. The sensitivity
//! sampler in [`crate::sweep`] only relies on this trait, so one sampler
//! serves both modes.

use crate::errors::SludgeError;
use crate::numeric::FloatValue;
use crate::parameters::ParameterSnapshot;
use crate::sweep::SweepVariable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which direction the mass balance is solved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorMode {
    /// Sustainable fish biomass per hectare under the nitrogen cap
    Biomass,
    /// Land area required for a given fish biomass
    Land,
}

impl CalculatorMode {
    pub fn name(&self) -> &'static str {
        match self {
            CalculatorMode::Biomass => "biomass",
            CalculatorMode::Land => "land",
        }
    }
}

impl fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for CalculatorMode {
    type Err = SludgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biomass" | "spreading" => Ok(CalculatorMode::Biomass),
            "land" | "area" => Ok(CalculatorMode::Land),
            _ => Err(SludgeError::UnknownMode(s.to_string())),
        }
    }
}

/// A nutrient mass balance solved from a parameter snapshot.
pub trait MassBalance {
    /// Full set of intermediate and final values
    type Results: fmt::Debug + Clone + Serialize;

    fn mode(&self) -> CalculatorMode;

    /// Evaluate the mass balance.
    ///
    /// Never fails: a zero or negative denominator makes the dependent value 0.
    fn calculate(&self, snapshot: &ParameterSnapshot) -> Self::Results;

    /// The value a user is after (biomass or area)
    fn headline(&self, results: &Self::Results) -> FloatValue;

    /// Decimal places used when the headline value is displayed
    fn headline_decimals(&self) -> u32;

    /// Whether `variable` can be swept with this calculator
    fn supports(&self, variable: SweepVariable) -> bool {
        variable != SweepVariable::TargetBiomass
    }

    /// Headline value with `variable` set to `value` and everything else held fixed.
    fn evaluate_at(
        &self,
        snapshot: &ParameterSnapshot,
        variable: SweepVariable,
        value: FloatValue,
    ) -> FloatValue {
        let varied = variable.apply(snapshot, value);
        self.headline(&self.calculate(&varied))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "biomass".parse::<CalculatorMode>().unwrap(),
            CalculatorMode::Biomass
        );
        assert_eq!(
            "Spreading".parse::<CalculatorMode>().unwrap(),
            CalculatorMode::Biomass
        );
        assert_eq!(
            " area ".parse::<CalculatorMode>().unwrap(),
            CalculatorMode::Land
        );
        assert!(matches!(
            "ocean".parse::<CalculatorMode>(),
            Err(SludgeError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [CalculatorMode::Biomass, CalculatorMode::Land] {
            assert_eq!(mode.to_string().parse::<CalculatorMode>().unwrap(), mode);
        }
    }
}
