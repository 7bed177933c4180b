//! Required land area calculator
//!
//! The inverse of [`crate::SpreadingBiomass`]: starting from a fish biomass,
//! follows its sludge through co-digestion to the nitrogen in the digestate
//! and the land needed to spread it within the nitrogen cap.
//!
//! # What This Component Does
//!
//! 1. Converts the digestate total solids and nitrogen content to g/L
//! 2. Converts fish biomass to feed, then to sludge total solids
//! 3. Converts sludge solids to wet sludge mass
//! 4. Adds the inoculum using the mixing ratio to get the digestate mass
//! 5. Computes the nitrogen in that digestate and divides by the cap
//!
//! Each step inverts the matching step of the biomass calculator, so spreading
//! the sustainable biomass of `h` hectares requires exactly `h` hectares.

use crate::mixture::mixing_factor;
use log::debug;
use serde::{Deserialize, Serialize};
use sludgecalc_core::calculator::{CalculatorMode, MassBalance};
use sludgecalc_core::numeric::{guarded_div, FloatValue};
use sludgecalc_core::parameters::{
    AgronomicParams, BiomassParams, DigestateParams, MixtureParams, ParameterSnapshot,
    DEFAULT_TARGET_BIOMASS,
};
use sludgecalc_core::store::ParameterStore;
use sludgecalc_core::sweep::SweepVariable;

/// Results of the land area calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaCalculationResults {
    /// Sludge total solids produced by the biomass
    /// unit: kg TS
    pub total_ts_sludge: FloatValue,
    /// Wet sludge mass
    /// unit: kg
    pub ms_kg: FloatValue,
    /// Digestate mass after co-digestion with the inoculum
    /// unit: kg
    pub mt_kg: FloatValue,
    /// Nitrogen contained in the digestate
    /// unit: kg N
    pub total_nitrogen_kg: FloatValue,
    /// Land needed to keep every hectare under the nitrogen cap
    /// unit: ha
    pub required_area_ha: FloatValue,
    /// Digestate total nitrogen
    /// unit: g/L
    pub n_tot_gl: FloatValue,
}

/// Land area needed to absorb the nitrogen of a fish biomass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandArea {
    /// Fish biomass
    /// unit: kg
    target_biomass: FloatValue,
}

impl Default for LandArea {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_BIOMASS)
    }
}

impl LandArea {
    pub fn new(target_biomass: FloatValue) -> Self {
        Self { target_biomass }
    }

    /// Calculator for the target biomass held by `store`
    pub fn from_store(store: &ParameterStore) -> Self {
        Self::new(store.target_biomass())
    }

    pub fn target_biomass(&self) -> FloatValue {
        self.target_biomass
    }
}

impl MassBalance for LandArea {
    type Results = AreaCalculationResults;

    fn mode(&self) -> CalculatorMode {
        CalculatorMode::Land
    }

    fn calculate(&self, snapshot: &ParameterSnapshot) -> AreaCalculationResults {
        let ParameterSnapshot {
            digestate,
            agronomic,
            mixture,
            biomass,
        } = snapshot;

        let ts_gl = digestate.ts_percent * 10.0;
        let n_tot_gl = ts_gl * digestate.n_tot_percent_ts / 100.0;

        // Fish -> feed -> sludge solids
        let total_ts_sludge =
            self.target_biomass * biomass.fcr * biomass.sludge_production_rate;
        let ms_kg = guarded_div(total_ts_sludge, mixture.ts_sludge / 100.0);
        let mt_kg = mixing_factor(mixture)
            .map(|factor| ms_kg * factor)
            .unwrap_or(0.0);

        // g/L is g/kg at a density of 1 kg/L
        let total_nitrogen_kg = mt_kg * n_tot_gl / 1000.0;
        let required_area_ha = guarded_div(total_nitrogen_kg, agronomic.max_nitrogen_load);

        debug!(
            "Land balance: biomass={} kg, mt={:.1} kg, N={:.2} kg, area={:.3} ha",
            self.target_biomass, mt_kg, total_nitrogen_kg, required_area_ha
        );

        AreaCalculationResults {
            total_ts_sludge,
            ms_kg,
            mt_kg,
            total_nitrogen_kg,
            required_area_ha,
            n_tot_gl,
        }
    }

    fn headline(&self, results: &AreaCalculationResults) -> FloatValue {
        results.required_area_ha
    }

    fn headline_decimals(&self) -> u32 {
        2
    }

    fn supports(&self, _variable: SweepVariable) -> bool {
        true
    }

    fn evaluate_at(
        &self,
        snapshot: &ParameterSnapshot,
        variable: SweepVariable,
        value: FloatValue,
    ) -> FloatValue {
        match variable {
            SweepVariable::TargetBiomass => {
                let calculator = LandArea::new(value);
                calculator.headline(&calculator.calculate(snapshot))
            }
            _ => {
                let varied = variable.apply(snapshot, value);
                self.headline(&self.calculate(&varied))
            }
        }
    }
}

/// Required land area for `target_biomass` kg of fish.
pub fn compute_area(
    target_biomass: FloatValue,
    digestate: DigestateParams,
    agronomic: AgronomicParams,
    mixture: MixtureParams,
    biomass: BiomassParams,
) -> AreaCalculationResults {
    LandArea::new(target_biomass).calculate(&ParameterSnapshot::new(
        digestate, agronomic, mixture, biomass,
    ))
}
