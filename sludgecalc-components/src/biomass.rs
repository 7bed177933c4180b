//! Sustainable biomass calculator
//!
//! Works back from the nitrogen cap on one hectare to the fish biomass whose
//! sludge, once co-digested and spread, stays within that cap.
//!
//! # What This Component Does
//!
//! 1. Converts the digestate total solids and nitrogen content to g/L
//! 2. Finds the digestate tonnage whose nitrogen equals the per-hectare cap
//! 3. Counts the spreading events needed at the per-event load
//! 4. Splits the digestate into sludge and inoculum using the mixing ratio
//! 5. Converts the sludge mass to sludge total solids, then to feed, then to fish
//!
//! # Outputs
//!
//! - `total_biomass` (kg/ha/yr) - fish biomass one hectare can absorb
//! - intermediate concentrations and masses, see [`CalculationResults`]
//!
//! Every quotient is guarded: a zero or negative denominator makes the
//! dependent output 0 instead of `NaN` or infinity.

use crate::mixture::mixing_factor;
use log::debug;
use serde::{Deserialize, Serialize};
use sludgecalc_core::calculator::{CalculatorMode, MassBalance};
use sludgecalc_core::numeric::{guarded_div, FloatValue};
use sludgecalc_core::parameters::{
    AgronomicParams, BiomassParams, DigestateParams, MixtureParams, ParameterSnapshot,
};

/// Results of the biomass calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    /// Digestate total solids
    /// unit: g/L
    pub ts_gl: FloatValue,
    /// Digestate total nitrogen
    /// unit: g/L
    pub n_tot_gl: FloatValue,
    /// Digestate that can be spread on one hectare per year
    /// unit: t/ha/yr
    pub mt_tons: FloatValue,
    /// Spreading events needed to apply `mt_tons`
    pub min_interventions: FloatValue,
    /// unit: kg/ha/yr
    pub mt_kg: FloatValue,
    /// Share of the digestate that comes from sludge
    /// unit: kg/ha/yr
    pub ms_kg: FloatValue,
    /// Share of the digestate that comes from inoculum
    /// unit: kg/ha/yr
    pub mi_kg: FloatValue,
    /// Sludge total solids in `ms_kg`
    /// unit: kg TS/ha/yr
    pub total_ts_sludge: FloatValue,
    /// Fish biomass whose sludge fills the nitrogen cap
    /// unit: kg/ha/yr
    pub total_biomass: FloatValue,
}

/// Sustainable fish biomass per hectare under a nitrogen cap.
///
/// $$B = \frac{M_s \cdot TS_s / 100}{P \cdot FCR}, \quad
///   M_s = \frac{1000 \cdot N_{max} / N_{tot}}{1 + R \cdot VS_s / VS_i}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadingBiomass;

impl SpreadingBiomass {
    pub fn new() -> Self {
        Self
    }
}

impl MassBalance for SpreadingBiomass {
    type Results = CalculationResults;

    fn mode(&self) -> CalculatorMode {
        CalculatorMode::Biomass
    }

    fn calculate(&self, snapshot: &ParameterSnapshot) -> CalculationResults {
        let ParameterSnapshot {
            digestate,
            agronomic,
            mixture,
            biomass,
        } = snapshot;

        // Percent by mass to g/L, taking the digestate density as 1 kg/L
        let ts_gl = digestate.ts_percent * 10.0;
        let n_tot_gl = ts_gl * digestate.n_tot_percent_ts / 100.0;

        // g/L is kg/t, so kg N/ha over kg N/t gives t/ha
        let mt_tons = guarded_div(agronomic.max_nitrogen_load, n_tot_gl);
        let min_interventions = guarded_div(mt_tons, agronomic.single_intervention_load);

        let mt_kg = mt_tons * 1000.0;
        let ms_kg = mixing_factor(mixture)
            .map(|factor| guarded_div(mt_kg, factor))
            .unwrap_or(0.0);
        let mi_kg = mt_kg - ms_kg;

        let total_ts_sludge = ms_kg * mixture.ts_sludge / 100.0;
        // Sludge solids -> feed -> fish
        let feed = guarded_div(total_ts_sludge, biomass.sludge_production_rate);
        let total_biomass = guarded_div(feed, biomass.fcr);

        debug!(
            "Biomass balance: mt={:.3} t/ha, ms={:.1} kg, biomass={:.1} kg/ha/yr",
            mt_tons, ms_kg, total_biomass
        );

        CalculationResults {
            ts_gl,
            n_tot_gl,
            mt_tons,
            min_interventions,
            mt_kg,
            ms_kg,
            mi_kg,
            total_ts_sludge,
            total_biomass,
        }
    }

    fn headline(&self, results: &CalculationResults) -> FloatValue {
        results.total_biomass
    }

    fn headline_decimals(&self) -> u32 {
        0
    }
}

/// Sustainable fish biomass for one set of parameter groups.
pub fn compute_biomass(
    digestate: DigestateParams,
    agronomic: AgronomicParams,
    mixture: MixtureParams,
    biomass: BiomassParams,
) -> CalculationResults {
    SpreadingBiomass.calculate(&ParameterSnapshot::new(
        digestate, agronomic, mixture, biomass,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sludgecalc_core::parameters::Field;
    use sludgecalc_core::sweep::{sweep_default, SweepVariable};

    fn calculate(snapshot: &ParameterSnapshot) -> CalculationResults {
        SpreadingBiomass::new().calculate(snapshot)
    }

    #[test]
    fn test_default_scenario() {
        let results = calculate(&ParameterSnapshot::default());

        assert_relative_eq!(results.ts_gl, 34.0, max_relative = 1e-12);
        assert_relative_eq!(results.n_tot_gl, 1.394, max_relative = 1e-12);
        assert_relative_eq!(results.mt_tons, 170.0 / 1.394, max_relative = 1e-12);
        assert_relative_eq!(
            results.min_interventions,
            170.0 / 1.394 / 40.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(results.ms_kg, 38167.94, max_relative = 1e-6);
        assert_relative_eq!(results.mi_kg, results.mt_kg - results.ms_kg);
        assert_relative_eq!(results.total_ts_sludge, 458.015, max_relative = 1e-5);
        assert_relative_eq!(results.total_biomass, 3469.81, max_relative = 1e-5);
    }

    #[test]
    fn test_free_function_matches_calculator() {
        let snapshot = ParameterSnapshot::default();
        let results = compute_biomass(
            snapshot.digestate,
            snapshot.agronomic,
            snapshot.mixture,
            snapshot.biomass,
        );
        assert_eq!(results, calculate(&snapshot));
    }

    #[test]
    fn test_zero_biomass_params() {
        let snapshot = ParameterSnapshot {
            biomass: BiomassParams {
                sludge_production_rate: 0.0,
                fcr: 0.0,
            },
            ..ParameterSnapshot::default()
        };
        let results = calculate(&snapshot);
        assert_eq!(results.total_biomass, 0.0);
        // Upstream values are unaffected
        assert!(results.ms_kg > 0.0);
    }

    #[test]
    fn test_zero_divisors_give_zero() {
        let cases = [
            (Field::NTotPercentTs, "mt_tons"),
            (Field::TsPercent, "mt_tons"),
            (Field::SingleInterventionLoad, "min_interventions"),
            (Field::VsInoculum, "ms_kg"),
            (Field::SludgeProductionRate, "total_biomass"),
            (Field::Fcr, "total_biomass"),
            (Field::MaxNitrogenLoad, "total_biomass"),
            (Field::TsSludge, "total_biomass"),
        ];
        for (field, output) in cases {
            let snapshot = ParameterSnapshot::default().with_field(field, 0.0);
            let results = calculate(&snapshot);
            let value = match output {
                "mt_tons" => results.mt_tons,
                "min_interventions" => results.min_interventions,
                "ms_kg" => results.ms_kg,
                _ => results.total_biomass,
            };
            assert_eq!(value, 0.0, "{} = 0 should give {} = 0", field, output);
            assert!(
                results.total_biomass.is_finite(),
                "{} = 0 should keep the biomass finite",
                field
            );
        }
    }

    #[test]
    fn test_negative_divisors_give_zero() {
        let snapshot = ParameterSnapshot::default().with_field(Field::Fcr, -1.1);
        assert_eq!(calculate(&snapshot).total_biomass, 0.0);
    }

    #[test]
    fn test_inoculum_takes_the_remainder() {
        let snapshot = ParameterSnapshot::default().with_field(Field::VsInoculum, 0.0);
        let results = calculate(&snapshot);
        assert_eq!(results.ms_kg, 0.0);
        assert_eq!(results.mi_kg, results.mt_kg);
    }

    #[test]
    fn test_r_sweep_matches_full_calculation() {
        let snapshot = ParameterSnapshot::default();
        let calculator = SpreadingBiomass::new();
        let points: Vec<_> = sweep_default(&calculator, &snapshot, SweepVariable::RRatio)
            .unwrap()
            .collect();

        assert_eq!(points.len(), 20);
        assert_eq!(points[0].x, 1.0);
        assert_eq!(points[0].y, 9091.0);
        assert_eq!(points[9].x, 10.0);
        assert_eq!(points[9].y, 3470.0);
        assert_eq!(points[19].y, 2057.0);
    }

    #[test]
    fn test_fcr_sweep_decreases() {
        let snapshot = ParameterSnapshot::default();
        let points: Vec<_> = sweep_default(&SpreadingBiomass, &snapshot, SweepVariable::Fcr)
            .unwrap()
            .collect();

        assert_eq!(points.len(), 10);
        for pair in points.windows(2) {
            assert!(
                pair[1].y < pair[0].y,
                "Biomass should fall as FCR rises: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_ts_sweep_samples() {
        let snapshot = ParameterSnapshot::default();
        let points: Vec<_> = sweep_default(&SpreadingBiomass, &snapshot, SweepVariable::TsSludge)
            .unwrap()
            .collect();

        assert_eq!(points.len(), 17);
        let at_default = points
            .iter()
            .find(|point| point.x == 1.2)
            .expect("1.2 is a sample of the default range");
        // vs_sludge follows ts_sludge at 0.75, which is 0.9 at the default
        assert_eq!(at_default.y, 3470.0);
    }

    #[test]
    fn test_target_biomass_not_sweepable() {
        let snapshot = ParameterSnapshot::default();
        assert!(sweep_default(&SpreadingBiomass, &snapshot, SweepVariable::TargetBiomass).is_err());
    }

    #[test]
    fn test_results_serialise_to_json() {
        let results = SpreadingBiomass.calculate(&ParameterSnapshot::default());
        let json = serde_json::to_value(results).unwrap();
        assert_eq!(json["total_biomass"], serde_json::json!(results.total_biomass));

        let restored: CalculationResults = serde_json::from_value(json).unwrap();
        assert_eq!(restored, results);
    }
}
