//! Calculator parameters
//!
//! Four parameter groups describe one scenario: the digestate composition, the
//! agronomic spreading limits, the co-digestion mixture and the fish farm's
//! feed and sludge conversion. Each group provides defaults matching a typical
//! recirculating aquaculture system (RAS) feeding a co-digester inside a
//! nitrate vulnerable zone.
//!
//! Parameters are plain values. Editing a field produces a new
//! [`ParameterSnapshot`] rather than mutating the one a reader might hold.

use crate::errors::{SludgeError, SludgeResult};
use crate::numeric::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Composition of the digestate that is spread on land.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestateParams {
    /// Total solids of the digestate
    /// unit: % by mass
    /// default: 3.4
    pub ts_percent: FloatValue,

    /// Total nitrogen expressed as a share of the total solids
    /// unit: % of TS
    /// default: 4.1
    pub n_tot_percent_ts: FloatValue,
}

impl Default for DigestateParams {
    fn default() -> Self {
        Self {
            ts_percent: 3.4,
            n_tot_percent_ts: 4.1,
        }
    }
}

/// Regulatory and practical limits on spreading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgronomicParams {
    /// Maximum nitrogen that may be applied per hectare and year.
    ///
    /// The default is the nitrate vulnerable zone ceiling.
    ///
    /// unit: kg N / ha / yr
    /// default: 170.0
    pub max_nitrogen_load: FloatValue,

    /// Digestate applied in a single spreading event
    /// unit: t / ha
    /// default: 40.0
    pub single_intervention_load: FloatValue,
}

impl Default for AgronomicParams {
    fn default() -> Self {
        Self {
            max_nitrogen_load: 170.0,
            single_intervention_load: 40.0,
        }
    }
}

/// Co-digestion mixture of fish sludge and inoculum.
///
/// The sludge volatile solids follow the total solids (see
/// [`crate::derived`]) but can still be overridden on their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixtureParams {
    /// Inoculum to substrate ratio on a volatile solids basis
    /// unit: dimensionless
    /// default: 10.0
    pub r_ratio: FloatValue,

    /// Total solids of the inoculum. Carried for completeness, no formula uses it.
    /// unit: %
    /// default: 5.5
    pub ts_inoculum: FloatValue,

    /// Volatile solids of the inoculum
    /// unit: %
    /// default: 4.1
    pub vs_inoculum: FloatValue,

    /// Total solids of the fish sludge
    /// unit: %
    /// default: 1.2
    pub ts_sludge: FloatValue,

    /// Volatile solids of the fish sludge
    /// unit: %
    /// default: 0.9
    pub vs_sludge: FloatValue,
}

impl Default for MixtureParams {
    fn default() -> Self {
        Self {
            r_ratio: 10.0,
            ts_inoculum: 5.5,
            vs_inoculum: 4.1,
            ts_sludge: 1.2,
            vs_sludge: 0.9,
        }
    }
}

/// Conversion between feed, sludge and fish biomass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomassParams {
    /// Sludge total solids produced per unit of feed (P)
    /// unit: kg TS / kg feed
    /// default: 0.12
    pub sludge_production_rate: FloatValue,

    /// Feed conversion ratio
    /// unit: kg feed / kg biomass
    /// default: 1.1
    pub fcr: FloatValue,
}

impl Default for BiomassParams {
    fn default() -> Self {
        Self {
            sludge_production_rate: 0.12,
            fcr: 1.1,
        }
    }
}

/// Default fish biomass used by the land calculator
/// unit: kg
pub const DEFAULT_TARGET_BIOMASS: FloatValue = 5000.0;

/// All parameter groups at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSnapshot {
    pub digestate: DigestateParams,
    pub agronomic: AgronomicParams,
    pub mixture: MixtureParams,
    pub biomass: BiomassParams,
}

impl ParameterSnapshot {
    pub fn new(
        digestate: DigestateParams,
        agronomic: AgronomicParams,
        mixture: MixtureParams,
        biomass: BiomassParams,
    ) -> Self {
        Self {
            digestate,
            agronomic,
            mixture,
            biomass,
        }
    }

    /// Current value of a snapshot field.
    ///
    /// Returns `None` for [`Field::TargetBiomass`], which is not part of a snapshot.
    pub fn get(&self, field: Field) -> Option<FloatValue> {
        let value = match field {
            Field::TsPercent => self.digestate.ts_percent,
            Field::NTotPercentTs => self.digestate.n_tot_percent_ts,
            Field::MaxNitrogenLoad => self.agronomic.max_nitrogen_load,
            Field::SingleInterventionLoad => self.agronomic.single_intervention_load,
            Field::RRatio => self.mixture.r_ratio,
            Field::TsInoculum => self.mixture.ts_inoculum,
            Field::VsInoculum => self.mixture.vs_inoculum,
            Field::TsSludge => self.mixture.ts_sludge,
            Field::VsSludge => self.mixture.vs_sludge,
            Field::SludgeProductionRate => self.biomass.sludge_production_rate,
            Field::Fcr => self.biomass.fcr,
            Field::TargetBiomass => return None,
        };
        Some(value)
    }

    /// Copy of this snapshot with a single field replaced.
    ///
    /// No derivation is applied here. [`Field::TargetBiomass`] leaves the
    /// snapshot unchanged.
    pub fn with_field(&self, field: Field, value: FloatValue) -> Self {
        let mut next = *self;
        match field {
            Field::TsPercent => next.digestate.ts_percent = value,
            Field::NTotPercentTs => next.digestate.n_tot_percent_ts = value,
            Field::MaxNitrogenLoad => next.agronomic.max_nitrogen_load = value,
            Field::SingleInterventionLoad => next.agronomic.single_intervention_load = value,
            Field::RRatio => next.mixture.r_ratio = value,
            Field::TsInoculum => next.mixture.ts_inoculum = value,
            Field::VsInoculum => next.mixture.vs_inoculum = value,
            Field::TsSludge => next.mixture.ts_sludge = value,
            Field::VsSludge => next.mixture.vs_sludge = value,
            Field::SludgeProductionRate => next.biomass.sludge_production_rate = value,
            Field::Fcr => next.biomass.fcr = value,
            Field::TargetBiomass => {}
        }
        next
    }
}

/// The groups an editable field can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterGroup {
    Digestate,
    Agronomic,
    Mixture,
    Biomass,
    /// Scenario level inputs that are not part of a snapshot (target biomass)
    Scenario,
}

impl ParameterGroup {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterGroup::Digestate => "digestate",
            ParameterGroup::Agronomic => "agronomic",
            ParameterGroup::Mixture => "mixture",
            ParameterGroup::Biomass => "biomass",
            ParameterGroup::Scenario => "scenario",
        }
    }
}

impl fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ParameterGroup {
    type Err = SludgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "digestate" => Ok(ParameterGroup::Digestate),
            "agronomic" => Ok(ParameterGroup::Agronomic),
            "mixture" => Ok(ParameterGroup::Mixture),
            "biomass" => Ok(ParameterGroup::Biomass),
            "scenario" => Ok(ParameterGroup::Scenario),
            _ => Err(SludgeError::UnknownGroup(s.to_string())),
        }
    }
}

/// Every field an external input handler can edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TsPercent,
    NTotPercentTs,
    MaxNitrogenLoad,
    SingleInterventionLoad,
    RRatio,
    TsInoculum,
    VsInoculum,
    TsSludge,
    VsSludge,
    SludgeProductionRate,
    Fcr,
    TargetBiomass,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::TsPercent,
        Field::NTotPercentTs,
        Field::MaxNitrogenLoad,
        Field::SingleInterventionLoad,
        Field::RRatio,
        Field::TsInoculum,
        Field::VsInoculum,
        Field::TsSludge,
        Field::VsSludge,
        Field::SludgeProductionRate,
        Field::Fcr,
        Field::TargetBiomass,
    ];

    pub fn group(&self) -> ParameterGroup {
        match self {
            Field::TsPercent | Field::NTotPercentTs => ParameterGroup::Digestate,
            Field::MaxNitrogenLoad | Field::SingleInterventionLoad => ParameterGroup::Agronomic,
            Field::RRatio
            | Field::TsInoculum
            | Field::VsInoculum
            | Field::TsSludge
            | Field::VsSludge => ParameterGroup::Mixture,
            Field::SludgeProductionRate | Field::Fcr => ParameterGroup::Biomass,
            Field::TargetBiomass => ParameterGroup::Scenario,
        }
    }

    /// Name used by input forms
    pub fn camel_name(&self) -> &'static str {
        match self {
            Field::TsPercent => "tsPercent",
            Field::NTotPercentTs => "nTotPercentTS",
            Field::MaxNitrogenLoad => "maxNitrogenLoad",
            Field::SingleInterventionLoad => "singleInterventionLoad",
            Field::RRatio => "rRatio",
            Field::TsInoculum => "tsInoculum",
            Field::VsInoculum => "vsInoculum",
            Field::TsSludge => "tsSludge",
            Field::VsSludge => "vsSludge",
            Field::SludgeProductionRate => "sludgeProductionRate",
            Field::Fcr => "fcr",
            Field::TargetBiomass => "targetBiomass",
        }
    }

    /// Name used in configuration files and serialized parameters
    pub fn snake_name(&self) -> &'static str {
        match self {
            Field::TsPercent => "ts_percent",
            Field::NTotPercentTs => "n_tot_percent_ts",
            Field::MaxNitrogenLoad => "max_nitrogen_load",
            Field::SingleInterventionLoad => "single_intervention_load",
            Field::RRatio => "r_ratio",
            Field::TsInoculum => "ts_inoculum",
            Field::VsInoculum => "vs_inoculum",
            Field::TsSludge => "ts_sludge",
            Field::VsSludge => "vs_sludge",
            Field::SludgeProductionRate => "sludge_production_rate",
            Field::Fcr => "fcr",
            Field::TargetBiomass => "target_biomass",
        }
    }

    /// Find a field of `group` by either its camelCase or snake_case name.
    pub fn lookup(group: ParameterGroup, name: &str) -> SludgeResult<Field> {
        let name = name.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|field| {
                field.group() == group && (field.camel_name() == name || field.snake_name() == name)
            })
            .ok_or_else(|| SludgeError::UnknownField {
                group: group.to_string(),
                field: name.to_string(),
            })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.camel_name())
    }
}
