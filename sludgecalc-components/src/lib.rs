//! Nutrient mass balances for aquaculture sludge digestate
//!
//! Fish sludge from a recirculating aquaculture system is co-digested with an
//! inoculum and the digestate is spread on farmland. Nitrogen is the limiting
//! nutrient, so the regulatory nitrogen cap ties fish biomass to land area.
//!
//! Two calculators solve the same balance in opposite directions:
//! - [`SpreadingBiomass`]: fish biomass one hectare can absorb per year
//! - [`LandArea`]: hectares needed for a given fish biomass
//!
//! Both implement [`sludgecalc_core::calculator::MassBalance`], so they can be
//! swept with [`sludgecalc_core::sweep::sweep`].

mod area;
mod biomass;
mod mixture;

pub use area::{compute_area, AreaCalculationResults, LandArea};
pub use biomass::{compute_biomass, CalculationResults, SpreadingBiomass};
pub use mixture::mixing_factor;
