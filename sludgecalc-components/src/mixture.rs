//! Co-digestion mixing
//!
//! For an inoculum to substrate ratio `R` on a volatile solids basis, each kg
//! of sludge is digested with `R * VS_sludge / VS_inoculum` kg of inoculum.
//! The total digestate mass is therefore
//!
//! $$M_t = M_s \left(1 + R \frac{VS_s}{VS_i}\right)$$

use sludgecalc_core::numeric::FloatValue;
use sludgecalc_core::parameters::MixtureParams;

/// Ratio of total digestate mass to sludge mass.
///
/// `None` when the inoculum volatile solids are not positive. Callers then
/// report a zero mass rather than a mass computed without the inoculum.
pub fn mixing_factor(mixture: &MixtureParams) -> Option<FloatValue> {
    if mixture.vs_inoculum > 0.0 {
        Some(1.0 + mixture.r_ratio * mixture.vs_sludge / mixture.vs_inoculum)
    } else {
        None
    }
}
