//! Derived fields
//!
//! The sludge volatile solids are not measured separately in most farms.
//! Whenever the sludge total solids are edited, the volatile solids are
//! re-derived as a fixed share of them. The derivation is one way: editing the
//! volatile solids never changes the total solids.

use crate::numeric::{round_to, FloatValue};
use crate::parameters::{Field, ParameterSnapshot};
use log::debug;

/// Share of the sludge total solids that is volatile
pub const VS_TO_TS_RATIO: FloatValue = 0.75;

/// Volatile solids implied by a sludge total solids value, rounded to 2 decimals
pub fn vs_sludge_from_ts(ts_sludge: FloatValue) -> FloatValue {
    round_to(ts_sludge * VS_TO_TS_RATIO, 2)
}

/// Apply any derivation triggered by an edit of `field`.
///
/// `snapshot` must already hold the edited value.
pub fn apply_derivations(field: Field, snapshot: ParameterSnapshot) -> ParameterSnapshot {
    match field {
        Field::TsSludge => {
            let vs_sludge = vs_sludge_from_ts(snapshot.mixture.ts_sludge);
            debug!(
                "Derived vs_sludge={} from ts_sludge={}",
                vs_sludge, snapshot.mixture.ts_sludge
            );
            snapshot.with_field(Field::VsSludge, vs_sludge)
        }
        _ => snapshot,
    }
}
