//! Mutable parameter store owned by the presentation layer.
//!
//! The store is the only writer. Each edit replaces the held snapshot with a
//! new one, so a snapshot handed out earlier never changes underneath its
//! reader. Calculators are re-run from [`ParameterStore::snapshot`] after every
//! edit.

use crate::calculator::MassBalance;
use crate::config::Scenario;
use crate::derived::apply_derivations;
use crate::errors::SludgeResult;
use crate::numeric::{parse_lenient, FloatValue};
use crate::parameters::{Field, ParameterGroup, ParameterSnapshot, DEFAULT_TARGET_BIOMASS};
use crate::sweep::{sweep_default, Sweep, SweepVariable};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    snapshot: ParameterSnapshot,
    target_biomass: FloatValue,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParameterSnapshot::default(), DEFAULT_TARGET_BIOMASS)
    }
}

impl ParameterStore {
    pub fn new(snapshot: ParameterSnapshot, target_biomass: FloatValue) -> Self {
        Self {
            snapshot,
            target_biomass,
        }
    }

    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self::new(scenario.parameters, scenario.target_biomass)
    }

    /// The current snapshot
    pub fn snapshot(&self) -> &ParameterSnapshot {
        &self.snapshot
    }

    /// Fish biomass used by the land calculator
    /// unit: kg
    pub fn target_biomass(&self) -> FloatValue {
        self.target_biomass
    }

    /// Current value of any editable field
    pub fn get(&self, field: Field) -> FloatValue {
        self.snapshot.get(field).unwrap_or(self.target_biomass)
    }

    /// Handle an edit coming from an input field.
    ///
    /// `raw` is read leniently (non numeric text becomes 0). Only an unknown
    /// field name is an error.
    pub fn on_field_change(
        &mut self,
        group: ParameterGroup,
        field_name: &str,
        raw: &str,
    ) -> SludgeResult<()> {
        let field = Field::lookup(group, field_name)?;
        self.set(field, parse_lenient(raw));
        Ok(())
    }

    /// Replace a field with an already parsed value and apply any derivation.
    pub fn set(&mut self, field: Field, value: FloatValue) {
        debug!("Setting {}.{} = {}", field.group(), field, value);
        match field {
            Field::TargetBiomass => self.target_biomass = value,
            _ => {
                let edited = self.snapshot.with_field(field, value);
                self.snapshot = apply_derivations(field, edited);
            }
        }
    }

    /// Evaluate `calculator` against the current snapshot
    pub fn evaluate<M: MassBalance>(&self, calculator: &M) -> M::Results {
        calculator.calculate(&self.snapshot)
    }

    /// Sweep `variable` over its default range from the current snapshot
    pub fn sweep<'a, M: MassBalance>(
        &self,
        calculator: &'a M,
        variable: SweepVariable,
    ) -> SludgeResult<Sweep<'a, M>> {
        sweep_default(calculator, &self.snapshot, variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SludgeError;

    #[test]
    fn test_edit_replaces_field() {
        let mut store = ParameterStore::default();
        store
            .on_field_change(ParameterGroup::Biomass, "fcr", "1.3")
            .unwrap();
        assert_eq!(store.snapshot().biomass.fcr, 1.3);
    }

    #[test]
    fn test_non_numeric_text_becomes_zero() {
        let mut store = ParameterStore::default();
        store
            .on_field_change(ParameterGroup::Digestate, "tsPercent", "abc")
            .unwrap();
        assert_eq!(store.snapshot().digestate.ts_percent, 0.0);
    }

    #[test]
    fn test_ts_sludge_edit_derives_vs_sludge() {
        let mut store = ParameterStore::default();
        store
            .on_field_change(ParameterGroup::Mixture, "tsSludge", "2.2")
            .unwrap();
        assert_eq!(store.snapshot().mixture.ts_sludge, 2.2);
        assert_eq!(store.snapshot().mixture.vs_sludge, 1.65);
    }

    #[test]
    fn test_vs_sludge_can_be_overridden() {
        let mut store = ParameterStore::default();
        store
            .on_field_change(ParameterGroup::Mixture, "tsSludge", "2.0")
            .unwrap();
        store
            .on_field_change(ParameterGroup::Mixture, "vsSludge", "1.1")
            .unwrap();
        assert_eq!(store.snapshot().mixture.vs_sludge, 1.1);
        assert_eq!(store.snapshot().mixture.ts_sludge, 2.0);
    }

    #[test]
    fn test_earlier_snapshot_is_not_mutated() {
        let mut store = ParameterStore::default();
        let before = *store.snapshot();
        store.set(Field::RRatio, 4.0);
        assert_eq!(before.mixture.r_ratio, 10.0);
        assert_eq!(store.snapshot().mixture.r_ratio, 4.0);
    }

    #[test]
    fn test_target_biomass_edit() {
        let mut store = ParameterStore::default();
        assert_eq!(store.target_biomass(), 5000.0);
        store
            .on_field_change(ParameterGroup::Scenario, "targetBiomass", "12000")
            .unwrap();
        assert_eq!(store.target_biomass(), 12000.0);
        assert_eq!(store.get(Field::TargetBiomass), 12000.0);
        assert_eq!(*store.snapshot(), ParameterSnapshot::default());
    }

    #[test]
    fn test_unknown_field_leaves_store_unchanged() {
        let mut store = ParameterStore::default();
        let result = store.on_field_change(ParameterGroup::Agronomic, "tsSludge", "3");
        assert!(matches!(result, Err(SludgeError::UnknownField { .. })));
        assert_eq!(store, ParameterStore::default());
    }
}
