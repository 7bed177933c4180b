//! Sensitivity sweeps
//!
//! A sweep re-evaluates a calculator while one variable steps across a range
//! and every other parameter stays at its snapshot value. The result is a lazy
//! sequence of `(x, y)` points intended for charting.
//!
//! Sample positions are computed from their index (`start + i * step`) rather
//! than by repeatedly adding the step, so both ends of the range are always
//! included.

use crate::calculator::MassBalance;
use crate::derived::VS_TO_TS_RATIO;
use crate::errors::{SludgeError, SludgeResult};
use crate::numeric::{round_to, FloatValue};
use crate::parameters::{Field, ParameterSnapshot};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places kept on x to strip floating point noise from `start + i * step`
const X_DECIMALS: u32 = 10;

/// Tolerance used when counting how many steps fit in a range
const STEP_TOLERANCE: FloatValue = 1e-9;

/// Largest number of samples a single range may hold
pub const MAX_SAMPLES: usize = 100_000;

/// A parameter that can be swept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepVariable {
    /// Inoculum to substrate ratio
    RRatio,
    /// Sludge total solids. The sludge volatile solids follow at 75 %.
    TsSludge,
    /// Feed conversion ratio
    Fcr,
    /// Fish biomass, only meaningful in land mode
    TargetBiomass,
}

impl SweepVariable {
    pub fn name(&self) -> &'static str {
        match self {
            SweepVariable::RRatio => "r_ratio",
            SweepVariable::TsSludge => "ts_sludge",
            SweepVariable::Fcr => "fcr",
            SweepVariable::TargetBiomass => "target_biomass",
        }
    }

    /// Range plotted by default
    pub fn default_range(&self) -> SweepRange {
        let (start, stop, step) = match self {
            SweepVariable::RRatio => (1.0, 20.0, 1.0),
            SweepVariable::TsSludge => (0.8, 2.4, 0.1),
            SweepVariable::Fcr => (0.8, 1.25, 0.05),
            SweepVariable::TargetBiomass => (1000.0, 20000.0, 1000.0),
        };
        SweepRange {
            start,
            stop,
            step,
            count: step_count(start, stop, step).unwrap_or(1),
        }
    }

    /// Copy of `snapshot` with this variable set to `value`.
    ///
    /// The target biomass is not part of a snapshot, so sweeping it returns an
    /// unchanged copy and leaves the substitution to the calculator.
    pub fn apply(&self, snapshot: &ParameterSnapshot, value: FloatValue) -> ParameterSnapshot {
        match self {
            SweepVariable::RRatio => snapshot.with_field(Field::RRatio, value),
            SweepVariable::TsSludge => snapshot
                .with_field(Field::TsSludge, value)
                .with_field(Field::VsSludge, value * VS_TO_TS_RATIO),
            SweepVariable::Fcr => snapshot.with_field(Field::Fcr, value),
            SweepVariable::TargetBiomass => *snapshot,
        }
    }
}

impl fmt::Display for SweepVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SweepVariable {
    type Err = SludgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "r_ratio" | "rRatio" | "r" | "R" => Ok(SweepVariable::RRatio),
            "ts_sludge" | "tsSludge" | "ts" | "TS" => Ok(SweepVariable::TsSludge),
            "fcr" | "FCR" => Ok(SweepVariable::Fcr),
            "target_biomass" | "targetBiomass" | "biomass" => Ok(SweepVariable::TargetBiomass),
            _ => Err(SludgeError::UnknownVariable(s.to_string())),
        }
    }
}

/// Inclusive, evenly spaced range of sample positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepRange {
    start: FloatValue,
    stop: FloatValue,
    step: FloatValue,
    count: usize,
}

/// Number of samples from `start` to `stop`, or `None` above [`MAX_SAMPLES`]
fn step_count(start: FloatValue, stop: FloatValue, step: FloatValue) -> Option<usize> {
    let steps = ((stop - start) / step + STEP_TOLERANCE).floor();
    if steps.is_finite() && steps < MAX_SAMPLES as FloatValue {
        Some(steps as usize + 1)
    } else {
        None
    }
}

impl SweepRange {
    /// Create a range from `start` to `stop` (inclusive when reachable) in `step` increments.
    ///
    /// The bounds must be finite, `step` strictly positive, `stop >= start`
    /// and the range may hold at most [`MAX_SAMPLES`] samples.
    pub fn new(start: FloatValue, stop: FloatValue, step: FloatValue) -> SludgeResult<Self> {
        let valid = start.is_finite()
            && stop.is_finite()
            && step.is_finite()
            && step > 0.0
            && stop >= start;
        let count = if valid {
            step_count(start, stop, step)
        } else {
            None
        };
        match count {
            Some(count) => Ok(Self {
                start,
                stop,
                step,
                count,
            }),
            None => Err(SludgeError::InvalidRange { start, stop, step }),
        }
    }

    pub fn start(&self) -> FloatValue {
        self.start
    }

    pub fn stop(&self) -> FloatValue {
        self.stop
    }

    pub fn step(&self) -> FloatValue {
        self.step
    }

    /// Number of samples in the range
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Position of the `index`-th sample
    pub fn value_at(&self, index: usize) -> FloatValue {
        round_to(self.start + index as FloatValue * self.step, X_DECIMALS)
    }

    pub fn values(&self) -> impl Iterator<Item = FloatValue> + '_ {
        (0..self.count).map(|index| self.value_at(index))
    }
}

/// One sample of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub x: FloatValue,
    pub y: FloatValue,
}

/// Lazy sequence of sweep samples.
///
/// Nothing is evaluated until the sequence is iterated. Cloning a sweep, or
/// building a new one from the same inputs, restarts it from the first sample.
pub struct Sweep<'a, M: MassBalance> {
    calculator: &'a M,
    snapshot: ParameterSnapshot,
    variable: SweepVariable,
    range: SweepRange,
    index: usize,
}

impl<'a, M: MassBalance> Clone for Sweep<'a, M> {
    fn clone(&self) -> Self {
        Self {
            calculator: self.calculator,
            snapshot: self.snapshot,
            variable: self.variable,
            range: self.range,
            index: self.index,
        }
    }
}

impl<'a, M: MassBalance> Sweep<'a, M> {
    pub fn variable(&self) -> SweepVariable {
        self.variable
    }

    pub fn range(&self) -> &SweepRange {
        &self.range
    }
}

impl<'a, M: MassBalance> Iterator for Sweep<'a, M> {
    type Item = SweepPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.range.len() {
            return None;
        }
        let x = self.range.value_at(self.index);
        self.index += 1;

        let value = self.calculator.evaluate_at(&self.snapshot, self.variable, x);
        let y = round_to(value, self.calculator.headline_decimals());
        trace!("{} sweep: {}={} -> {}", self.calculator.mode(), self.variable, x, y);

        Some(SweepPoint { x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a, M: MassBalance> ExactSizeIterator for Sweep<'a, M> {}

/// Sweep `variable` across `range` with every other parameter fixed at `snapshot`.
pub fn sweep<'a, M: MassBalance>(
    calculator: &'a M,
    snapshot: &ParameterSnapshot,
    variable: SweepVariable,
    range: SweepRange,
) -> SludgeResult<Sweep<'a, M>> {
    if !calculator.supports(variable) {
        return Err(SludgeError::UnsupportedSweep {
            variable: variable.to_string(),
            mode: calculator.mode().to_string(),
        });
    }
    Ok(Sweep {
        calculator,
        snapshot: *snapshot,
        variable,
        range,
        index: 0,
    })
}

/// Sweep `variable` across its default range.
pub fn sweep_default<'a, M: MassBalance>(
    calculator: &'a M,
    snapshot: &ParameterSnapshot,
    variable: SweepVariable,
) -> SludgeResult<Sweep<'a, M>> {
    sweep(calculator, snapshot, variable, variable.default_range())
}
