//! Python bindings for the sludge digestate calculators
//!
//! The calculators live in `sludgecalc-core` and `sludgecalc-components`. This
//! crate only builds the `_lib` extension module that a presentation layer
//! imports.

pub mod python;

pub use sludgecalc_components;
pub use sludgecalc_core;
