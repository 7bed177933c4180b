//! Core types for aquaculture sludge nutrient-balance calculators
//!
//! This crate holds everything the calculators share: the parameter groups
//! and snapshot, the [`calculator::MassBalance`] trait, the sensitivity
//! sampler, the derived-field rules and the parameter store driven by an
//! external input layer. The calculators themselves live in
//! `sludgecalc-components`.

pub mod calculator;
pub mod config;
pub mod derived;
pub mod errors;
pub mod numeric;
pub mod parameters;
pub mod store;
pub mod sweep;
