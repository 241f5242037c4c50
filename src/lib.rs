//! liqsim -- Liquefiable soil column simulator
//!
//! Staged (gravity, then seismic) analysis of a saturated soil column discretized by u-p
//! quadrilaterals. The numerical engine is reached through the [fem::Engine] trait;
//! [fem::ShearColumn] is the engine shipped with this crate.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod plot;
pub mod prelude;
