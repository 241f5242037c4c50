//! Implements the numerical engine interface, the reference engine, and the staged analysis

mod adaptive;
mod analysis;
mod control_time;
mod engine;
mod monitor;
mod recorders;
mod shear_column;
mod simulation;
mod summary;
pub use crate::fem::adaptive::*;
pub use crate::fem::analysis::*;
pub use crate::fem::control_time::*;
pub use crate::fem::engine::*;
pub use crate::fem::monitor::*;
pub use crate::fem::recorders::*;
pub use crate::fem::shear_column::*;
pub use crate::fem::simulation::*;
pub use crate::fem::summary::*;
