//! Implements the base structures of the simulation: grid, parameters, boundary conditions,
//! ground motion, and configuration

mod config;
mod constants;
mod enums;
mod essential;
mod grid;
mod ground_motion;
mod parameters;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::essential::*;
pub use crate::base::grid::*;
pub use crate::base::ground_motion::*;
pub use crate::base::parameters::*;
