//! Makes available common structures needed to run a simulation
//!
//! You may write `use liqsim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, ConvergenceTest, Dof, Essential, Grid, GroundMotion, ParamPdmy02, ParamUp, Response};
pub use crate::base::{DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::fem::{AdaptiveTimestep, AnalysisSetup, DynamicReport, Engine, Recorders, ShearColumn, Simulation, Summary};
pub use crate::plot::{Figures, Panel, Table};
