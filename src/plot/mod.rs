//! Implements tools to read the recorder files and draw the time histories

mod figures;
mod table;
pub use crate::plot::figures::*;
pub use crate::plot::table::*;
