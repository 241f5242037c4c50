use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines degrees-of-freedom (DOF) types of the u-p nodes
///
/// Note: The fixed numbering scheme assists in sorting the DOFs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Displacement along the first dimension
    Ux = 0,

    /// Displacement along the second dimension
    Uy = 1,

    /// Pore water pressure
    Pw = 2,
}

impl Dof {
    /// Returns the index of the DOF at a node
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Defines the nodal response quantity
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum Response {
    /// Displacement (or the primary value of the pressure DOF)
    Disp,

    /// Velocity
    ///
    /// For the pressure DOF of u-p elements this is the pore pressure itself.
    Vel,

    /// Acceleration
    Accel,
}

/// Defines the element (material) quantity
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum ElementQuantity {
    /// Effective stress components [σxx, σyy, σxy]
    Stress,

    /// Strain components [εxx, εyy, γxy]
    Strain,
}

/// Defines the material stage of the soil model
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum MaterialStage {
    /// Linear elastic behavior (used to establish the gravity state)
    Elastic = 0,

    /// Elastoplastic behavior
    ElastoPlastic = 1,
}

/// Defines the convergence test of the nonlinear iterations
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum ConvergenceTest {
    /// Max-norm of the displacement increment: ‖δu‖∞ ≤ tol
    NormDispIncr,

    /// Energy increment: |δu · R| ≤ tol
    EnergyIncr,
}

/// Defines the element parameters that can be modified after the mesh is built
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum ElementParameter {
    /// Vertical permeability
    VerticalPerm,

    /// Horizontal permeability
    HorizontalPerm,
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dof::Ux => write!(f, "Ux"),
            Dof::Uy => write!(f, "Uy"),
            Dof::Pw => write!(f, "Pw"),
        }
    }
}

impl fmt::Display for ElementParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementParameter::VerticalPerm => write!(f, "vPerm"),
            ElementParameter::HorizontalPerm => write!(f, "hPerm"),
        }
    }
}

impl fmt::Display for ConvergenceTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceTest::NormDispIncr => write!(f, "NormDispIncr"),
            ConvergenceTest::EnergyIncr => write!(f, "EnergyIncr"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
