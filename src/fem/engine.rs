use crate::base::{ConvergenceTest, Dof, ElementParameter, ElementQuantity, GroundMotion, MaterialStage, Newmark, Response};
use crate::StrError;

/// Holds the options of a (transient) analysis
///
/// Setting a new analysis replaces the previous one; the model state is kept.
#[derive(Clone, Debug)]
pub struct AnalysisSetup {
    /// Newmark parameters
    pub newmark: Newmark,

    /// Convergence test of the nonlinear iterations
    pub test: ConvergenceTest,

    /// Tolerance of the convergence test
    pub tol: f64,

    /// Maximum number of iterations
    pub n_max_iterations: usize,

    /// Rayleigh coefficients (a0, a1) of the mass and stiffness proportional damping
    pub rayleigh: (f64, f64),

    /// Uniform base excitation (horizontal acceleration)
    ///
    /// None means that no dynamic load is applied (e.g., gravity stages).
    pub excitation: Option<GroundMotion>,
}

/// Holds the outcome of a time step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Indicates that the nonlinear iterations converged and the step was committed
    pub converged: bool,

    /// Number of iterations performed
    pub iterations: usize,

    /// Max-norm of the last displacement increment
    pub norm_mdu: f64,
}

/// Defines the numerical engine that holds the model and advances it in time
///
/// All tags are one-based (see [crate::base::Grid]).
pub trait Engine {
    /// Switches the material stage of the soil
    fn set_material_stage(&mut self, stage: MaterialStage) -> Result<(), StrError>;

    /// Defines the analysis (integrator, convergence test, damping, excitation)
    fn set_analysis(&mut self, setup: AnalysisSetup) -> Result<(), StrError>;

    /// Removes the analysis definition (the model state is kept)
    fn wipe_analysis(&mut self);

    /// Registers an element parameter that can be updated later
    fn add_parameter(&mut self, tag: usize, element: usize, parameter: ElementParameter) -> Result<(), StrError>;

    /// Updates the value of a registered parameter
    fn update_parameter(&mut self, tag: usize, value: f64) -> Result<(), StrError>;

    /// Advances the model by one time step
    ///
    /// A non-converged step is not an error: the report flags it and the committed state
    /// (including the time) is left unchanged.
    fn step(&mut self, dt: f64) -> Result<StepReport, StrError>;

    /// Returns the time of the last committed step
    fn time(&self) -> f64;

    /// Sets the time
    fn set_time(&mut self, t: f64);

    /// Returns a nodal response
    fn node_response(&self, node: usize, dof: Dof, response: Response) -> Result<f64, StrError>;

    /// Returns the stress or strain components of an element
    fn element_response(&self, element: usize, quantity: ElementQuantity) -> Result<Vec<f64>, StrError>;
}
