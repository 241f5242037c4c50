use super::{ConvergenceTest, Grid, ParamPdmy02, ParamUp};
use super::{CONTROL_MIN_DT_MIN, CONTROL_MIN_TOL, DEFAULT_GROUND_MOTION_FILE, DEFAULT_OUT_DIR, GRAVITY};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the Newmark parameters γ and β
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Newmark {
    /// γ parameter (θ1)
    pub gamma: f64,

    /// β parameter (θ2 = 2·β)
    pub beta: f64,
}

impl Newmark {
    /// Returns the average acceleration method (γ = 1/2, β = 1/4)
    pub fn average_acceleration() -> Self {
        Newmark { gamma: 0.5, beta: 0.25 }
    }

    /// Returns the numerically dissipative parameters used in the gravity stages
    ///
    /// ```text
    /// β = (γ + 1/2)² / 4
    /// ```
    pub fn dissipative(gamma: f64) -> Self {
        Newmark {
            gamma,
            beta: (gamma + 0.5) * (gamma + 0.5) / 4.0,
        }
    }
}

/// Holds the number of steps and the timestep of an analysis stage
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct StageControl {
    /// Number of steps
    pub n_steps: usize,

    /// Timestep Δt
    pub dt: f64,
}

impl StageControl {
    /// Returns the duration n_steps · Δt
    pub fn duration(&self) -> f64 {
        (self.n_steps as f64) * self.dt
    }
}

/// Holds the configuration of the liquefiable column simulation
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Structured grid
    pub grid: Grid,

    /// Material tag (attribute of all cells)
    pub material_tag: usize,

    /// Soil parameters
    pub soil: ParamPdmy02,

    /// Element parameters (with the gravity-stage permeabilities)
    pub element: ParamUp,

    /// Horizontal permeability for the dynamic analysis, already divided by g·ρf
    pub perm_h_dynamic: f64,

    /// Vertical permeability for the dynamic analysis, already divided by g·ρf
    pub perm_v_dynamic: f64,

    /// Newmark parameters of the gravity stages
    pub gravity_newmark: Newmark,

    /// Gravity stage with elastic material
    pub gravity_elastic: StageControl,

    /// Gravity stage with elastoplastic material
    pub gravity_plastic: StageControl,

    /// Convergence test of the gravity stages
    pub gravity_test: ConvergenceTest,

    /// Tolerance of the convergence test (gravity stages)
    pub gravity_tol: f64,

    /// Maximum number of iterations (gravity stages)
    pub gravity_n_max_iterations: usize,

    /// Newmark parameters of the dynamic analysis
    pub dynamic_newmark: Newmark,

    /// Nominal timestep and number of steps of the dynamic analysis
    pub dynamic: StageControl,

    /// Convergence test of the dynamic analysis
    pub dynamic_test: ConvergenceTest,

    /// Tolerance of the convergence test (dynamic analysis)
    pub dynamic_tol: f64,

    /// Maximum number of iterations (dynamic analysis)
    pub dynamic_n_max_iterations: usize,

    /// Rayleigh damping ratio ζ
    pub damping_ratio: f64,

    /// Lower frequency (Hz) of the Rayleigh damping
    pub damping_freq_low: f64,

    /// Upper frequency (Hz) of the Rayleigh damping
    pub damping_freq_high: f64,

    /// Maximum number of timestep halvings after non-convergence
    pub max_halvings: usize,

    /// Minimum allowed timestep
    pub dt_min: f64,

    /// Path of the ground motion file
    pub ground_motion_path: String,

    /// Sample interval of the ground motion
    pub ground_motion_dt: f64,

    /// Scale factor of the ground motion
    pub ground_motion_factor: f64,

    /// Output directory of the recorders
    pub out_dir: String,

    /// Recording interval
    pub dt_out: f64,

    /// Node tags of the node recorders
    pub recorded_nodes: Vec<usize>,

    /// Element tags of the element recorders
    pub recorded_elements: Vec<usize>,

    /// Verbose mode for stages
    pub verbose_stages: bool,

    /// Verbose mode during timesteps
    pub verbose_timesteps: bool,

    /// Verbose mode during iterations
    pub verbose_iterations: bool,
}

impl Config {
    /// Allocates a new instance with the parameters of the liquefiable column
    pub fn new() -> Self {
        let soil = ParamPdmy02::sample_loose_sand();
        let element = ParamUp::sample_column(soil.void_ratio);
        Config {
            grid: Grid::sample_column(),
            material_tag: 1,
            soil,
            element,
            perm_h_dynamic: ParamUp::scaled_permeability(2.0e-3, element.rho_fluid),
            perm_v_dynamic: ParamUp::scaled_permeability(2.0e-3, element.rho_fluid),
            gravity_newmark: Newmark::dissipative(1.5),
            gravity_elastic: StageControl { n_steps: 10, dt: 5e3 },
            gravity_plastic: StageControl { n_steps: 10, dt: 1e1 },
            gravity_test: ConvergenceTest::NormDispIncr,
            gravity_tol: 1e-2,
            gravity_n_max_iterations: 50,
            dynamic_newmark: Newmark::average_acceleration(),
            dynamic: StageControl {
                n_steps: 13000,
                dt: 0.0025,
            },
            dynamic_test: ConvergenceTest::EnergyIncr,
            dynamic_tol: 1e-8,
            dynamic_n_max_iterations: 10,
            damping_ratio: 0.02,
            damping_freq_low: 1.0,
            damping_freq_high: 20.0,
            max_halvings: 2,
            dt_min: CONTROL_MIN_DT_MIN,
            ground_motion_path: DEFAULT_GROUND_MOTION_FILE.to_string(),
            ground_motion_dt: 0.01,
            ground_motion_factor: GRAVITY,
            out_dir: DEFAULT_OUT_DIR.to_string(),
            dt_out: 0.1,
            recorded_nodes: vec![53, 95, 137, 158, 179, 221],
            recorded_elements: vec![10, 70, 130, 190],
            verbose_stages: true,
            verbose_timesteps: false,
            verbose_iterations: false,
        }
    }

    /// Sets the grid
    pub fn set_grid(&mut self, grid: Grid) -> &mut Self {
        self.grid = grid;
        self
    }

    /// Sets the number of steps and the nominal timestep of the dynamic analysis
    pub fn set_dynamic(&mut self, n_steps: usize, dt: f64) -> &mut Self {
        self.dynamic = StageControl { n_steps, dt };
        self
    }

    /// Sets the permeabilities (m/s) of the dynamic analysis
    ///
    /// The values are divided by g·ρf as required by the u-p elements.
    pub fn set_dynamic_permeability(&mut self, perm_h: f64, perm_v: f64) -> &mut Self {
        self.perm_h_dynamic = ParamUp::scaled_permeability(perm_h, self.element.rho_fluid);
        self.perm_v_dynamic = ParamUp::scaled_permeability(perm_v, self.element.rho_fluid);
        self
    }

    /// Sets the maximum number of timestep halvings
    pub fn set_max_halvings(&mut self, value: usize) -> &mut Self {
        self.max_halvings = value;
        self
    }

    /// Sets the minimum allowed timestep
    pub fn set_dt_min(&mut self, value: f64) -> &mut Self {
        self.dt_min = value;
        self
    }

    /// Sets the convergence tests and tolerances of the gravity stages and the dynamic analysis
    pub fn set_convergence(
        &mut self,
        gravity_test: ConvergenceTest,
        gravity_tol: f64,
        dynamic_test: ConvergenceTest,
        dynamic_tol: f64,
    ) -> &mut Self {
        self.gravity_test = gravity_test;
        self.gravity_tol = gravity_tol;
        self.dynamic_test = dynamic_test;
        self.dynamic_tol = dynamic_tol;
        self
    }

    /// Sets the ground motion file, its sample interval, and its scale factor
    pub fn set_ground_motion(&mut self, path: &str, dt: f64, factor: f64) -> &mut Self {
        self.ground_motion_path = path.to_string();
        self.ground_motion_dt = dt;
        self.ground_motion_factor = factor;
        self
    }

    /// Sets the output directory
    pub fn set_out_dir(&mut self, out_dir: &str) -> &mut Self {
        self.out_dir = out_dir.to_string();
        self
    }

    /// Sets the recording interval
    pub fn set_dt_out(&mut self, value: f64) -> &mut Self {
        self.dt_out = value;
        self
    }

    /// Sets the node tags of the node recorders
    pub fn set_recorded_nodes(&mut self, nodes: &[usize]) -> &mut Self {
        self.recorded_nodes = nodes.to_vec();
        self
    }

    /// Sets the element tags of the element recorders
    pub fn set_recorded_elements(&mut self, elements: &[usize]) -> &mut Self {
        self.recorded_elements = elements.to_vec();
        self
    }

    /// Sets the verbose flags
    pub fn set_verbose(&mut self, stages: bool, timesteps: bool, iterations: bool) -> &mut Self {
        self.verbose_stages = stages;
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        self
    }

    /// Returns the Rayleigh coefficients (a0, a1) of the mass and stiffness proportional terms
    ///
    /// ```text
    /// a0 = 2 ζ ω1 ω2 / (ω1 + ω2)
    /// a1 = 2 ζ / (ω1 + ω2)
    /// ```
    pub fn rayleigh_coefficients(&self) -> (f64, f64) {
        let w1 = 2.0 * PI * self.damping_freq_low;
        let w2 = 2.0 * PI * self.damping_freq_high;
        let a0 = 2.0 * self.damping_ratio * w1 * w2 / (w1 + w2);
        let a1 = 2.0 * self.damping_ratio / (w1 + w2);
        (a0, a1)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if let Err(e) = Grid::new(self.grid.nx, self.grid.ny, self.grid.dx, self.grid.dy) {
            return Some(format!("grid is incorrect: {}", e));
        }
        if let Some(msg) = self.soil.validate() {
            return Some(format!("soil parameters: {}", msg));
        }
        if let Some(msg) = self.element.validate() {
            return Some(format!("element parameters: {}", msg));
        }
        if self.perm_h_dynamic < 0.0 || self.perm_v_dynamic < 0.0 {
            return Some(format!(
                "(perm_h_dynamic, perm_v_dynamic) = ({:?}, {:?}) is incorrect; permeabilities must be ≥ 0.0",
                self.perm_h_dynamic, self.perm_v_dynamic
            ));
        }
        if self.dt_min < CONTROL_MIN_DT_MIN {
            return Some(format!(
                "dt_min = {:?} is incorrect; it must be ≥ {:e}",
                self.dt_min, CONTROL_MIN_DT_MIN
            ));
        }
        for (name, newmark) in [("gravity", &self.gravity_newmark), ("dynamic", &self.dynamic_newmark)] {
            if newmark.gamma < 0.5 {
                return Some(format!(
                    "{}_newmark.gamma = {:?} is incorrect; it must be ≥ 0.5",
                    name, newmark.gamma
                ));
            }
            if 2.0 * newmark.beta < newmark.gamma {
                return Some(format!(
                    "{}_newmark.beta = {:?} is incorrect; it must be ≥ γ/2 = {:?}",
                    name,
                    newmark.beta,
                    newmark.gamma / 2.0
                ));
            }
        }
        for (name, stage) in [
            ("gravity_elastic", &self.gravity_elastic),
            ("gravity_plastic", &self.gravity_plastic),
            ("dynamic", &self.dynamic),
        ] {
            if stage.n_steps < 1 {
                return Some(format!("{}.n_steps = 0 is incorrect; it must be ≥ 1", name));
            }
            if stage.dt < self.dt_min {
                return Some(format!(
                    "{}.dt = {:?} is incorrect; it must be ≥ dt_min = {:?}",
                    name, stage.dt, self.dt_min
                ));
            }
        }
        for (name, tol) in [("gravity_tol", self.gravity_tol), ("dynamic_tol", self.dynamic_tol)] {
            if tol < CONTROL_MIN_TOL {
                return Some(format!(
                    "{} = {:?} is incorrect; it must be ≥ {:e}",
                    name, tol, CONTROL_MIN_TOL
                ));
            }
        }
        if self.gravity_n_max_iterations < 1 || self.dynamic_n_max_iterations < 1 {
            return Some("the maximum number of iterations must be ≥ 1".to_string());
        }
        if self.damping_ratio < 0.0 {
            return Some(format!(
                "damping_ratio = {:?} is incorrect; it must be ≥ 0.0",
                self.damping_ratio
            ));
        }
        if self.damping_freq_low <= 0.0 || self.damping_freq_high <= self.damping_freq_low {
            return Some(format!(
                "(damping_freq_low, damping_freq_high) = ({:?}, {:?}) is incorrect; it must be 0 < f1 < f2",
                self.damping_freq_low, self.damping_freq_high
            ));
        }
        if self.ground_motion_dt <= 0.0 {
            return Some(format!(
                "ground_motion_dt = {:?} is incorrect; it must be > 0.0",
                self.ground_motion_dt
            ));
        }
        if self.dt_out < 0.0 {
            return Some(format!("dt_out = {:?} is incorrect; it must be ≥ 0.0", self.dt_out));
        }
        let n_node = self.grid.n_node();
        if let Some(node) = self.recorded_nodes.iter().find(|n| **n < 1 || **n > n_node) {
            return Some(format!(
                "recorded node {:?} is incorrect; it must be in [1, {:?}]",
                node, n_node
            ));
        }
        let n_element = self.grid.n_element();
        if let Some(e) = self.recorded_elements.iter().find(|e| **e < 1 || **e > n_element) {
            return Some(format!(
                "recorded element {:?} is incorrect; it must be in [1, {:?}]",
                e, n_element
            ));
        }
        None // all good
    }

    /// Reads a JSON file containing the configuration
    ///
    /// Missing keys take the default values of [Config::new].
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(file);
        let config = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(config)
    }

    /// Writes a JSON file with the configuration
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer_pretty(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
