use super::{AnalysisSetup, ControlTime, Engine, StepReport};
use crate::base::{Config, ConvergenceTest, Dof, ElementParameter, ElementQuantity, Essential, Grid, MaterialStage};
use crate::base::{ParamPdmy02, ParamUp, Response, CONTROL_MIN_DT_MIN};
use crate::StrError;
use russell_lab::{solve_lin_sys, vec_inner, vec_norm, Matrix, Norm, Vector};
use std::collections::HashMap;

/// Implements an engine for the tied soil column under uniform base excitation
///
/// With all nodes of each row tied (equal Ux and Uy) and the base uniformly excited, the grid
/// deforms as a column of `ny + 1` levels in simple shear. This engine solves that reduced
/// problem:
///
/// ```text
///  level ny  o   ← surface (drained, p = 0)
///            |   layer ny-1: k = G·W·t/dy
///  level 1   o
///            |   layer 0
///  level 0   o   ← base (fixed, excited)
/// ```
///
/// * Gravity steps (analysis without excitation) establish the geostatic state: hydrostatic
///   pore pressure, effective vertical stress, moduli of the current material stage, and the
///   settlement profile.
/// * Dynamic steps integrate `M ü + C u̇ + K u = -M 1 ag(t)` with Newmark's method (relative
///   displacements) and Rayleigh damping. The iterations stop according to the convergence test:
///   `‖δu‖∞ ≤ tol` (NormDispIncr) or `|δu · R| ≤ tol` (EnergyIncr).
///
/// The elastoplastic stage uses the pressure-dependent small-strain moduli of the soil
/// (no yield surfaces); the generation of excess pore pressure is not represented.
pub struct ShearColumn {
    /// Holds the grid
    grid: Grid,

    /// Holds the soil parameters
    soil: ParamPdmy02,

    /// Holds the element parameters
    element: ParamUp,

    /// Current material stage
    stage: MaterialStage,

    /// Current analysis
    setup: Option<AnalysisSetup>,

    /// Holds the time control (Newmark coefficients) of the current analysis
    control: Option<ControlTime>,

    /// Time of the last committed step
    t: f64,

    /// Shear modulus of each layer (ny)
    shear: Vec<f64>,

    /// Bulk modulus of each layer (ny)
    bulk: Vec<f64>,

    /// Effective vertical stress (compression positive) at the center of each layer (ny)
    sig_v: Vec<f64>,

    /// Vertical strain of each layer (ny)
    eps_v: Vec<f64>,

    /// Settlement (vertical displacement) of each level (ny + 1)
    settlement: Vec<f64>,

    /// Pore water pressure of each level (ny + 1)
    pore_pressure: Vec<f64>,

    /// Lumped mass of levels 1..=ny
    mass: Vector,

    /// Horizontal displacement (relative to the base) of levels 1..=ny
    uu: Vector,

    /// Horizontal velocity (relative to the base) of levels 1..=ny
    vv: Vector,

    /// Horizontal acceleration (relative to the base) of levels 1..=ny
    aa: Vector,

    /// Permeabilities [vertical, horizontal] of each element
    permeability: Vec<[f64; 2]>,

    /// Maps parameter tag to (element, parameter)
    parameters: HashMap<usize, (usize, ElementParameter)>,
}

impl ShearColumn {
    /// Allocates a new instance
    pub fn new(grid: &Grid, soil: &ParamPdmy02, element: &ParamUp, essential: &Essential) -> Result<Self, StrError> {
        if let Some(msg) = soil.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate engine because the soil parameters are incorrect");
        }
        if let Some(msg) = element.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate engine because the element parameters are incorrect");
        }
        if element.gravity() <= 0.0 {
            return Err("the body force must be non-zero");
        }
        for node in grid.base_nodes() {
            if !essential.is_fixed(node, Dof::Ux) || !essential.is_fixed(node, Dof::Uy) {
                return Err("all base nodes must have fixed Ux and Uy");
            }
        }
        for node in grid.surface_nodes() {
            if !essential.is_fixed(node, Dof::Pw) {
                return Err("all surface nodes must have fixed Pw (drained surface)");
            }
        }
        for (first, last) in grid.side_node_pairs() {
            if !essential.are_tied(first, last, Dof::Ux) || !essential.are_tied(first, last, Dof::Uy) {
                return Err("each row above the base must have Ux and Uy tied");
            }
        }
        let ny = grid.ny;
        let mut mass = Vector::new(ny);
        let m_layer = soil.rho_sat * grid.width() * element.thickness * grid.dy;
        for j in 0..ny {
            mass[j] = if j == ny - 1 { 0.5 * m_layer } else { m_layer };
        }
        Ok(ShearColumn {
            grid: *grid,
            soil: *soil,
            element: *element,
            stage: MaterialStage::Elastic,
            setup: None,
            control: None,
            t: 0.0,
            shear: vec![soil.shear_ref; ny],
            bulk: vec![soil.bulk_ref; ny],
            sig_v: vec![0.0; ny],
            eps_v: vec![0.0; ny],
            settlement: vec![0.0; ny + 1],
            pore_pressure: vec![0.0; ny + 1],
            mass,
            uu: Vector::new(ny),
            vv: Vector::new(ny),
            aa: Vector::new(ny),
            permeability: vec![[element.perm_v, element.perm_h]; grid.n_element()],
            parameters: HashMap::new(),
        })
    }

    /// Allocates a new instance with the grid, parameters, and boundary conditions of a configuration
    pub fn from_config(config: &Config) -> Result<Self, StrError> {
        let essential = Essential::soil_column(&config.grid);
        ShearColumn::new(&config.grid, &config.soil, &config.element, &essential)
    }

    /// Returns the current material stage
    pub fn stage(&self) -> MaterialStage {
        self.stage
    }

    /// Returns the shear modulus of the layer containing an element
    pub fn shear_modulus(&self, element: usize) -> Result<f64, StrError> {
        let (_, j) = self.grid.element_indices(element)?;
        Ok(self.shear[j - 1])
    }

    /// Returns the permeabilities (vertical, horizontal) of an element
    pub fn permeability(&self, element: usize) -> Result<(f64, f64), StrError> {
        self.grid.element_indices(element)?;
        let [kv, kh] = self.permeability[element - 1];
        Ok((kv, kh))
    }

    /// Returns the number of registered parameters
    pub fn n_parameter(&self) -> usize {
        self.parameters.len()
    }

    /// Returns the horizontal displacement of a level (zero at the base)
    fn level_ux(&self, level: usize) -> f64 {
        if level == 0 {
            0.0
        } else {
            self.uu[level - 1]
        }
    }

    /// Calculates the geostatic state for the current material stage
    fn geostatic_state(&mut self) {
        let ny = self.grid.ny;
        let dy = self.grid.dy;
        let height = self.grid.height();
        let g = self.element.gravity();
        let gamma_eff = (self.soil.rho_sat - self.element.rho_fluid) * g;
        let k0 = self.soil.k0();
        for e in 0..ny {
            let depth = height - ((e as f64) + 0.5) * dy;
            self.sig_v[e] = gamma_eff * depth;
            let p_eff = self.sig_v[e] * (1.0 + 2.0 * k0) / 3.0;
            let factor = match self.stage {
                MaterialStage::Elastic => 1.0,
                MaterialStage::ElastoPlastic => self.soil.pressure_factor(p_eff),
            };
            self.shear[e] = self.soil.shear_ref * factor;
            self.bulk[e] = self.soil.bulk_ref * factor;
            let constrained = self.bulk[e] + 4.0 * self.shear[e] / 3.0;
            self.eps_v[e] = -self.sig_v[e] / constrained;
        }
        self.settlement[0] = 0.0;
        for j in 1..=ny {
            self.settlement[j] = self.settlement[j - 1] + self.eps_v[j - 1] * dy;
        }
        for j in 0..=ny {
            let y = (j as f64) * dy;
            self.pore_pressure[j] = self.element.rho_fluid * g * (height - y);
        }
    }

    /// Assembles the stiffness matrix of the layer springs
    fn stiffness(&self) -> Matrix {
        let ny = self.grid.ny;
        let area = self.grid.width() * self.element.thickness;
        let mut kk = Matrix::new(ny, ny);
        for e in 0..ny {
            let k = self.shear[e] * area / self.grid.dy;
            // spring e connects level e (index e-1) to level e+1 (index e)
            kk.set(e, e, kk.get(e, e) + k);
            if e > 0 {
                kk.set(e - 1, e - 1, kk.get(e - 1, e - 1) + k);
                kk.set(e - 1, e, kk.get(e - 1, e) - k);
                kk.set(e, e - 1, kk.get(e, e - 1) - k);
            }
        }
        kk
    }

    /// Performs a dynamic step
    fn dynamic_step(&mut self, dt: f64) -> Result<StepReport, StrError> {
        let (setup, control) = match (&self.setup, &self.control) {
            (Some(s), Some(c)) => (s, c),
            _ => return Err("analysis has not been defined"),
        };
        let ag = match &setup.excitation {
            Some(motion) => motion.value(self.t + dt),
            None => 0.0,
        };
        let c = control.coefficients(dt)?;
        let (a0, a1) = setup.rayleigh;
        let n = self.grid.ny;
        let kk = self.stiffness();

        // effective stiffness: K + α1 M + α4 C  with  C = a0 M + a1 K
        let mut kk_eff = Matrix::new(n, n);
        for i in 0..n {
            for j in 0..n {
                let mut value = (1.0 + c.alpha4 * a1) * kk.get(i, j);
                if i == j {
                    value += (c.alpha1 + c.alpha4 * a0) * self.mass[i];
                }
                kk_eff.set(i, j, value);
            }
        }

        // iterations
        let mut u = self.uu.clone();
        let mut a = Vector::new(n);
        let mut v = Vector::new(n);
        let mut rr = Vector::new(n);
        let mut norm_mdu = 0.0;
        for iteration in 0..setup.n_max_iterations {
            // trial velocity and acceleration
            for i in 0..n {
                let du = u[i] - self.uu[i];
                a[i] = c.alpha1 * du - c.alpha2 * self.vv[i] - c.alpha3 * self.aa[i];
                v[i] = c.alpha4 * du - c.alpha5 * self.vv[i] - c.alpha6 * self.aa[i];
            }

            // residual: R = -M 1 ag - M a - C v - K u
            for i in 0..n {
                let mut ku = 0.0;
                let mut kv = 0.0;
                for j in 0..n {
                    ku += kk.get(i, j) * u[j];
                    kv += kk.get(i, j) * v[j];
                }
                let m = self.mass[i];
                rr[i] = -m * ag - m * a[i] - (a0 * m * v[i] + a1 * kv) - ku;
            }

            // solve K_eff δu = R
            let mut work = kk_eff.clone();
            let mut mdu = rr.clone();
            if solve_lin_sys(&mut mdu, &mut work).is_err() {
                return Ok(StepReport {
                    converged: false,
                    iterations: iteration + 1,
                    norm_mdu: f64::NAN,
                });
            }
            norm_mdu = vec_norm(&mdu, Norm::Max);
            let finite = (0..n).all(|i| mdu[i].is_finite());
            if !finite || !norm_mdu.is_finite() {
                return Ok(StepReport {
                    converged: false,
                    iterations: iteration + 1,
                    norm_mdu,
                });
            }
            for i in 0..n {
                u[i] += mdu[i];
            }

            // check convergence
            let error = match setup.test {
                ConvergenceTest::NormDispIncr => norm_mdu,
                ConvergenceTest::EnergyIncr => f64::abs(vec_inner(&mdu, &rr)),
            };
            if error <= setup.tol {
                for i in 0..n {
                    let du = u[i] - self.uu[i];
                    let a_new = c.alpha1 * du - c.alpha2 * self.vv[i] - c.alpha3 * self.aa[i];
                    let v_new = c.alpha4 * du - c.alpha5 * self.vv[i] - c.alpha6 * self.aa[i];
                    self.aa[i] = a_new;
                    self.vv[i] = v_new;
                    self.uu[i] = u[i];
                }
                self.t += dt;
                return Ok(StepReport {
                    converged: true,
                    iterations: iteration + 1,
                    norm_mdu,
                });
            }
        }
        Ok(StepReport {
            converged: false,
            iterations: setup.n_max_iterations,
            norm_mdu,
        })
    }
}

impl Engine for ShearColumn {
    fn set_material_stage(&mut self, stage: MaterialStage) -> Result<(), StrError> {
        self.stage = stage;
        Ok(())
    }

    fn set_analysis(&mut self, setup: AnalysisSetup) -> Result<(), StrError> {
        if setup.n_max_iterations < 1 {
            return Err("the maximum number of iterations must be ≥ 1");
        }
        if setup.tol <= 0.0 {
            return Err("the convergence tolerance must be > 0.0");
        }
        let control = ControlTime::new(&setup.newmark, CONTROL_MIN_DT_MIN)?;
        if let Some(motion) = &setup.excitation {
            // initial acceleration from the equilibrium at the current time
            let ag = motion.value(self.t);
            let (a0, a1) = setup.rayleigh;
            let kk = self.stiffness();
            for i in 0..self.grid.ny {
                let mut ku = 0.0;
                let mut kv = 0.0;
                for j in 0..self.grid.ny {
                    ku += kk.get(i, j) * self.uu[j];
                    kv += kk.get(i, j) * self.vv[j];
                }
                let m = self.mass[i];
                self.aa[i] = (-m * ag - (a0 * m * self.vv[i] + a1 * kv) - ku) / m;
            }
        }
        self.control = Some(control);
        self.setup = Some(setup);
        Ok(())
    }

    fn wipe_analysis(&mut self) {
        self.setup = None;
        self.control = None;
    }

    fn add_parameter(&mut self, tag: usize, element: usize, parameter: ElementParameter) -> Result<(), StrError> {
        self.grid.element_indices(element)?;
        if self.parameters.contains_key(&tag) {
            return Err("parameter tag already exists");
        }
        self.parameters.insert(tag, (element, parameter));
        Ok(())
    }

    fn update_parameter(&mut self, tag: usize, value: f64) -> Result<(), StrError> {
        let (element, parameter) = match self.parameters.get(&tag) {
            Some(entry) => *entry,
            None => return Err("parameter tag does not exist"),
        };
        if value < 0.0 {
            return Err("permeability must be ≥ 0.0");
        }
        match parameter {
            ElementParameter::VerticalPerm => self.permeability[element - 1][0] = value,
            ElementParameter::HorizontalPerm => self.permeability[element - 1][1] = value,
        }
        Ok(())
    }

    fn step(&mut self, dt: f64) -> Result<StepReport, StrError> {
        let dynamic = match &self.setup {
            Some(setup) => setup.excitation.is_some(),
            None => return Err("analysis has not been defined"),
        };
        if dynamic {
            self.dynamic_step(dt)
        } else {
            if dt < CONTROL_MIN_DT_MIN {
                return Err("Δt is smaller than the allowed minimum");
            }
            self.geostatic_state();
            self.t += dt;
            Ok(StepReport {
                converged: true,
                iterations: 1,
                norm_mdu: 0.0,
            })
        }
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn set_time(&mut self, t: f64) {
        self.t = t;
    }

    fn node_response(&self, node: usize, dof: Dof, response: Response) -> Result<f64, StrError> {
        let (_, j) = self.grid.node_indices(node)?;
        let level = j - 1;
        let value = match (dof, response) {
            (Dof::Ux, Response::Disp) => self.level_ux(level),
            (Dof::Ux, Response::Vel) => {
                if level == 0 {
                    0.0
                } else {
                    self.vv[level - 1]
                }
            }
            (Dof::Ux, Response::Accel) => {
                if level == 0 {
                    0.0
                } else {
                    self.aa[level - 1]
                }
            }
            (Dof::Uy, Response::Disp) => self.settlement[level],
            (Dof::Uy, _) => 0.0,
            (Dof::Pw, Response::Accel) => 0.0,
            (Dof::Pw, _) => self.pore_pressure[level],
        };
        Ok(value)
    }

    fn element_response(&self, element: usize, quantity: ElementQuantity) -> Result<Vec<f64>, StrError> {
        let (_, j) = self.grid.element_indices(element)?;
        let e = j - 1;
        let gamma = (self.level_ux(e + 1) - self.level_ux(e)) / self.grid.dy;
        let values = match quantity {
            ElementQuantity::Stress => {
                let sig_yy = -self.sig_v[e];
                vec![self.soil.k0() * sig_yy, sig_yy, self.shear[e] * gamma]
            }
            ElementQuantity::Strain => vec![0.0, self.eps_v[e], gamma],
        };
        Ok(values)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
