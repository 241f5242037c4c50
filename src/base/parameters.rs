use super::GRAVITY;
use serde::{Deserialize, Serialize};

/// Holds parameters of the pressure-dependent multi-yield soil model (PDMY02)
///
/// Units: kN, Mg (ton), s, m. Stresses are in kPa and mass densities in Mg/m³.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamPdmy02 {
    /// Number of dimensions (2 for plane-strain)
    pub ndim: usize,

    /// Saturated mass density
    pub rho_sat: f64,

    /// Reference low-strain shear modulus Gr (at p' = pr)
    pub shear_ref: f64,

    /// Reference bulk modulus Br (at p' = pr)
    pub bulk_ref: f64,

    /// Friction angle at peak shear strength (degrees)
    pub friction_angle: f64,

    /// Octahedral shear strain at which the peak strength is reached
    pub peak_shear_strain: f64,

    /// Reference mean effective confining pressure pr
    pub p_ref: f64,

    /// Pressure dependency coefficient d
    ///
    /// ```text
    /// G = Gr · (p'/pr)^d
    /// ```
    pub press_depend_coef: f64,

    /// Phase transformation angle (degrees)
    pub pt_angle: f64,

    /// Contraction parameters [c1, c2, c3]
    pub contraction: [f64; 3],

    /// Dilation parameters [d1, d2, d3]
    pub dilation: [f64; 3],

    /// Number of yield surfaces
    pub n_surf: usize,

    /// Liquefaction-induced perfectly plastic shear strain parameters [l1, l2]
    pub liquefaction: [f64; 2],

    /// Initial void ratio
    pub void_ratio: f64,

    /// Critical state line parameters [cs1, cs2, cs3]
    ///
    /// ```text
    /// ec = cs1 - cs2 · (p'/pa)^cs3
    /// ```
    pub critical_state: [f64; 3],

    /// Atmospheric pressure pa
    pub p_atm: f64,
}

/// Holds parameters of the u-p quadrilateral (quadUP) elements
///
/// Permeabilities are stored in the form expected by the u-p formulation,
/// i.e., k / (g · ρf).
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ParamUp {
    /// Out-of-plane thickness
    pub thickness: f64,

    /// Combined undrained bulk modulus of the fluid-solid mixture
    pub bulk_fluid: f64,

    /// Fluid mass density ρf
    pub rho_fluid: f64,

    /// Horizontal permeability during the gravity stages
    pub perm_h: f64,

    /// Vertical permeability during the gravity stages
    pub perm_v: f64,

    /// Horizontal body force (acceleration)
    pub body_x: f64,

    /// Vertical body force (acceleration)
    pub body_y: f64,
}

impl ParamPdmy02 {
    /// Returns parameters of a loose sand (relative density of 50%)
    pub fn sample_loose_sand() -> Self {
        ParamPdmy02 {
            ndim: 2,
            rho_sat: 1.9,
            shear_ref: 10.0e4,
            bulk_ref: 23.3e4,
            friction_angle: 33.5,
            peak_shear_strain: 0.1,
            p_ref: 101.0,
            press_depend_coef: 0.5,
            pt_angle: 25.5,
            contraction: [0.045, 5.0, 0.15],
            dilation: [0.06, 3.0, 0.25],
            n_surf: 20,
            liquefaction: [1.0, 0.0],
            void_ratio: 0.7,
            critical_state: [0.9, 0.02, 0.7],
            p_atm: 101.0,
        }
    }

    /// Returns the Poisson coefficient corresponding to (Br, Gr)
    pub fn poisson(&self) -> f64 {
        let (kk, gg) = (self.bulk_ref, self.shear_ref);
        (3.0 * kk - 2.0 * gg) / (2.0 * (3.0 * kk + gg))
    }

    /// Returns the coefficient of earth pressure at rest K0 = ν / (1 - ν)
    pub fn k0(&self) -> f64 {
        let nu = self.poisson();
        nu / (1.0 - nu)
    }

    /// Returns the pressure scaling factor (p'/pr)^d
    ///
    /// The mean effective stress is limited from below by 1% of pr.
    pub fn pressure_factor(&self, p_eff: f64) -> f64 {
        let p = f64::max(p_eff, 0.01 * self.p_ref);
        f64::powf(p / self.p_ref, self.press_depend_coef)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.ndim != 2 {
            return Some(format!("ndim = {:?} is incorrect; it must be 2", self.ndim));
        }
        if self.rho_sat <= 0.0 {
            return Some(format!("rho_sat = {:?} is incorrect; it must be > 0.0", self.rho_sat));
        }
        if self.shear_ref <= 0.0 {
            return Some(format!("shear_ref = {:?} is incorrect; it must be > 0.0", self.shear_ref));
        }
        if self.bulk_ref <= 0.0 {
            return Some(format!("bulk_ref = {:?} is incorrect; it must be > 0.0", self.bulk_ref));
        }
        let nu = self.poisson();
        if nu <= -1.0 || nu >= 0.5 {
            return Some(format!(
                "(bulk_ref, shear_ref) = ({:?}, {:?}) is incorrect; it gives ν = {:?} outside (-1, 0.5)",
                self.bulk_ref, self.shear_ref, nu
            ));
        }
        if self.p_ref <= 0.0 {
            return Some(format!("p_ref = {:?} is incorrect; it must be > 0.0", self.p_ref));
        }
        if self.friction_angle <= 0.0 || self.friction_angle >= 90.0 {
            return Some(format!(
                "friction_angle = {:?} is incorrect; it must be in (0, 90)",
                self.friction_angle
            ));
        }
        if self.pt_angle <= 0.0 || self.pt_angle > self.friction_angle {
            return Some(format!(
                "pt_angle = {:?} is incorrect; it must be in (0, friction_angle]",
                self.pt_angle
            ));
        }
        if self.n_surf < 1 || self.n_surf > 40 {
            return Some(format!("n_surf = {:?} is incorrect; it must be in [1, 40]", self.n_surf));
        }
        None // all good
    }
}

impl ParamUp {
    /// Returns the element parameters of the liquefiable column
    ///
    /// The fluid bulk modulus is 2.2e6 / e and the initial permeabilities (100 m/s) are large
    /// so that the gravity stages reach the drained state.
    pub fn sample_column(void_ratio: f64) -> Self {
        let rho_fluid = 1.0;
        ParamUp {
            thickness: 1.0,
            bulk_fluid: 2.2e6 / void_ratio,
            rho_fluid,
            perm_h: ParamUp::scaled_permeability(100.0, rho_fluid),
            perm_v: ParamUp::scaled_permeability(100.0, rho_fluid),
            body_x: 0.0,
            body_y: -GRAVITY,
        }
    }

    /// Converts a permeability (m/s) to the form used by the u-p elements: k / (g · ρf)
    pub fn scaled_permeability(perm: f64, rho_fluid: f64) -> f64 {
        perm / GRAVITY / rho_fluid
    }

    /// Returns the gravity acceleration implied by the body force
    pub fn gravity(&self) -> f64 {
        f64::sqrt(self.body_x * self.body_x + self.body_y * self.body_y)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.thickness <= 0.0 {
            return Some(format!("thickness = {:?} is incorrect; it must be > 0.0", self.thickness));
        }
        if self.bulk_fluid <= 0.0 {
            return Some(format!("bulk_fluid = {:?} is incorrect; it must be > 0.0", self.bulk_fluid));
        }
        if self.rho_fluid <= 0.0 {
            return Some(format!("rho_fluid = {:?} is incorrect; it must be > 0.0", self.rho_fluid));
        }
        if self.perm_h < 0.0 || self.perm_v < 0.0 {
            return Some(format!(
                "(perm_h, perm_v) = ({:?}, {:?}) is incorrect; permeabilities must be ≥ 0.0",
                self.perm_h, self.perm_v
            ));
        }
        None // all good
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
