use crate::base::{Newmark, CONTROL_MIN_DT_MIN};
use crate::StrError;

/// Holds the coefficients of Newmark's method for a given Δt
///
/// ```text
/// aⁿ⁺¹ = α1 (uⁿ⁺¹ - uⁿ) - α2 vⁿ - α3 aⁿ
/// vⁿ⁺¹ = α4 (uⁿ⁺¹ - uⁿ) - α5 vⁿ - α6 aⁿ
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewmarkCoefficients {
    pub alpha1: f64,
    pub alpha2: f64,
    pub alpha3: f64,
    pub alpha4: f64,
    pub alpha5: f64,
    pub alpha6: f64,
}

/// Assists in the time loop control
///
/// Computes the coefficients for dynamic analyses
///
/// # Notes
///
/// * `θ1` -- First Newmark parameter (aka, γ) with `γ ≥ 1/2`
/// * `θ2` -- Second Newmark parameter (aka, 2 β) with `θ2 ≥ θ1` (unconditional stability)
pub struct ControlTime {
    /// First Newmark parameter (gamma)
    theta1: f64,

    /// Second Newmark parameter (2*beta)
    theta2: f64,

    /// Minimum timestep
    dt_min: f64,
}

impl ControlTime {
    /// Allocates a new instance
    pub fn new(newmark: &Newmark, dt_min: f64) -> Result<Self, StrError> {
        let theta1 = newmark.gamma;
        let theta2 = 2.0 * newmark.beta;
        if theta1 < 0.5 {
            return Err("Newmark's method requires: γ ≥ 1/2");
        }
        if theta2 < theta1 {
            return Err("Newmark's method requires: 2β ≥ γ");
        }
        if dt_min < CONTROL_MIN_DT_MIN {
            return Err("the minimum timestep is too small");
        }
        Ok(ControlTime { theta1, theta2, dt_min })
    }

    /// Calculates all derived coefficients for given timestep Δt
    pub fn coefficients(&self, dt: f64) -> Result<NewmarkCoefficients, StrError> {
        if dt < self.dt_min {
            return Err("Δt is smaller than the allowed minimum");
        }
        let m = dt * dt / 2.0;
        Ok(NewmarkCoefficients {
            alpha1: 1.0 / (self.theta2 * m),
            alpha2: dt / (self.theta2 * m),
            alpha3: 1.0 / self.theta2 - 1.0,
            alpha4: self.theta1 * dt / (self.theta2 * m),
            alpha5: 2.0 * self.theta1 / self.theta2 - 1.0,
            alpha6: (self.theta1 / self.theta2 - 1.0) * dt,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
