use super::{analyze, Engine, Monitor, Recorders};
use crate::base::CONTROL_MIN_DT_MIN;
use crate::StrError;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when converting the remaining time into a number of steps
const REMAINING_STEPS_TOL: f64 = 1e-6;

/// Holds the data of one attempt of the dynamic analysis
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Attempt {
    /// Timestep
    pub dt: f64,

    /// Number of planned steps
    pub n_steps: usize,

    /// Number of committed steps
    pub n_completed: usize,

    /// Indicates that all planned steps converged
    pub converged: bool,

    /// Engine time at the beginning of the attempt
    pub t_start: f64,

    /// Engine time at the end of the attempt
    pub t_end: f64,
}

/// Holds the outcome of the dynamic analysis with adaptive timestep
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct DynamicReport {
    /// Target time (initial time + n_steps · Δt)
    pub t_target: f64,

    /// Engine time at the end of the analysis
    pub t_final: f64,

    /// Indicates that the target time has been reached
    pub completed: bool,

    /// All attempts (the first one uses the nominal Δt)
    pub attempts: Vec<Attempt>,
}

impl DynamicReport {
    /// Returns the number of timestep halvings performed
    pub fn n_halvings(&self) -> usize {
        if self.attempts.is_empty() {
            0
        } else {
            self.attempts.len() - 1
        }
    }
}

/// Drives the dynamic analysis with a bounded timestep-halving retry
///
/// After a non-converged step at time `t_now`, the remaining time `t_end - t_now` is covered
/// with `Δt' = Δt/2` and `n' = ceil((t_end - t_now)/Δt')` steps (an exact multiple does not
/// add a step). At most `max_halvings` retries are made; a failure after that is reported in
/// [DynamicReport] and is not an error.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveTimestep {
    /// Maximum number of halvings
    pub max_halvings: usize,

    /// Minimum timestep; a retry with a smaller Δt is not attempted
    pub dt_min: f64,
}

impl AdaptiveTimestep {
    /// Allocates a new instance
    pub fn new(max_halvings: usize, dt_min: f64) -> Result<Self, StrError> {
        if dt_min < CONTROL_MIN_DT_MIN {
            return Err("the minimum timestep is too small");
        }
        Ok(AdaptiveTimestep { max_halvings, dt_min })
    }

    /// Returns the number of steps of size Δt needed to cover the time from t_now to t_end
    pub fn remaining_steps(t_now: f64, t_end: f64, dt: f64) -> usize {
        let remaining = t_end - t_now;
        if remaining <= 0.0 {
            return 0;
        }
        let n = f64::ceil(remaining / dt - REMAINING_STEPS_TOL);
        if n < 0.0 {
            0
        } else {
            n as usize
        }
    }

    /// Returns the (Δt, n_steps) of the next attempt after a failure
    ///
    /// Returns None if the maximum number of halvings has been reached, if the halved Δt
    /// is smaller than the minimum, or if there is nothing left to compute.
    pub fn next_attempt(&self, n_halvings: usize, t_now: f64, t_end: f64, dt: f64) -> Option<(f64, usize)> {
        if n_halvings >= self.max_halvings {
            return None;
        }
        let dt_new = dt / 2.0;
        if dt_new < self.dt_min {
            return None;
        }
        match AdaptiveTimestep::remaining_steps(t_now, t_end, dt_new) {
            0 => None,
            n => Some((dt_new, n)),
        }
    }

    /// Runs the dynamic analysis
    pub fn run<E: Engine>(
        &self,
        engine: &mut E,
        n_steps: usize,
        dt: f64,
        mut recorders: Option<&mut Recorders>,
        monitor: &Monitor,
    ) -> Result<DynamicReport, StrError> {
        if dt < self.dt_min {
            return Err("Δt is smaller than the allowed minimum");
        }
        let t_initial = engine.time();
        let t_target = t_initial + (n_steps as f64) * dt;
        let mut attempts = Vec::new();
        let (mut dt_current, mut n_current) = (dt, n_steps);
        loop {
            let t_start = engine.time();
            let res = analyze(engine, n_current, dt_current, recorders.as_deref_mut(), monitor)?;
            let t_end = engine.time();
            attempts.push(Attempt {
                dt: dt_current,
                n_steps: n_current,
                n_completed: res.n_completed,
                converged: res.converged,
                t_start,
                t_end,
            });
            if res.converged {
                break;
            }
            monitor.print_failure(t_end, dt_current);
            match self.next_attempt(attempts.len() - 1, t_end, t_target, dt_current) {
                Some((dt_new, n_new)) => {
                    monitor.print_retry(attempts.len(), dt_new, n_new);
                    dt_current = dt_new;
                    n_current = n_new;
                }
                None => break,
            }
        }
        let completed = match attempts.last() {
            Some(a) => a.converged,
            None => true,
        };
        let t_final = engine.time();
        monitor.print_done(t_final, completed);
        Ok(DynamicReport {
            t_target,
            t_final,
            completed,
            attempts,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{AdaptiveTimestep, Attempt, DynamicReport};

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            AdaptiveTimestep::new(2, 0.0).err(),
            Some("the minimum timestep is too small")
        );
        let adaptive = AdaptiveTimestep::new(2, 1e-8).unwrap();
        assert_eq!(adaptive.max_halvings, 2);
    }

    #[test]
    fn remaining_steps_works() {
        assert_eq!(AdaptiveTimestep::remaining_steps(1.0, 1.0, 0.1), 0);
        assert_eq!(AdaptiveTimestep::remaining_steps(2.0, 1.0, 0.1), 0);
        // exact multiple (within round-off)
        assert_eq!(AdaptiveTimestep::remaining_steps(0.0, 0.3, 0.1), 3);
        assert_eq!(AdaptiveTimestep::remaining_steps(0.0025, 0.0125, 0.00125), 8);
        // between step boundaries
        assert_eq!(AdaptiveTimestep::remaining_steps(0.0, 0.31, 0.1), 4);
    }

    #[test]
    fn remaining_steps_covers_the_remaining_time() {
        let t_end = 32.5;
        let dt = 0.00125;
        for t_now in [0.0, 0.0025, 1.234567, 17.0001, 32.49] {
            let n = AdaptiveTimestep::remaining_steps(t_now, t_end, dt);
            let remaining = t_end - t_now;
            assert!((n as f64) * dt >= remaining - 1e-6 * dt);
            assert!(((n - 1) as f64) * dt < remaining);
        }
    }

    #[test]
    fn next_attempt_works() {
        let adaptive = AdaptiveTimestep::new(2, 1e-4).unwrap();
        // first failure: halve once; the doubled-count rule would give (13000 - 400) · 2 = 25200
        let (dt, n) = adaptive.next_attempt(0, 1.0, 32.5, 0.0025).unwrap();
        assert_eq!(dt, 0.00125);
        assert_eq!(n, 25200);
        // failure in between step boundaries
        let (dt, n) = adaptive.next_attempt(1, 1.0006, 32.5, 0.00125).unwrap();
        assert_eq!(dt, 0.000625);
        assert_eq!(n, 50400);
        // maximum number of halvings reached
        assert_eq!(adaptive.next_attempt(2, 1.0, 32.5, 0.000625), None);
        // too small
        assert_eq!(adaptive.next_attempt(0, 1.0, 32.5, 1e-4), None);
        // nothing to do
        assert_eq!(adaptive.next_attempt(0, 32.5, 32.5, 0.0025), None);
    }

    #[test]
    fn n_halvings_works() {
        let report = DynamicReport {
            t_target: 1.0,
            t_final: 1.0,
            completed: true,
            attempts: Vec::new(),
        };
        assert_eq!(report.n_halvings(), 0);

        let attempt = |dt: f64, n_steps: usize, n_completed: usize, t_start: f64, t_end: f64| Attempt {
            dt,
            n_steps,
            n_completed,
            converged: n_completed == n_steps,
            t_start,
            t_end,
        };
        let report = DynamicReport {
            t_target: 0.05,
            t_final: 0.05,
            completed: true,
            attempts: vec![
                attempt(0.0025, 20, 4, 0.0, 0.01),
                attempt(0.00125, 32, 1, 0.01, 0.01125),
                attempt(0.000625, 62, 62, 0.01125, 0.05),
            ],
        };
        assert_eq!(report.n_halvings(), 2);
        assert!(!report.attempts[1].converged && report.attempts[2].converged);
    }
}
