use liqsim::base::{Dof, ElementParameter, ElementQuantity, MaterialStage, Response, DEFAULT_TEST_DIR};
use liqsim::fem::{AdaptiveTimestep, AnalysisSetup, Engine, Monitor, Recorders, StepReport};
use liqsim::StrError;
use russell_lab::approx_eq;
use std::fs;

/// Engine that fails to converge when a step starts inside a window and Δt is too large
///
/// Each window is (t_start, t_end, Δt_ok).
struct ScriptedEngine {
    t: f64,
    windows: Vec<(f64, f64, f64)>,
    n_calls: usize,
}

impl ScriptedEngine {
    fn new(windows: &[(f64, f64, f64)]) -> Self {
        ScriptedEngine {
            t: 0.0,
            windows: windows.to_vec(),
            n_calls: 0,
        }
    }
}

impl Engine for ScriptedEngine {
    fn set_material_stage(&mut self, _: MaterialStage) -> Result<(), StrError> {
        Ok(())
    }
    fn set_analysis(&mut self, _: AnalysisSetup) -> Result<(), StrError> {
        Ok(())
    }
    fn wipe_analysis(&mut self) {}
    fn add_parameter(&mut self, _: usize, _: usize, _: ElementParameter) -> Result<(), StrError> {
        Ok(())
    }
    fn update_parameter(&mut self, _: usize, _: f64) -> Result<(), StrError> {
        Ok(())
    }
    fn step(&mut self, dt: f64) -> Result<StepReport, StrError> {
        self.n_calls += 1;
        let fail = self.windows.iter().any(|(t_start, t_end, dt_ok)| {
            self.t >= t_start - 1e-12 && self.t < t_end - 1e-12 && dt > dt_ok * (1.0 + 1e-12)
        });
        if fail {
            return Ok(StepReport {
                converged: false,
                iterations: 10,
                norm_mdu: 1.0,
            });
        }
        self.t += dt;
        Ok(StepReport {
            converged: true,
            iterations: 2,
            norm_mdu: 1e-12,
        })
    }
    fn time(&self) -> f64 {
        self.t
    }
    fn set_time(&mut self, t: f64) {
        self.t = t;
    }
    fn node_response(&self, _: usize, _: Dof, _: Response) -> Result<f64, StrError> {
        Ok(self.t)
    }
    fn element_response(&self, _: usize, _: ElementQuantity) -> Result<Vec<f64>, StrError> {
        Ok(vec![self.t; 3])
    }
}

#[test]
fn retry_is_not_needed() -> Result<(), StrError> {
    let mut engine = ScriptedEngine::new(&[]);
    let adaptive = AdaptiveTimestep::new(2, 1e-8)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, None, &Monitor::quiet())?;
    assert!(report.completed);
    assert_eq!(report.n_halvings(), 0);
    assert_eq!(report.attempts[0].n_completed, 20);
    assert_eq!(engine.n_calls, 20);
    approx_eq(report.t_final, 0.05, 1e-15);
    approx_eq(report.t_target, 0.05, 1e-15);
    Ok(())
}

#[test]
fn one_halving_completes_the_analysis() -> Result<(), StrError> {
    // fails at t = 0.01 with Δt = 0.0025; fine with Δt = 0.00125
    let mut engine = ScriptedEngine::new(&[(0.01, 0.0125, 0.00125)]);
    let adaptive = AdaptiveTimestep::new(2, 1e-8)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, None, &Monitor::quiet())?;
    assert!(report.completed);
    assert_eq!(report.n_halvings(), 1);

    let first = &report.attempts[0];
    assert!(!first.converged);
    assert_eq!(first.n_completed, 4);
    approx_eq(first.t_end, 0.01, 1e-15);

    // the retry starts where the failure happened (no restart)
    let second = &report.attempts[1];
    assert!(second.converged);
    assert_eq!(second.dt, 0.00125);
    approx_eq(second.t_start, 0.01, 1e-15);
    assert_eq!(second.n_steps, 32);
    assert_eq!(second.n_completed, 32);
    approx_eq(report.t_final, 0.05, 1e-14);
    Ok(())
}

#[test]
fn two_halvings_complete_the_analysis() -> Result<(), StrError> {
    // the first retry fails at t = 0.01125 (between the nominal step boundaries)
    let mut engine = ScriptedEngine::new(&[(0.01, 0.01125, 0.00125), (0.01125, 0.0125, 0.000625)]);
    let adaptive = AdaptiveTimestep::new(2, 1e-8)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, None, &Monitor::quiet())?;
    assert!(report.completed);
    assert_eq!(report.n_halvings(), 2);

    let third = &report.attempts[2];
    assert_eq!(third.dt, 0.000625);
    approx_eq(third.t_start, 0.01125, 1e-15);
    assert_eq!(third.n_steps, 62);

    // the planned steps cover the remaining time
    for attempt in &report.attempts {
        let remaining = report.t_target - attempt.t_start;
        let dt = attempt.dt;
        assert!((attempt.n_steps as f64) * dt >= remaining - 1e-6 * dt);
        assert!(((attempt.n_steps - 1) as f64) * dt < remaining);
    }
    approx_eq(report.t_final, 0.05, 1e-14);
    Ok(())
}

#[test]
fn failure_after_the_last_halving_is_reported() -> Result<(), StrError> {
    // never converges after t = 0.01
    let mut engine = ScriptedEngine::new(&[(0.01, 1.0, 0.0)]);
    let adaptive = AdaptiveTimestep::new(2, 1e-8)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, None, &Monitor::quiet())?;
    assert!(!report.completed);
    assert_eq!(report.attempts.len(), 3);
    assert_eq!(report.attempts[1].dt, 0.00125);
    assert_eq!(report.attempts[2].dt, 0.000625);
    for attempt in &report.attempts[1..] {
        assert_eq!(attempt.n_completed, 0);
    }
    approx_eq(report.t_final, 0.01, 1e-15);
    assert_eq!(engine.n_calls, 4 + 1 + 1 + 1);

    // no halvings allowed
    let mut engine = ScriptedEngine::new(&[(0.01, 1.0, 0.0)]);
    let adaptive = AdaptiveTimestep::new(0, 1e-8)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, None, &Monitor::quiet())?;
    assert!(!report.completed);
    assert_eq!(report.attempts.len(), 1);

    // the halved timestep would be too small
    let mut engine = ScriptedEngine::new(&[(0.01, 1.0, 0.0)]);
    let adaptive = AdaptiveTimestep::new(2, 0.002)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, None, &Monitor::quiet())?;
    assert_eq!(report.attempts.len(), 1);
    Ok(())
}

#[test]
fn recorders_follow_all_attempts() -> Result<(), StrError> {
    let path = format!("{}/adaptive_retry_recorder.txt", DEFAULT_TEST_DIR);
    let mut recorders = Recorders::new();
    recorders.add_node(&path, &[1], &[Dof::Ux], Response::Disp, 0.01)?;
    let mut engine = ScriptedEngine::new(&[(0.01, 0.0125, 0.00125)]);
    let adaptive = AdaptiveTimestep::new(2, 1e-8)?;
    let report = adaptive.run(&mut engine, 20, 0.0025, Some(&mut recorders), &Monitor::quiet())?;
    recorders.close()?;
    assert!(report.completed);

    let contents = fs::read_to_string(&path).map_err(|_| "cannot read file")?;
    let times: Vec<f64> = contents
        .lines()
        .map(|line| line.split_whitespace().next().unwrap().parse().unwrap())
        .collect();
    assert!(times.len() >= 5);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 0.01 * (1.0 - 1e-5));
    }
    approx_eq(times[0], 0.0025, 1e-15);
    Ok(())
}
