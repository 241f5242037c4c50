use super::{Engine, Monitor, Recorders};
use crate::StrError;

/// Holds the outcome of a sequence of steps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzeResult {
    /// Number of committed steps
    pub n_completed: usize,

    /// Indicates that all steps converged
    pub converged: bool,
}

/// Performs `n_steps` steps with constant Δt
///
/// Stops at the first non-converged step; the engine keeps the state of the last
/// committed step. The recorders (if any) are called after each committed step.
pub fn analyze<E: Engine>(
    engine: &mut E,
    n_steps: usize,
    dt: f64,
    mut recorders: Option<&mut Recorders>,
    monitor: &Monitor,
) -> Result<AnalyzeResult, StrError> {
    for timestep in 0..n_steps {
        monitor.print_timestep(timestep, engine.time() + dt, dt);
        let report = engine.step(dt)?;
        monitor.print_iterations(&report);
        if !report.converged {
            return Ok(AnalyzeResult {
                n_completed: timestep,
                converged: false,
            });
        }
        if let Some(r) = recorders.as_deref_mut() {
            r.record(engine)?;
        }
    }
    Ok(AnalyzeResult {
        n_completed: n_steps,
        converged: true,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::analyze;
    use crate::base::{Config, ConvergenceTest, Newmark, DEFAULT_TEST_DIR};
    use crate::fem::{AnalysisSetup, Engine, Monitor, Recorders, ShearColumn};
    use russell_lab::approx_eq;
    use std::fs;

    #[test]
    fn analyze_works() {
        let mut config = Config::new();
        config
            .set_out_dir(&format!("{}/analyze", DEFAULT_TEST_DIR))
            .set_dt_out(0.0);
        let mut engine = ShearColumn::from_config(&config).unwrap();
        engine
            .set_analysis(AnalysisSetup {
                newmark: Newmark::dissipative(1.5),
                test: ConvergenceTest::NormDispIncr,
                tol: 1e-2,
                n_max_iterations: 50,
                rayleigh: (0.0, 0.0),
                excitation: None,
            })
            .unwrap();
        let mut recorders = Recorders::standard(&config).unwrap();
        let res = analyze(&mut engine, 3, 5e3, Some(&mut recorders), &Monitor::quiet()).unwrap();
        recorders.close().unwrap();
        assert!(res.converged);
        assert_eq!(res.n_completed, 3);
        approx_eq(engine.time(), 1.5e4, 1e-12);
        let contents = fs::read_to_string(&recorders.paths()[0]).unwrap();
        assert_eq!(contents.lines().count(), 3);

        // without recorders
        let res = analyze(&mut engine, 2, 10.0, None, &Monitor::quiet()).unwrap();
        assert_eq!(res.n_completed, 2);
        approx_eq(engine.time(), 1.502e4, 1e-12);
    }

    #[test]
    fn analyze_propagates_errors() {
        let config = Config::new();
        let mut engine = ShearColumn::from_config(&config).unwrap();
        assert_eq!(
            analyze(&mut engine, 1, 1.0, None, &Monitor::quiet()).err(),
            Some("analysis has not been defined")
        );
    }
}
