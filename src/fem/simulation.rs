use super::{analyze, AdaptiveTimestep, AnalysisSetup, DynamicReport, Engine, Monitor, Recorders};
use super::{GroundMotionInfo, Summary};
use crate::base::{Config, ElementParameter, GroundMotion, MaterialStage, StageControl, FIRST_PARAMETER_TAG};
use crate::StrError;
use std::fs;

/// Runs the staged analysis of the liquefiable soil column
///
/// The stages are:
///
/// 1. Gravity with elastic material
/// 2. Gravity with elastoplastic material; then the analysis is wiped and the time is reset to zero
/// 3. Registration of the permeability parameters and update to the dynamic values
/// 4. Recorders
/// 5. Dynamic analysis with timestep-halving retry
pub struct Simulation<'a, E: Engine> {
    /// Holds the configuration
    pub config: &'a Config,

    /// Holds the engine
    pub engine: &'a mut E,

    /// Prints the progress
    pub monitor: Monitor,

    /// Holds what was run
    pub summary: Summary,
}

impl<'a, E: Engine> Simulation<'a, E> {
    /// Allocates a new instance
    pub fn new(config: &'a Config, engine: &'a mut E) -> Result<Self, StrError> {
        if let Some(msg) = config.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate simulation because config.validate() failed");
        }
        Ok(Simulation {
            config,
            engine,
            monitor: Monitor::new(config),
            summary: Summary::new(config),
        })
    }

    /// Runs a gravity stage
    fn gravity(&mut self, name: &str, stage: MaterialStage, control: StageControl) -> Result<(), StrError> {
        self.monitor.print_stage(name, control.n_steps, control.dt);
        self.engine.set_material_stage(stage)?;
        self.engine.set_analysis(AnalysisSetup {
            newmark: self.config.gravity_newmark,
            test: self.config.gravity_test,
            tol: self.config.gravity_tol,
            n_max_iterations: self.config.gravity_n_max_iterations,
            rayleigh: (0.0, 0.0),
            excitation: None,
        })?;
        self.monitor.print_header();
        let res = analyze(self.engine, control.n_steps, control.dt, None, &self.monitor)?;
        self.monitor.print_footer();
        if !res.converged {
            self.monitor.print_failure(self.engine.time(), control.dt);
            return Err("gravity analysis failed to converge");
        }
        self.monitor.print_done(self.engine.time(), true);
        Ok(())
    }

    /// Runs the gravity stage with elastic material
    pub fn gravity_elastic(&mut self) -> Result<(), StrError> {
        self.gravity("GRAVITY (ELASTIC)", MaterialStage::Elastic, self.config.gravity_elastic)
    }

    /// Runs the gravity stage with elastoplastic material
    ///
    /// Afterwards, the analysis is wiped and the time is reset to zero.
    pub fn gravity_plastic(&mut self) -> Result<(), StrError> {
        self.gravity(
            "GRAVITY (ELASTOPLASTIC)",
            MaterialStage::ElastoPlastic,
            self.config.gravity_plastic,
        )?;
        self.engine.wipe_analysis();
        self.engine.set_time(0.0);
        Ok(())
    }

    /// Registers the permeability parameters of all elements and sets the dynamic values
    ///
    /// The k-th element (zero-based) uses the tags `10001 + 2k` (vertical) and `10002 + 2k`
    /// (horizontal). Returns the number of registered parameters.
    pub fn update_permeabilities(&mut self) -> Result<usize, StrError> {
        let n_element = self.config.grid.n_element();
        for k in 0..n_element {
            let element = k + 1;
            let tag_v = FIRST_PARAMETER_TAG + 2 * k;
            let tag_h = tag_v + 1;
            self.engine.add_parameter(tag_v, element, ElementParameter::VerticalPerm)?;
            self.engine.add_parameter(tag_h, element, ElementParameter::HorizontalPerm)?;
            self.engine.update_parameter(tag_v, self.config.perm_v_dynamic)?;
            self.engine.update_parameter(tag_h, self.config.perm_h_dynamic)?;
        }
        self.summary.n_parameter = 2 * n_element;
        Ok(2 * n_element)
    }

    /// Runs the dynamic analysis
    pub fn dynamic(
        &mut self,
        motion: &GroundMotion,
        recorders: Option<&mut Recorders>,
    ) -> Result<DynamicReport, StrError> {
        let control = self.config.dynamic;
        self.monitor.print_stage("DYNAMIC", control.n_steps, control.dt);
        let (a0, a1) = self.config.rayleigh_coefficients();
        self.monitor.print_damping(a0, a1);
        self.engine.set_analysis(AnalysisSetup {
            newmark: self.config.dynamic_newmark,
            test: self.config.dynamic_test,
            tol: self.config.dynamic_tol,
            n_max_iterations: self.config.dynamic_n_max_iterations,
            rayleigh: (a0, a1),
            excitation: Some(motion.clone()),
        })?;
        let adaptive = AdaptiveTimestep::new(self.config.max_halvings, self.config.dt_min)?;
        self.monitor.print_header();
        let report = adaptive.run(self.engine, control.n_steps, control.dt, recorders, &self.monitor)?;
        self.monitor.print_footer();
        self.summary.dynamic = Some(report.clone());
        Ok(report)
    }

    /// Runs all stages and writes the mesh, the recorder files, and `summary.json` to the output directory
    pub fn run(&mut self, motion: &GroundMotion, motion_path: &str) -> Result<&Summary, StrError> {
        fs::create_dir_all(&self.config.out_dir).map_err(|_| "cannot create output directory")?;
        let mesh = self.config.grid.mesh(self.config.material_tag);
        mesh.write_json(&format!("{}/mesh.json", self.config.out_dir))?;
        if self.monitor.verbose_stages {
            self.config.grid.print_nodes();
        }
        self.gravity_elastic()?;
        self.gravity_plastic()?;
        self.update_permeabilities()?;
        let mut recorders = Recorders::standard(self.config)?;
        self.summary.recorder_files = recorders.paths();
        self.summary.ground_motion = Some(GroundMotionInfo {
            path: motion_path.to_string(),
            dt: motion.dt,
            factor: motion.factor,
            n_samples: motion.samples.len(),
            duration: motion.duration(),
            peak: motion.peak(),
        });
        let res = self.dynamic(motion, Some(&mut recorders));
        recorders.close()?;
        res?;
        self.summary.write_json(&Summary::path(&self.config.out_dir))?;
        Ok(&self.summary)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
