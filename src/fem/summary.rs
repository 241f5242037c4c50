use super::DynamicReport;
use crate::base::{Config, Grid, StageControl};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the ground motion data used in the dynamic analysis
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GroundMotionInfo {
    /// Path of the file
    pub path: String,

    /// Sample interval
    pub dt: f64,

    /// Scale factor
    pub factor: f64,

    /// Number of samples
    pub n_samples: usize,

    /// Duration of the record
    pub duration: f64,

    /// Peak absolute (scaled) acceleration
    pub peak: f64,
}

/// Records what was run and how it ended
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Summary {
    /// Structured grid
    pub grid: Grid,

    /// Rayleigh coefficients (a0, a1)
    pub rayleigh: (f64, f64),

    /// Elastic gravity stage
    pub gravity_elastic: StageControl,

    /// Elastoplastic gravity stage
    pub gravity_plastic: StageControl,

    /// Number of registered permeability parameters
    pub n_parameter: usize,

    /// Ground motion
    pub ground_motion: Option<GroundMotionInfo>,

    /// Outcome of the dynamic analysis
    pub dynamic: Option<DynamicReport>,

    /// Paths of the recorder files
    pub recorder_files: Vec<String>,
}

impl Summary {
    /// Allocates a new instance with the data of a configuration
    pub fn new(config: &Config) -> Self {
        Summary {
            grid: config.grid,
            rayleigh: config.rayleigh_coefficients(),
            gravity_elastic: config.gravity_elastic,
            gravity_plastic: config.gravity_plastic,
            n_parameter: 0,
            ground_motion: None,
            dynamic: None,
            recorder_files: Vec::new(),
        }
    }

    /// Returns the path of the summary file in a directory
    pub fn path(out_dir: &str) -> String {
        format!("{}/summary.json", out_dir)
    }

    /// Reads a JSON file containing this struct
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
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

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Summary;
    use crate::base::{Config, DEFAULT_TEST_DIR};
    use crate::fem::{Attempt, DynamicReport};
    use russell_lab::approx_eq;

    #[test]
    fn read_and_write_work() {
        let config = Config::new();
        let mut summary = Summary::new(&config);
        assert_eq!(summary.grid.nx, 20);
        summary.dynamic = Some(DynamicReport {
            t_target: 0.01,
            t_final: 0.0075,
            completed: false,
            attempts: vec![Attempt {
                dt: 0.0025,
                n_steps: 4,
                n_completed: 3,
                converged: false,
                t_start: 0.0,
                t_end: 0.0075,
            }],
        });
        summary.recorder_files.push("Outputs/disp2.txt".to_string());
        let path = Summary::path(&format!("{}/summary", DEFAULT_TEST_DIR));
        summary.write_json(&path).unwrap();
        let read = Summary::read_json(&path).unwrap();
        assert_eq!(read.grid, summary.grid);
        assert_eq!(read.dynamic, summary.dynamic);
        assert_eq!(read.recorder_files, summary.recorder_files);
        approx_eq(read.rayleigh.0, summary.rayleigh.0, 1e-15);
        approx_eq(read.rayleigh.1, summary.rayleigh.1, 1e-15);
        assert_eq!(
            Summary::read_json("/tmp/liqsim/__not_found__.json").err(),
            Some("cannot open file")
        );
    }
}
