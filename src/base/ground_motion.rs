use crate::StrError;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Holds an acceleration time series sampled at a fixed interval
///
/// The value at time t is linearly interpolated between samples and multiplied by the scale
/// factor. Outside the record (t < 0 or t beyond the last sample) the value is zero.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundMotion {
    /// Sample interval
    pub dt: f64,

    /// Scale factor (e.g., g to convert from g-units to m/s²)
    pub factor: f64,

    /// Holds the (unscaled) samples
    pub samples: Vec<f64>,
}

impl GroundMotion {
    /// Allocates a new instance
    pub fn new(dt: f64, factor: f64, samples: Vec<f64>) -> Result<Self, StrError> {
        if dt <= 0.0 {
            return Err("the sample interval must be > 0.0");
        }
        if samples.len() == 0 {
            return Err("the ground motion requires at least one sample");
        }
        Ok(GroundMotion { dt, factor, samples })
    }

    /// Reads a file with one acceleration sample per line
    ///
    /// Only the first whitespace-separated token of each line is used. Blank lines are skipped.
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    /// * `dt` -- sample interval
    /// * `factor` -- scale factor
    pub fn read<P>(full_path: &P, dt: f64, factor: f64) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open ground motion file")?;
        let buffered = BufReader::new(file);
        let mut samples = Vec::new();
        for line in buffered.lines() {
            let line = line.map_err(|_| "cannot read line of ground motion file")?;
            let mut tokens = line.split_whitespace();
            if let Some(token) = tokens.next() {
                let value: f64 = token.parse().map_err(|_| "cannot parse acceleration value")?;
                samples.push(value);
            }
        }
        GroundMotion::new(dt, factor, samples)
    }

    /// Returns the duration of the record (time of the last sample)
    pub fn duration(&self) -> f64 {
        ((self.samples.len() - 1) as f64) * self.dt
    }

    /// Returns the times of the samples
    pub fn times(&self) -> Vec<f64> {
        (0..self.samples.len()).map(|i| (i as f64) * self.dt).collect()
    }

    /// Returns the scaled value at time t
    pub fn value(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let s = t / self.dt;
        let i = f64::floor(s) as usize;
        let n = self.samples.len();
        if i + 1 >= n {
            if i + 1 == n && f64::abs(s - (i as f64)) < 1e-12 {
                return self.factor * self.samples[i];
            }
            return 0.0;
        }
        let xi = s - (i as f64);
        self.factor * ((1.0 - xi) * self.samples[i] + xi * self.samples[i + 1])
    }

    /// Returns the peak absolute (scaled) value
    pub fn peak(&self) -> f64 {
        self.samples
            .iter()
            .fold(0.0, |acc, a| f64::max(acc, f64::abs(self.factor * a)))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
