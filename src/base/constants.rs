/// Defines the directory where the recorder files are saved
pub const DEFAULT_OUT_DIR: &str = "Outputs";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/liqsim/test";

/// Defines the default ground motion file (one acceleration sample per line, in g)
pub const DEFAULT_GROUND_MOTION_FILE: &str = "acc_value.txt";

/// Gravity acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Defines the first tag of the permeability parameters
///
/// The k-th element (zero-based) receives `FIRST_PARAMETER_TAG + 2k` (vertical) and
/// `FIRST_PARAMETER_TAG + 2k + 1` (horizontal).
pub const FIRST_PARAMETER_TAG: usize = 10001;

/// Defines the smallest allowed dt_min
pub const CONTROL_MIN_DT_MIN: f64 = 1e-10;

/// Defines the smallest allowed tolerance
pub const CONTROL_MIN_TOL: f64 = 1e-15;

/// Relative tolerance on the recording interval (a row is written slightly before t_next)
pub const RECORDER_REL_DT_TOL: f64 = 1e-5;
