use liqsim::base::{Config, GroundMotion};
use liqsim::plot::Figures;
use liqsim::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "liqsim_plot",
    about = "Draws the pore pressure, acceleration, and displacement histories"
)]
struct Options {
    /// JSON file with the configuration used in the simulation
    #[structopt(short, long)]
    config: Option<String>,

    /// Ground motion file (overrides the configuration)
    #[structopt(short, long)]
    ground_motion: Option<String>,

    /// Directory with the recorder files (overrides the configuration)
    #[structopt(short, long)]
    out_dir: Option<String>,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // configuration
    let config = match &options.config {
        Some(path) => Config::read_json(path)?,
        None => Config::new(),
    };
    let motion_path = match &options.ground_motion {
        Some(path) => path.clone(),
        None => config.ground_motion_path.clone(),
    };
    let out_dir = match &options.out_dir {
        Some(d) => d.clone(),
        None => config.out_dir.clone(),
    };

    // input motion (in g)
    let motion = GroundMotion::read(&motion_path, config.ground_motion_dt, 1.0)?;

    // figures
    let figures = Figures::new(&config, &motion)?;
    let paths = figures.draw_all(&out_dir)?;

    // message
    for path in &paths {
        println!("{}", path);
    }
    Ok(())
}
