use liqsim::base::{Config, GroundMotion};
use liqsim::fem::{ShearColumn, Simulation, Summary};
use liqsim::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "liqsim",
    about = "Runs the gravity and seismic analyses of the liquefiable soil column"
)]
struct Options {
    /// JSON file with the configuration (missing keys take the default values)
    #[structopt(short, long)]
    config: Option<String>,

    /// Ground motion file (overrides the configuration)
    #[structopt(short, long)]
    ground_motion: Option<String>,

    /// Output directory (overrides the configuration)
    #[structopt(short, long)]
    out_dir: Option<String>,

    /// Writes the configuration to this file (e.g., to start a new JSON file) and exits
    #[structopt(long)]
    write_config: Option<String>,

    /// Prints the timesteps
    #[structopt(short, long)]
    verbose: bool,

    /// Prints nothing
    #[structopt(short, long)]
    quiet: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // configuration
    let mut config = match &options.config {
        Some(path) => Config::read_json(path)?,
        None => Config::new(),
    };
    if let Some(path) = &options.ground_motion {
        let (dt, factor) = (config.ground_motion_dt, config.ground_motion_factor);
        config.set_ground_motion(path, dt, factor);
    }
    if let Some(out_dir) = &options.out_dir {
        config.set_out_dir(out_dir);
    }
    if options.verbose {
        config.set_verbose(true, true, false);
    }
    if options.quiet {
        config.set_verbose(false, false, false);
    }
    if let Some(path) = &options.write_config {
        config.write_json(path)?;
        println!("configuration written to {}", path);
        return Ok(());
    }

    // input motion
    let motion = GroundMotion::read(
        &config.ground_motion_path,
        config.ground_motion_dt,
        config.ground_motion_factor,
    )?;

    // run
    let mut engine = ShearColumn::from_config(&config)?;
    let mut sim = Simulation::new(&config, &mut engine)?;
    let summary = sim.run(&motion, &config.ground_motion_path)?;

    // message
    if !options.quiet {
        let path = Summary::path(&config.out_dir);
        let thin_line = format!("{:─^1$}", "", path.len());
        println!("\n\n{}", thin_line);
        match &summary.dynamic {
            Some(report) if report.completed => println!("dynamic analysis completed; the summary is:"),
            _ => println!("dynamic analysis did NOT complete; the summary is:"),
        }
        println!("{}", path);
        println!("{}\n\n", thin_line);
    }
    Ok(())
}
