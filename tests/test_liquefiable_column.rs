use liqsim::base::{Config, Dof, Grid, GroundMotion, Response, StageControl, DEFAULT_TEST_DIR};
use liqsim::fem::{Engine, ShearColumn, Simulation, Summary};
use liqsim::plot::{Figures, Table};
use liqsim::StrError;
use russell_lab::approx_eq;
use std::fs;

// Liquefiable soil column (reduced)
//
// The column has the width of two elements and the height of six elements (1 m each).
// The recorded nodes are on the left side at depths 5, 3, 2, 1, and 0 m.
//
//  y=6 ─ 19 20 21   ← drained surface
//        ...
//  y=0 ─  1  2  3   ← fixed base (excited)
//
// The input motion is a short sine pulse (in g) read from a text file.

const SAVE_FIGURE: bool = false;

fn write_ground_motion(path: &str) -> Result<(), StrError> {
    let mut text = String::new();
    for i in 0..=20 {
        let t = 0.01 * (i as f64);
        let a = 0.1 * f64::sin(2.0 * std::f64::consts::PI * t / 0.2);
        text.push_str(&format!("{}\n", a));
    }
    text.push('\n'); // trailing blank line
    fs::create_dir_all(DEFAULT_TEST_DIR).map_err(|_| "cannot create directory")?;
    fs::write(path, text).map_err(|_| "cannot write file")
}

#[test]
fn test_liquefiable_column() -> Result<(), StrError> {
    // input files
    let motion_path = format!("{}/liquefiable_column_acc_value.txt", DEFAULT_TEST_DIR);
    write_ground_motion(&motion_path)?;
    let out_dir = format!("{}/liquefiable_column", DEFAULT_TEST_DIR);

    // configuration
    let mut config = Config::new();
    config
        .set_grid(Grid::new(2, 6, 1.0, 1.0)?)
        .set_recorded_nodes(&[4, 10, 13, 16, 19])
        .set_recorded_elements(&[1, 11])
        .set_dynamic(80, 0.0025)
        .set_dt_out(0.01)
        .set_ground_motion(&motion_path, 0.01, 9.81)
        .set_out_dir(&out_dir)
        .set_verbose(false, false, false);
    config.gravity_elastic = StageControl { n_steps: 2, dt: 5e3 };
    config.gravity_plastic = StageControl { n_steps: 2, dt: 10.0 };
    let config_path = format!("{}/config.json", out_dir);
    config.write_json(&config_path)?;
    let config = Config::read_json(&config_path)?;
    assert_eq!(config.validate(), None);

    // run
    let motion = GroundMotion::read(&config.ground_motion_path, config.ground_motion_dt, config.ground_motion_factor)?;
    assert_eq!(motion.samples.len(), 21);
    let mut engine = ShearColumn::from_config(&config)?;
    let mut sim = Simulation::new(&config, &mut engine)?;
    let summary = sim.run(&motion, &motion_path)?.clone();

    // summary
    let report = summary.dynamic.as_ref().unwrap();
    assert!(report.completed);
    assert_eq!(report.n_halvings(), 0);
    approx_eq(report.t_final, 0.2, 1e-14);
    assert_eq!(summary.n_parameter, 24);
    let info = summary.ground_motion.as_ref().unwrap();
    assert_eq!(info.n_samples, 21);
    approx_eq(info.duration, 0.2, 1e-15);
    approx_eq(info.peak, 0.981, 1e-12);
    let read = Summary::read_json(&Summary::path(&out_dir))?;
    assert_eq!(read.recorder_files, summary.recorder_files);

    // geostatic state after the gravity stages
    approx_eq(engine.node_response(1, Dof::Pw, Response::Vel)?, 6.0 * 9.81, 1e-12);
    assert_eq!(engine.node_response(19, Dof::Pw, Response::Vel)?, 0.0);
    assert!(engine.node_response(19, Dof::Uy, Response::Disp)? < 0.0);
    assert_eq!(engine.node_response(1, Dof::Ux, Response::Disp)?, 0.0);

    // recorder files
    let disp = Table::read(&format!("{}/disp2.txt", out_dir))?;
    let ydisp = Table::read(&format!("{}/Ydisp2.txt", out_dir))?;
    let pwp = Table::read(&format!("{}/pwp1.txt", out_dir))?;
    let acc = Table::read(&format!("{}/acc1.txt", out_dir))?;
    let stress = Table::read(&format!("{}/stress11.txt", out_dir))?;
    let strain = Table::read(&format!("{}/strain1.txt", out_dir))?;
    assert_eq!(disp.n_column(), 1 + 5 * 2);
    assert_eq!(ydisp.n_column(), 1 + 5);
    assert_eq!(pwp.n_column(), 1 + 5);
    assert_eq!(acc.n_column(), 1 + 5);
    assert_eq!(stress.n_column(), 1 + 3);
    assert_eq!(strain.n_column(), 1 + 3);

    // rows every 0.01 s starting at the first step
    let n_row = disp.n_row();
    assert!(n_row >= 19 && n_row <= 21);
    let time = disp.column(0)?;
    approx_eq(time[0], 0.0025, 1e-15);
    for pair in time.windows(2) {
        assert!(pair[1] - pair[0] >= 0.01 * (1.0 - 1e-5));
    }

    // Uy columns of disp2 match Ydisp2; pore pressures stay hydrostatic
    for r in 0..n_row {
        for k in 0..5 {
            assert_eq!(disp.columns[2 + 2 * k][r], ydisp.columns[1 + k][r]);
        }
        approx_eq(pwp.columns[1][r], 5.0 * 9.81, 1e-12);
        approx_eq(pwp.columns[5][r], 0.0, 1e-15);
    }

    // the surface moves during the shaking
    let ux_surface = disp.column(9)?;
    let max_ux = ux_surface.iter().fold(0.0, |acc, v| f64::max(acc, f64::abs(*v)));
    assert!(max_ux > 0.0);

    // figures
    let figures = Figures::new(&config, &GroundMotion::read(&motion_path, 0.01, 1.0)?)?;
    let panels = figures.pwp_panels(&pwp)?;
    assert_eq!(panels[0].label, "PWP (kPa) (5m)");
    assert_eq!(panels[3].label, "PWP (kPa) (1m)");
    let panels = figures.disp_panels(&disp)?;
    assert_eq!(panels[0].label, "disp (0m)");
    assert_eq!(&panels[1].y, ux_surface);
    if SAVE_FIGURE {
        figures.draw_all(&out_dir)?;
    }
    Ok(())
}
