use super::Table;
use crate::base::{Config, GroundMotion};
use crate::StrError;
use plotpy::{Curve, Plot};

/// Holds the data of one panel (subplot) of a figure
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    /// Label of the y-axis
    pub label: String,

    /// Title (may be empty)
    pub title: String,

    /// Line color
    pub color: String,

    /// Time
    pub x: Vec<f64>,

    /// Values
    pub y: Vec<f64>,
}

/// Draws the time histories of the recorder files together with the input motion
///
/// Each figure has one panel per history and the input motion (in g) at the bottom.
/// The time axis spans the duration of the ground motion.
pub struct Figures {
    /// Depths of the recorded nodes
    depths: Vec<f64>,

    /// Input motion panel
    motion: Panel,

    /// Upper limit of the time axis
    t_max: f64,
}

impl Figures {
    /// Allocates a new instance
    ///
    /// The samples of `motion` are drawn without the scale factor (i.e., in g).
    pub fn new(config: &Config, motion: &GroundMotion) -> Result<Self, StrError> {
        let mut depths = Vec::new();
        for node in &config.recorded_nodes {
            depths.push(config.grid.node_depth(*node)?);
        }
        Ok(Figures {
            depths,
            motion: Panel {
                label: "ACC (g)".to_string(),
                title: String::new(),
                color: "black".to_string(),
                x: motion.times(),
                y: motion.samples.clone(),
            },
            t_max: motion.duration(),
        })
    }

    /// Returns the depth of the k-th recorded node
    fn depth(&self, k: usize) -> Result<f64, StrError> {
        self.depths.get(k).copied().ok_or("there are not enough recorded nodes")
    }

    /// Returns the pore water pressure panels of (up to) the first four recorded nodes
    pub fn pwp_panels(&self, pwp: &Table) -> Result<Vec<Panel>, StrError> {
        let n = usize::min(4, self.depths.len());
        let mut panels = Vec::new();
        for k in 0..n {
            panels.push(Panel {
                label: format!("PWP (kPa) ({}m)", self.depth(k)?),
                title: if k == 0 { "Pore water pressure".to_string() } else { String::new() },
                color: "green".to_string(),
                x: pwp.column(0)?.clone(),
                y: pwp.column(1 + k)?.clone(),
            });
        }
        Ok(panels)
    }

    /// Returns the horizontal acceleration panel of the first recorded node
    pub fn acc_panels(&self, acc: &Table) -> Result<Vec<Panel>, StrError> {
        Ok(vec![Panel {
            label: format!("ACC ({}m)", self.depth(0)?),
            title: "Horizontal acceleration".to_string(),
            color: "red".to_string(),
            x: acc.column(0)?.clone(),
            y: acc.column(1)?.clone(),
        }])
    }

    /// Returns the vertical and horizontal displacement panels of the last recorded node
    ///
    /// The displacement file holds (Ux, Uy) for each node.
    pub fn disp_panels(&self, disp: &Table) -> Result<Vec<Panel>, StrError> {
        if self.depths.is_empty() {
            return Err("there are not enough recorded nodes");
        }
        let k = self.depths.len() - 1;
        let depth = self.depth(k)?;
        Ok(vec![
            Panel {
                label: format!("disp ({}m)", depth),
                title: "Vertical displacement".to_string(),
                color: "red".to_string(),
                x: disp.column(0)?.clone(),
                y: disp.column(2 + 2 * k)?.clone(),
            },
            Panel {
                label: format!("disp ({}m)", depth),
                title: "Horizontal displacement".to_string(),
                color: "red".to_string(),
                x: disp.column(0)?.clone(),
                y: disp.column(1 + 2 * k)?.clone(),
            },
        ])
    }

    /// Returns the upper limit of the time axis
    pub fn t_max(&self) -> f64 {
        self.t_max
    }

    /// Draws the panels followed by the input motion and saves the figure
    pub fn draw(&self, panels: &[Panel], figure_path: &str) -> Result<(), StrError> {
        let n = panels.len() + 1;
        let mut plot = Plot::new();
        for (i, panel) in panels.iter().chain(std::iter::once(&self.motion)).enumerate() {
            let mut curve = Curve::new();
            curve.set_line_color(&panel.color);
            curve.draw(&panel.x, &panel.y);
            plot.set_subplot(n, 1, i + 1);
            if !panel.title.is_empty() {
                plot.set_title(&panel.title);
            }
            let x_label = if i == n - 1 { "Time (s)" } else { "" };
            plot.add(&curve)
                .grid_and_labels(x_label, &panel.label)
                .set_xrange(0.0, self.t_max);
        }
        plot.set_figure_size_points(864.0, 576.0).save(figure_path)
    }

    /// Reads the recorder files in `out_dir` and saves `pwp.svg`, `acc.svg`, and `disp.svg`
    ///
    /// Returns the paths of the figures.
    pub fn draw_all(&self, out_dir: &str) -> Result<Vec<String>, StrError> {
        let pwp = Table::read(&format!("{}/pwp1.txt", out_dir))?;
        let acc = Table::read(&format!("{}/acc1.txt", out_dir))?;
        let disp = Table::read(&format!("{}/disp2.txt", out_dir))?;
        let paths = vec![
            format!("{}/pwp.svg", out_dir),
            format!("{}/acc.svg", out_dir),
            format!("{}/disp.svg", out_dir),
        ];
        self.draw(&self.pwp_panels(&pwp)?, &paths[0])?;
        self.draw(&self.acc_panels(&acc)?, &paths[1])?;
        self.draw(&self.disp_panels(&disp)?, &paths[2])?;
        Ok(paths)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Figures;
    use crate::base::{Config, GroundMotion, DEFAULT_TEST_DIR};
    use crate::plot::Table;

    const SAVE_FIGURE: bool = false;

    fn sample_tables() -> (Table, Table, Table) {
        let mut pwp = String::new();
        let mut acc = String::new();
        let mut disp = String::new();
        for i in 0..4 {
            let t = 0.1 * ((i + 1) as f64);
            pwp.push_str(&format!("{} 78.48 58.86 39.24 29.43 19.62 0\n", t));
            acc.push_str(&format!("{} {} 0 0 0 0 0\n", t, 0.5 * t));
            disp.push_str(&format!("{}", t));
            for k in 0..6 {
                disp.push_str(&format!(" {} {}", 0.01 * (k as f64) * t, -0.001 * (k as f64)));
            }
            disp.push('\n');
        }
        (
            Table::from_text(&pwp).unwrap(),
            Table::from_text(&acc).unwrap(),
            Table::from_text(&disp).unwrap(),
        )
    }

    #[test]
    fn panels_work() {
        let config = Config::new();
        let motion = GroundMotion::new(0.01, 9.81, vec![0.0, 0.1, -0.2, 0.0, 0.05]).unwrap();
        let figures = Figures::new(&config, &motion).unwrap();
        assert_eq!(figures.t_max(), 0.04);
        let (pwp, acc, disp) = sample_tables();

        let panels = figures.pwp_panels(&pwp).unwrap();
        assert_eq!(panels.len(), 4);
        assert_eq!(panels[0].label, "PWP (kPa) (8m)");
        assert_eq!(panels[1].label, "PWP (kPa) (6m)");
        assert_eq!(panels[2].label, "PWP (kPa) (4m)");
        assert_eq!(panels[3].label, "PWP (kPa) (3m)");
        assert_eq!(panels[3].y, vec![29.43; 4]);

        let panels = figures.acc_panels(&acc).unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].label, "ACC (8m)");
        assert_eq!(panels[0].x, pwp.columns[0]);

        let panels = figures.disp_panels(&disp).unwrap();
        assert_eq!(panels[0].title, "Vertical displacement");
        assert_eq!(panels[0].label, "disp (0m)");
        assert_eq!(&panels[0].y, disp.column(12).unwrap());
        assert_eq!(&panels[1].y, disp.column(11).unwrap());
        assert_eq!(panels[0].y[0], -0.005);

        if SAVE_FIGURE {
            figures
                .draw(&figures.pwp_panels(&pwp).unwrap(), &format!("{}/figures_pwp.svg", DEFAULT_TEST_DIR))
                .unwrap();
        }
    }

    #[test]
    fn panels_capture_errors() {
        let mut config = Config::new();
        config.set_recorded_nodes(&[]);
        let motion = GroundMotion::new(0.01, 1.0, vec![0.0, 0.1]).unwrap();
        let figures = Figures::new(&config, &motion).unwrap();
        let (pwp, acc, disp) = sample_tables();
        assert_eq!(figures.pwp_panels(&pwp).unwrap().len(), 0);
        assert_eq!(figures.acc_panels(&acc).err(), Some("there are not enough recorded nodes"));
        assert_eq!(figures.disp_panels(&disp).err(), Some("there are not enough recorded nodes"));

        config.set_recorded_nodes(&[1000]);
        assert_eq!(Figures::new(&config, &motion).err(), Some("node tag is out of range"));
    }
}
