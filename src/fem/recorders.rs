use super::Engine;
use crate::base::{Config, Dof, ElementQuantity, Response, RECORDER_REL_DT_TOL};
use crate::StrError;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Defines what a recorder writes
#[derive(Clone, Debug, PartialEq)]
pub enum Recorded {
    /// Nodal responses; each row holds the values of all DOFs of the first node, then the second node, ...
    Node {
        nodes: Vec<usize>,
        dofs: Vec<Dof>,
        response: Response,
    },

    /// All stress or strain components of one element
    Element { element: usize, quantity: ElementQuantity },
}

/// Writes time histories to a whitespace-delimited text file
///
/// Each row starts with the time followed by the recorded values. A row is written
/// when `t - t_next ≥ -tol·Δt_out` and then `t_next = t + Δt_out`. With `Δt_out = 0`,
/// every call writes a row.
pub struct Recorder {
    /// Defines the recorded quantities
    pub recorded: Recorded,

    /// Holds the path of the output file
    pub path: String,

    /// Recording interval
    dt_out: f64,

    /// Next time to record
    t_next: f64,

    /// Number of rows written
    n_rows: usize,

    /// Holds the buffered file
    writer: BufWriter<File>,
}

impl Recorder {
    /// Allocates a new instance and creates the output file
    pub fn new(path: &str, recorded: Recorded, dt_out: f64) -> Result<Self, StrError> {
        if dt_out < 0.0 {
            return Err("the recording interval must be ≥ 0.0");
        }
        if let Recorded::Node { nodes, dofs, .. } = &recorded {
            if nodes.is_empty() || dofs.is_empty() {
                return Err("node recorder requires at least one node and one DOF");
            }
        }
        if let Some(p) = Path::new(path).parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let file = File::create(path).map_err(|_| "cannot create recorder file")?;
        Ok(Recorder {
            recorded,
            path: path.to_string(),
            dt_out,
            t_next: 0.0,
            n_rows: 0,
            writer: BufWriter::new(file),
        })
    }

    /// Returns the number of rows written so far
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Writes a row if the engine time reached the next recording time
    ///
    /// Returns true if a row has been written.
    pub fn record<E: Engine>(&mut self, engine: &E) -> Result<bool, StrError> {
        let t = engine.time();
        if t - self.t_next < -RECORDER_REL_DT_TOL * self.dt_out {
            return Ok(false);
        }
        let mut values = Vec::new();
        match &self.recorded {
            Recorded::Node { nodes, dofs, response } => {
                for node in nodes {
                    for dof in dofs {
                        values.push(engine.node_response(*node, *dof, *response)?);
                    }
                }
            }
            Recorded::Element { element, quantity } => {
                values = engine.element_response(*element, *quantity)?;
            }
        }
        let mut row = format!("{}", t);
        for v in &values {
            row.push_str(&format!(" {}", v));
        }
        writeln!(&mut self.writer, "{}", row).map_err(|_| "cannot write to recorder file")?;
        self.t_next = t + self.dt_out;
        self.n_rows += 1;
        Ok(true)
    }

    /// Flushes the buffered rows to the file
    pub fn flush(&mut self) -> Result<(), StrError> {
        self.writer.flush().map_err(|_| "cannot flush recorder file")
    }
}

/// Holds a collection of recorders
pub struct Recorders {
    /// All recorders
    pub all: Vec<Recorder>,
}

impl Recorders {
    /// Allocates an empty collection
    pub fn new() -> Self {
        Recorders { all: Vec::new() }
    }

    /// Allocates the recorders of the liquefiable column in `config.out_dir`
    ///
    /// | file            | quantity                       |
    /// |-----------------|--------------------------------|
    /// | `disp2.txt`     | Ux and Uy displacement         |
    /// | `Ydisp2.txt`    | Uy displacement                |
    /// | `pwp1.txt`      | pore pressure (Pw "velocity")  |
    /// | `acc1.txt`      | Ux acceleration                |
    /// | `stress{E}.txt` | stress components of element E |
    /// | `strain{E}.txt` | strain components of element E |
    pub fn standard(config: &Config) -> Result<Self, StrError> {
        let nodes = &config.recorded_nodes;
        let dir = &config.out_dir;
        let dt = config.dt_out;
        let mut recorders = Recorders::new();
        recorders.add_node(&format!("{}/disp2.txt", dir), nodes, &[Dof::Ux, Dof::Uy], Response::Disp, dt)?;
        recorders.add_node(&format!("{}/Ydisp2.txt", dir), nodes, &[Dof::Uy], Response::Disp, dt)?;
        recorders.add_node(&format!("{}/pwp1.txt", dir), nodes, &[Dof::Pw], Response::Vel, dt)?;
        recorders.add_node(&format!("{}/acc1.txt", dir), nodes, &[Dof::Ux], Response::Accel, dt)?;
        for element in &config.recorded_elements {
            let path = format!("{}/stress{}.txt", dir, element);
            recorders.add_element(&path, *element, ElementQuantity::Stress, dt)?;
            let path = format!("{}/strain{}.txt", dir, element);
            recorders.add_element(&path, *element, ElementQuantity::Strain, dt)?;
        }
        Ok(recorders)
    }

    /// Adds a node recorder
    pub fn add_node(
        &mut self,
        path: &str,
        nodes: &[usize],
        dofs: &[Dof],
        response: Response,
        dt_out: f64,
    ) -> Result<&mut Self, StrError> {
        let recorded = Recorded::Node {
            nodes: nodes.to_vec(),
            dofs: dofs.to_vec(),
            response,
        };
        self.all.push(Recorder::new(path, recorded, dt_out)?);
        Ok(self)
    }

    /// Adds an element recorder
    pub fn add_element(
        &mut self,
        path: &str,
        element: usize,
        quantity: ElementQuantity,
        dt_out: f64,
    ) -> Result<&mut Self, StrError> {
        let recorded = Recorded::Element { element, quantity };
        self.all.push(Recorder::new(path, recorded, dt_out)?);
        Ok(self)
    }

    /// Calls all recorders after a committed step
    pub fn record<E: Engine>(&mut self, engine: &E) -> Result<(), StrError> {
        for recorder in &mut self.all {
            recorder.record(engine)?;
        }
        Ok(())
    }

    /// Flushes all files
    pub fn close(&mut self) -> Result<(), StrError> {
        for recorder in &mut self.all {
            recorder.flush()?;
        }
        Ok(())
    }

    /// Returns the paths of all files
    pub fn paths(&self) -> Vec<String> {
        self.all.iter().map(|r| r.path.clone()).collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
