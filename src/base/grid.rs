use crate::StrError;
use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;
use serde::{Deserialize, Serialize};

/// Holds a structured grid of u-p quadrilaterals
///
/// Nodes and elements are identified by one-based tags:
///
/// ```text
///  node(i, j)    = i + (j - 1) · (nx + 1)     i = 1..=nx+1, j = 1..=ny+1
///  element(i, j) = i + (j - 1) · nx           i = 1..=nx,   j = 1..=ny
///
///   n3-----n4
///    |     |      connectivity: [n1, n2, n4, n3] (counter-clockwise)
///    |     |
///   n1-----n2
/// ```
///
/// The first row of nodes (j = 1) lies at y = 0 (base); the last row lies at the surface.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Grid {
    /// Number of elements along x
    pub nx: usize,

    /// Number of elements along y
    pub ny: usize,

    /// Element size along x
    pub dx: f64,

    /// Element size along y
    pub dy: f64,
}

impl Grid {
    /// Allocates a new instance
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> Result<Self, StrError> {
        if nx < 1 || ny < 1 {
            return Err("the grid requires at least one element along each direction");
        }
        if dx <= 0.0 || dy <= 0.0 {
            return Err("element sizes must be > 0.0");
        }
        Ok(Grid { nx, ny, dx, dy })
    }

    /// Returns the grid of the liquefiable column (20 × 10 elements of 1 m × 1 m)
    pub fn sample_column() -> Self {
        Grid {
            nx: 20,
            ny: 10,
            dx: 1.0,
            dy: 1.0,
        }
    }

    /// Returns the number of nodes along x
    pub fn nx_node(&self) -> usize {
        self.nx + 1
    }

    /// Returns the number of nodes along y
    pub fn ny_node(&self) -> usize {
        self.ny + 1
    }

    /// Returns the total number of nodes
    pub fn n_node(&self) -> usize {
        self.nx_node() * self.ny_node()
    }

    /// Returns the total number of elements
    pub fn n_element(&self) -> usize {
        self.nx * self.ny
    }

    /// Returns the width of the model
    pub fn width(&self) -> f64 {
        (self.nx as f64) * self.dx
    }

    /// Returns the height of the model
    pub fn height(&self) -> f64 {
        (self.ny as f64) * self.dy
    }

    /// Returns the tag of node (i, j) (one-based indices)
    pub fn node_tag(&self, i: usize, j: usize) -> usize {
        i + (j - 1) * self.nx_node()
    }

    /// Returns the tag of element (i, j) (one-based indices)
    pub fn element_tag(&self, i: usize, j: usize) -> usize {
        i + (j - 1) * self.nx
    }

    /// Returns the one-based (i, j) indices of a node
    pub fn node_indices(&self, tag: usize) -> Result<(usize, usize), StrError> {
        if tag < 1 || tag > self.n_node() {
            return Err("node tag is out of range");
        }
        let k = tag - 1;
        Ok((k % self.nx_node() + 1, k / self.nx_node() + 1))
    }

    /// Returns the one-based (i, j) indices of an element
    pub fn element_indices(&self, tag: usize) -> Result<(usize, usize), StrError> {
        if tag < 1 || tag > self.n_element() {
            return Err("element tag is out of range");
        }
        let k = tag - 1;
        Ok((k % self.nx + 1, k / self.nx + 1))
    }

    /// Returns the coordinates of a node
    pub fn node_coords(&self, tag: usize) -> Result<(f64, f64), StrError> {
        let (i, j) = self.node_indices(tag)?;
        Ok((((i - 1) as f64) * self.dx, ((j - 1) as f64) * self.dy))
    }

    /// Returns the depth of a node below the surface
    pub fn node_depth(&self, tag: usize) -> Result<f64, StrError> {
        let (_, y) = self.node_coords(tag)?;
        Ok(self.height() - y)
    }

    /// Returns the connectivity [n1, n2, n4, n3] of an element (counter-clockwise)
    pub fn element_nodes(&self, tag: usize) -> Result<[usize; 4], StrError> {
        let (i, j) = self.element_indices(tag)?;
        let n1 = self.node_tag(i, j);
        let n2 = self.node_tag(i + 1, j);
        let n4 = self.node_tag(i + 1, j + 1);
        let n3 = self.node_tag(i, j + 1);
        Ok([n1, n2, n4, n3])
    }

    /// Returns the tags of the base nodes (y = 0)
    pub fn base_nodes(&self) -> Vec<usize> {
        (1..=self.nx_node()).map(|i| self.node_tag(i, 1)).collect()
    }

    /// Returns the tags of the surface nodes (y = height)
    pub fn surface_nodes(&self) -> Vec<usize> {
        (1..=self.nx_node()).map(|i| self.node_tag(i, self.ny_node())).collect()
    }

    /// Returns the (first, last) node tags of each row above the base
    pub fn side_node_pairs(&self) -> Vec<(usize, usize)> {
        (2..=self.ny_node())
            .map(|j| (self.node_tag(1, j), self.node_tag(self.nx_node(), j)))
            .collect()
    }

    /// Generates the mesh
    ///
    /// Point and cell ids are the tags minus one. All cells receive the given attribute
    /// (the material tag).
    pub fn mesh(&self, attribute: usize) -> Mesh {
        let mut points = Vec::with_capacity(self.n_node());
        for j in 1..=self.ny_node() {
            for i in 1..=self.nx_node() {
                let x = ((i - 1) as f64) * self.dx;
                let y = ((j - 1) as f64) * self.dy;
                points.push(Point {
                    id: self.node_tag(i, j) - 1,
                    marker: 0,
                    coords: vec![x, y],
                });
            }
        }
        let mut cells = Vec::with_capacity(self.n_element());
        for j in 1..=self.ny {
            for i in 1..=self.nx {
                let tag = self.element_tag(i, j);
                let [n1, n2, n4, n3] = [
                    self.node_tag(i, j),
                    self.node_tag(i + 1, j),
                    self.node_tag(i + 1, j + 1),
                    self.node_tag(i, j + 1),
                ];
                cells.push(Cell {
                    id: tag - 1,
                    attribute,
                    kind: GeoKind::Qua4,
                    points: vec![n1 - 1, n2 - 1, n4 - 1, n3 - 1],
                });
            }
        }
        Mesh {
            ndim: 2,
            points,
            cells,
        }
    }

    /// Prints the node table (tag, x, y)
    pub fn print_nodes(&self) {
        for j in 1..=self.ny_node() {
            for i in 1..=self.nx_node() {
                let tag = self.node_tag(i, j);
                let x = ((i - 1) as f64) * self.dx;
                let y = ((j - 1) as f64) * self.dy;
                println!("Node {:>5} {:>10.3} {:>10.3}", tag, x, y);
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
