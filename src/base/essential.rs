use super::{Dof, Grid};
use crate::StrError;
use std::collections::BTreeMap;
use std::fmt;

/// Holds an equal-DOF constraint (tie) between two nodes
#[derive(Clone, Debug, PartialEq)]
pub struct EqualDof {
    /// Retained node
    pub retained: usize,

    /// Constrained node
    pub constrained: usize,

    /// Tied DOFs
    pub dofs: Vec<Dof>,
}

/// Holds essential boundary conditions (fixities) and equal-DOF ties
pub struct Essential {
    /// Maps node tag to the fixity flags [Ux, Uy, Pw]
    pub fixities: BTreeMap<usize, [bool; 3]>,

    /// Holds the equal-DOF ties
    pub ties: Vec<EqualDof>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential {
            fixities: BTreeMap::new(),
            ties: Vec::new(),
        }
    }

    /// Fixes DOFs at nodes
    ///
    /// The flags are combined with previous fixities of the same node.
    pub fn fix(&mut self, nodes: &[usize], flags: [bool; 3]) -> &mut Self {
        for node in nodes {
            let current = self.fixities.entry(*node).or_insert([false; 3]);
            for m in 0..3 {
                current[m] = current[m] || flags[m];
            }
        }
        self
    }

    /// Ties the DOFs of the constrained node to the retained node
    pub fn equal_dof(&mut self, retained: usize, constrained: usize, dofs: &[Dof]) -> Result<&mut Self, StrError> {
        if retained == constrained {
            return Err("equal-DOF requires two distinct nodes");
        }
        if dofs.len() == 0 {
            return Err("equal-DOF requires at least one DOF");
        }
        self.ties.push(EqualDof {
            retained,
            constrained,
            dofs: dofs.to_vec(),
        });
        Ok(self)
    }

    /// Returns whether a DOF of a node is fixed
    pub fn is_fixed(&self, node: usize, dof: Dof) -> bool {
        match self.fixities.get(&node) {
            Some(flags) => flags[dof.index()],
            None => false,
        }
    }

    /// Returns whether the two nodes are tied at the given DOF
    pub fn are_tied(&self, a: usize, b: usize, dof: Dof) -> bool {
        self.ties.iter().any(|tie| {
            ((tie.retained == a && tie.constrained == b) || (tie.retained == b && tie.constrained == a))
                && tie.dofs.contains(&dof)
        })
    }

    /// Returns the boundary conditions of the soil column
    ///
    /// * Base nodes: fixed Ux and Uy (pore pressure free)
    /// * Surface nodes: fixed Pw (free drainage)
    /// * Each row above the base: Ux and Uy of the last node tied to the first node
    pub fn soil_column(grid: &Grid) -> Self {
        let mut essential = Essential::new();
        essential
            .fix(&grid.base_nodes(), [true, true, false])
            .fix(&grid.surface_nodes(), [false, false, true]);
        for (first, last) in grid.side_node_pairs() {
            essential.ties.push(EqualDof {
                retained: first,
                constrained: last,
                dofs: vec![Dof::Ux, Dof::Uy],
            });
        }
        essential
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of the boundary conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixities\n").unwrap();
        write!(f, "========\n").unwrap();
        for (node, flags) in &self.fixities {
            let fixed: Vec<_> = [Dof::Ux, Dof::Uy, Dof::Pw]
                .iter()
                .filter(|dof| flags[dof.index()])
                .map(|dof| format!("{}", dof))
                .collect();
            write!(f, "{:?} : {}\n", node, fixed.join(" ")).unwrap();
        }
        write!(f, "\nEqual DOFs\n").unwrap();
        write!(f, "==========\n").unwrap();
        for tie in &self.ties {
            let dofs: Vec<_> = tie.dofs.iter().map(|d| format!("{}", d)).collect();
            write!(f, "{:?} ← {:?} : {}\n", tie.retained, tie.constrained, dofs.join(" ")).unwrap();
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Essential;
    use crate::base::{Dof, Grid};

    #[test]
    fn essential_works() {
        let mut essential = Essential::new();
        essential
            .fix(&[1, 2], [true, false, false])
            .fix(&[2], [false, true, false])
            .equal_dof(3, 4, &[Dof::Ux])
            .unwrap();
        assert!(essential.is_fixed(1, Dof::Ux));
        assert!(!essential.is_fixed(1, Dof::Uy));
        assert!(essential.is_fixed(2, Dof::Uy));
        assert!(!essential.is_fixed(5, Dof::Pw));
        assert!(essential.are_tied(4, 3, Dof::Ux));
        assert!(!essential.are_tied(3, 4, Dof::Uy));
        assert_eq!(
            format!("{}", essential),
            "Fixities\n\
             ========\n\
             1 : Ux\n\
             2 : Ux Uy\n\
             \n\
             Equal DOFs\n\
             ==========\n\
             3 ← 4 : Ux\n"
        );
    }

    #[test]
    fn equal_dof_captures_errors() {
        let mut essential = Essential::new();
        assert_eq!(
            essential.equal_dof(1, 1, &[Dof::Ux]).err(),
            Some("equal-DOF requires two distinct nodes")
        );
        assert_eq!(
            essential.equal_dof(1, 2, &[]).err(),
            Some("equal-DOF requires at least one DOF")
        );
    }

    #[test]
    fn soil_column_works() {
        let grid = Grid::new(2, 2, 1.0, 1.0).unwrap();
        let essential = Essential::soil_column(&grid);
        for node in [1, 2, 3] {
            assert!(essential.is_fixed(node, Dof::Ux));
            assert!(essential.is_fixed(node, Dof::Uy));
            assert!(!essential.is_fixed(node, Dof::Pw));
        }
        for node in [7, 8, 9] {
            assert!(!essential.is_fixed(node, Dof::Ux));
            assert!(essential.is_fixed(node, Dof::Pw));
        }
        assert_eq!(essential.ties.len(), 2);
        assert!(essential.are_tied(4, 6, Dof::Ux));
        assert!(essential.are_tied(7, 9, Dof::Uy));
        assert!(!essential.are_tied(1, 3, Dof::Ux));
    }
}
