//! Local mesh partition: the subdomain a rank owns.
//!
//! A [`Subdomain`] stores nodal coordinates and linear tetrahedral cells. It is
//! the geometric gatekeeper for this rank: point location (`find_cell`,
//! `contains`) decides whether a pointwise evaluation is computable locally,
//! and the cell geometry (volumes, shape-function gradients) drives the
//! quadrature integrator and residual assembly.
//!
//! # Submodules
//!
//! - [`gauss`] - Gauss quadrature rules for tetrahedra

use crate::error::{Error, Result};
use crate::types::{Point3, Vec3};

pub mod gauss;

/// Tolerance on barycentric coordinates for point-membership tests.
///
/// Slightly negative coordinates are accepted so that points on cell faces and
/// partition boundaries register as inside.
const BARY_TOL: f64 = 1e-10;

/// Volume below which a cell is rejected as degenerate.
const MIN_VOLUME: f64 = 1e-300;

/// Geometry of one linear tetrahedral cell.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    coords: [Point3; 4],
}

impl Cell {
    /// Build a cell from its four vertex coordinates.
    pub fn new(coords: [Point3; 4]) -> Self {
        Self { coords }
    }

    /// Vertex coordinates.
    pub fn coords(&self) -> &[Point3; 4] {
        &self.coords
    }

    /// Edge matrix with columns (x1-x0, x2-x0, x3-x0).
    fn edge_matrix(&self) -> nalgebra::Matrix3<f64> {
        let [x0, x1, x2, x3] = &self.coords;
        nalgebra::Matrix3::from_columns(&[x1 - x0, x2 - x0, x3 - x0])
    }

    /// Cell volume: |det(x1-x0, x2-x0, x3-x0)| / 6.
    pub fn volume(&self) -> f64 {
        self.edge_matrix().determinant().abs() / 6.0
    }

    /// Cell centroid.
    pub fn centroid(&self) -> Point3 {
        (self.coords[0] + self.coords[1] + self.coords[2] + self.coords[3]) / 4.0
    }

    /// Map barycentric coordinates to a physical point.
    pub fn point_at(&self, bary: &[f64; 4]) -> Point3 {
        self.coords[0] * bary[0]
            + self.coords[1] * bary[1]
            + self.coords[2] * bary[2]
            + self.coords[3] * bary[3]
    }

    /// Barycentric coordinates of a physical point, or `None` for a
    /// degenerate cell.
    pub fn barycentric(&self, x: &Point3) -> Option<[f64; 4]> {
        let inv = self.edge_matrix().try_inverse()?;
        let lam = inv * (x - self.coords[0]);
        Some([1.0 - lam[0] - lam[1] - lam[2], lam[0], lam[1], lam[2]])
    }

    /// Whether the point lies in this cell (faces and vertices included).
    pub fn contains(&self, x: &Point3) -> bool {
        match self.barycentric(x) {
            Some(bary) => bary.iter().all(|&l| l >= -BARY_TOL),
            None => false,
        }
    }

    /// Gradients of the four linear shape functions.
    ///
    /// Constant over the cell; they satisfy Σₐ ∇Nₐ = 0, and for nodal values
    /// of a linear field the weighted sum Σₐ fₐ ∇Nₐ reproduces the field
    /// gradient exactly.
    pub fn shape_gradients(&self) -> Result<[Vec3; 4]> {
        let inv = self.edge_matrix().try_inverse().ok_or_else(|| {
            Error::DegenerateCell(format!("zero-volume cell at {:?}", self.coords[0]))
        })?;
        let g1 = inv.row(0).transpose();
        let g2 = inv.row(1).transpose();
        let g3 = inv.row(2).transpose();
        let g0 = -(g1 + g2 + g3);
        Ok([g0, g1, g2, g3])
    }
}

/// The local partition of a domain-decomposed tetrahedral mesh.
#[derive(Debug, Clone, Default)]
pub struct Subdomain {
    nodes: Vec<Point3>,
    cells: Vec<[usize; 4]>,
}

impl Subdomain {
    /// Create an empty subdomain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its index.
    pub fn add_node(&mut self, point: Point3) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(point);
        idx
    }

    /// Add a tetrahedral cell given its four node indices.
    ///
    /// # Errors
    ///
    /// Fails if a node index is out of range or the cell has (near-)zero
    /// volume.
    pub fn add_cell(&mut self, nodes: [usize; 4]) -> Result<usize> {
        for &n in &nodes {
            if n >= self.nodes.len() {
                return Err(Error::Config(format!(
                    "cell references node {} but only {} nodes exist",
                    n,
                    self.nodes.len()
                )));
            }
        }
        let cell = Cell::new([
            self.nodes[nodes[0]],
            self.nodes[nodes[1]],
            self.nodes[nodes[2]],
            self.nodes[nodes[3]],
        ]);
        if cell.volume() < MIN_VOLUME {
            return Err(Error::DegenerateCell(format!(
                "cell {:?} has zero volume",
                nodes
            )));
        }
        let idx = self.cells.len();
        self.cells.push(nodes);
        Ok(idx)
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of cells.
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Nodal coordinates.
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Cell connectivity.
    pub fn cells(&self) -> &[[usize; 4]] {
        &self.cells
    }

    /// Node indices of a cell.
    pub fn cell_nodes(&self, index: usize) -> Option<&[usize; 4]> {
        self.cells.get(index)
    }

    /// Geometry of a cell.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        let nodes = self.cells.get(index)?;
        Some(Cell::new([
            self.nodes[nodes[0]],
            self.nodes[nodes[1]],
            self.nodes[nodes[2]],
            self.nodes[nodes[3]],
        ]))
    }

    /// Total volume of the partition.
    pub fn volume(&self) -> f64 {
        (0..self.cells.len())
            .map(|i| self.cell(i).map(|c| c.volume()).unwrap_or(0.0))
            .sum()
    }

    /// Index of a cell containing the point, if any. Points on faces shared
    /// between cells report the first matching cell.
    pub fn find_cell(&self, x: &Point3) -> Option<usize> {
        (0..self.cells.len()).find(|&i| {
            self.cell(i).map(|c| c.contains(x)).unwrap_or(false)
        })
    }

    /// Whether the point lies inside this rank's partition.
    pub fn contains(&self, x: &Point3) -> bool {
        self.find_cell(x).is_some()
    }

    /// Build a box partition `[origin, origin + extent]` with
    /// `divisions = [nx, ny, nz]` grid cells, each split into six tetrahedra
    /// (Kuhn subdivision along the main diagonal).
    pub fn box_mesh(origin: Point3, extent: Vec3, divisions: [usize; 3]) -> Result<Subdomain> {
        let [nx, ny, nz] = divisions;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(Error::Config("box mesh requires at least one division per axis".into()));
        }
        if extent.iter().any(|&e| e <= 0.0) {
            return Err(Error::Config("box mesh extent must be positive".into()));
        }

        let mut domain = Subdomain::new();
        let node_index = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);

        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    domain.add_node(Point3::new(
                        origin[0] + extent[0] * i as f64 / nx as f64,
                        origin[1] + extent[1] * j as f64 / ny as f64,
                        origin[2] + extent[2] * k as f64 / nz as f64,
                    ));
                }
            }
        }

        // Six tetrahedra per grid cell, one per monotone lattice path from the
        // (0,0,0) corner to the (1,1,1) corner.
        const PATHS: [[[usize; 3]; 2]; 6] = [
            [[1, 0, 0], [1, 1, 0]],
            [[1, 0, 0], [1, 0, 1]],
            [[0, 1, 0], [1, 1, 0]],
            [[0, 1, 0], [0, 1, 1]],
            [[0, 0, 1], [1, 0, 1]],
            [[0, 0, 1], [0, 1, 1]],
        ];

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let corner = |d: [usize; 3]| node_index(i + d[0], j + d[1], k + d[2]);
                    for path in &PATHS {
                        domain.add_cell([
                            corner([0, 0, 0]),
                            corner(path[0]),
                            corner(path[1]),
                            corner([1, 1, 1]),
                        ])?;
                    }
                }
            }
        }

        Ok(domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_tet() -> Cell {
        Cell::new([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ])
    }

    #[test]
    fn test_unit_tet_volume() {
        assert_relative_eq!(unit_tet().volume(), 1.0 / 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_barycentric_roundtrip() {
        let cell = unit_tet();
        let bary = [0.1, 0.2, 0.3, 0.4];
        let x = cell.point_at(&bary);
        let recovered = cell.barycentric(&x).unwrap();
        for a in 0..4 {
            assert_relative_eq!(recovered[a], bary[a], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_containment() {
        let cell = unit_tet();
        assert!(cell.contains(&Point3::new(0.25, 0.25, 0.25)));
        // Face point
        assert!(cell.contains(&Point3::new(0.25, 0.25, 0.0)));
        // Vertex
        assert!(cell.contains(&Point3::new(1.0, 0.0, 0.0)));
        assert!(!cell.contains(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!cell.contains(&Point3::new(-0.1, 0.2, 0.2)));
    }

    #[test]
    fn test_shape_gradients_sum_to_zero() {
        let grads = unit_tet().shape_gradients().unwrap();
        let total = grads[0] + grads[1] + grads[2] + grads[3];
        assert_relative_eq!(total.norm(), 0.0, epsilon = 1e-13);
    }

    #[test]
    fn test_shape_gradients_reproduce_linear_field() {
        // f(x) = a · x has constant gradient a; nodal interpolation on a
        // linear tet must recover it exactly.
        let cell = Cell::new([
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(1.3, 0.1, 0.2),
            Point3::new(0.2, 1.1, 0.4),
            Point3::new(0.3, 0.2, 1.2),
        ]);
        let a = Vec3::new(2.0, -1.0, 0.5);
        let grads = cell.shape_gradients().unwrap();
        let mut recovered = Vec3::zeros();
        for (node, grad) in cell.coords().iter().zip(grads.iter()) {
            recovered += grad * a.dot(node);
        }
        for i in 0..3 {
            assert_relative_eq!(recovered[i], a[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_cell_rejected() {
        let mut domain = Subdomain::new();
        domain.add_node(Point3::new(0.0, 0.0, 0.0));
        domain.add_node(Point3::new(1.0, 0.0, 0.0));
        domain.add_node(Point3::new(2.0, 0.0, 0.0));
        domain.add_node(Point3::new(3.0, 0.0, 0.0));
        // All nodes collinear: zero volume
        assert!(matches!(
            domain.add_cell([0, 1, 2, 3]),
            Err(Error::DegenerateCell(_))
        ));
    }

    #[test]
    fn test_invalid_node_index_rejected() {
        let mut domain = Subdomain::new();
        domain.add_node(Point3::new(0.0, 0.0, 0.0));
        assert!(matches!(domain.add_cell([0, 1, 2, 3]), Err(Error::Config(_))));
    }

    #[test]
    fn test_box_mesh_volume() {
        let domain = Subdomain::box_mesh(
            Point3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 1.0),
            [2, 1, 1],
        )
        .unwrap();
        assert_eq!(domain.n_nodes(), 3 * 2 * 2);
        assert_eq!(domain.n_cells(), 12);
        assert_relative_eq!(domain.volume(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_box_mesh_point_location() {
        let domain = Subdomain::box_mesh(
            Point3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            [2, 2, 2],
        )
        .unwrap();
        assert!(domain.contains(&Point3::new(1.5, 0.5, 0.5)));
        // Boundary face of the partition
        assert!(domain.contains(&Point3::new(1.0, 0.5, 0.5)));
        assert!(!domain.contains(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!domain.contains(&Point3::new(2.5, 0.5, 0.5)));
    }

    #[test]
    fn test_box_mesh_invalid_divisions() {
        let result = Subdomain::box_mesh(
            Point3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            [0, 1, 1],
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
