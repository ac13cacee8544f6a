//! Displacement solution field over a local partition.
//!
//! The field stores one vector per node and interpolates with the linear cell
//! shape functions. Nodal values sit behind a lock so the external solve loop
//! can advance the solution between residual evaluations while operators and
//! quantities of interest keep shared handles to the same field. Updates must
//! stay serialized with evaluations; the lock makes the access safe, not the
//! ordering.

use std::sync::{Arc, RwLock};

use crate::domain::Subdomain;
use crate::error::{Error, Result};
use crate::types::{outer, Point3, Tensor2, Vec3};

/// Nodal vector field over a [`Subdomain`].
pub struct DisplacementField {
    domain: Arc<Subdomain>,
    nodal: RwLock<Vec<Vec3>>,
}

impl DisplacementField {
    /// Zero displacement over every node of the partition.
    pub fn zero(domain: Arc<Subdomain>) -> Self {
        let nodal = vec![Vec3::zeros(); domain.n_nodes()];
        Self {
            domain,
            nodal: RwLock::new(nodal),
        }
    }

    /// The partition this field lives on.
    pub fn domain(&self) -> &Arc<Subdomain> {
        &self.domain
    }

    /// Replace all nodal values.
    ///
    /// # Errors
    ///
    /// Fails if the value count does not match the node count.
    pub fn set_nodal_values(&self, values: Vec<Vec3>) -> Result<()> {
        if values.len() != self.domain.n_nodes() {
            return Err(Error::Config(format!(
                "{} nodal values supplied for {} nodes",
                values.len(),
                self.domain.n_nodes()
            )));
        }
        *self.nodal.write().unwrap() = values;
        Ok(())
    }

    /// Set nodal values by sampling a displacement function at the nodes.
    pub fn set_from_fn(&self, u: impl Fn(&Point3) -> Vec3) {
        let values: Vec<Vec3> = self.domain.nodes().iter().map(|x| u(x)).collect();
        *self.nodal.write().unwrap() = values;
    }

    /// Snapshot of the nodal values.
    pub fn nodal_values(&self) -> Vec<Vec3> {
        self.nodal.read().unwrap().clone()
    }

    /// Displacement gradient ∇u on a cell: (∇u)ᵢⱼ = ∂uᵢ/∂xⱼ.
    ///
    /// Constant over a linear cell: ∇u = Σₐ uₐ ⊗ ∇Nₐ.
    pub fn gradient_in_cell(&self, cell_index: usize) -> Result<Tensor2> {
        let cell = self.domain.cell(cell_index).ok_or_else(|| {
            Error::Config(format!("cell index {} out of range", cell_index))
        })?;
        let nodes = self.domain.cell_nodes(cell_index).unwrap();
        let grads = cell.shape_gradients()?;
        let nodal = self.nodal.read().unwrap();

        let mut grad_u = Tensor2::zeros();
        for (a, &node) in nodes.iter().enumerate() {
            grad_u += outer(&nodal[node], &grads[a]);
        }
        Ok(grad_u)
    }

    /// Interpolated displacement at a point of the local partition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PointNotInSubdomain`] when the point lies outside this
    /// rank's cells.
    pub fn value_at(&self, x: &Point3) -> Result<Vec3> {
        let cell_index = self
            .domain
            .find_cell(x)
            .ok_or(Error::PointNotInSubdomain(x[0], x[1], x[2]))?;
        let cell = self.domain.cell(cell_index).unwrap();
        let nodes = self.domain.cell_nodes(cell_index).unwrap();
        let bary = cell.barycentric(x).ok_or_else(|| {
            Error::DegenerateCell(format!("cell {} is degenerate", cell_index))
        })?;
        let nodal = self.nodal.read().unwrap();

        let mut value = Vec3::zeros();
        for (a, &node) in nodes.iter().enumerate() {
            value += nodal[node] * bary[a];
        }
        Ok(value)
    }
}
