//! Parallel residual assembly.
//!
//! Assembles the local internal-force residual vector from cell contributions
//! using Rayon for shared-memory parallelism. The test space is the nodal
//! basis of the partition: entry `node * 3 + i` accumulates the virtual work
//! of the hat function of `node` acting in direction `i`.
//!
//! The deformation state is constant per linear cell, so a single integration
//! point per cell is exact for the stress formulations.

use std::sync::Mutex;

use rayon::prelude::*;

use crate::error::Result;
use crate::hyperelasticity::ResidualForm;
use crate::kinematics::Kinematics;
use crate::measure::Measure;
use crate::types::{outer, Vec3};

/// Degrees of freedom per node (3D displacement).
const DOFS_PER_NODE: usize = 3;

/// Assemble the local residual vector for the current solution.
///
/// # Arguments
///
/// * `measure` - Integration measure over this rank's partition
/// * `kinematics` - Kinematics provider for the solution field
/// * `form` - Residual variational form to integrate
///
/// # Returns
///
/// Dense residual of length `n_nodes * 3`. Local to this rank: combining
/// shared-node contributions across ranks belongs to the external solver.
pub fn assemble_residual(
    measure: &Measure,
    kinematics: &Kinematics,
    form: &ResidualForm,
) -> Result<Vec<f64>> {
    let domain = measure.domain();
    let n_dofs = domain.n_nodes() * DOFS_PER_NODE;
    let residual = Mutex::new(vec![0.0; n_dofs]);

    (0..domain.n_cells())
        .into_par_iter()
        .try_for_each(|cell_index| -> Result<()> {
            // Cells are index-validated at construction
            let cell = domain.cell(cell_index).unwrap();
            let nodes = domain.cell_nodes(cell_index).unwrap();
            let grads = cell.shape_gradients()?;
            let volume = cell.volume();
            let state = kinematics.state_in_cell(cell_index)?;

            let mut local = [[0.0; DOFS_PER_NODE]; 4];
            for (a, grad_n) in grads.iter().enumerate() {
                for i in 0..DOFS_PER_NODE {
                    let mut e_i = Vec3::zeros();
                    e_i[i] = 1.0;
                    let grad_v = outer(&e_i, grad_n);
                    local[a][i] = form.density(&state, &grad_v) * volume;
                }
            }

            // Thread-safe scatter into the global vector
            let mut global = residual.lock().unwrap();
            for (a, &node) in nodes.iter().enumerate() {
                for i in 0..DOFS_PER_NODE {
                    global[node * DOFS_PER_NODE + i] += local[a][i];
                }
            }
            Ok(())
        })?;

    Ok(residual.into_inner().unwrap())
}
