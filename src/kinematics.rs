//! Finite-deformation kinematics derived from the displacement field.
//!
//! [`Kinematics`] is the provider: it wraps a displacement field and yields a
//! [`DeformationState`] per cell. The state carries the deformation gradient
//! F = I + ∇u and everything derived from it (C, E, J), plus the directional
//! variations the residual formulations contract against:
//!
//! - dF[∇v] = ∇v
//! - dE[∇v] = sym(Fᵀ∇v)

use std::sync::Arc;

use crate::error::Result;
use crate::field::DisplacementField;
use crate::types::{identity, sym, Tensor2};

/// Kinematics provider over a displacement field.
pub struct Kinematics {
    displacement: Arc<DisplacementField>,
}

impl Kinematics {
    pub fn new(displacement: Arc<DisplacementField>) -> Self {
        Self { displacement }
    }

    /// The underlying displacement field.
    pub fn displacement(&self) -> &Arc<DisplacementField> {
        &self.displacement
    }

    /// Deformation state on a cell, from the current solution.
    ///
    /// Constant per cell for the linear interpolation.
    pub fn state_in_cell(&self, cell_index: usize) -> Result<DeformationState> {
        let grad_u = self.displacement.gradient_in_cell(cell_index)?;
        Ok(DeformationState::from_displacement_gradient(grad_u))
    }
}

/// Deformation measures at one evaluation point.
#[derive(Debug, Clone, Copy)]
pub struct DeformationState {
    grad_u: Tensor2,
    f: Tensor2,
}

impl DeformationState {
    /// Build the state from a displacement gradient ∇u.
    pub fn from_displacement_gradient(grad_u: Tensor2) -> Self {
        Self {
            grad_u,
            f: identity() + grad_u,
        }
    }

    /// Displacement gradient ∇u.
    pub fn displacement_gradient(&self) -> &Tensor2 {
        &self.grad_u
    }

    /// Deformation gradient F = I + ∇u.
    pub fn deformation_gradient(&self) -> &Tensor2 {
        &self.f
    }

    /// Volume ratio J = det F.
    pub fn jacobian(&self) -> f64 {
        self.f.determinant()
    }

    /// Right Cauchy-Green tensor C = FᵀF.
    pub fn right_cauchy_green(&self) -> Tensor2 {
        self.f.transpose() * self.f
    }

    /// Green-Lagrange strain E = (C - I) / 2.
    pub fn green_lagrange(&self) -> Tensor2 {
        (self.right_cauchy_green() - identity()) / 2.0
    }

    /// Directional variation of F along a test-function gradient: dF = ∇v.
    pub fn deformation_gradient_variation(&self, grad_v: &Tensor2) -> Tensor2 {
        *grad_v
    }

    /// Directional variation of E along a test-function gradient:
    /// dE = sym(Fᵀ∇v).
    pub fn green_lagrange_variation(&self, grad_v: &Tensor2) -> Tensor2 {
        sym(&(self.f.transpose() * grad_v))
    }

    /// State displaced by `h` along a test-function gradient.
    ///
    /// Used by the energy formulation to take directional derivatives of the
    /// strain-energy density numerically.
    pub fn perturbed(&self, grad_v: &Tensor2, h: f64) -> DeformationState {
        DeformationState::from_displacement_gradient(self.grad_u + grad_v * h)
    }
}
