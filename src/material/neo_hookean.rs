//! Compressible Neo-Hookean hyperelastic law.
//!
//! Ψ(C) = μ/2 (tr C - 3) - μ ln J + λ/2 (ln J)²
//!
//! Requires J > 0; inadmissible states produce non-finite values rather than
//! aborting, leaving rejection to the outer solver.

use crate::error::Result;
use crate::kinematics::DeformationState;
use crate::material::{inverse_or_nan, HyperElastic, MaterialParameters, Moduli};
use crate::types::{identity, Tensor2};

/// Compressible Neo-Hookean material in Lamé parameters.
#[derive(Debug, Clone, Copy)]
pub struct NeoHookean {
    lambda: f64,
    mu: f64,
}

impl NeoHookean {
    /// Build from validated engineering moduli.
    pub fn new(moduli: Moduli) -> Self {
        Self {
            lambda: moduli.lame_lambda(),
            mu: moduli.lame_mu(),
        }
    }

    /// Build from an `"E"` / `"nu"` parameter map.
    pub fn from_parameters(params: &MaterialParameters) -> Result<Self> {
        Ok(Self::new(Moduli::from_parameters(params)?))
    }
}

impl HyperElastic for NeoHookean {
    fn strain_energy(&self, state: &DeformationState) -> f64 {
        let i1 = state.right_cauchy_green().trace();
        let ln_j = state.jacobian().ln();
        self.mu / 2.0 * (i1 - 3.0) - self.mu * ln_j + self.lambda / 2.0 * ln_j * ln_j
    }

    /// Σ = μ (I - C⁻¹) + λ ln J C⁻¹.
    fn pk2_stress(&self, state: &DeformationState) -> Tensor2 {
        let c = state.right_cauchy_green();
        let inv_c = inverse_or_nan(&c);
        let ln_j = state.jacobian().ln();
        (identity() - inv_c) * self.mu + inv_c * (self.lambda * ln_j)
    }

    /// Closed form P = μ (F - F⁻ᵀ) + λ ln J F⁻ᵀ, equal to F·Σ.
    fn pk1_stress(&self, state: &DeformationState) -> Tensor2 {
        let f = state.deformation_gradient();
        let f_inv_t = inverse_or_nan(f).transpose();
        (f - f_inv_t) * self.mu + f_inv_t * (self.lambda * state.jacobian().ln())
    }

    fn name(&self) -> &str {
        "neo_hookean"
    }
}
