//! St. Venant-Kirchhoff hyperelastic law.
//!
//! The direct finite-strain extension of linear elasticity:
//!
//! Ψ(E) = λ/2 tr(E)² + μ E : E
//!
//! Valid for large rotations with moderate strains; not polyconvex, so it
//! softens unphysically under strong compression.

use crate::kinematics::DeformationState;
use crate::material::{HyperElastic, MaterialParameters, Moduli};
use crate::types::{ddot, identity, Tensor2};
use crate::error::Result;

/// St. Venant-Kirchhoff material in Lamé parameters.
#[derive(Debug, Clone, Copy)]
pub struct StVenantKirchhoff {
    lambda: f64,
    mu: f64,
}

impl StVenantKirchhoff {
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

impl HyperElastic for StVenantKirchhoff {
    fn strain_energy(&self, state: &DeformationState) -> f64 {
        let e = state.green_lagrange();
        let tr = e.trace();
        self.lambda / 2.0 * tr * tr + self.mu * ddot(&e, &e)
    }

    /// Σ = λ tr(E) I + 2μ E.
    fn pk2_stress(&self, state: &DeformationState) -> Tensor2 {
        let e = state.green_lagrange();
        identity() * (self.lambda * e.trace()) + e * (2.0 * self.mu)
    }

    fn name(&self) -> &str {
        "st_venant_kirchhoff"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn material() -> StVenantKirchhoff {
        StVenantKirchhoff::new(Moduli::new(10.0, 0.3).unwrap())
    }

    fn deformed_state() -> DeformationState {
        let grad_u = Tensor2::new(0.10, 0.05, 0.00, -0.02, 0.08, 0.01, 0.03, 0.00, -0.06);
        DeformationState::from_displacement_gradient(grad_u)
    }

    #[test]
    fn test_undeformed_state_is_stress_free() {
        let state = DeformationState::from_displacement_gradient(Tensor2::zeros());
        let m = material();
        assert_relative_eq!(m.strain_energy(&state), 0.0, epsilon = 1e-14);
        assert_relative_eq!(m.pk2_stress(&state).norm(), 0.0, epsilon = 1e-14);
        assert_relative_eq!(m.pk1_stress(&state).norm(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_energy_positive_when_deformed() {
        assert!(material().strain_energy(&deformed_state()) > 0.0);
    }

    #[test]
    fn test_rigid_rotation_is_stress_free() {
        // 90° rotation about z: E = 0, so Ψ and Σ vanish.
        let r = Tensor2::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let state = DeformationState::from_displacement_gradient(r - identity());
        let m = material();
        assert_relative_eq!(m.strain_energy(&state), 0.0, epsilon = 1e-13);
        assert_relative_eq!(m.pk2_stress(&state).norm(), 0.0, epsilon = 1e-13);
    }

    #[test]
    fn test_stress_consistent_with_energy() {
        // dΨ[∇v] = P : ∇v for every direction; central differences of Ψ
        // check the whole Ψ → Σ → P chain.
        let m = material();
        let state = deformed_state();
        let p = m.pk1_stress(&state);
        let h = 1e-6;
        for i in 0..3 {
            for j in 0..3 {
                let mut dir = Tensor2::zeros();
                dir[(i, j)] = 1.0;
                let plus = m.strain_energy(&state.perturbed(&dir, h));
                let minus = m.strain_energy(&state.perturbed(&dir, -h));
                let fd = (plus - minus) / (2.0 * h);
                assert_relative_eq!(fd, p[(i, j)], epsilon = 1e-8, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn test_pk1_equals_f_times_pk2() {
        let m = material();
        let state = deformed_state();
        let expected = state.deformation_gradient() * m.pk2_stress(&state);
        let p = m.pk1_stress(&state);
        assert_relative_eq!((p - expected).norm(), 0.0, epsilon = 1e-13);
    }
}
