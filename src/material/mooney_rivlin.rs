//! Compressible Mooney-Rivlin hyperelastic law.
//!
//! Two-invariant rubber model with a volumetric penalty:
//!
//! Ψ(C) = c₁ (I₁ - 3) + c₂ (I₂ - 3) - (2c₁ + 4c₂) ln J + κ/2 (J - 1)²
//!
//! The logarithmic term makes the undeformed state stress-free for any
//! admissible (c₁, c₂).

use crate::error::{Error, Result};
use crate::kinematics::DeformationState;
use crate::material::{inverse_or_nan, HyperElastic, MaterialParameters};
use crate::types::{ddot, identity, Tensor2};

/// Compressible Mooney-Rivlin material.
#[derive(Debug, Clone, Copy)]
pub struct MooneyRivlin {
    c1: f64,
    c2: f64,
    kappa: f64,
}

impl MooneyRivlin {
    /// Create a validated Mooney-Rivlin law.
    ///
    /// # Errors
    ///
    /// Fails unless c₁ ≥ 0, c₂ ≥ 0, c₁ + c₂ > 0 and κ > 0.
    pub fn new(c1: f64, c2: f64, kappa: f64) -> Result<Self> {
        if !(c1 >= 0.0 && c2 >= 0.0 && c1 + c2 > 0.0) {
            return Err(Error::InvalidMaterial(
                "Mooney-Rivlin constants must be non-negative with c1 + c2 > 0".into(),
            ));
        }
        if !(kappa > 0.0) {
            return Err(Error::InvalidMaterial(
                "bulk modulus kappa must be positive".into(),
            ));
        }
        Ok(Self { c1, c2, kappa })
    }

    /// Build from a `"c1"` / `"c2"` / `"kappa"` parameter map.
    pub fn from_parameters(params: &MaterialParameters) -> Result<Self> {
        Self::new(params.get("c1")?, params.get("c2")?, params.get("kappa")?)
    }
}

impl HyperElastic for MooneyRivlin {
    fn strain_energy(&self, state: &DeformationState) -> f64 {
        let c = state.right_cauchy_green();
        let i1 = c.trace();
        let i2 = (i1 * i1 - ddot(&c, &c)) / 2.0;
        let j = state.jacobian();
        self.c1 * (i1 - 3.0) + self.c2 * (i2 - 3.0)
            - (2.0 * self.c1 + 4.0 * self.c2) * j.ln()
            + self.kappa / 2.0 * (j - 1.0) * (j - 1.0)
    }

    /// Σ = 2c₁ I + 2c₂ (I₁ I - C) - (2c₁ + 4c₂) C⁻¹ + κ (J - 1) J C⁻¹.
    fn pk2_stress(&self, state: &DeformationState) -> Tensor2 {
        let c = state.right_cauchy_green();
        let inv_c = inverse_or_nan(&c);
        let i1 = c.trace();
        let j = state.jacobian();
        identity() * (2.0 * self.c1)
            + (identity() * i1 - c) * (2.0 * self.c2)
            + inv_c * (self.kappa * (j - 1.0) * j - (2.0 * self.c1 + 4.0 * self.c2))
    }

    fn name(&self) -> &str {
        "mooney_rivlin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn material() -> MooneyRivlin {
        MooneyRivlin::new(1.0, 0.2, 10.0).unwrap()
    }

    fn deformed_state() -> DeformationState {
        let grad_u = Tensor2::new(0.10, 0.05, 0.00, -0.02, 0.08, 0.01, 0.03, 0.00, -0.06);
        DeformationState::from_displacement_gradient(grad_u)
    }

    #[test]
    fn test_parameter_validation() {
        assert!(MooneyRivlin::new(1.0, 0.0, 10.0).is_ok());
        assert!(MooneyRivlin::new(0.0, 0.5, 10.0).is_ok());
        assert!(MooneyRivlin::new(0.0, 0.0, 10.0).is_err());
        assert!(MooneyRivlin::new(-1.0, 0.5, 10.0).is_err());
        assert!(MooneyRivlin::new(1.0, 0.2, 0.0).is_err());
    }

    #[test]
    fn test_undeformed_state_is_stress_free() {
        let state = DeformationState::from_displacement_gradient(Tensor2::zeros());
        let m = material();
        assert_relative_eq!(m.strain_energy(&state), 0.0, epsilon = 1e-14);
        assert_relative_eq!(m.pk2_stress(&state).norm(), 0.0, epsilon = 1e-13);
        assert_relative_eq!(m.pk1_stress(&state).norm(), 0.0, epsilon = 1e-13);
    }

    #[test]
    fn test_energy_positive_when_deformed() {
        assert!(material().strain_energy(&deformed_state()) > 0.0);
    }

    #[test]
    fn test_stress_consistent_with_energy() {
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
        assert_relative_eq!(
            (m.pk1_stress(&state) - expected).norm(),
            0.0,
            epsilon = 1e-12
        );
    }
}
