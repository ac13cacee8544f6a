//! Hyperelastic material abstraction.
//!
//! Every material law implements [`HyperElastic`], exposing the three derived
//! quantities the residual formulations consume: the strain-energy density Ψ,
//! the second Piola-Kirchhoff stress Σ and the first Piola-Kirchhoff stress P.
//! Laws are selected at runtime through [`create_material`], keyed on a model
//! name string plus a parameter mapping.
//!
//! The quantities must be mutually consistent: Σ = 2 ∂Ψ/∂C and P = F·Σ. The
//! trait supplies `pk1_stress` as F·Σ by default, so a model stays consistent
//! unless it overrides with the (equivalent) closed form.
//!
//! # Submodules
//!
//! - [`stvk`] - St. Venant-Kirchhoff
//! - [`neo_hookean`] - compressible Neo-Hookean
//! - [`mooney_rivlin`] - compressible Mooney-Rivlin

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::kinematics::DeformationState;
use crate::types::Tensor2;

pub mod mooney_rivlin;
pub mod neo_hookean;
pub mod stvk;

pub use mooney_rivlin::MooneyRivlin;
pub use neo_hookean::NeoHookean;
pub use stvk::StVenantKirchhoff;

/// Named scalar parameters for material construction.
#[derive(Debug, Clone, Default)]
pub struct MaterialParameters {
    values: HashMap<String, f64>,
}

impl MaterialParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_owned(), value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_owned(), value);
    }

    /// Fetch a required parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMaterial`] when the parameter is absent.
    pub fn get(&self, name: &str) -> Result<f64> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| Error::InvalidMaterial(format!("missing parameter {:?}", name)))
    }
}

/// Elastic moduli in engineering form.
///
/// Validates the physical ranges once, then converts to whatever
/// parameterization a model prefers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moduli {
    /// Young's modulus E.
    pub youngs_modulus: f64,
    /// Poisson's ratio ν.
    pub poissons_ratio: f64,
}

impl Moduli {
    /// Create validated moduli.
    ///
    /// # Errors
    ///
    /// Returns an error if E ≤ 0 or ν is outside (-1, 0.5).
    pub fn new(youngs_modulus: f64, poissons_ratio: f64) -> Result<Self> {
        if !(youngs_modulus > 0.0) {
            return Err(Error::InvalidMaterial(
                "Young's modulus must be positive".into(),
            ));
        }
        if !(poissons_ratio > -1.0 && poissons_ratio < 0.5) {
            return Err(Error::InvalidMaterial(
                "Poisson's ratio must be in range (-1, 0.5)".into(),
            ));
        }
        Ok(Self {
            youngs_modulus,
            poissons_ratio,
        })
    }

    /// Read the `"E"` / `"nu"` entries of a parameter map.
    pub fn from_parameters(params: &MaterialParameters) -> Result<Self> {
        Self::new(params.get("E")?, params.get("nu")?)
    }

    /// Shear modulus G = E / (2(1 + ν)).
    pub fn shear_modulus(&self) -> f64 {
        self.youngs_modulus / (2.0 * (1.0 + self.poissons_ratio))
    }

    /// Bulk modulus K = E / (3(1 - 2ν)).
    pub fn bulk_modulus(&self) -> f64 {
        self.youngs_modulus / (3.0 * (1.0 - 2.0 * self.poissons_ratio))
    }

    /// Lamé's first parameter λ = Eν / ((1+ν)(1-2ν)).
    pub fn lame_lambda(&self) -> f64 {
        let e = self.youngs_modulus;
        let nu = self.poissons_ratio;
        e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu))
    }

    /// Lamé's second parameter μ = G.
    pub fn lame_mu(&self) -> f64 {
        self.shear_modulus()
    }
}

/// Capability contract of a hyperelastic law.
///
/// Materials must be thread-safe (Send + Sync): residual assembly evaluates
/// them from parallel cell loops.
pub trait HyperElastic: Send + Sync {
    /// Strain-energy density Ψ at a deformation state.
    fn strain_energy(&self, state: &DeformationState) -> f64;

    /// Second Piola-Kirchhoff stress Σ = 2 ∂Ψ/∂C.
    fn pk2_stress(&self, state: &DeformationState) -> Tensor2;

    /// First Piola-Kirchhoff stress P = F·Σ.
    fn pk1_stress(&self, state: &DeformationState) -> Tensor2 {
        state.deformation_gradient() * self.pk2_stress(state)
    }

    /// Model name for diagnostics.
    fn name(&self) -> &str;
}

/// Build a material law from its model name and parameters.
///
/// Recognized names: `"st_venant_kirchhoff"` (alias `"stvk"`),
/// `"neo_hookean"`, `"mooney_rivlin"`.
///
/// # Errors
///
/// Returns [`Error::UnknownMaterial`] for an unrecognized name and
/// [`Error::InvalidMaterial`] for missing or out-of-range parameters.
pub fn create_material(
    model: &str,
    params: &MaterialParameters,
) -> Result<Box<dyn HyperElastic>> {
    match model {
        "st_venant_kirchhoff" | "stvk" => {
            Ok(Box::new(StVenantKirchhoff::from_parameters(params)?))
        }
        "neo_hookean" => Ok(Box::new(NeoHookean::from_parameters(params)?)),
        "mooney_rivlin" => Ok(Box::new(MooneyRivlin::from_parameters(params)?)),
        other => Err(Error::UnknownMaterial(other.to_owned())),
    }
}

/// Inverse of a (theoretically SPD) tensor.
///
/// A numerically singular state surfaces as non-finite stress components,
/// which the outer solver's line search rejects; the material itself never
/// aborts mid-assembly.
pub(crate) fn inverse_or_nan(c: &Tensor2) -> Tensor2 {
    c.try_inverse()
        .unwrap_or_else(|| Tensor2::from_element(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_moduli_validation() {
        assert!(Moduli::new(10.0, 0.3).is_ok());
        assert!(Moduli::new(-1.0, 0.3).is_err());
        assert!(Moduli::new(0.0, 0.3).is_err());
        assert!(Moduli::new(10.0, 0.5).is_err());
        assert!(Moduli::new(10.0, -1.0).is_err());
        assert!(Moduli::new(f64::NAN, 0.3).is_err());
    }

    #[test]
    fn test_lame_conversion() {
        let m = Moduli::new(200.0, 0.3).unwrap();
        // G = E / (2(1+ν))
        assert_relative_eq!(m.lame_mu(), 200.0 / 2.6, epsilon = 1e-10);
        // λ = Eν / ((1+ν)(1-2ν))
        assert_relative_eq!(m.lame_lambda(), 200.0 * 0.3 / (1.3 * 0.4), epsilon = 1e-10);
        // K = E / (3(1-2ν))
        assert_relative_eq!(m.bulk_modulus(), 200.0 / 1.2, epsilon = 1e-10);
    }

    #[test]
    fn test_parameters_lookup() {
        let params = MaterialParameters::new().with("E", 10.0).with("nu", 0.3);
        assert_relative_eq!(params.get("E").unwrap(), 10.0);
        assert!(matches!(
            params.get("kappa"),
            Err(Error::InvalidMaterial(_))
        ));
    }

    #[test]
    fn test_factory_builds_all_models() {
        let two_modulus = MaterialParameters::new().with("E", 10.0).with("nu", 0.3);
        for name in ["st_venant_kirchhoff", "stvk", "neo_hookean"] {
            let material = create_material(name, &two_modulus).unwrap();
            assert!(!material.name().is_empty());
        }
        let mr = MaterialParameters::new()
            .with("c1", 1.0)
            .with("c2", 0.2)
            .with("kappa", 10.0);
        assert!(create_material("mooney_rivlin", &mr).is_ok());
    }

    #[test]
    fn test_factory_unknown_model() {
        let params = MaterialParameters::new();
        assert!(matches!(
            create_material("ogden", &params),
            Err(Error::UnknownMaterial(_))
        ));
    }

    #[test]
    fn test_factory_missing_parameters() {
        let params = MaterialParameters::new().with("E", 10.0);
        assert!(matches!(
            create_material("neo_hookean", &params),
            Err(Error::InvalidMaterial(_))
        ));
    }
}
