//! Internal-virtual-work residual for hyperelastic materials.
//!
//! The operator builds its residual form once, at construction, under one of
//! three formulations. All three express the same virtual work and agree for
//! a consistent material; they differ in which derived quantity carries the
//! derivative:
//!
//! - `"ener"`: directional derivative of the strain-energy functional along
//!   the test function.
//! - `"PK2"`: Σ double-contracted with the variation of the Green-Lagrange
//!   strain.
//! - `"PK1"`: P double-contracted with the variation of the deformation
//!   gradient.

use std::str::FromStr;
use std::sync::Arc;

use crate::assembly::assemble_residual;
use crate::error::{Error, Result};
use crate::kinematics::{DeformationState, Kinematics};
use crate::material::{create_material, HyperElastic, MaterialParameters};
use crate::measure::{FormParameters, Measure};
use crate::types::{ddot, Tensor2};

/// Step length for the energy formulation's directional derivative.
const ENERGY_STEP: f64 = 1e-6;

/// Residual formulation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    /// Directional derivative of the energy functional.
    Energy,
    /// Second Piola-Kirchhoff stress against dE.
    Pk2,
    /// First Piola-Kirchhoff stress against dF.
    Pk1,
}

impl Formulation {
    /// The wire tag of this formulation.
    pub fn tag(&self) -> &'static str {
        match self {
            Formulation::Energy => "ener",
            Formulation::Pk2 => "PK2",
            Formulation::Pk1 => "PK1",
        }
    }
}

impl FromStr for Formulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ener" => Ok(Formulation::Energy),
            "PK2" => Ok(Formulation::Pk2),
            "PK1" => Ok(Formulation::Pk1),
            other => Err(Error::UnknownFormulation(other.to_owned())),
        }
    }
}

/// The residual variational form: virtual-work density per unit reference
/// volume, contracted against a test-function gradient.
pub struct ResidualForm {
    formulation: Formulation,
    material: Arc<dyn HyperElastic>,
}

impl ResidualForm {
    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Virtual-work density at a deformation state for one test-function
    /// gradient ∇v.
    pub fn density(&self, state: &DeformationState, grad_v: &Tensor2) -> f64 {
        match self.formulation {
            Formulation::Energy => {
                let psi_plus = self
                    .material
                    .strain_energy(&state.perturbed(grad_v, ENERGY_STEP));
                let psi_minus = self
                    .material
                    .strain_energy(&state.perturbed(grad_v, -ENERGY_STEP));
                (psi_plus - psi_minus) / (2.0 * ENERGY_STEP)
            }
            Formulation::Pk2 => ddot(
                &self.material.pk2_stress(state),
                &state.green_lagrange_variation(grad_v),
            ),
            Formulation::Pk1 => ddot(
                &self.material.pk1_stress(state),
                &state.deformation_gradient_variation(grad_v),
            ),
        }
    }
}

/// Hyperelastic internal-virtual-work operator.
///
/// Construction selects the material (through the factory) and the
/// formulation; the resulting residual form is immutable for the operator's
/// lifetime. The displacement solution the kinematics wrap may advance
/// between residual evaluations.
pub struct HyperElasticity {
    kinematics: Arc<Kinematics>,
    material: Arc<dyn HyperElastic>,
    measure: Measure,
    res_form: ResidualForm,
}

impl HyperElasticity {
    /// Build the operator.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnknownFormulation`] for an unrecognized
    /// formulation tag, and with the factory's errors for unknown models or
    /// invalid parameters. Nothing is built on failure.
    pub fn new(
        kinematics: Arc<Kinematics>,
        model: &str,
        params: &MaterialParameters,
        measure: Measure,
        formulation: &str,
    ) -> Result<Self> {
        let formulation = formulation.parse::<Formulation>()?;
        let material: Arc<dyn HyperElastic> = Arc::from(create_material(model, params)?);
        let res_form = ResidualForm {
            formulation,
            material: Arc::clone(&material),
        };
        Ok(Self {
            kinematics,
            material,
            measure,
            res_form,
        })
    }

    /// The kinematics provider.
    pub fn kinematics(&self) -> &Arc<Kinematics> {
        &self.kinematics
    }

    /// The material law.
    pub fn material(&self) -> &Arc<dyn HyperElastic> {
        &self.material
    }

    /// The integration measure.
    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    /// The residual variational form, fixed at construction.
    pub fn res_form(&self) -> &ResidualForm {
        &self.res_form
    }

    /// Assemble the local residual vector for the current solution.
    ///
    /// One entry per nodal dof of this rank's partition; cross-rank dof
    /// assembly belongs to the external solver.
    pub fn residual(&self) -> Result<Vec<f64>> {
        assemble_residual(&self.measure, &self.kinematics, &self.res_form)
    }

    /// Total strain energy of the current solution over the measure.
    ///
    /// Rank-aggregated like any other integral; handy as a QOI density.
    pub fn total_strain_energy(&self, params: &FormParameters) -> Result<f64> {
        let kinematics = Arc::clone(&self.kinematics);
        let material = Arc::clone(&self.material);
        let domain = Arc::clone(self.measure.domain());
        self.measure.integrate(
            &move |x: &crate::types::Point3| {
                let cell = match domain.find_cell(x) {
                    Some(c) => c,
                    None => return 0.0,
                };
                match kinematics.state_in_cell(cell) {
                    Ok(state) => material.strain_energy(&state),
                    Err(_) => 0.0,
                }
            },
            params,
        )
    }
}
