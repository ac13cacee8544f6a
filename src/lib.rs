//! hyperfem - QOI extraction and hyperelastic residual formulations
//!
//! Building blocks for nonlinear continuum-mechanics simulations on
//! domain-decomposed meshes:
//! - Scalar quantities of interest, by domain integration or by MPI-safe
//!   pointwise evaluation with rank consensus
//! - Internal-virtual-work residuals for hyperelastic materials under the
//!   energy, PK2 and PK1 formulations
//! - Parallel cell-loop integration and residual assembly using Rayon
//!
//! # Architecture
//!
//! The library is designed around these core abstractions:
//!
//! - [`HyperElastic`] trait: the material capability contract (Ψ, Σ, P),
//!   with laws selected through [`create_material`]
//! - [`Kinematics`]: deformation measures derived from the displacement field
//! - [`Communicator`] trait: blocking collective reductions across ranks
//! - [`Measure`]: rank-aggregated integration over a local partition
//! - [`Qoi`] / [`HyperElasticity`]: the two consumer-facing operators

pub mod assembly;
pub mod comm;
pub mod domain;
pub mod error;
pub mod field;
pub mod hyperelasticity;
pub mod kinematics;
pub mod material;
pub mod measure;
pub mod qoi;
pub mod types;

pub use assembly::assemble_residual;
pub use comm::{Communicator, SerialComm, ThreadComm};
pub use domain::Subdomain;
pub use error::{Error, Result};
pub use field::DisplacementField;
pub use hyperelasticity::{Formulation, HyperElasticity, ResidualForm};
pub use kinematics::{DeformationState, Kinematics};
pub use material::{create_material, HyperElastic, MaterialParameters, Moduli};
pub use measure::{
    FieldExpression, FormParameters, Functional, FunctionalForm, Measure, PointValue,
    ScalarDensity,
};
pub use qoi::Qoi;
pub use types::{Point3, Tensor2, Vec3};
