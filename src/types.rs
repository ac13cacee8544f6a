//! Core tensor types for finite-strain mechanics.
//!
//! This module defines the fundamental types used throughout hyperfem:
//! - Geometric primitives (points, vectors)
//! - Second-order tensors in full 3x3 form
//!
//! Stress and deformation tensors are kept as full `Matrix3` values rather than
//! Voigt vectors: the first Piola-Kirchhoff stress is not symmetric, so a
//! six-component representation cannot hold it.

use nalgebra::{Matrix3, Vector3};

/// A point in 3D space.
pub type Point3 = Vector3<f64>;

/// A 3D vector (displacement, force, etc.).
pub type Vec3 = Vector3<f64>;

/// A second-order tensor in 3D (deformation gradient, stress, ...).
pub type Tensor2 = Matrix3<f64>;

/// The second-order identity tensor.
#[inline]
pub fn identity() -> Tensor2 {
    Matrix3::identity()
}

/// Symmetric part of a tensor: sym(A) = (A + Aᵀ) / 2.
#[inline]
pub fn sym(a: &Tensor2) -> Tensor2 {
    (a + a.transpose()) / 2.0
}

/// Double contraction of two second-order tensors: A : B = Σᵢⱼ AᵢⱼBᵢⱼ.
#[inline]
pub fn ddot(a: &Tensor2, b: &Tensor2) -> f64 {
    a.component_mul(b).sum()
}

/// Outer (dyadic) product of two vectors: (a ⊗ b)ᵢⱼ = aᵢbⱼ.
#[inline]
pub fn outer(a: &Vec3, b: &Vec3) -> Tensor2 {
    a * b.transpose()
}
