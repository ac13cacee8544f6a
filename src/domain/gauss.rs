//! Gauss quadrature rules for tetrahedral integration.
//!
//! Points are stored in barycentric coordinates over the reference tetrahedron,
//! with weights normalized to sum to one. To integrate over a physical cell,
//! multiply the weighted samples by the cell volume.
//!
//! # Usage
//!
//! ```
//! use hyperfem::domain::gauss::tet_rule;
//!
//! for qp in tet_rule(2).unwrap() {
//!     // qp.bary gives (L1, L2, L3, L4), qp.weight the normalized weight
//! }
//! ```

/// A quadrature point in barycentric coordinates with a normalized weight.
#[derive(Debug, Clone, Copy)]
pub struct QuadraturePoint {
    /// Barycentric coordinates (L1, L2, L3, L4), summing to one.
    pub bary: [f64; 4],
    /// Integration weight; each rule's weights sum to one.
    pub weight: f64,
}

/// Centroid rule: exact for constant and linear integrands.
const TET_1: [QuadraturePoint; 1] = [QuadraturePoint {
    bary: [0.25, 0.25, 0.25, 0.25],
    weight: 1.0,
}];

// 4-point rule constants: a at the favored vertex, b at the other three.
const TET_4_A: f64 = 0.585_410_196_624_968_5;
const TET_4_B: f64 = 0.138_196_601_125_010_5;

/// 4-point rule: exact for quadratic integrands.
const TET_4: [QuadraturePoint; 4] = [
    QuadraturePoint {
        bary: [TET_4_A, TET_4_B, TET_4_B, TET_4_B],
        weight: 0.25,
    },
    QuadraturePoint {
        bary: [TET_4_B, TET_4_A, TET_4_B, TET_4_B],
        weight: 0.25,
    },
    QuadraturePoint {
        bary: [TET_4_B, TET_4_B, TET_4_A, TET_4_B],
        weight: 0.25,
    },
    QuadraturePoint {
        bary: [TET_4_B, TET_4_B, TET_4_B, TET_4_A],
        weight: 0.25,
    },
];

/// Quadrature rule for the reference tetrahedron, by polynomial degree.
///
/// Supported degrees: 1 (centroid rule) and 2 (4-point rule). Returns `None`
/// for unsupported degrees; callers surface that as a configuration error.
pub fn tet_rule(degree: usize) -> Option<&'static [QuadraturePoint]> {
    match degree {
        0 | 1 => Some(&TET_1),
        2 => Some(&TET_4),
        _ => None,
    }
}
