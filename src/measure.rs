//! Integration measure and the form seams consumed by operators and QOIs.
//!
//! [`Measure`] binds a local partition to a communicator and performs the
//! rank-aggregated definite integral: cells integrate in parallel with the
//! Gauss rule selected through [`FormParameters`], and the local sums are
//! combined with one collective reduction. Callers therefore never re-reduce
//! an integral across ranks themselves.
//!
//! Expressions come in two capabilities, mirroring how they are consumed:
//! [`Functional`] for quantities assembled by integration and [`PointValue`]
//! for quantities evaluated at a spatial point (which may fail locally when
//! the point belongs to another rank's partition).

use std::sync::Arc;

use rayon::prelude::*;

use crate::comm::Communicator;
use crate::domain::gauss::tet_rule;
use crate::domain::Subdomain;
use crate::error::{Error, Result};
use crate::types::Point3;

/// Pass-through configuration for form integration.
#[derive(Debug, Clone)]
pub struct FormParameters {
    /// Polynomial degree the quadrature rule must integrate exactly.
    pub quadrature_degree: usize,
}

impl Default for FormParameters {
    fn default() -> Self {
        Self {
            quadrature_degree: 2,
        }
    }
}

/// A scalar integrand sampled at spatial points.
pub trait ScalarDensity: Send + Sync {
    fn at(&self, x: &Point3) -> f64;
}

impl<F> ScalarDensity for F
where
    F: Fn(&Point3) -> f64 + Send + Sync,
{
    fn at(&self, x: &Point3) -> f64 {
        self(x)
    }
}

/// Integration measure over a rank's partition.
///
/// Cheap to clone; the partition and communicator are shared.
#[derive(Clone)]
pub struct Measure {
    domain: Arc<Subdomain>,
    comm: Arc<dyn Communicator>,
}

impl Measure {
    pub fn new(domain: Arc<Subdomain>, comm: Arc<dyn Communicator>) -> Self {
        Self { domain, comm }
    }

    /// The partition integrated over.
    pub fn domain(&self) -> &Arc<Subdomain> {
        &self.domain
    }

    /// The communicator used for the cross-rank reduction.
    pub fn comm(&self) -> &Arc<dyn Communicator> {
        &self.comm
    }

    /// Rank-aggregated definite integral of a scalar density.
    ///
    /// Every rank of the communicator must call this collectively: the local
    /// quadrature sum ends in a blocking collective reduction.
    ///
    /// # Errors
    ///
    /// Fails if `params` requests an unsupported quadrature degree.
    pub fn integrate(&self, density: &dyn ScalarDensity, params: &FormParameters) -> Result<f64> {
        let rule = tet_rule(params.quadrature_degree).ok_or_else(|| {
            Error::Config(format!(
                "unsupported quadrature degree {}",
                params.quadrature_degree
            ))
        })?;

        let local: f64 = (0..self.domain.n_cells())
            .into_par_iter()
            .map(|i| {
                // Cells are index-validated at construction
                let cell = self.domain.cell(i).unwrap();
                let volume = cell.volume();
                let sample: f64 = rule
                    .iter()
                    .map(|qp| qp.weight * density.at(&cell.point_at(&qp.bary)))
                    .sum();
                sample * volume
            })
            .sum();

        Ok(self.comm.sum(local))
    }
}

/// An integrable expression: produces one scalar per assembly.
pub trait Functional: Send + Sync {
    fn assemble(&self, params: &FormParameters) -> Result<f64>;
}

/// A scalar density bound to its integration measure.
pub struct FunctionalForm {
    measure: Measure,
    density: Arc<dyn ScalarDensity>,
}

impl FunctionalForm {
    pub fn new(measure: Measure, density: impl ScalarDensity + 'static) -> Self {
        Self {
            measure,
            density: Arc::new(density),
        }
    }
}

impl Functional for FunctionalForm {
    fn assemble(&self, params: &FormParameters) -> Result<f64> {
        self.measure.integrate(&*self.density, params)
    }
}

/// A pointwise-evaluable expression.
///
/// Evaluation is local: it fails with [`Error::PointNotInSubdomain`] when the
/// point belongs to another rank. The distributed consensus over such
/// failures lives in the QOI update protocol, not here.
pub trait PointValue: Send + Sync {
    fn evaluate_at(&self, x: &Point3) -> Result<f64>;
}

/// A scalar spatial function gated by a rank's partition.
pub struct FieldExpression {
    domain: Arc<Subdomain>,
    f: Arc<dyn Fn(&Point3) -> f64 + Send + Sync>,
}

impl FieldExpression {
    pub fn new(
        domain: Arc<Subdomain>,
        f: impl Fn(&Point3) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            domain,
            f: Arc::new(f),
        }
    }
}

impl PointValue for FieldExpression {
    fn evaluate_at(&self, x: &Point3) -> Result<f64> {
        if self.domain.contains(x) {
            Ok((self.f)(x))
        } else {
            Err(Error::PointNotInSubdomain(x[0], x[1], x[2]))
        }
    }
}
