//! Error types for hyperfem operations.

use thiserror::Error;

/// Result type alias using the hyperfem Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during hyperfem operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unrecognized residual formulation tag.
    #[error("unknown residual formulation: {0:?} (expected \"ener\", \"PK2\" or \"PK1\")")]
    UnknownFormulation(String),

    /// Unrecognized material model name.
    #[error("unknown material model: {0:?}")]
    UnknownMaterial(String),

    /// Missing or physically invalid material parameters.
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    /// Invalid configuration of a quantity of interest or measure.
    #[error("configuration error: {0}")]
    Config(String),

    /// `divide_by_dt` requested with a vanishing time step.
    #[error("time step must be finite and non-zero for a rate quantity")]
    ZeroTimeStep,

    /// Point lies outside the local subdomain. Local condition only: the
    /// distributed evaluation protocol absorbs it before the consensus check.
    #[error("point ({0}, {1}, {2}) not in local subdomain")]
    PointNotInSubdomain(f64, f64, f64),

    /// Point lies in no rank's subdomain. Raised on every rank after the
    /// collective reductions complete.
    #[error("point ({0}, {1}, {2}) outside the global domain")]
    PointOutsideDomain(f64, f64, f64),

    /// Degenerate cell geometry encountered during integration.
    #[error("degenerate cell: {0}")]
    DegenerateCell(String),
}
