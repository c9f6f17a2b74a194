use thiserror::Error;

use crate::Algorithm;

/// Invalid arguments passed to a [`Context`](crate::Context).
///
/// Setters return these directly. Problems that can only be detected once a
/// run starts make [`Context::optimize`](crate::Context::optimize) report
/// [`ResultCode::InvalidArgs`](crate::ResultCode::InvalidArgs) instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgError {
    #[error("context has zero dimensions")]
    ZeroDimension,

    #[error("expected {expected} values, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("bound {index} is invalid: lower {lower}, upper {upper}")]
    InvalidBound { index: usize, lower: f64, upper: f64 },

    #[error("bound {index} must be finite for global search")]
    UnboundedGlobal { index: usize },

    #[error("{name} must be non-negative, got {value}")]
    Tolerance { name: &'static str, value: f64 },

    #[error("stop value must not be NaN")]
    StopValue,

    #[error("initial step {index} must be finite and non-zero, got {value}")]
    Step { index: usize, value: f64 },

    #[error("no objective installed")]
    NoObjective,

    #[error("global search needs a stop value, an evaluation budget, or a positive score tolerance")]
    NoTermination,

    #[error("{algorithm} cannot be nested as a local optimizer")]
    NotLocal { algorithm: Algorithm },

    #[error("local optimizer has dimension {actual}, expected {expected}")]
    LocalDimension { expected: usize, actual: usize },

    #[error("local optimizer rejected: {0}")]
    Local(Box<ArgError>),
}
