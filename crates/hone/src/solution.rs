use thiserror::Error;

use crate::{Input, ResultCode};

/// The result of [`Optimizer::optimize`](crate::Optimizer::optimize).
///
/// `optimum` and `score` hold the best point seen, also when the run ended
/// early or the solver failed. If the solver rejected its arguments before
/// evaluating anything, `optimum` is the initial point and `score` is NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution<const N: usize> {
    /// How the run ended.
    pub code: ResultCode,

    /// Best point found.
    pub optimum: Input<N>,

    /// Objective value at `optimum`.
    pub score: f64,
}

/// A run that ended with a failure code.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("optimization failed with {code:?} (best score {score})")]
pub struct Failure<const N: usize> {
    pub code: ResultCode,
    pub optimum: Input<N>,
    pub score: f64,
}

impl<const N: usize> Solution<N> {
    /// Returns `true` unless the code reports a failure.
    ///
    /// A forced stop counts as a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Converts a failed run into an error.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] carrying the code and best point if the run
    /// ended with a failure code.
    pub fn into_result(self) -> Result<Self, Failure<N>> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Failure {
                code: self.code,
                optimum: self.optimum,
                score: self.score,
            })
        }
    }
}
