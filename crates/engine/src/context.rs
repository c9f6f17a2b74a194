use std::fmt;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{trace, warn};

use crate::{
    Algorithm, ArgError, ResultCode, StopHandle, esch,
    evaluator::{Evaluator, Sense},
    simplex,
    step::default_step,
    stop::Tolerance,
    subplex,
};

type Objective<'f> = Box<dyn FnMut(&[f64]) -> f64 + 'f>;

/// The result of [`Context::optimize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// How the run ended.
    pub code: ResultCode,

    /// Best raw score found, or NaN if nothing was evaluated.
    pub score: f64,

    /// Number of objective evaluations, nested local runs included.
    pub evaluations: u32,
}

impl Outcome {
    fn rejected() -> Self {
        Self {
            code: ResultCode::InvalidArgs,
            score: f64::NAN,
            evaluations: 0,
        }
    }
}

/// Bounds, steps, and tolerances handed to an algorithm.
pub(crate) struct Domain<'a> {
    pub(crate) lower: &'a [f64],
    pub(crate) upper: &'a [f64],
    pub(crate) step: &'a [f64],
    pub(crate) tol: Tolerance,
}

/// A solver context for one algorithm and a fixed dimension.
///
/// The lifetime `'f` bounds whatever the installed objective borrows. A
/// context is an owned value: dropping it releases the objective and any
/// attached local context.
pub struct Context<'f> {
    algorithm: Algorithm,
    dim: usize,
    lower: Vec<f64>,
    upper: Vec<f64>,
    tol: Tolerance,
    stopval: Option<f64>,
    maxeval: Option<u32>,
    initial_step: Option<Vec<f64>>,
    objective: Option<(Sense, Objective<'f>)>,
    local: Option<Box<Context<'f>>>,
    stop: StopHandle,
    seed: Option<u64>,
}

impl<'f> Context<'f> {
    /// Creates an unbounded context with no stopping criteria.
    #[must_use]
    pub fn new(algorithm: Algorithm, dim: usize) -> Self {
        Self {
            algorithm,
            dim,
            lower: vec![f64::NEG_INFINITY; dim],
            upper: vec![f64::INFINITY; dim],
            tol: Tolerance::default(),
            stopval: None,
            maxeval: None,
            initial_step: None,
            objective: None,
            local: None,
            stop: StopHandle::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Sets the lower bound of every dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `lower` does not have one value per dimension.
    pub fn set_lower_bounds(&mut self, lower: &[f64]) -> Result<(), ArgError> {
        self.check_len(lower.len())?;
        self.lower.copy_from_slice(lower);
        Ok(())
    }

    /// Sets the upper bound of every dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if `upper` does not have one value per dimension.
    pub fn set_upper_bounds(&mut self, upper: &[f64]) -> Result<(), ArgError> {
        self.check_len(upper.len())?;
        self.upper.copy_from_slice(upper);
        Ok(())
    }

    /// Stops when successive scores differ by less than `tol`.
    pub fn set_ftol_abs(&mut self, tol: f64) {
        self.tol.abs = Some(tol);
    }

    /// Stops when successive scores differ by less than `tol` times their magnitude.
    pub fn set_ftol_rel(&mut self, tol: f64) {
        self.tol.rel = Some(tol);
    }

    /// Stops as soon as a score at least as good as `stopval` is found.
    pub fn set_stopval(&mut self, stopval: f64) {
        self.stopval = Some(stopval);
    }

    /// Caps the number of objective evaluations. Zero removes the cap.
    pub fn set_maxeval(&mut self, maxeval: u32) {
        self.maxeval = (maxeval > 0).then_some(maxeval);
    }

    /// Overrides the default initial step.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` has the wrong length or holds a zero or
    /// non-finite value.
    pub fn set_initial_step(&mut self, step: &[f64]) -> Result<(), ArgError> {
        self.check_len(step.len())?;
        if let Some((index, &value)) = step
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s == 0.0)
        {
            return Err(ArgError::Step { index, value });
        }
        self.initial_step = Some(step.to_vec());
        Ok(())
    }

    /// Seeds the random state of randomized algorithms.
    ///
    /// Unseeded contexts draw their seed from the operating system.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Installs an objective to minimize.
    pub fn set_min_objective<F>(&mut self, objective: F)
    where
        F: FnMut(&[f64]) -> f64 + 'f,
    {
        self.objective = Some((Sense::Minimize, Box::new(objective)));
    }

    /// Installs an objective to maximize.
    pub fn set_max_objective<F>(&mut self, objective: F)
    where
        F: FnMut(&[f64]) -> f64 + 'f,
    {
        self.objective = Some((Sense::Maximize, Box::new(objective)));
    }

    /// Returns a handle that can interrupt this context while it runs.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Requests a stop after the current evaluation.
    pub fn force_stop(&self) {
        self.stop.force_stop();
    }

    /// Attaches a local context that refines the candidates of a global search.
    ///
    /// Local algorithms ignore an attached context.
    ///
    /// # Errors
    ///
    /// Returns an error if `local` runs a global algorithm or has a
    /// different dimension.
    pub fn set_local_optimizer(&mut self, local: Context<'f>) -> Result<(), ArgError> {
        if local.algorithm.is_global() {
            return Err(ArgError::NotLocal {
                algorithm: local.algorithm,
            });
        }
        if local.dim != self.dim {
            return Err(ArgError::LocalDimension {
                expected: self.dim,
                actual: local.dim,
            });
        }
        self.local = Some(Box::new(local));
        Ok(())
    }

    /// Runs the algorithm from the point in `x`.
    ///
    /// `x` is projected onto the bounds first and holds the best point found
    /// when the call returns. Invalid configurations leave `x` untouched and
    /// report [`ResultCode::InvalidArgs`] with a NaN score.
    pub fn optimize(&mut self, x: &mut [f64]) -> Outcome {
        if let Err(err) = self.validate(x.len()) {
            warn!(algorithm = %self.algorithm, %err, "rejected solver arguments");
            return Outcome::rejected();
        }

        self.stop.reset();
        for ((xi, &lo), &hi) in x.iter_mut().zip(&self.lower).zip(&self.upper) {
            *xi = xi.clamp(lo, hi);
        }

        let step = match &self.initial_step {
            Some(step) => step.clone(),
            None => default_step(x, &self.lower, &self.upper),
        };
        let domain = Domain {
            lower: &self.lower,
            upper: &self.upper,
            step: &step,
            tol: self.tol,
        };

        let Some((sense, objective)) = self.objective.as_mut() else {
            return Outcome::rejected();
        };
        let mut eval = Evaluator::new(
            objective.as_mut(),
            *sense,
            self.stop.clone(),
            self.stopval,
            self.maxeval,
            x,
        );

        let result = match self.algorithm {
            Algorithm::NelderMead => simplex::minimize(&mut eval, &domain, x),
            Algorithm::Subplex => subplex::minimize(&mut eval, &domain, x),
            Algorithm::Esch => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                esch::minimize(&mut eval, &domain, x, &mut rng, self.local.as_deref_mut())
            }
        };
        let mut code = result.unwrap_or_else(|halt| halt.0);

        let (best, score, evaluations) = eval.finish();
        x.copy_from_slice(&best);
        if evaluations > 0 && score.is_nan() {
            code = ResultCode::Failure;
        }

        trace!(algorithm = %self.algorithm, ?code, score, evaluations, "solver run finished");

        Outcome {
            code,
            score,
            evaluations,
        }
    }

    /// Runs as a nested local search with at most `budget` evaluations.
    pub(crate) fn refine(&mut self, x: &mut [f64], budget: Option<u32>) -> Outcome {
        let own = self.maxeval;
        self.maxeval = match (own, budget) {
            (Some(own), Some(budget)) => Some(own.min(budget)),
            (own, budget) => own.or(budget),
        };
        let outcome = self.optimize(x);
        self.maxeval = own;
        outcome
    }

    fn check_len(&self, actual: usize) -> Result<(), ArgError> {
        if actual == self.dim {
            Ok(())
        } else {
            Err(ArgError::Length {
                expected: self.dim,
                actual,
            })
        }
    }

    fn validate(&self, len: usize) -> Result<(), ArgError> {
        if self.dim == 0 {
            return Err(ArgError::ZeroDimension);
        }
        self.check_len(len)?;

        for (index, (&lower, &upper)) in self.lower.iter().zip(&self.upper).enumerate() {
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err(ArgError::InvalidBound {
                    index,
                    lower,
                    upper,
                });
            }
            if self.algorithm.is_global() && !(lower.is_finite() && upper.is_finite()) {
                return Err(ArgError::UnboundedGlobal { index });
            }
        }

        for (name, value) in [("ftol_abs", self.tol.abs), ("ftol_rel", self.tol.rel)] {
            if let Some(value) = value {
                if value.is_nan() || value < 0.0 {
                    return Err(ArgError::Tolerance { name, value });
                }
            }
        }
        if self.stopval.is_some_and(f64::is_nan) {
            return Err(ArgError::StopValue);
        }

        if self.objective.is_none() {
            return Err(ArgError::NoObjective);
        }

        if self.algorithm.is_global() {
            if self.stopval.is_none() && self.maxeval.is_none() && !self.tol.can_converge() {
                return Err(ArgError::NoTermination);
            }
            if let Some(local) = &self.local {
                local
                    .validate(len)
                    .map_err(|err| ArgError::Local(Box::new(err)))?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("algorithm", &self.algorithm)
            .field("dim", &self.dim)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("tol", &self.tol)
            .field("stopval", &self.stopval)
            .field("maxeval", &self.maxeval)
            .field("has_objective", &self.objective.is_some())
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
