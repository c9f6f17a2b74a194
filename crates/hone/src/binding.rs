use std::{any::type_name, cell::RefCell};

use hone_engine::{Algorithm, ArgError, Context, ResultCode};
use tracing::{debug, trace, warn};

use crate::{Bounds, Direction, Input, Solution, StopCriteria, adapter::ObjectiveAdapter};

/// Everything a binding needs to configure its contexts for one run.
pub struct Setup<'a, const N: usize> {
    pub(crate) bounds: Bounds<N>,
    pub(crate) criteria: &'a StopCriteria,
    pub(crate) direction: Direction,
    pub(crate) seed: Option<u64>,
}

/// Builds the solver context(s) a method runs on.
///
/// The returned context owns everything it needs: dropping it releases the
/// objective borrow and any subordinate context.
pub trait SolverBinding {
    /// # Errors
    ///
    /// Returns an error if the engine rejects the configuration.
    fn set_up<'f, const N: usize, F>(
        setup: &Setup<'_, N>,
        objective: &'f RefCell<F>,
    ) -> Result<Context<'f>, ArgError>
    where
        F: FnMut(&[f64; N]) -> f64 + 'f;
}

/// Configures a context for `algorithm` with the bounds, criteria,
/// direction, and seed of `setup`.
pub(crate) fn configure<'f, const N: usize, F>(
    algorithm: Algorithm,
    setup: &Setup<'_, N>,
    objective: &'f RefCell<F>,
) -> Result<Context<'f>, ArgError>
where
    F: FnMut(&[f64; N]) -> f64 + 'f,
{
    let mut context = Context::new(algorithm, N);
    context.set_lower_bounds(&setup.bounds.map(|bound| bound.min()))?;
    context.set_upper_bounds(&setup.bounds.map(|bound| bound.max()))?;

    let criteria = setup.criteria;
    if let Some(diff) = criteria.abs_score_diff() {
        context.set_ftol_abs(diff);
    }
    if let Some(diff) = criteria.rel_score_diff() {
        context.set_ftol_rel(diff);
    }
    if let Some(score) = criteria.stop_score() {
        context.set_stopval(score);
    }
    if criteria.max_iterations() > 0 {
        context.set_maxeval(criteria.max_iterations());
    }
    if let Some(seed) = setup.seed.filter(|_| algorithm.is_randomized()) {
        context.set_seed(seed);
    }
    trace!(
        algorithm = %context.algorithm(),
        dimension = context.dimension(),
        seeded = setup.seed.is_some() && algorithm.is_randomized(),
        "configured solver context"
    );

    let adapter = ObjectiveAdapter::new(objective, criteria.clone(), context.stop_handle());
    match setup.direction {
        Direction::Minimize => context.set_min_objective(move |x: &[f64]| adapter.evaluate(x)),
        Direction::Maximize => context.set_max_objective(move |x: &[f64]| adapter.evaluate(x)),
    }

    Ok(context)
}

/// Runs `objective` once with the contexts `M` builds.
pub(crate) fn solve<M, const N: usize, F>(
    objective: F,
    setup: &Setup<'_, N>,
    initial: Input<N>,
) -> Solution<N>
where
    M: SolverBinding,
    F: FnMut(&[f64; N]) -> f64,
{
    let method = type_name::<M>();
    debug!(method, dimension = N, direction = ?setup.direction, "starting optimization");

    let objective = RefCell::new(objective);
    let mut optimum = initial;

    let outcome = match M::set_up(setup, &objective) {
        Ok(mut context) => context.optimize(&mut optimum),
        Err(err) => {
            warn!(method, %err, "solver setup failed");
            return Solution {
                code: ResultCode::InvalidArgs,
                optimum: initial,
                score: f64::NAN,
            };
        }
    };

    debug!(
        method,
        code = ?outcome.code,
        score = outcome.score,
        evaluations = outcome.evaluations,
        "optimization finished"
    );

    Solution {
        code: outcome.code,
        optimum,
        score: outcome.score,
    }
}
