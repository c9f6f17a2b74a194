use std::{any::type_name, fmt, marker::PhantomData};

use crate::{
    Bounds, Combined, Direction, Esch, Input, Method, NelderMead, Objective, Solution,
    StopCriteria, Subplex,
    binding::{Setup, solve},
};

/// Stochastic global search refined by local simplex search.
pub type Genetic = Combined<Esch, NelderMead>;

/// The recommended optimizer when the objective may have several minima.
pub type DefaultGlobalOptimizer = Optimizer<Genetic>;

/// The recommended optimizer for refining a good starting point.
pub type DefaultLocalOptimizer = Optimizer<Subplex>;

/// A derivative-free optimizer running method `M`.
///
/// The optimizer holds only configuration: stop criteria, direction, and an
/// optional seed. Each call to [`optimize`](Self::optimize) builds its
/// solver contexts from scratch and releases them before returning, so one
/// optimizer can run any number of problems of any dimension.
///
/// ```
/// use hone::{Bound, DefaultLocalOptimizer, StopCriteria};
///
/// let criteria = StopCriteria::default().with_abs_score_diff(1e-10);
/// let solution = DefaultLocalOptimizer::new(criteria).optimize(
///     |x: f64, y: f64| (x - 3.0).powi(2) + (y + 1.0).powi(2),
///     [0.0, 0.0],
///     [Bound::new(-10.0, 10.0); 2],
/// );
///
/// assert!(solution.is_success());
/// assert!((solution.optimum[0] - 3.0).abs() < 1e-3);
/// assert!((solution.optimum[1] + 1.0).abs() < 1e-3);
/// ```
pub struct Optimizer<M: Method> {
    criteria: StopCriteria,
    direction: Direction,
    seed: Option<u64>,
    method: PhantomData<fn() -> M>,
}

impl<M: Method> Optimizer<M> {
    #[must_use]
    pub fn new(criteria: StopCriteria) -> Self {
        Self {
            criteria,
            direction: Direction::Minimize,
            seed: None,
            method: PhantomData,
        }
    }

    /// Looks for the smallest score. This is the default.
    #[allow(clippy::wrong_self_convention)]
    pub fn to_min(&mut self) -> &mut Self {
        self.direction = Direction::Minimize;
        self
    }

    /// Looks for the largest score.
    #[allow(clippy::wrong_self_convention)]
    pub fn to_max(&mut self) -> &mut Self {
        self.direction = Direction::Maximize;
        self
    }

    /// Replaces the stop criteria used by later runs.
    pub fn set_criteria(&mut self, criteria: StopCriteria) -> &mut Self {
        self.criteria = criteria;
        self
    }

    #[must_use]
    pub fn criteria(&self) -> &StopCriteria {
        &self.criteria
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Seeds randomized methods so runs are reproducible.
    ///
    /// Deterministic methods ignore the seed. Without one, randomized
    /// methods draw a fresh seed for every run.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.seed = Some(seed);
        self
    }

    /// Optimizes `objective` over `bounds`, starting from `initial`.
    ///
    /// A starting point outside `bounds` is projected onto them. Run
    /// outcomes, including invalid configurations, are reported through
    /// [`Solution::code`] rather than as errors.
    pub fn optimize<const N: usize, F, Args>(
        &self,
        mut objective: F,
        initial: Input<N>,
        bounds: Bounds<N>,
    ) -> Solution<N>
    where
        F: Objective<N, Args>,
    {
        let setup = Setup {
            bounds,
            criteria: &self.criteria,
            direction: self.direction,
            seed: self.seed,
        };
        solve::<M, N, _>(|x: &[f64; N]| objective.evaluate(x), &setup, initial)
    }
}

impl<M: Method> Default for Optimizer<M> {
    fn default() -> Self {
        Self::new(StopCriteria::default())
    }
}

impl<M: Method> Clone for Optimizer<M> {
    fn clone(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            direction: self.direction,
            seed: self.seed,
            method: PhantomData,
        }
    }
}

impl<M: Method> fmt::Debug for Optimizer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optimizer")
            .field("method", &type_name::<M>())
            .field("criteria", &self.criteria)
            .field("direction", &self.direction)
            .field("seed", &self.seed)
            .finish()
    }
}
