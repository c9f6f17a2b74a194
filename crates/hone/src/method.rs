//! Compile-time tags selecting the algorithm an [`Optimizer`](crate::Optimizer) runs.
//!
//! Each tag is a zero-sized type. Single-algorithm tags run one solver
//! context; [`Combined`] runs a global search whose improving candidates are
//! refined by a local search, both sharing one evaluation budget.

use std::{cell::RefCell, marker::PhantomData};

use hone_engine::{Algorithm, ArgError, Context};

use crate::binding::{Setup, SolverBinding, configure};

/// An optimization method an [`Optimizer`](crate::Optimizer) can run.
///
/// Implemented for [`NelderMead`], [`Subplex`], [`Esch`], and
/// [`Combined<G, L>`] for any global `G` and local `L`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a supported optimization method",
    label = "no solver binding for `{Self}`",
    note = "use `NelderMead`, `Subplex`, `Esch`, or `Combined<G, L>` with a global `G` and a local `L`"
)]
pub trait Method: SolverBinding {}

/// A method that searches the whole bounded domain.
///
/// Global methods need finite bounds on every input and at least one
/// stopping criterion.
pub trait Global {
    const ALGORITHM: Algorithm;
}

/// A method that refines a starting point within its basin.
pub trait Local {
    const ALGORITHM: Algorithm;
}

/// Bounded Nelder-Mead simplex search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NelderMead;

/// Subplex: Nelder-Mead on a sequence of low-dimensional subspaces.
///
/// More robust than plain Nelder-Mead as the number of inputs grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Subplex;

/// Evolutionary strategy with Cauchy mutation.
///
/// Randomized; see [`Optimizer::seed`](crate::Optimizer::seed) for
/// reproducible runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Esch;

/// A global search `G` whose improving candidates are refined by `L`.
///
/// Both searches see the same bounds, criteria, and objective. The
/// evaluation budget is shared, and the result code is the global one.
#[derive(Debug)]
pub struct Combined<G, L = NelderMead>(PhantomData<fn() -> (G, L)>);

macro_rules! single_algorithm {
    ($($tag:ident => $role:ident),+ $(,)?) => {$(
        impl $role for $tag {
            const ALGORITHM: Algorithm = Algorithm::$tag;
        }

        impl SolverBinding for $tag {
            fn set_up<'f, const N: usize, F>(
                setup: &Setup<'_, N>,
                objective: &'f RefCell<F>,
            ) -> Result<Context<'f>, ArgError>
            where
                F: FnMut(&[f64; N]) -> f64 + 'f,
            {
                configure(Algorithm::$tag, setup, objective)
            }
        }

        impl Method for $tag {}
    )+};
}

single_algorithm!(NelderMead => Local, Subplex => Local, Esch => Global);

impl<G: Global, L: Local> SolverBinding for Combined<G, L> {
    fn set_up<'f, const N: usize, F>(
        setup: &Setup<'_, N>,
        objective: &'f RefCell<F>,
    ) -> Result<Context<'f>, ArgError>
    where
        F: FnMut(&[f64; N]) -> f64 + 'f,
    {
        let mut global = configure(G::ALGORITHM, setup, objective)?;
        let local = configure(L::ALGORITHM, setup, objective)?;
        global.set_local_optimizer(local)?;
        Ok(global)
    }
}

impl<G: Global, L: Local> Method for Combined<G, L> {}
