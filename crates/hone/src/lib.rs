//! Derivative-free optimization over a fixed number of bounded inputs.
//!
//! An [`Optimizer<M>`] minimizes or maximizes an objective of `N` real
//! inputs, where `N` is a compile-time constant and `M` is a method tag
//! choosing the algorithm:
//!
//! - [`NelderMead`]: local simplex search
//! - [`Subplex`]: local search on adaptively chosen subspaces
//! - [`Esch`]: global evolutionary strategy
//! - [`Combined<G, L>`]: global search `G` refined by local search `L`
//!
//! [`DefaultGlobalOptimizer`] and [`DefaultLocalOptimizer`] name the usual
//! choices.
//!
//! Every run follows the same contract. [`StopCriteria`] says when to stop,
//! [`Bounds`] constrain each input, and the [`Solution`] reports the best
//! point seen together with a [`ResultCode`], also when the run ended early.
//!
//! ```
//! use hone::{Bound, DefaultGlobalOptimizer, StopCriteria};
//!
//! // A tilted double well: the left minimum is the deeper one.
//! let well = |x: f64| (x * x - 4.0).powi(2) + x;
//!
//! let mut optimizer = DefaultGlobalOptimizer::new(
//!     StopCriteria::default()
//!         .with_abs_score_diff(1e-10)
//!         .with_max_iterations(2000),
//! );
//! optimizer.seed(7);
//!
//! let solution = optimizer.optimize(well, [2.0], [Bound::new(-5.0, 5.0)]);
//! assert!(solution.optimum[0] < 0.0);
//! ```
//!
//! # Stopping from outside
//!
//! [`StopCriteria::with_stop_condition`] installs a predicate polled before
//! each evaluation. When it returns `true` the evaluation in flight still
//! completes, then the run ends with [`ResultCode::ForcedStop`], which counts
//! as a success and carries the best point so far.
//!
//! # Unsupported methods
//!
//! Only registered method tags can parameterize an optimizer:
//!
//! ```compile_fail
//! use hone::Optimizer;
//!
//! struct Unsupported;
//!
//! let _ = Optimizer::<Unsupported>::default();
//! ```
//!
//! A combination needs a global method first and a local one second:
//!
//! ```compile_fail
//! use hone::{Combined, NelderMead, Optimizer, Subplex};
//!
//! let _ = Optimizer::<Combined<Subplex, NelderMead>>::default();
//! ```

mod adapter;
mod binding;
mod bound;
mod criteria;
mod direction;
mod method;
mod objective;
mod optimizer;
mod solution;

pub use hone_engine::{ResultCode, UnknownCode};

pub use bound::{Bound, Bounds, Input};
pub use criteria::StopCriteria;
pub use direction::Direction;
pub use method::{Combined, Esch, Global, Local, Method, NelderMead, Subplex};
pub use objective::{Objective, Packed, Positional};
pub use optimizer::{DefaultGlobalOptimizer, DefaultLocalOptimizer, Genetic, Optimizer};
pub use solution::{Failure, Solution};
