//! Derivative-free solver contexts.
//!
//! A [`Context`] owns one run of one algorithm over a fixed number of
//! dimensions. Callers configure it the way a C optimization library is
//! configured: bounds, score tolerances, a stop value, an evaluation budget,
//! and an objective callback over a raw `&[f64]`. [`Context::optimize`] then
//! drives the algorithm synchronously, mutating a caller-owned point buffer
//! and reporting a numeric [`ResultCode`].
//!
//! # Algorithms
//!
//! - [`Algorithm::NelderMead`]: bounded simplex search (local)
//! - [`Algorithm::Subplex`]: Nelder-Mead over adaptively chosen subspaces (local)
//! - [`Algorithm::Esch`]: evolutionary strategy (global, randomized)
//!
//! A global context can carry a subordinate local context through
//! [`Context::set_local_optimizer`]; the global search then refines every
//! improving candidate with the local one.
//!
//! # Stopping
//!
//! All algorithms share the same rules, checked after each evaluation:
//! a forced stop (see [`StopHandle`]), reaching the stop value, or exhausting
//! the evaluation budget. Score tolerances are checked by each algorithm on
//! the pair of scores it considers "successive".

mod algorithm;
mod code;
mod context;
mod error;
mod esch;
mod evaluator;
mod simplex;
mod step;
mod stop;
mod subplex;

pub use algorithm::Algorithm;
pub use code::{ResultCode, UnknownCode};
pub use context::{Context, Outcome};
pub use error::ArgError;
pub use stop::StopHandle;
