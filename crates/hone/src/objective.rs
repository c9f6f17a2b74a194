//! Objective functions of `N` real inputs.
//!
//! An objective is any closure returning an `f64` score that takes either
//! `N` positional `f64` arguments (`N` from 1 to 8) or a single
//! `&[f64; N]`. The `Args` marker on [`Objective`] tells the two shapes
//! apart and is inferred at the call site, so closure parameters need type
//! annotations:
//!
//! ```
//! use hone::{Bound, NelderMead, Optimizer, StopCriteria};
//!
//! let optimizer = Optimizer::<NelderMead>::new(StopCriteria::default().with_abs_score_diff(1e-10));
//! let bounds = [Bound::new(-5.0, 5.0); 2];
//!
//! let positional = optimizer.optimize(|x: f64, y: f64| x * x + y * y, [1.0, 1.0], bounds);
//! let packed = optimizer.optimize(|x: &[f64; 2]| x[0] * x[0] + x[1] * x[1], [1.0, 1.0], bounds);
//!
//! assert!(positional.score < 1e-6);
//! assert_eq!(positional, packed);
//! ```

/// Marks objectives that take `N` positional `f64` arguments.
#[derive(Debug, Clone, Copy)]
pub struct Positional;

/// Marks objectives that take a single `&[f64; N]`.
#[derive(Debug, Clone, Copy)]
pub struct Packed;

/// A scalar function of `N` real inputs.
pub trait Objective<const N: usize, Args> {
    /// Returns the score at `x`.
    fn evaluate(&mut self, x: &[f64; N]) -> f64;
}

impl<const N: usize, F> Objective<N, Packed> for F
where
    F: FnMut(&[f64; N]) -> f64,
{
    fn evaluate(&mut self, x: &[f64; N]) -> f64 {
        self(x)
    }
}

macro_rules! positional {
    (@f64 $arg:ident) => { f64 };
    ($n:literal => $($arg:ident),+) => {
        impl<F> Objective<$n, Positional> for F
        where
            F: FnMut($(positional!(@f64 $arg)),+) -> f64,
        {
            fn evaluate(&mut self, x: &[f64; $n]) -> f64 {
                let [$($arg),+] = *x;
                self($($arg),+)
            }
        }
    };
}

positional!(1 => a);
positional!(2 => a, b);
positional!(3 => a, b, c);
positional!(4 => a, b, c, d);
positional!(5 => a, b, c, d, e);
positional!(6 => a, b, c, d, e, f);
positional!(7 => a, b, c, d, e, f, g);
positional!(8 => a, b, c, d, e, f, g, h);
