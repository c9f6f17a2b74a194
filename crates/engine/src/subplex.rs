//! Subplex: Nelder-Mead on a sequence of subspaces.
//!
//! Each cycle sorts the coordinates by how far they moved in the previous
//! cycle, splits them into subspaces of at most five coordinates, and runs a
//! short simplex search on each. The step vector is then rescaled by the
//! progress made, so the search tightens as it converges.

use crate::{
    ResultCode,
    context::Domain,
    evaluator::{Evaluator, Halt},
    simplex::{Until, search},
};

/// Fraction of its initial size a subspace simplex shrinks to per cycle.
const PSI: f64 = 0.25;

/// Bounds on the step rescaling factor (`OMEGA..=1/OMEGA`).
const OMEGA: f64 = 0.1;

const MIN_SUBSPACE: usize = 2;
const MAX_SUBSPACE: usize = 5;

pub(crate) fn minimize(
    eval: &mut Evaluator<'_, '_>,
    domain: &Domain<'_>,
    x: &mut [f64],
) -> Result<ResultCode, Halt> {
    let mut fx = eval.eval(x)?;
    let mut step = domain.step.to_vec();
    let mut progress: Vec<f64> = step.iter().map(|s| s.abs()).collect();

    loop {
        let previous = x.to_vec();
        let f_previous = fx;

        let subspaces = partition(&progress);
        for dims in &subspaces {
            let sub_step: Vec<f64> = dims.iter().map(|&d| step[d]).collect();
            search(eval, domain, x, &mut fx, dims, &sub_step, Until::Shrunk(PSI))?;
        }

        if domain.tol.converged(f_previous, fx) {
            return Ok(ResultCode::FtolReached);
        }

        for (p, (&now, &before)) in progress.iter_mut().zip(x.iter().zip(&previous)) {
            *p = now - before;
        }

        let scale = if subspaces.len() > 1 {
            let moved: f64 = progress.iter().map(|d| d.abs()).sum();
            let span: f64 = step.iter().map(|s| s.abs()).sum();
            (moved / span).clamp(OMEGA, 1.0 / OMEGA)
        } else {
            PSI
        };

        for (s, &delta) in step.iter_mut().zip(&progress) {
            let magnitude = s.abs() * scale;
            *s = if delta > 0.0 {
                magnitude
            } else if delta < 0.0 {
                -magnitude
            } else {
                -s.signum() * magnitude
            };
        }

        if step.iter().any(|s| !s.is_finite()) {
            return Ok(ResultCode::RoundoffLimited);
        }
        if step
            .iter()
            .zip(x.iter())
            .all(|(s, xi)| s.abs() <= f64::EPSILON * xi.abs().max(1.0))
        {
            return Ok(ResultCode::XtolReached);
        }

        for p in &mut progress {
            *p = p.abs();
        }
    }
}

/// Splits coordinates into subspaces, largest progress first.
///
/// Every subspace has between `MIN_SUBSPACE` and `MAX_SUBSPACE` coordinates
/// (fewer only when the problem itself is smaller).
fn partition(progress: &[f64]) -> Vec<Vec<usize>> {
    let n = progress.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| progress[b].total_cmp(&progress[a]));

    let min = MIN_SUBSPACE.min(n);
    let mut subspaces = Vec::new();
    let mut rest = &order[..];
    while !rest.is_empty() {
        let mut size = MAX_SUBSPACE.min(rest.len());
        if rest.len() > size && rest.len() - size < min {
            size = rest.len() - min;
        }
        let (head, tail) = rest.split_at(size);
        subspaces.push(head.to_vec());
        rest = tail;
    }
    subspaces
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{StopHandle, evaluator::Sense, step::default_step, stop::Tolerance};

    #[test]
    fn small_problems_use_one_subspace() {
        assert_eq!(partition(&[1.0, 3.0, 2.0]), vec![vec![1, 2, 0]]);
        assert_eq!(partition(&[1.0]), vec![vec![0]]);
    }

    #[test]
    fn large_problems_keep_subspaces_balanced() {
        let sizes = |n: usize| -> Vec<usize> {
            let progress: Vec<f64> = (0..n).map(|i| i as f64).collect();
            partition(&progress).iter().map(Vec::len).collect()
        };

        assert_eq!(sizes(6), vec![4, 2]);
        assert_eq!(sizes(7), vec![5, 2]);
        assert_eq!(sizes(10), vec![5, 5]);
        assert_eq!(sizes(11), vec![5, 4, 2]);
    }

    #[test]
    fn partition_sorts_by_progress() {
        let subspaces = partition(&[0.1, 0.0, 9.0, 0.5, 3.0, 0.2, 7.0]);
        assert_eq!(subspaces[0], vec![2, 6, 4, 3, 5]);
        assert_eq!(subspaces[1], vec![0, 1]);
    }

    #[test]
    fn minimizes_separable_quadratic_in_eight_dimensions() {
        let mut f = |x: &[f64]| {
            x.iter()
                .enumerate()
                .map(|(i, &xi)| (xi - i as f64 * 0.5).powi(2))
                .sum::<f64>()
        };
        let lower = [-10.0; 8];
        let upper = [10.0; 8];
        let mut x = [0.0; 8];
        let step = default_step(&x, &lower, &upper);
        let domain = Domain {
            lower: &lower,
            upper: &upper,
            step: &step,
            tol: Tolerance {
                abs: Some(1e-14),
                rel: None,
            },
        };

        let mut eval = Evaluator::new(&mut f, Sense::Minimize, StopHandle::default(), None, None, &x);
        let code = minimize(&mut eval, &domain, &mut x).unwrap_or_else(|halt| halt.0);
        let (best, score, _) = eval.finish();

        assert!(code.is_success(), "unexpected code {code:?}");
        assert!(score < 1e-6, "score {score}");
        for (i, xi) in best.iter().enumerate() {
            assert_relative_eq!(*xi, i as f64 * 0.5, epsilon = 1e-2);
        }
    }
}
