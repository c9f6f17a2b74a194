//! ESCH: an evolutionary strategy with Cauchy mutation.
//!
//! The population holds [`PARENTS`] members. Each generation breeds
//! [`OFFSPRING`] children by one-point crossover of two random parents and a
//! Cauchy mutation of one random coordinate, then keeps the best
//! [`PARENTS`] of parents and children together.
//!
//! When a local context is attached, each generation that improves the best
//! score hands the new best point to the local context for refinement. The
//! refined point joins the population, and its evaluations count against
//! the global budget.

use rand::{Rng, rngs::StdRng};
use tracing::trace;

use crate::{
    Context, ResultCode,
    context::Domain,
    evaluator::{Evaluator, Halt},
};

const PARENTS: usize = 40;
const OFFSPRING: usize = 60;

/// Mutation scale relative to the bound width.
const SPREAD: f64 = 0.1;

struct Member {
    x: Vec<f64>,
    f: f64,
}

pub(crate) fn minimize(
    eval: &mut Evaluator<'_, '_>,
    domain: &Domain<'_>,
    x: &[f64],
    rng: &mut StdRng,
    mut local: Option<&mut Context<'_>>,
) -> Result<ResultCode, Halt> {
    let n = x.len();
    let mut population: Vec<Member> = Vec::with_capacity(PARENTS + OFFSPRING);

    let f = eval.eval(x)?;
    population.push(Member { x: x.to_vec(), f });
    while population.len() < PARENTS {
        let point: Vec<f64> = (0..n)
            .map(|i| uniform(rng, domain.lower[i], domain.upper[i]))
            .collect();
        let f = eval.eval(&point)?;
        population.push(Member { x: point, f });
    }

    let mut best = f64::INFINITY;

    loop {
        if eval.best_score() < best {
            best = eval.best_score();
            if let Some(local) = local.as_deref_mut() {
                best = refine(eval, local, &mut population)?;
            }
        }

        for _ in 0..OFFSPRING {
            let first = &population[rng.gen_range(0..PARENTS)].x;
            let second = &population[rng.gen_range(0..PARENTS)].x;
            let cut = rng.gen_range(0..=n);

            let mut child: Vec<f64> = first[..cut].iter().chain(&second[cut..]).copied().collect();
            let j = rng.gen_range(0..n);
            child[j] = mutate(rng, child[j], domain.lower[j], domain.upper[j]);
            for ((c, &lo), &hi) in child.iter_mut().zip(domain.lower).zip(domain.upper) {
                *c = c.clamp(lo, hi);
            }

            let f = eval.eval(&child)?;
            population.push(Member { x: child, f });
        }

        population.sort_by(|a, b| a.f.total_cmp(&b.f));
        population.truncate(PARENTS);

        if domain.tol.is_set() && domain.tol.converged(population[0].f, population[PARENTS - 1].f) {
            return Ok(ResultCode::FtolReached);
        }
    }
}

/// Refines the current best point with the local context.
///
/// Returns the transformed score of the refined point.
fn refine(
    eval: &mut Evaluator<'_, '_>,
    local: &mut Context<'_>,
    population: &mut [Member],
) -> Result<f64, Halt> {
    let mut point = eval.best_point().to_vec();
    let outcome = local.refine(&mut point, eval.remaining());
    trace!(
        code = ?outcome.code,
        score = outcome.score,
        evaluations = outcome.evaluations,
        "local refinement finished"
    );

    let f = eval.absorb(&point, &outcome)?;

    if let Some(worst) = population.iter_mut().max_by(|a, b| a.f.total_cmp(&b.f)) {
        if f < worst.f {
            worst.x = point;
            worst.f = f;
        }
    }

    Ok(eval.best_score())
}

/// Draws uniformly from `[lower, upper]`.
///
/// Interpolates instead of scaling `upper - lower`, which overflows for
/// bounds near `f64::MAX`.
fn uniform(rng: &mut StdRng, lower: f64, upper: f64) -> f64 {
    let r = rng.r#gen::<f64>();
    (lower * (1.0 - r) + upper * r).clamp(lower, upper)
}

/// Perturbs `value` by a Cauchy step, redrawing uniformly if it leaves the bounds.
fn mutate(rng: &mut StdRng, value: f64, lower: f64, upper: f64) -> f64 {
    let cauchy = (std::f64::consts::PI * (rng.r#gen::<f64>() - 0.5)).tan();
    let half_width = 0.5 * upper - 0.5 * lower;
    let trial = value + 2.0 * SPREAD * half_width * cauchy;
    if (lower..=upper).contains(&trial) {
        trial
    } else {
        uniform(rng, lower, upper)
    }
}
