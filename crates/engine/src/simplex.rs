//! Bounded Nelder-Mead simplex search.
//!
//! The same routine backs [`Algorithm::NelderMead`](crate::Algorithm) on the
//! full space and the per-subspace searches of Subplex.

use crate::{
    ResultCode,
    context::Domain,
    evaluator::{Evaluator, Halt},
};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// When a simplex search returns on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Until {
    /// Run until the score tolerance is met or the simplex collapses.
    Converged,

    /// Also return once the simplex size falls to this fraction of its
    /// initial size.
    Shrunk(f64),
}

/// Minimizes over the full space starting from `x`.
pub(crate) fn minimize(
    eval: &mut Evaluator<'_, '_>,
    domain: &Domain<'_>,
    x: &mut [f64],
) -> Result<ResultCode, Halt> {
    let mut fx = eval.eval(x)?;
    let dims: Vec<usize> = (0..x.len()).collect();
    search(eval, domain, x, &mut fx, &dims, domain.step, Until::Converged)
}

/// Runs Nelder-Mead over the coordinates listed in `dims`.
///
/// Other coordinates stay fixed at their values in `x`. `fx` must hold the
/// transformed score at `x`, and `step[i]` is the initial edge length along
/// `dims[i]`. On return `x` and `fx` hold the best vertex.
pub(crate) fn search(
    eval: &mut Evaluator<'_, '_>,
    domain: &Domain<'_>,
    x: &mut [f64],
    fx: &mut f64,
    dims: &[usize],
    step: &[f64],
    until: Until,
) -> Result<ResultCode, Halt> {
    let mut space = Subspace {
        dims,
        lower: domain.lower,
        upper: domain.upper,
        full: x.to_vec(),
    };

    let origin = space.project(x);
    let mut vertices = vec![origin.clone()];
    let mut scores = vec![*fx];

    for (i, &d) in dims.iter().enumerate() {
        let mut vertex = origin.clone();
        let forward = vertex[i] + step[i];
        vertex[i] = if forward > domain.upper[d] || forward < domain.lower[d] {
            vertex[i] - step[i]
        } else {
            forward
        };
        space.clamp(&mut vertex);
        scores.push(space.eval(eval, &vertex)?);
        vertices.push(vertex);
    }

    let initial_size = size(&vertices, 0);
    let mut centroid = vec![0.0; dims.len()];

    let code = loop {
        let (best, second, worst) = rank(&scores);

        if domain.tol.converged(scores[best], scores[worst]) {
            break ResultCode::FtolReached;
        }
        if is_collapsed(&vertices, best) {
            break ResultCode::XtolReached;
        }
        if let Until::Shrunk(fraction) = until {
            if size(&vertices, best) <= fraction * initial_size {
                break ResultCode::Success;
            }
        }

        centroid.fill(0.0);
        for (j, vertex) in vertices.iter().enumerate() {
            if j != worst {
                for (c, v) in centroid.iter_mut().zip(vertex) {
                    *c += v;
                }
            }
        }
        let count = dims.len() as f64;
        for c in &mut centroid {
            *c /= count;
        }

        let reflected = space.toward(&centroid, &vertices[worst], -REFLECT);
        let f_reflected = space.eval(eval, &reflected)?;

        if f_reflected < scores[best] {
            let expanded = space.toward(&centroid, &vertices[worst], -EXPAND);
            let f_expanded = space.eval(eval, &expanded)?;
            if f_expanded < f_reflected {
                vertices[worst] = expanded;
                scores[worst] = f_expanded;
            } else {
                vertices[worst] = reflected;
                scores[worst] = f_reflected;
            }
        } else if f_reflected < scores[second] {
            vertices[worst] = reflected;
            scores[worst] = f_reflected;
        } else {
            let outside = f_reflected < scores[worst];
            let contracted = if outside {
                space.toward(&centroid, &reflected, CONTRACT)
            } else {
                space.toward(&centroid, &vertices[worst], CONTRACT)
            };
            let f_contracted = space.eval(eval, &contracted)?;

            let accepted = if outside {
                f_contracted <= f_reflected
            } else {
                f_contracted < scores[worst]
            };

            if accepted {
                vertices[worst] = contracted;
                scores[worst] = f_contracted;
            } else {
                let anchor = vertices[best].clone();
                for j in 0..vertices.len() {
                    if j == best {
                        continue;
                    }
                    let shrunk = space.toward(&anchor, &vertices[j], SHRINK);
                    scores[j] = space.eval(eval, &shrunk)?;
                    vertices[j] = shrunk;
                }
            }
        }
    };

    let (best, _, _) = rank(&scores);
    for (&d, &v) in dims.iter().zip(&vertices[best]) {
        x[d] = v;
    }
    *fx = scores[best];

    Ok(code)
}

/// A view of the coordinates being searched, with the rest held fixed.
struct Subspace<'a> {
    dims: &'a [usize],
    lower: &'a [f64],
    upper: &'a [f64],
    full: Vec<f64>,
}

impl Subspace<'_> {
    fn project(&self, x: &[f64]) -> Vec<f64> {
        self.dims.iter().map(|&d| x[d]).collect()
    }

    fn clamp(&self, vertex: &mut [f64]) {
        for (v, &d) in vertex.iter_mut().zip(self.dims) {
            *v = v.clamp(self.lower[d], self.upper[d]);
        }
    }

    /// Returns `from + t * (to - from)`, projected onto the bounds.
    fn toward(&self, from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
        let mut point: Vec<f64> = from
            .iter()
            .zip(to)
            .map(|(&a, &b)| a + t * (b - a))
            .collect();
        self.clamp(&mut point);
        point
    }

    fn eval(&mut self, eval: &mut Evaluator<'_, '_>, vertex: &[f64]) -> Result<f64, Halt> {
        for (&d, &v) in self.dims.iter().zip(vertex) {
            self.full[d] = v;
        }
        eval.eval(&self.full)
    }
}

/// Returns the indices of the best, second-worst, and worst scores.
fn rank(scores: &[f64]) -> (usize, usize, usize) {
    let mut best = 0;
    let mut worst = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s < scores[best] {
            best = i;
        }
        if s >= scores[worst] {
            worst = i;
        }
    }
    if best == worst {
        worst = usize::from(best == 0);
    }

    let mut second = best;
    for (i, &s) in scores.iter().enumerate() {
        if i != worst && s >= scores[second] {
            second = i;
        }
    }
    (best, second, worst)
}

/// Sum of L1 distances from each vertex to the vertex at `anchor`.
fn size(vertices: &[Vec<f64>], anchor: usize) -> f64 {
    vertices
        .iter()
        .map(|v| {
            v.iter()
                .zip(&vertices[anchor])
                .map(|(a, b)| (a - b).abs())
                .sum::<f64>()
        })
        .sum()
}

fn is_collapsed(vertices: &[Vec<f64>], best: usize) -> bool {
    vertices.iter().all(|v| {
        v.iter()
            .zip(&vertices[best])
            .all(|(&a, &b)| (a - b).abs() <= f64::EPSILON * b.abs().max(1.0))
    })
}
