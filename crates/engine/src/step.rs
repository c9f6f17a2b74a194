/// Computes the initial step for each coordinate of `x`.
///
/// Bounded coordinates start at a quarter of the bound width, shrunk to
/// three quarters of the distance to a closer bound. Coordinates without a
/// usable width fall back to a tenth of `|x|`, or 1 when `x` is zero.
pub(crate) fn default_step(x: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(lower.iter().zip(upper))
        .map(|(&x, (&lo, &hi))| {
            let mut step = f64::INFINITY;

            let width = hi - lo;
            if width.is_finite() {
                step = 0.25 * width;
            }
            if hi.is_finite() && hi > x && hi - x < step {
                step = 0.75 * (hi - x);
            }
            if lo.is_finite() && x > lo && x - lo < step {
                step = 0.75 * (x - lo);
            }

            if step.is_finite() && step > 0.0 {
                step
            } else if x != 0.0 {
                0.1 * x.abs()
            } else {
                1.0
            }
        })
        .collect()
}
