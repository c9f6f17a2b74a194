/// A closed interval constraining one input.
///
/// `min <= max` is expected but not enforced here; the solver rejects
/// inverted bounds when a run starts. The default bound is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bound {
    min: f64,
    max: f64,
}

/// One bound per input, index-aligned with [`Input`].
pub type Bounds<const N: usize> = [Bound; N];

/// A point in the input space: the initial guess or the optimum.
pub type Input<const N: usize> = [f64; N];

impl Bound {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The widest representable range, `[-inf, +inf]`.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self::new(f64::NEG_INFINITY, f64::INFINITY)
    }

    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` if `x` lies within the bound, ends included.
    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Projects `x` onto the bound.
    #[must_use]
    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.min).min(self.max)
    }

    /// Returns `true` if both ends are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::unbounded()
    }
}
