use std::fmt;

/// The derivative-free algorithms a [`Context`](crate::Context) can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Bounded Nelder-Mead simplex search.
    NelderMead,

    /// Subplex: Nelder-Mead on a sequence of low-dimensional subspaces.
    Subplex,

    /// Evolutionary strategy with Cauchy mutation.
    ///
    /// Requires finite bounds on every dimension.
    Esch,
}

impl Algorithm {
    /// Returns `true` for algorithms that search the whole bounded domain.
    #[must_use]
    pub fn is_global(self) -> bool {
        matches!(self, Self::Esch)
    }

    /// Returns `true` if the algorithm is stochastic and honors a seed.
    #[must_use]
    pub fn is_randomized(self) -> bool {
        matches!(self, Self::Esch)
    }

    /// Short human-readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::NelderMead => "nelder-mead",
            Self::Subplex => "subplex",
            Self::Esch => "esch",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
