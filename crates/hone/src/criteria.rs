use std::{fmt, sync::Arc};

type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// When an optimization run should end.
///
/// Every criterion starts unset. Setting a numeric criterion to NaN leaves it
/// unset, while zero is a real threshold. Criteria combine with "any of"
/// semantics: the run ends as soon as one of them is met.
///
/// Clones share the stop condition, so a clone observes the same
/// cancellation source as the original.
///
/// ```
/// use hone::StopCriteria;
///
/// let criteria = StopCriteria::default()
///     .with_abs_score_diff(1e-8)
///     .with_max_iterations(500);
///
/// assert_eq!(criteria.abs_score_diff(), Some(1e-8));
/// assert_eq!(criteria.rel_score_diff(), None);
/// assert_eq!(criteria.max_iterations(), 500);
/// ```
#[derive(Clone, Default)]
pub struct StopCriteria {
    abs_score_diff: Option<f64>,
    rel_score_diff: Option<f64>,
    stop_score: Option<f64>,
    max_iterations: u32,
    stop_condition: Option<Predicate>,
}

fn unless_nan(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

impl StopCriteria {
    /// Ends the run when successive scores differ by less than `diff`.
    #[must_use]
    pub fn with_abs_score_diff(mut self, diff: f64) -> Self {
        self.abs_score_diff = unless_nan(diff);
        self
    }

    /// Ends the run when successive scores differ by less than `diff` times
    /// their magnitude.
    #[must_use]
    pub fn with_rel_score_diff(mut self, diff: f64) -> Self {
        self.rel_score_diff = unless_nan(diff);
        self
    }

    /// Ends the run as soon as a score at least as good as `score` is found.
    ///
    /// "At least as good" follows the optimizer's direction: at or below
    /// when minimizing, at or above when maximizing.
    #[must_use]
    pub fn with_stop_score(mut self, score: f64) -> Self {
        self.stop_score = unless_nan(score);
        self
    }

    /// Caps the number of objective evaluations. Zero means no cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Ends the run when `condition` returns `true`.
    ///
    /// The condition is polled before every evaluation. Once it fires, the
    /// evaluation in flight still completes and counts toward the result.
    #[must_use]
    pub fn with_stop_condition<F>(mut self, condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.stop_condition = Some(Arc::new(condition));
        self
    }

    #[must_use]
    pub fn abs_score_diff(&self) -> Option<f64> {
        self.abs_score_diff
    }

    #[must_use]
    pub fn rel_score_diff(&self) -> Option<f64> {
        self.rel_score_diff
    }

    #[must_use]
    pub fn stop_score(&self) -> Option<f64> {
        self.stop_score
    }

    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Evaluates the stop condition, `false` if none is set.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_condition.as_ref().is_some_and(|condition| condition())
    }
}

impl fmt::Debug for StopCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopCriteria")
            .field("abs_score_diff", &self.abs_score_diff)
            .field("rel_score_diff", &self.rel_score_diff)
            .field("stop_score", &self.stop_score)
            .field("max_iterations", &self.max_iterations)
            .field("has_stop_condition", &self.stop_condition.is_some())
            .finish()
    }
}
