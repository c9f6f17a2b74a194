use crate::{Outcome, ResultCode, StopHandle};

/// Signals that a run must end with the wrapped code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Halt(pub(crate) ResultCode);

/// Whether the caller wants the smallest or the largest score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    /// Maps a raw score to the value algorithms minimize.
    ///
    /// NaN ranks as the worst possible score.
    pub(crate) fn transform(self, raw: f64) -> f64 {
        let value = match self {
            Self::Minimize => raw,
            Self::Maximize => -raw,
        };
        if value.is_nan() { f64::INFINITY } else { value }
    }
}

/// Wraps the objective with the stopping rules shared by every algorithm.
///
/// Algorithms always minimize the transformed score and never see the raw
/// objective. The evaluator also tracks the best point so a halted run can
/// report it.
pub(crate) struct Evaluator<'r, 'f> {
    objective: &'r mut (dyn FnMut(&[f64]) -> f64 + 'f),
    sense: Sense,
    stop: StopHandle,
    stopval: Option<f64>,
    maxeval: Option<u32>,
    evaluations: u32,
    best_x: Vec<f64>,
    best_f: f64,
    best_raw: f64,
}

impl<'r, 'f> Evaluator<'r, 'f> {
    pub(crate) fn new(
        objective: &'r mut (dyn FnMut(&[f64]) -> f64 + 'f),
        sense: Sense,
        stop: StopHandle,
        stopval: Option<f64>,
        maxeval: Option<u32>,
        start: &[f64],
    ) -> Self {
        Self {
            objective,
            sense,
            stop,
            stopval: stopval.map(|v| sense.transform(v)),
            maxeval,
            evaluations: 0,
            best_x: start.to_vec(),
            best_f: f64::INFINITY,
            best_raw: f64::NAN,
        }
    }

    /// Evaluates the objective at `x` and returns the transformed score.
    ///
    /// # Errors
    ///
    /// Returns a [`Halt`] when this evaluation ends the run. The score is
    /// recorded before halting.
    pub(crate) fn eval(&mut self, x: &[f64]) -> Result<f64, Halt> {
        if self.is_exhausted() {
            return Err(Halt(ResultCode::MaxevalReached));
        }

        let raw = (self.objective)(x);
        self.evaluations += 1;

        let f = self.sense.transform(raw);
        self.record(x, raw, f);
        self.check(f)?;

        Ok(f)
    }

    /// Folds the result of a nested run into this evaluator.
    ///
    /// # Errors
    ///
    /// Returns a [`Halt`] when the nested run ended in a way that must also
    /// end this run.
    pub(crate) fn absorb(&mut self, x: &[f64], nested: &Outcome) -> Result<f64, Halt> {
        self.evaluations = self.evaluations.saturating_add(nested.evaluations);

        let f = self.sense.transform(nested.score);
        self.record(x, nested.score, f);

        if nested.code == ResultCode::ForcedStop {
            return Err(Halt(ResultCode::ForcedStop));
        }
        self.check(f)?;

        Ok(f)
    }

    fn record(&mut self, x: &[f64], raw: f64, f: f64) {
        if !raw.is_nan() && (self.best_raw.is_nan() || f < self.best_f) {
            self.best_x.copy_from_slice(x);
            self.best_f = f;
            self.best_raw = raw;
        }
    }

    fn check(&self, f: f64) -> Result<(), Halt> {
        if self.stop.is_stopped() {
            return Err(Halt(ResultCode::ForcedStop));
        }
        if self.stopval.is_some_and(|stopval| f <= stopval) {
            return Err(Halt(ResultCode::StopvalReached));
        }
        if self.is_exhausted() {
            return Err(Halt(ResultCode::MaxevalReached));
        }
        Ok(())
    }

    fn is_exhausted(&self) -> bool {
        self.maxeval.is_some_and(|max| self.evaluations >= max)
    }

    /// Evaluations left in the budget, if there is one.
    pub(crate) fn remaining(&self) -> Option<u32> {
        self.maxeval.map(|max| max.saturating_sub(self.evaluations))
    }

    /// Best transformed score so far, `+inf` before any finite evaluation.
    pub(crate) fn best_score(&self) -> f64 {
        self.best_f
    }

    pub(crate) fn best_point(&self) -> &[f64] {
        &self.best_x
    }

    /// Consumes the evaluator, returning the best point, its raw score, and
    /// the number of evaluations.
    pub(crate) fn finish(self) -> (Vec<f64>, f64, u32) {
        (self.best_x, self.best_raw, self.evaluations)
    }
}
