use thiserror::Error;

/// Termination code reported by a solver run.
///
/// Positive codes are successful terminations. Negative codes are failures,
/// with the exception of [`ResultCode::ForcedStop`], which reports an early
/// return requested by the caller and still carries a valid best point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum ResultCode {
    /// Generic success.
    Success = 1,

    /// A score at least as good as the stop value was found.
    StopvalReached = 2,

    /// Successive scores changed by less than the score tolerance.
    FtolReached = 3,

    /// The search collapsed to a single point.
    XtolReached = 4,

    /// The evaluation budget was used up.
    MaxevalReached = 5,

    /// Uncategorized failure.
    Failure = -1,

    /// The context was configured with invalid arguments.
    InvalidArgs = -2,

    /// The solver ran out of memory.
    OutOfMemory = -3,

    /// Round-off errors prevented further progress.
    RoundoffLimited = -4,

    /// The run was interrupted through a stop handle.
    ForcedStop = -5,
}

/// Error returned when converting an unrecognized integer to a [`ResultCode`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown result code {0}")]
pub struct UnknownCode(pub i32);

impl ResultCode {
    /// Returns the numeric form of the code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns `true` for positive codes and for [`ResultCode::ForcedStop`].
    #[must_use]
    pub fn is_success(self) -> bool {
        self.as_i32() > 0 || self == Self::ForcedStop
    }

    /// Returns `true` for codes reporting a solver failure.
    #[must_use]
    pub fn is_failure(self) -> bool {
        !self.is_success()
    }
}

impl From<ResultCode> for i32 {
    fn from(code: ResultCode) -> Self {
        code.as_i32()
    }
}

impl TryFrom<i32> for ResultCode {
    type Error = UnknownCode;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::Success,
            2 => Self::StopvalReached,
            3 => Self::FtolReached,
            4 => Self::XtolReached,
            5 => Self::MaxevalReached,
            -1 => Self::Failure,
            -2 => Self::InvalidArgs,
            -3 => Self::OutOfMemory,
            -4 => Self::RoundoffLimited,
            -5 => Self::ForcedStop,
            other => return Err(UnknownCode(other)),
        })
    }
}
