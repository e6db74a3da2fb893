use thiserror::Error;

/// Errors raised when a constraint or expression is built from invalid arguments.
///
/// These indicate a mistake of the caller and are never recovered from by the solver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("the minimum capacity {min} exceeds the maximum capacity {max}")]
    InvalidCapacityBounds { min: i64, max: i64 },
    #[error("the maximum capacity {0} is negative")]
    NegativeCapacity(i64),
    #[error("the window [{from}, {to}) is empty")]
    EmptyWindow { from: i32, to: i32 },
    #[error("the interval is not part of the scope of the cumulative function")]
    IntervalNotInScope,
}
