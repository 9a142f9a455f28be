use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - underflow")]
    Underflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
    #[error("Math error - invalid rounding mode")]
    InvalidRoundingMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("State error - bin {0} is outside the loaded bin arrays")]
    BinNotFound(i32),

    #[error("State error - bin array index mismatch: expected {expected}, found {found}")]
    BinArrayIndexMismatch { expected: i32, found: i32 },

    #[error("State error - expected 1 to 3 bin arrays, got {0}")]
    InvalidBinArrayCount(usize),

    #[error("State error - bin array {index} holds {len} bins")]
    InvalidBinArrayLength { index: i32, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("Swap error - amount is zero")]
    ZeroAmount,

    #[error("Swap error - slippage must be within [0, 100)")]
    InvalidSlippage,

    #[error("Swap error - swap crosses too many bins")]
    SwapCrossesTooManyBins,
}

/// Failures reported by a [`SnapshotSource`](crate::pool::source::SnapshotSource).
///
/// These are passed through to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Source error - not found: {0}")]
    NotFound(String),

    #[error("Source error - network: {0}")]
    Network(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    SwapError(#[from] crate::error::SwapError),

    #[error(transparent)]
    SourceError(#[from] crate::error::SourceError),

    #[error("Invalid parameter - {0}")]
    InvalidParameter(&'static str),
}
