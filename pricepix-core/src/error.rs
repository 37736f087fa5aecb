//! Structured error types for the encoding pipeline.
//!
//! Every failure is fatal to the current date's generation. Nothing here is
//! retried or recovered locally.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A color code fell outside `[0, 16777215]`.
    #[error("color code {value} is outside the 24-bit range [0, 16777215]")]
    Range { value: i64 },

    /// A closing price that cannot be scaled to a color code (NaN, infinite).
    #[error("closing price {price} at t={time} is not a finite number")]
    NonFinitePrice { time: i64, price: f64 },

    #[error("signature must contain exactly 4 values, got {len}")]
    SignatureLength { len: usize },

    #[error("price + signature length must equal {expected} (grid {size}x{size}), got {actual}")]
    SequenceLength {
        size: usize,
        expected: usize,
        actual: usize,
    },

    #[error("expected {expected} normalized prices, got {actual}")]
    Size { expected: usize, actual: usize },

    #[error("observation window failed sanity check: {0}")]
    DataIntegrity(String),

    #[error("grid size {0} is too small: the signature block needs at least 2x2")]
    GridSize(usize),

    #[error("year {year} is not a 4-digit year; signature is undefined")]
    UnsupportedYear { year: i32 },
}

impl EncodeError {
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }
}
