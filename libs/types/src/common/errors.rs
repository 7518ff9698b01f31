//! Error types for fixed-point arithmetic and identifier validation
//!
//! Every failure in the decimal library is reported through these enums; the
//! arithmetic itself never panics on caller-supplied input.

use thiserror::Error;

/// Errors that can occur during typed ID and denom validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// ID value is null/zero when non-null required
    #[error("ID cannot be null/zero")]
    NullId,

    /// Denom is empty
    #[error("Denom cannot be empty")]
    EmptyDenom,

    /// Denom does not follow the chain's denom grammar
    #[error("Invalid denom '{denom}': {reason}")]
    InvalidDenom { denom: String, reason: &'static str },
}

/// Errors that can occur during fixed-point arithmetic operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FixedPointError {
    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected numeric format")]
    InvalidDecimal { input: String },

    /// More fractional digits than the fixed scale can hold
    #[error("Too much precision: '{input}' has more than {max} fractional digits")]
    TooMuchPrecision { input: String, max: u32 },

    /// Division by zero in fixed-point arithmetic
    #[error("Division by zero in fixed-point arithmetic")]
    DivisionByZero,

    /// Power base outside the open interval (0, 2)
    #[error("Power base {base} outside supported range (0, 2)")]
    PowBaseOutOfRange { base: String },

    /// Negative exponent passed to a power function
    #[error("Negative exponent {exp} is not supported")]
    NegativeExponent { exp: String },

    /// Fractional part of the exponent is not in [0, 1)
    #[error("Fractional exponent {exp} outside [0, 1)")]
    FractionalExponentOutOfRange { exp: String },

    /// Binomial series did not reach the requested precision
    #[error("Power series did not converge after {iterations} terms")]
    SeriesDidNotConverge { iterations: usize },

    /// Value cannot be represented in the target type
    #[error("Overflow: value {value} cannot be represented as {target}")]
    Overflow { value: String, target: &'static str },
}
