//! # Error Types
//!
//! Error types for boolean mesh operations.
//!
//! ## Error Policy
//!
//! Two distinct classes are kept apart so tests can tell them apart:
//!
//! - **Operational failures** — the input could not be processed (degenerate
//!   or non-manifold operands, non-finite coordinates, an empty operand
//!   list, or a kernel panic contained by the rounding guard). Callers may
//!   retry with cleaned-up input.
//! - **Invariant violations** — the engine itself is broken (a result face
//!   with no provenance, a topologically degenerate result face). These are
//!   never downgraded into operational failures.

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors produced by the boolean mesh engine.
#[derive(Error, Debug)]
pub enum CsgError {
    /// An operand mesh cannot enter the exact-arithmetic kernel.
    #[error("invalid operand: {message}")]
    InvalidOperand {
        /// What is wrong with the operand.
        message: String,
    },

    /// The kernel could not produce a result for these operands.
    #[error("boolean operation '{operation}' failed: {message}")]
    OperationFailed {
        /// Name of the boolean operation (union, difference, intersection).
        operation: String,
        /// Failure details.
        message: String,
    },

    /// An N-ary union was requested over zero operands.
    #[error("union requires at least one operand")]
    EmptyOperandList,

    /// An engine invariant was broken. This is a bug in the engine, not a
    /// property of the input.
    #[error("internal invariant violation: {message}")]
    InvariantViolation {
        /// Which invariant was broken.
        message: String,
    },
}

impl CsgError {
    /// Creates an operational failure for the named operation.
    pub fn operation_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid-operand failure.
    pub fn invalid_operand(message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            message: message.into(),
        }
    }

    /// Creates an invariant violation.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Returns true for failures a caller may recover from by fixing its
    /// input; false for engine bugs.
    pub fn is_operational(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for boolean mesh operations.
pub type Result<T> = std::result::Result<T, CsgError>;

// =============================================================================
// TESTS
// =============================================================================
