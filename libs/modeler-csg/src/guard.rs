//! # Rounding/Robustness Guard
//!
//! Scoped acquisition around one whole boolean call.
//!
//! The guard serializes access to the kernel's process-wide arithmetic
//! state (boolean calls share no other mutable state, so callers may run
//! them from multiple threads) and contains every panic escaping the
//! kernel, converting it into an operational failure. Release happens on
//! every exit path by drop order; a panic never propagates past this
//! boundary and never poisons the lock for later calls.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::error::{CsgError, Result};

/// Process-wide arithmetic state shared by all boolean calls.
static ARITHMETIC_STATE: Mutex<()> = Mutex::new(());

/// Scoped hold on the shared arithmetic state.
struct ArithmeticStateGuard<'a> {
    _lock: MutexGuard<'a, ()>,
}

impl ArithmeticStateGuard<'_> {
    fn acquire() -> Self {
        // A previous holder may have panicked inside its own call; the
        // state itself carries no data, so recover instead of propagating
        // the poison.
        let lock = ARITHMETIC_STATE
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Self { _lock: lock }
    }
}

/// Runs one boolean call under the guard.
///
/// Typed errors pass through untouched (invariant violations are never
/// downgraded here); panics become an operational failure for the named
/// operation.
pub(crate) fn with_rounding_guard<T>(
    operation: &str,
    body: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let _state = ArithmeticStateGuard::acquire();
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload);
            warn!(operation, %message, "kernel panicked; reporting failure");
            Err(CsgError::operation_failed(operation, message))
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "kernel panicked".to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_passes_through() {
        let result = with_rounding_guard("union", || Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_typed_errors_are_not_downgraded() {
        let result: Result<()> =
            with_rounding_guard("union", || Err(CsgError::invariant("broken")));
        assert!(!result.unwrap_err().is_operational());
    }

    #[test]
    fn test_panic_becomes_operational_failure() {
        let result: Result<()> = with_rounding_guard("difference", || panic!("kernel blew up"));
        let error = result.unwrap_err();
        assert!(error.is_operational());
        assert!(error.to_string().contains("difference"));
    }

    #[test]
    fn test_guard_survives_previous_panic() {
        let _: Result<()> = with_rounding_guard("union", || panic!("first call dies"));
        // The lock must not stay poisoned for the next call.
        let result = with_rounding_guard("union", || Ok(1));
        assert_eq!(result.unwrap(), 1);
    }
}
