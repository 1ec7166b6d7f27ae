//! Utility functions for error handling
//!
//! Collaborator failures are never fatal for aggregation or detail views.
//! These helpers log a failed fetch and hand back a usable fallback.

use crate::error::Result;

/// Unwrap a fetch result or fall back to the type's default
///
/// The error is logged as a warning with the operation name for context.
///
/// # Example
/// ```
/// use herd_ledger::error::{HerdError, Result};
/// use herd_ledger::error::util::recover_or_default;
///
/// let failed: Result<Vec<String>> = Err(HerdError::fetch("farms", "timeout"));
/// let farms = recover_or_default(failed, "loading farms");
/// assert!(farms.is_empty());
/// ```
pub fn recover_or_default<T: Default>(result: Result<T>, operation: &str) -> T {
    recover_or_else(result, operation, T::default)
}

/// Unwrap a fetch result or fall back to a computed value
pub fn recover_or_else<T, F>(result: Result<T>, operation: &str, fallback: F) -> T
where
    F: FnOnce() -> T,
{
    match result {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Failed {operation}, continuing with fallback: {e}");
            fallback()
        }
    }
}

/// Try multiple operations in sequence, returning the first success or all errors
pub fn try_operations<T, F>(operation_name: &str, operations: Vec<F>) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let mut errors = Vec::new();

    for (i, operation) in operations.into_iter().enumerate() {
        match operation() {
            Ok(result) => return Ok(result),
            Err(e) => errors.push((i, e)),
        }
    }

    let error_details = errors
        .into_iter()
        .map(|(i, e)| format!("Attempt {}: {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(crate::error::HerdError::InvalidOperation(format!(
        "All attempts failed for operation: {operation_name}\n{error_details}"
    )))
}
