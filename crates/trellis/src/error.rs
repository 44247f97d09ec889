//! Control error taxonomy.
//!
//! Every fallible control operation reports one of three conditions and
//! recovers locally; none of them escalate. The distinction between
//! [`InvalidArgument`](ControlError::InvalidArgument) and
//! [`OutOfSpace`](ControlError::OutOfSpace) is load-bearing: out-of-space
//! additionally fires the owning widget's `space_exhausted` signal so the
//! application can react to memory pressure, invalid arguments never notify
//! anyone.

use std::fmt;

/// Error result of a control operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Out-of-range index, empty text where text is required, an inverted
    /// range, or an operation sent to a widget mode that does not support it.
    InvalidArgument,
    /// Allocation failed while duplicating text or growing item storage.
    /// The requested mutation did not take effect.
    OutOfSpace,
    /// A search exhausted the list without a match.
    NotFound,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "Invalid argument"),
            Self::OutOfSpace => write!(f, "Out of space"),
            Self::NotFound => write!(f, "Not found"),
        }
    }
}

impl std::error::Error for ControlError {}

/// A specialized Result type for control operations.
pub type ControlResult<T> = std::result::Result<T, ControlError>;

/// Duplicate `text` into an owned key, reporting out-of-space instead of
/// aborting when the copy cannot be satisfied.
pub(crate) fn duplicate_text(text: &str) -> ControlResult<String> {
    let mut key = String::new();
    key.try_reserve_exact(text.len())
        .map_err(|_| ControlError::OutOfSpace)?;
    key.push_str(text);
    Ok(key)
}
