//! Error types for the navigation source.

use thiserror::Error;

/// Result type for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors raised by [`History`](crate::History) and [`RouterLink`](crate::RouterLink).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HistoryError {
	/// The path cannot be recorded as a history entry.
	#[error("invalid history path '{0}': paths must be non-empty and start with '/'")]
	InvalidPath(String),

	/// An argument failed validation.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
}
