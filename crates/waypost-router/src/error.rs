//! Router error types.

use thiserror::Error;
use waypost_history::HistoryError;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors raised while configuring the router or navigating.
///
/// Configuration errors surface at construction time. During a transition
/// the orchestrator never returns these; it reports them through
/// [`RouterEvent::Error`](crate::RouterEvent::Error) and leaves the committed
/// component stack untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RouterError {
	/// The route list was empty.
	#[error("\"routes\" list cannot be empty")]
	EmptyRoutes,

	/// A route definition lacks its path or its view factory.
	#[error("path and view must be provided in a route (path: '{path}')")]
	IncompleteRoute {
		/// The offending path (empty when missing).
		path: String,
	},

	/// Two definitions flattened to the same absolute path.
	#[error("route already registered: {0}")]
	DuplicateRoute(String),

	/// A path pattern could not be compiled.
	#[error("invalid route pattern '{pattern}': {reason}")]
	InvalidPattern {
		/// The pattern as written.
		pattern: String,
		/// Why it was rejected.
		reason: String,
	},

	/// No route matches the path.
	#[error("route not found: {0}")]
	NotFound(String),

	/// A record names a parent that is not registered.
	#[error("parent route '{parent}' of '{path}' is not registered")]
	MissingParent {
		/// The child record.
		path: String,
		/// The missing parent key.
		parent: String,
	},

	/// Walking parent links revisited a record.
	#[error("cyclic parent chain detected at '{0}'")]
	CyclicParent(String),

	/// The initial path could not be pushed on mount.
	#[error("unable to push initial route '{path}': {source}")]
	InitialRoute {
		/// The configured initial path.
		path: String,
		/// Underlying failure.
		#[source]
		source: Box<RouterError>,
	},

	/// The router was destroyed and cannot be mounted again.
	#[error("router has been destroyed")]
	Destroyed,

	/// The navigation source rejected the request.
	#[error(transparent)]
	History(#[from] HistoryError),
}
