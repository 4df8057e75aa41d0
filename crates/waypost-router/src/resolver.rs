//! Path resolution.

use super::route::{RouteLookup, RouteMatch};

/// Result of resolving a path.
#[derive(Debug, Clone)]
pub enum Resolution {
	/// A record matched.
	Match(RouteMatch),
	/// Nothing matched.
	NotFound,
}

impl Resolution {
	/// Returns the match, if any.
	pub fn into_match(self) -> Option<RouteMatch> {
		match self {
			Self::Match(route_match) => Some(route_match),
			Self::NotFound => None,
		}
	}

	/// Returns `true` for [`Resolution::NotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound)
	}
}

/// Resolves concrete paths against a [`RouteLookup`].
///
/// Unmatched paths are never an error here.
pub struct PathResolver<'a> {
	table: &'a dyn RouteLookup,
}

impl<'a> PathResolver<'a> {
	/// Creates a resolver over `table`.
	pub fn new(table: &'a dyn RouteLookup) -> Self {
		Self { table }
	}

	/// Resolves `path`.
	pub fn resolve(&self, path: &str) -> Resolution {
		match self.table.lookup(path) {
			Some((record, params)) => {
				tracing::trace!(path, route = %record.full_path, "path resolved");
				Resolution::Match(RouteMatch {
					path: path.to_string(),
					record,
					params,
				})
			}
			None => {
				tracing::trace!(path, "no route matches path");
				Resolution::NotFound
			}
		}
	}
}
