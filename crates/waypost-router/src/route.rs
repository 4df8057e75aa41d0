//! Route definitions, patterns and the route table.

pub mod definition;
pub mod pattern;
pub mod table;

pub use definition::{RouteDefinition, RouteRecord};
pub use pattern::{PatternKind, RoutePattern, WILDCARD_PARAM, is_parameterized};
pub use table::{RouteLookup, RouteTable};

use std::collections::HashMap;
use std::rc::Rc;

/// A resolved navigation target.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	/// The concrete path that was resolved.
	pub path: String,
	/// The matched record.
	pub record: Rc<RouteRecord>,
	/// Parameters extracted from `path`.
	pub params: HashMap<String, String>,
}

impl RouteMatch {
	/// Returns the matched record's key.
	pub fn key(&self) -> &str {
		&self.record.full_path
	}
}
