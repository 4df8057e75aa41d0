//! Route table.

use super::definition::RouteRecord;
use super::pattern::{PatternKind, RoutePattern};
use crate::error::{RouterError, RouterResult};
use std::collections::HashMap;
use std::rc::Rc;

/// Lookup contract the router depends on.
///
/// Records are keyed by their absolute pattern (`full_path`); [`lookup`]
/// matches a concrete path against the registered patterns.
///
/// [`lookup`]: RouteLookup::lookup
pub trait RouteLookup {
	/// Registers a record.
	fn insert(&mut self, record: RouteRecord) -> RouterResult<()>;

	/// Returns the record registered under `full_path`.
	fn get(&self, full_path: &str) -> Option<Rc<RouteRecord>>;

	/// Matches a concrete `path`, returning the record and its parameters.
	fn lookup(&self, path: &str) -> Option<(Rc<RouteRecord>, HashMap<String, String>)>;

	/// Unregisters the record under `full_path`.
	fn remove(&mut self, full_path: &str) -> Option<Rc<RouteRecord>>;

	/// Returns the number of records.
	fn len(&self) -> usize;

	/// Returns `true` when no record is registered.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Default [`RouteLookup`]: exact map for static patterns, ordered list for
/// the rest.
///
/// Static patterns win over parameterized ones, parameterized over
/// wildcards. Within a class, the first inserted pattern wins.
#[derive(Debug, Default)]
pub struct RouteTable {
	statics: HashMap<String, Rc<RouteRecord>>,
	dynamics: Vec<(RoutePattern, Rc<RouteRecord>)>,
}

impl RouteTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	fn contains(&self, full_path: &str) -> bool {
		self.statics.contains_key(full_path)
			|| self
				.dynamics
				.iter()
				.any(|(pattern, _)| pattern.pattern() == full_path)
	}
}

impl RouteLookup for RouteTable {
	fn insert(&mut self, record: RouteRecord) -> RouterResult<()> {
		if self.contains(&record.full_path) {
			return Err(RouterError::DuplicateRoute(record.full_path));
		}

		let pattern = RoutePattern::new(&record.full_path)?;
		let record = Rc::new(record);
		match pattern.kind() {
			PatternKind::Static => {
				self.statics.insert(record.full_path.clone(), record);
			}
			kind => {
				let at = self
					.dynamics
					.iter()
					.position(|(existing, _)| existing.kind() > kind)
					.unwrap_or(self.dynamics.len());
				self.dynamics.insert(at, (pattern, record));
			}
		}
		Ok(())
	}

	fn get(&self, full_path: &str) -> Option<Rc<RouteRecord>> {
		self.statics.get(full_path).cloned().or_else(|| {
			self.dynamics
				.iter()
				.find(|(pattern, _)| pattern.pattern() == full_path)
				.map(|(_, record)| Rc::clone(record))
		})
	}

	fn lookup(&self, path: &str) -> Option<(Rc<RouteRecord>, HashMap<String, String>)> {
		if let Some(record) = self.statics.get(path) {
			return Some((Rc::clone(record), HashMap::new()));
		}
		self.dynamics.iter().find_map(|(pattern, record)| {
			pattern
				.matches(path)
				.map(|params| (Rc::clone(record), params))
		})
	}

	fn remove(&mut self, full_path: &str) -> Option<Rc<RouteRecord>> {
		if let Some(record) = self.statics.remove(full_path) {
			return Some(record);
		}
		let index = self
			.dynamics
			.iter()
			.position(|(pattern, _)| pattern.pattern() == full_path)?;
		Some(self.dynamics.remove(index).1)
	}

	fn len(&self) -> usize {
		self.statics.len() + self.dynamics.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::view::{Rendered, ViewInput};
	use rstest::{fixture, rstest};

	fn record(full_path: &str) -> RouteRecord {
		RouteRecord {
			full_path: full_path.to_string(),
			factory: Rc::new(|_: &ViewInput| Rendered::markup("")),
			parent_path: None,
			before_enter: None,
		}
	}

	#[fixture]
	fn table() -> RouteTable {
		let mut table = RouteTable::new();
		for path in ["/files/**", "/users/:id", "/users/new", "/users/{name}"] {
			table.insert(record(path)).unwrap();
		}
		table
	}

	#[rstest]
	#[case("/users/new", "/users/new")]
	#[case("/users/42", "/users/:id")]
	#[case("/files/a/b", "/files/**")]
	fn test_lookup_priority(table: RouteTable, #[case] path: &str, #[case] expected: &str) {
		let (record, _) = table.lookup(path).unwrap();
		assert_eq!(record.full_path, expected);
	}

	#[rstest]
	fn test_lookup_extracts_params(table: RouteTable) {
		let (_, params) = table.lookup("/users/42").unwrap();
		assert_eq!(params.get("id").map(String::as_str), Some("42"));
	}

	#[rstest]
	fn test_lookup_miss(table: RouteTable) {
		assert!(table.lookup("/nope").is_none());
	}

	#[rstest]
	fn test_duplicate_is_rejected(mut table: RouteTable) {
		assert_eq!(
			table.insert(record("/users/:id")),
			Err(RouterError::DuplicateRoute("/users/:id".to_string()))
		);
		assert_eq!(table.len(), 4);
	}

	#[rstest]
	fn test_invalid_pattern_is_rejected(mut table: RouteTable) {
		assert!(matches!(
			table.insert(record("/users/{id")),
			Err(RouterError::InvalidPattern { .. })
		));
	}

	#[rstest]
	fn test_get_and_remove(mut table: RouteTable) {
		assert!(table.get("/users/:id").is_some());
		assert!(table.get("/users/42").is_none());

		assert!(table.remove("/users/:id").is_some());
		assert!(table.remove("/users/new").is_some());
		assert!(table.remove("/users/new").is_none());
		assert_eq!(table.len(), 2);

		let (record, _) = table.lookup("/users/42").unwrap();
		assert_eq!(record.full_path, "/users/{name}");
	}
}
