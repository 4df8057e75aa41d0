//! Component stack: the live root-to-leaf view chain of the active route.

use super::view::ViewHandle;

/// A mounted view and the route key it was mounted for.
#[derive(Debug, Clone)]
pub struct StackEntry {
	/// Route key (the record's absolute pattern).
	pub path: String,
	/// The live view.
	pub view: ViewHandle,
}

impl StackEntry {
	/// Creates a new entry.
	pub fn new(path: impl Into<String>, view: ViewHandle) -> Self {
		Self {
			path: path.into(),
			view,
		}
	}
}

/// Ordered root-first sequence of [`StackEntry`].
#[derive(Debug, Clone, Default)]
pub struct ComponentStack {
	entries: Vec<StackEntry>,
}

impl ComponentStack {
	/// Creates an empty stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when nothing is mounted.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates root to leaf.
	pub fn iter(&self) -> impl Iterator<Item = &StackEntry> {
		self.entries.iter()
	}

	/// Returns the leaf entry.
	pub fn top(&self) -> Option<&StackEntry> {
		self.entries.last()
	}

	/// Returns the entry paths, root first.
	pub fn paths(&self) -> Vec<&str> {
		self.entries.iter().map(|e| e.path.as_str()).collect()
	}

	/// Scans leaf to root and returns the index of the deepest entry for `path`.
	pub fn find_from_top(&self, path: &str) -> Option<usize> {
		self.entries.iter().rposition(|e| e.path == path)
	}

	/// Keeps the first `len` entries and returns the removed ones, leaf first.
	pub fn truncate(&mut self, len: usize) -> Vec<StackEntry> {
		if len >= self.entries.len() {
			return Vec::new();
		}
		let mut removed = self.entries.split_off(len);
		removed.reverse();
		removed
	}

	/// Appends an entry on top.
	pub fn push(&mut self, entry: StackEntry) {
		self.entries.push(entry);
	}

	/// Removes every entry, leaf first.
	pub fn drain(&mut self) -> Vec<StackEntry> {
		self.truncate(0)
	}

	/// Appends registrations collected leaf-first, restoring root-to-leaf order.
	pub fn append_registrations(&mut self, mut registrations: Vec<StackEntry>) {
		registrations.reverse();
		self.entries.extend(registrations);
	}
}
