//! In-memory history stack.
//!
//! [`History`] keeps an ordered list of visited paths and a cursor into it.
//! Every navigation that changes the active entry is broadcast to the
//! subscribed `change-route` listeners, synchronously and in subscription
//! order.

use super::error::{HistoryError, HistoryResult};
use super::mode::HistoryMode;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Type alias for `change-route` listeners.
type ChangeRouteListener = Rc<dyn Fn(&str)>;

struct HistoryInner {
	entries: Vec<String>,
	cursor: Option<usize>,
	mode: HistoryMode,
	listeners: Vec<(u64, ChangeRouteListener)>,
	next_listener_id: u64,
}

impl HistoryInner {
	fn current(&self) -> Option<&str> {
		self.cursor
			.and_then(|index| self.entries.get(index))
			.map(String::as_str)
	}
}

/// Shared handle to a history stack.
///
/// Cloning a `History` yields another handle to the same stack, so a router
/// and the links it renders observe the same entries.
#[derive(Clone)]
pub struct History {
	inner: Rc<RefCell<HistoryInner>>,
}

impl std::fmt::Debug for History {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.borrow();
		f.debug_struct("History")
			.field("entries", &inner.entries)
			.field("cursor", &inner.cursor)
			.field("mode", &inner.mode)
			.field("listeners", &inner.listeners.len())
			.finish()
	}
}

impl Default for History {
	fn default() -> Self {
		Self::new()
	}
}

impl History {
	/// Creates an empty history in [`HistoryMode::Path`].
	pub fn new() -> Self {
		Self::with_mode(HistoryMode::default())
	}

	/// Creates an empty history rendering links in `mode`.
	pub fn with_mode(mode: HistoryMode) -> Self {
		Self {
			inner: Rc::new(RefCell::new(HistoryInner {
				entries: Vec::new(),
				cursor: None,
				mode,
				listeners: Vec::new(),
				next_listener_id: 0,
			})),
		}
	}

	/// Returns the URL mode.
	pub fn mode(&self) -> HistoryMode {
		self.inner.borrow().mode
	}

	/// Returns the link target for `path` in the configured mode.
	pub fn href(&self, path: &str) -> String {
		self.mode().href(path)
	}

	/// Returns the active entry, if any.
	pub fn current_path(&self) -> Option<String> {
		self.inner.borrow().current().map(str::to_string)
	}

	/// Returns every recorded entry, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.inner.borrow().entries.clone()
	}

	/// Returns the number of recorded entries.
	pub fn len(&self) -> usize {
		self.inner.borrow().entries.len()
	}

	/// Returns `true` when nothing has been pushed yet.
	pub fn is_empty(&self) -> bool {
		self.inner.borrow().entries.is_empty()
	}

	/// Pushes `path` as a new entry and emits `change-route`.
	///
	/// Entries ahead of the cursor are discarded. Pushing the active path is a
	/// no-op and returns `Ok(false)` without emitting.
	pub fn push(&self, path: impl Into<String>) -> HistoryResult<bool> {
		let path = validate(path.into())?;
		{
			let mut inner = self.inner.borrow_mut();
			if inner.current() == Some(path.as_str()) {
				tracing::debug!(path = %path, "push of active path ignored");
				return Ok(false);
			}

			let keep = inner.cursor.map_or(0, |index| index + 1);
			inner.entries.truncate(keep);
			inner.entries.push(path.clone());
			inner.cursor = Some(inner.entries.len() - 1);
		}

		self.emit(&path);
		Ok(true)
	}

	/// Replaces the active entry with `path` and emits `change-route`.
	///
	/// On an empty history this records the first entry.
	pub fn replace(&self, path: impl Into<String>) -> HistoryResult<()> {
		let path = validate(path.into())?;
		{
			let mut inner = self.inner.borrow_mut();
			match inner.cursor {
				Some(index) => inner.entries[index] = path.clone(),
				None => {
					inner.entries.push(path.clone());
					inner.cursor = Some(0);
				}
			}
		}

		self.emit(&path);
		Ok(())
	}

	/// Moves the cursor one entry back and emits its path.
	///
	/// Returns `false` when already at the oldest entry.
	pub fn back(&self) -> bool {
		self.step(-1)
	}

	/// Moves the cursor one entry forward and emits its path.
	///
	/// Returns `false` when already at the newest entry.
	pub fn forward(&self) -> bool {
		self.step(1)
	}

	fn step(&self, delta: isize) -> bool {
		let path = {
			let mut inner = self.inner.borrow_mut();
			let Some(cursor) = inner.cursor else {
				return false;
			};
			let Some(target) = cursor.checked_add_signed(delta) else {
				return false;
			};
			if target >= inner.entries.len() {
				return false;
			}
			inner.cursor = Some(target);
			inner.entries[target].clone()
		};

		self.emit(&path);
		true
	}

	/// Subscribes to `change-route` notifications.
	///
	/// The listener stays registered until the returned [`Subscription`] is
	/// dropped or explicitly unsubscribed.
	pub fn subscribe<F>(&self, listener: F) -> Subscription
	where
		F: Fn(&str) + 'static,
	{
		let mut inner = self.inner.borrow_mut();
		let id = inner.next_listener_id;
		inner.next_listener_id += 1;
		inner.listeners.push((id, Rc::new(listener)));

		Subscription {
			id,
			history: Rc::downgrade(&self.inner),
		}
	}

	/// Returns the number of live `change-route` listeners.
	pub fn listener_count(&self) -> usize {
		self.inner.borrow().listeners.len()
	}

	fn emit(&self, path: &str) {
		// Listeners may navigate again, so none of them runs under the borrow.
		let listeners: Vec<ChangeRouteListener> = self
			.inner
			.borrow()
			.listeners
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();

		tracing::debug!(path, listeners = listeners.len(), "change-route");
		for listener in listeners {
			listener(path);
		}
	}
}

fn validate(path: String) -> HistoryResult<String> {
	if path.is_empty() || !path.starts_with('/') {
		return Err(HistoryError::InvalidPath(path));
	}
	Ok(path)
}

/// Registration handle returned by [`History::subscribe`].
///
/// Dropping the handle removes the listener.
#[must_use = "dropping a Subscription immediately removes the listener"]
pub struct Subscription {
	id: u64,
	history: Weak<RefCell<HistoryInner>>,
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("active", &self.is_active())
			.finish()
	}
}

impl Subscription {
	/// Returns `true` while the listener is still registered.
	pub fn is_active(&self) -> bool {
		self.history.upgrade().is_some_and(|inner| {
			inner
				.borrow()
				.listeners
				.iter()
				.any(|(id, _)| *id == self.id)
		})
	}

	/// Removes the listener now.
	pub fn unsubscribe(self) {
		drop(self);
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(inner) = self.history.upgrade() {
			inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
		}
	}
}
