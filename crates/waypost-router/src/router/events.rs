//! Router lifecycle events and their listeners.

use crate::reconciler::ReconcileSummary;
use std::rc::Rc;

/// Kind of a [`RouterEvent`], used to filter listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	/// A transition committed a new stack.
	Update,
	/// No route matched.
	NotFound,
	/// A guard aborted the transition, or reconciliation failed.
	Error,
	/// A guard halted the transition.
	TransitionHalted,
}

impl EventKind {
	/// Returns the event name.
	pub fn name(self) -> &'static str {
		match self {
			Self::Update => "update",
			Self::NotFound => "not-found",
			Self::Error => "error",
			Self::TransitionHalted => "transition-halted",
		}
	}
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Event emitted by a [`Router`](crate::Router).
#[derive(Debug)]
pub enum RouterEvent {
	/// The stack for `path` is in place.
	Update {
		/// New active path.
		path: String,
		/// Path active before the transition.
		previous: Option<String>,
		/// What the reconciliation did.
		summary: ReconcileSummary,
	},
	/// `path` matched no route; nothing changed.
	NotFound {
		/// The unmatched path.
		path: String,
	},
	/// The transition to `path` failed; nothing changed.
	Error {
		/// The target path.
		path: String,
		/// The value a guard aborted with, or the reconciliation failure.
		error: anyhow::Error,
	},
	/// A guard halted the transition; nothing changed.
	TransitionHalted {
		/// Active path.
		from: Option<String>,
		/// Rejected target.
		to: String,
	},
}

impl RouterEvent {
	/// Returns the event kind.
	pub fn kind(&self) -> EventKind {
		match self {
			Self::Update { .. } => EventKind::Update,
			Self::NotFound { .. } => EventKind::NotFound,
			Self::Error { .. } => EventKind::Error,
			Self::TransitionHalted { .. } => EventKind::TransitionHalted,
		}
	}

	/// Returns the event name.
	pub fn name(&self) -> &'static str {
		self.kind().name()
	}
}

/// Handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&RouterEvent)>;

/// Listener registry.
#[derive(Default)]
pub(crate) struct Listeners {
	next_id: u64,
	slots: Vec<(ListenerId, Option<EventKind>, Listener)>,
}

impl Listeners {
	pub(crate) fn add(&mut self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
		let id = ListenerId(self.next_id);
		self.next_id += 1;
		self.slots.push((id, kind, listener));
		id
	}

	pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
		let before = self.slots.len();
		self.slots.retain(|(slot, _, _)| *slot != id);
		self.slots.len() != before
	}

	pub(crate) fn len(&self) -> usize {
		self.slots.len()
	}

	/// Listeners interested in `kind`, in registration order.
	pub(crate) fn matching(&self, kind: EventKind) -> Vec<Listener> {
		self.slots
			.iter()
			.filter(|(_, filter, _)| filter.is_none_or(|k| k == kind))
			.map(|(_, _, listener)| Rc::clone(listener))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::RefCell;

	#[rstest]
	#[case(EventKind::Update, "update")]
	#[case(EventKind::NotFound, "not-found")]
	#[case(EventKind::Error, "error")]
	#[case(EventKind::TransitionHalted, "transition-halted")]
	fn test_event_names(#[case] kind: EventKind, #[case] name: &str) {
		assert_eq!(kind.name(), name);
		assert_eq!(kind.to_string(), name);
	}

	#[rstest]
	fn test_listeners_filter_by_kind() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let mut listeners = Listeners::default();

		let sink = Rc::clone(&seen);
		listeners.add(
			Some(EventKind::NotFound),
			Rc::new(move |event: &RouterEvent| sink.borrow_mut().push(event.name())),
		);
		let sink = Rc::clone(&seen);
		let any = listeners.add(
			None,
			Rc::new(move |event: &RouterEvent| sink.borrow_mut().push(event.name())),
		);

		let event = RouterEvent::NotFound {
			path: "/missing".to_string(),
		};
		for listener in listeners.matching(event.kind()) {
			listener(&event);
		}
		assert_eq!(listeners.matching(EventKind::Update).len(), 1);
		assert_eq!(*seen.borrow(), vec!["not-found", "not-found"]);

		assert!(listeners.remove(any));
		assert!(!listeners.remove(any));
		assert_eq!(listeners.len(), 1);
	}
}
