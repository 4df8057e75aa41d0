//! Shared fixtures for router integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use waypost_router::{Rendered, RouteDefinition, RouterEvent, View, ViewInput};

/// Lifecycle call recorded by a [`Tracked`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	Created(&'static str),
	Updated(&'static str),
	Destroyed(&'static str),
}

/// Ordered log of view lifecycle calls and their inputs.
#[derive(Clone, Default)]
pub struct Journal {
	calls: Rc<RefCell<Vec<Call>>>,
	inputs: Rc<RefCell<HashMap<&'static str, ViewInput>>>,
}

impl Journal {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.borrow().clone()
	}

	/// Drains the log.
	pub fn take(&self) -> Vec<Call> {
		std::mem::take(&mut *self.calls.borrow_mut())
	}

	pub fn count(&self, call: &Call) -> usize {
		self.calls.borrow().iter().filter(|c| *c == call).count()
	}

	/// Creates minus destroys.
	pub fn live(&self) -> usize {
		let calls = self.calls.borrow();
		let created = calls
			.iter()
			.filter(|c| matches!(c, Call::Created(_)))
			.count();
		let destroyed = calls
			.iter()
			.filter(|c| matches!(c, Call::Destroyed(_)))
			.count();
		created - destroyed
	}

	/// Last input a view named `name` was created or updated with.
	pub fn input(&self, name: &str) -> Option<ViewInput> {
		self.inputs.borrow().get(name).cloned()
	}

	fn record(&self, call: Call, input: Option<&ViewInput>) {
		let name = match call {
			Call::Created(name) | Call::Updated(name) | Call::Destroyed(name) => name,
		};
		if let Some(input) = input {
			self.inputs.borrow_mut().insert(name, input.clone());
		}
		self.calls.borrow_mut().push(call);
	}

	/// Route definition rendering a tracked view named `name`.
	pub fn route(&self, path: &str, name: &'static str) -> RouteDefinition {
		let journal = self.clone();
		RouteDefinition::new(path, move |input| {
			journal.record(Call::Created(name), Some(input));
			Rendered::view(Tracked {
				name,
				journal: journal.clone(),
			})
		})
	}
}

/// View that logs its lifecycle and renders `<name>outlet</name>`.
pub struct Tracked {
	name: &'static str,
	journal: Journal,
}

impl View for Tracked {
	fn render(&self, outlet: &str) -> String {
		format!("<{0}>{1}</{0}>", self.name, outlet)
	}

	fn update(&mut self, input: &ViewInput) {
		self.journal.record(Call::Updated(self.name), Some(input));
	}

	fn destroy(&mut self) {
		self.journal.record(Call::Destroyed(self.name), None);
	}
}

/// Collects event names (and error messages) emitted by a router.
#[derive(Clone, Default)]
pub struct EventLog {
	events: Rc<RefCell<Vec<String>>>,
}

impl EventLog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn listener(&self) -> impl Fn(&RouterEvent) + 'static {
		let events = Rc::clone(&self.events);
		move |event: &RouterEvent| {
			let entry = match event {
				RouterEvent::Update { path, .. } => format!("update {}", path),
				RouterEvent::NotFound { path } => format!("not-found {}", path),
				RouterEvent::Error { path, error } => format!("error {} {}", path, error),
				RouterEvent::TransitionHalted { to, .. } => format!("transition-halted {}", to),
			};
			events.borrow_mut().push(entry);
		}
	}

	pub fn events(&self) -> Vec<String> {
		self.events.borrow().clone()
	}

	pub fn count_prefix(&self, prefix: &str) -> usize {
		self.events
			.borrow()
			.iter()
			.filter(|e| e.starts_with(prefix))
			.count()
	}
}
