//! Nested placeholder protocol.
//!
//! A [`Placeholder`] stands in for a child route inside its parent's input.
//! When the parent is created or updated, the placeholder is mounted into the
//! parent's outlet: it renders the real child view in its place and reports
//! the child to the [`RenderContext`] of the current pass.
//!
//! Placeholders nest. The innermost one mounts first, so registrations are
//! collected leaf first and reversed when merged into the component stack.

use super::stack::StackEntry;
use super::view::{Rendered, ViewFactory, ViewHandle, ViewInput};

/// Deferred render slot for a nested route.
#[derive(Clone)]
pub struct Placeholder {
	path: String,
	factory: ViewFactory,
	input: ViewInput,
}

impl std::fmt::Debug for Placeholder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Placeholder")
			.field("path", &self.path)
			.field("input", &self.input)
			.finish()
	}
}

impl Placeholder {
	pub(crate) fn new(path: impl Into<String>, factory: ViewFactory, input: ViewInput) -> Self {
		Self {
			path: path.into(),
			factory,
			input,
		}
	}

	/// Route key the rendered view registers under.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Renders the target view (and its own nested placeholders) and
	/// registers it.
	pub(crate) fn mount(self, cx: &mut RenderContext) -> Rendered {
		let rendered = render_with_nested(&self.factory, self.input, cx);
		match rendered.as_view() {
			Some(view) => cx.register(&self.path, view.clone()),
			None => tracing::warn!(
				path = %self.path,
				"No view to retrieve; route level is not trackable"
			),
		}
		rendered
	}
}

/// Creates a view from `factory` and mounts its nested placeholder, if any,
/// into the new render's outlet.
///
/// Markup hosts the nested route too; only its own level goes untracked.
pub(crate) fn render_with_nested(
	factory: &ViewFactory,
	mut input: ViewInput,
	cx: &mut RenderContext,
) -> Rendered {
	let mut rendered = factory(&input);
	if let Some(nested) = input.take_nested() {
		let content = nested.mount(cx);
		rendered.set_outlet(content);
	}
	rendered
}

/// Updates an existing view and remounts its outlet from `input`.
pub(crate) fn apply_input(view: &ViewHandle, mut input: ViewInput, cx: &mut RenderContext) {
	view.update(&input);
	let content = input.take_nested().map(|nested| nested.mount(cx));
	view.set_outlet(content);
}

/// Accumulator for the views self-registered during one render pass.
#[derive(Debug, Default)]
pub struct RenderContext {
	stack_top: Option<String>,
	registrations: Vec<StackEntry>,
}

impl RenderContext {
	/// Creates a context for a pass over a stack whose leaf is `stack_top`.
	pub fn new(stack_top: Option<&str>) -> Self {
		Self {
			stack_top: stack_top.map(str::to_string),
			registrations: Vec::new(),
		}
	}

	/// Records `view` under `path`.
	///
	/// Skipped when the stack the pass runs against already ends with `path`.
	pub fn register(&mut self, path: &str, view: ViewHandle) {
		if self.stack_top.as_deref() == Some(path) {
			tracing::debug!(path, "registration skipped; already on top of stack");
			return;
		}
		tracing::trace!(path, view = %view.id(), "view registered");
		self.registrations.push(StackEntry::new(path, view));
	}

	/// Returns the number of registrations so far.
	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	/// Returns `true` when nothing registered.
	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}

	/// Consumes the context, returning registrations in leaf-first order.
	pub fn into_registrations(self) -> Vec<StackEntry> {
		self.registrations
	}
}
