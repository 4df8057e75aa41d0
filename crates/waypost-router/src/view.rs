//! View layer seam.
//!
//! The router does not render anything itself. It drives [`View`]
//! implementations through [`ViewFactory`] closures and tracks the resulting
//! [`ViewHandle`]s. Each handle owns an *outlet*: the slot into which the
//! nested placeholder protocol mounts the child route's output.

use super::placeholder::Placeholder;
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Factory producing a view (or plain markup) from its input.
pub type ViewFactory = Rc<dyn Fn(&ViewInput) -> Rendered>;

/// Wraps a closure as a [`ViewFactory`].
pub fn view_factory<F>(factory: F) -> ViewFactory
where
	F: Fn(&ViewInput) -> Rendered + 'static,
{
	Rc::new(factory)
}

/// A mountable, updatable view instance.
pub trait View {
	/// Renders the view's markup around `outlet`, the nested route's output.
	fn render(&self, outlet: &str) -> String;

	/// Applies new input to the existing instance.
	fn update(&mut self, input: &ViewInput);

	/// Releases the view's resources.
	fn destroy(&mut self) {}
}

/// Input handed to every view level of a route chain.
///
/// Each level receives its own shallow copy of the router's injected data
/// and the extracted path parameters.
#[derive(Clone, Default)]
pub struct ViewInput {
	params: HashMap<String, String>,
	data: Map<String, Value>,
	nested: Option<Box<Placeholder>>,
}

impl std::fmt::Debug for ViewInput {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewInput")
			.field("params", &self.params)
			.field("data", &self.data)
			.field("nested", &self.nested.as_ref().map(|p| p.path()))
			.finish()
	}
}

impl ViewInput {
	/// Creates an input from path parameters and injected data.
	pub fn new(params: HashMap<String, String>, data: Map<String, Value>) -> Self {
		Self {
			params,
			data,
			nested: None,
		}
	}

	/// Returns the extracted path parameters.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// Returns a single path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Returns the injected data.
	pub fn data(&self) -> &Map<String, Value> {
		&self.data
	}

	/// Returns the path of the nested route that will fill this view's outlet.
	pub fn nested_path(&self) -> Option<&str> {
		self.nested.as_ref().map(|p| p.path())
	}

	pub(crate) fn with_nested(mut self, placeholder: Placeholder) -> Self {
		self.nested = Some(Box::new(placeholder));
		self
	}

	pub(crate) fn take_nested(&mut self) -> Option<Placeholder> {
		self.nested.take().map(|p| *p)
	}
}

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a created view instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
	fn next() -> Self {
		Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
	}
}

impl std::fmt::Display for ViewId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "view#{}", self.0)
	}
}

/// Shared handle to a created view.
///
/// Clones refer to the same instance; [`ViewHandle::id`] is stable across
/// updates and only changes when a view is recreated.
#[derive(Clone)]
pub struct ViewHandle {
	id: ViewId,
	view: Rc<RefCell<Box<dyn View>>>,
	outlet: Rc<RefCell<Option<Rendered>>>,
	destroyed: Rc<Cell<bool>>,
}

impl std::fmt::Debug for ViewHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewHandle")
			.field("id", &self.id)
			.field("destroyed", &self.destroyed.get())
			.finish()
	}
}

impl ViewHandle {
	/// Wraps a freshly created view.
	pub fn new<V>(view: V) -> Self
	where
		V: View + 'static,
	{
		Self {
			id: ViewId::next(),
			view: Rc::new(RefCell::new(Box::new(view))),
			outlet: Rc::new(RefCell::new(None)),
			destroyed: Rc::new(Cell::new(false)),
		}
	}

	/// Returns the instance identity.
	pub fn id(&self) -> ViewId {
		self.id
	}

	/// Updates the view in place.
	pub fn update(&self, input: &ViewInput) {
		self.view.borrow_mut().update(input);
	}

	/// Destroys the view. Subsequent calls are ignored.
	pub fn destroy(&self) {
		if self.destroyed.replace(true) {
			return;
		}
		self.view.borrow_mut().destroy();
		self.outlet.borrow_mut().take();
	}

	/// Returns `true` once [`ViewHandle::destroy`] ran.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed.get()
	}

	/// Renders the view together with its outlet content.
	pub fn output(&self) -> String {
		let outlet = self
			.outlet
			.borrow()
			.as_ref()
			.map(Rendered::output)
			.unwrap_or_default();
		self.view.borrow().render(&outlet)
	}

	/// Returns `true` when both handles refer to the same instance.
	pub fn ptr_eq(&self, other: &ViewHandle) -> bool {
		Rc::ptr_eq(&self.view, &other.view)
	}

	/// Replaces the outlet content, returning the previous content.
	pub(crate) fn set_outlet(&self, content: Option<Rendered>) -> Option<Rendered> {
		std::mem::replace(&mut *self.outlet.borrow_mut(), content)
	}
}

/// Marker a [`Markup`] render uses to place its nested route's output.
///
/// Markup without the marker gets the nested output appended.
pub const OUTLET_MARKER: &str = "<router-outlet></router-outlet>";

/// Plain markup with no view instance behind it.
///
/// Markup cannot be updated or registered, but it still hosts an outlet so
/// the routes nested below it are rendered.
#[derive(Debug, Clone)]
pub struct Markup {
	html: String,
	outlet: Option<Box<Rendered>>,
}

impl Markup {
	/// Returns the markup as produced by the factory.
	pub fn html(&self) -> &str {
		&self.html
	}

	/// Returns the nested content, if any.
	pub fn outlet(&self) -> Option<&Rendered> {
		self.outlet.as_deref()
	}

	/// Renders the markup together with its outlet content.
	pub fn output(&self) -> String {
		let Some(nested) = self.outlet.as_deref() else {
			return self.html.clone();
		};
		let nested = nested.output();
		if self.html.contains(OUTLET_MARKER) {
			self.html.replacen(OUTLET_MARKER, &nested, 1)
		} else {
			format!("{}{}", self.html, nested)
		}
	}
}

/// Output of a [`ViewFactory`].
///
/// Only [`Rendered::View`] can be tracked by the router; markup occupies its
/// slot and hosts nested content but cannot be updated, destroyed or
/// registered.
#[derive(Debug, Clone)]
pub enum Rendered {
	/// A view instance.
	View(ViewHandle),
	/// Plain markup with no instance behind it.
	Markup(Markup),
}

impl Rendered {
	/// Wraps a freshly created view.
	pub fn view<V>(view: V) -> Self
	where
		V: View + 'static,
	{
		Self::View(ViewHandle::new(view))
	}

	/// Wraps plain markup.
	///
	/// Place [`OUTLET_MARKER`] where nested routes should render.
	pub fn markup(markup: impl Into<String>) -> Self {
		Self::Markup(Markup {
			html: markup.into(),
			outlet: None,
		})
	}

	/// Returns the view handle, when there is one.
	pub fn as_view(&self) -> Option<&ViewHandle> {
		match self {
			Self::View(handle) => Some(handle),
			Self::Markup(_) => None,
		}
	}

	/// Renders the mounted output.
	pub fn output(&self) -> String {
		match self {
			Self::View(handle) => handle.output(),
			Self::Markup(markup) => markup.output(),
		}
	}

	/// Puts `content` into this render's outlet.
	pub(crate) fn set_outlet(&mut self, content: Rendered) {
		match self {
			Self::View(handle) => {
				handle.set_outlet(Some(content));
			}
			Self::Markup(markup) => markup.outlet = Some(Box::new(content)),
		}
	}
}

/// The router's content slot.
#[derive(Debug, Default)]
pub struct MountPoint {
	content: Option<Rendered>,
}

impl MountPoint {
	/// Creates an empty mount point.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the mounted content.
	pub fn content(&self) -> Option<&Rendered> {
		self.content.as_ref()
	}

	/// Mounts `content`, replacing whatever was mounted before.
	pub fn replace(&mut self, content: Rendered) -> Option<Rendered> {
		self.content.replace(content)
	}

	/// Unmounts the current content.
	pub fn clear(&mut self) -> Option<Rendered> {
		self.content.take()
	}

	/// Renders the mounted output (empty when nothing is mounted).
	pub fn output(&self) -> String {
		self.content
			.as_ref()
			.map(Rendered::output)
			.unwrap_or_default()
	}
}
