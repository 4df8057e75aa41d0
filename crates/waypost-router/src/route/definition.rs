//! Route definitions and their flattened records.

use crate::error::{RouterError, RouterResult};
use crate::hooks::{BeforeHook, Next};
use crate::view::{Rendered, ViewFactory, ViewInput};
use std::rc::Rc;

/// Author-supplied route tree node.
///
/// # Example
///
/// ```
/// use waypost_router::{RouteDefinition, Rendered};
///
/// let routes = vec![
/// 	RouteDefinition::new("/users", |_| Rendered::markup("<ul></ul>")).nested(vec![
/// 		RouteDefinition::new("/:id", |input| {
/// 			Rendered::markup(format!("user {}", input.param("id").unwrap_or("?")))
/// 		}),
/// 	]),
/// ];
/// assert_eq!(routes[0].nested_routes()[0].path(), "/:id");
/// ```
#[derive(Clone)]
pub struct RouteDefinition {
	path: String,
	view: Option<ViewFactory>,
	before_enter: Option<BeforeHook>,
	nested_routes: Vec<RouteDefinition>,
}

impl std::fmt::Debug for RouteDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteDefinition")
			.field("path", &self.path)
			.field("has_view", &self.view.is_some())
			.field("has_before_enter", &self.before_enter.is_some())
			.field("nested_routes", &self.nested_routes)
			.finish()
	}
}

impl RouteDefinition {
	/// Creates a route rendering `view` at `path`.
	///
	/// Nested paths are relative to the parent: `/b` under `/a` is `/a/b`.
	pub fn new<F>(path: impl Into<String>, view: F) -> Self
	where
		F: Fn(&ViewInput) -> Rendered + 'static,
	{
		Self::with_factory(path, Rc::new(view))
	}

	/// Creates a route from an existing factory.
	pub fn with_factory(path: impl Into<String>, factory: ViewFactory) -> Self {
		Self::from_parts(path.into(), Some(factory))
	}

	/// Creates a possibly incomplete definition; completeness is checked on
	/// registration.
	pub(crate) fn from_parts(path: String, view: Option<ViewFactory>) -> Self {
		Self {
			path,
			view,
			before_enter: None,
			nested_routes: Vec::new(),
		}
	}

	/// Sets the nested routes.
	pub fn nested(mut self, routes: Vec<RouteDefinition>) -> Self {
		self.nested_routes = routes;
		self
	}

	/// Appends one nested route.
	pub fn child(mut self, route: RouteDefinition) -> Self {
		self.nested_routes.push(route);
		self
	}

	/// Adds a guard run when this route is the navigation target.
	pub fn with_before_enter<F>(mut self, hook: F) -> Self
	where
		F: Fn(Option<&str>, &str, Next) + 'static,
	{
		self.before_enter = Some(Rc::new(hook));
		self
	}

	/// Returns the path as written.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the nested routes.
	pub fn nested_routes(&self) -> &[RouteDefinition] {
		&self.nested_routes
	}
}

/// Flattened form of a [`RouteDefinition`] stored in the route table.
#[derive(Clone)]
pub struct RouteRecord {
	/// Absolute path pattern; also the record's key.
	pub full_path: String,
	/// View factory.
	pub factory: ViewFactory,
	/// Key of the parent record, `None` at the root.
	pub parent_path: Option<String>,
	/// Guard run when this record is the navigation target.
	pub before_enter: Option<BeforeHook>,
}

impl std::fmt::Debug for RouteRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteRecord")
			.field("full_path", &self.full_path)
			.field("parent_path", &self.parent_path)
			.field("has_before_enter", &self.before_enter.is_some())
			.finish()
	}
}

/// Joins a nested path onto its parent's absolute path.
pub(crate) fn join_paths(parent: Option<&str>, path: &str) -> String {
	let path = if path.starts_with('/') {
		path.to_string()
	} else {
		format!("/{}", path)
	};
	match parent {
		None => path,
		Some(parent) => {
			let joined = format!("{}{}", parent.trim_end_matches('/'), path);
			if joined.is_empty() {
				"/".to_string()
			} else {
				joined
			}
		}
	}
}

/// Flattens a definition tree depth-first, parents before children.
pub(crate) fn flatten(
	definitions: Vec<RouteDefinition>,
	parent: Option<&str>,
	out: &mut Vec<RouteRecord>,
) -> RouterResult<()> {
	for definition in definitions {
		let RouteDefinition {
			path,
			view,
			before_enter,
			nested_routes,
		} = definition;

		let factory = match view {
			Some(factory) if !path.is_empty() => factory,
			_ => return Err(RouterError::IncompleteRoute { path }),
		};

		let full_path = join_paths(parent, &path);
		out.push(RouteRecord {
			full_path: full_path.clone(),
			factory,
			parent_path: parent.map(str::to_string),
			before_enter,
		});
		flatten(nested_routes, Some(&full_path), out)?;
	}
	Ok(())
}
