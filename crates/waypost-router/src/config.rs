//! Router settings loaded from TOML.
//!
//! ```toml
//! mode = "hash"
//! initial_path = "/a/b"
//!
//! [injected_input]
//! title = "Dashboard"
//!
//! [[routes]]
//! path = "/a"
//! view = "layout"
//!
//! [[routes.nested_routes]]
//! path = "/b"
//! view = "panel"
//! ```
//!
//! View names are resolved through a [`ViewRegistry`].

use crate::error::RouterError;
use crate::route::RouteDefinition;
use crate::router::{Router, RouterOptions};
use crate::view::{Rendered, ViewFactory, ViewInput};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use waypost_history::{History, HistoryMode};

/// Errors raised while loading router settings.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// The settings file could not be read.
	#[error("IO error reading {path}: {source}")]
	IoError {
		/// File path.
		path: PathBuf,
		/// Underlying error.
		#[source]
		source: std::io::Error,
	},

	/// The settings are not valid TOML for [`RouterConfig`].
	#[error("Failed to parse router configuration: {message}")]
	ParseError {
		/// Parser message.
		message: String,
	},

	/// A route names a view the registry does not know.
	#[error("unknown view '{view}' for route '{path}'")]
	UnknownView {
		/// The view name.
		view: String,
		/// The route path as written.
		path: String,
	},

	/// Building the router failed.
	#[error(transparent)]
	Router(#[from] RouterError),
}

/// Top-level router settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
	/// URL mode of the history.
	pub mode: HistoryMode,
	/// Path pushed on mount.
	pub initial_path: Option<String>,
	/// Data copied into every view's input.
	pub injected_input: Map<String, Value>,
	/// Route tree.
	pub routes: Vec<RouteConfig>,
}

/// One route in [`RouterConfig::routes`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
	/// Path segment, relative to the parent route.
	pub path: Option<String>,
	/// Registered view name.
	pub view: Option<String>,
	/// Child routes.
	pub nested_routes: Vec<RouteConfig>,
}

impl RouterConfig {
	/// Loads settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content =
			std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::IoError {
				path: path.as_ref().to_path_buf(),
				source: e,
			})?;
		Self::from_toml(&content)
	}

	/// Parses settings from a TOML string.
	pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::ParseError {
			message: e.to_string(),
		})
	}

	/// Returns a history in the configured mode.
	pub fn history(&self) -> History {
		History::with_mode(self.mode)
	}

	/// Resolves view names and produces router options.
	///
	/// Missing `path` or `view` keys are left for the router to reject at
	/// construction.
	pub fn into_options(self, registry: &ViewRegistry) -> Result<RouterOptions, ConfigError> {
		let routes = self
			.routes
			.into_iter()
			.map(|route| route.into_definition(registry))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(RouterOptions {
			routes,
			initial_path: self.initial_path,
			injected_input: self.injected_input,
		})
	}

	/// Builds a router and its history.
	pub fn build(self, registry: &ViewRegistry) -> Result<Router, ConfigError> {
		let history = self.history();
		let options = self.into_options(registry)?;
		Ok(Router::new(options, history)?)
	}
}

impl RouteConfig {
	fn into_definition(self, registry: &ViewRegistry) -> Result<RouteDefinition, ConfigError> {
		let path = self.path.unwrap_or_default();
		let view = match self.view {
			Some(name) => Some(registry.get(&name).ok_or_else(|| ConfigError::UnknownView {
				view: name.clone(),
				path: path.clone(),
			})?),
			None => None,
		};
		let nested = self
			.nested_routes
			.into_iter()
			.map(|route| route.into_definition(registry))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(RouteDefinition::from_parts(path, view).nested(nested))
	}
}

/// Maps view names used in settings to factories.
#[derive(Default, Clone)]
pub struct ViewRegistry {
	views: HashMap<String, ViewFactory>,
}

impl std::fmt::Debug for ViewRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut names: Vec<&String> = self.views.keys().collect();
		names.sort();
		f.debug_struct("ViewRegistry").field("views", &names).finish()
	}
}

impl ViewRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `factory` under `name`, replacing any previous entry.
	pub fn register<F>(mut self, name: impl Into<String>, factory: F) -> Self
	where
		F: Fn(&ViewInput) -> Rendered + 'static,
	{
		self.views.insert(name.into(), Rc::new(factory));
		self
	}

	/// Returns the factory registered under `name`.
	pub fn get(&self, name: &str) -> Option<ViewFactory> {
		self.views.get(name).cloned()
	}

	/// Returns the number of registered views.
	pub fn len(&self) -> usize {
		self.views.len()
	}

	/// Returns `true` when no view is registered.
	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}
}
