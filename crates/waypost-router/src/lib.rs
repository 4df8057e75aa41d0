//! Hierarchical client-side routing for waypost.
//!
//! A route tree maps nested paths to view factories. On every navigation the
//! router resolves the target, rebuilds its ancestor chain and reconciles the
//! live component stack against it: surviving ancestors are updated in place,
//! abandoned levels are destroyed, and only the missing levels are created.
//!
//! ## Modules
//!
//! - [`route`]: definitions, patterns and the [`RouteTable`]
//! - [`resolver`]: path to [`RouteMatch`] resolution
//! - [`stack`]: the live [`ComponentStack`]
//! - [`placeholder`]: deferred rendering of nested routes
//! - [`reconciler`]: stack transitions
//! - [`hooks`]: `before_each` / `before_enter` guards and `after_each`
//! - [`router`]: the [`Router`] orchestrator and its events
//! - `config`: TOML settings (feature `config`)
//!
//! ## Example
//!
//! ```
//! use waypost_history::History;
//! use waypost_router::{RouteDefinition, Rendered, Router, RouterOptions, View, ViewInput};
//!
//! struct Layout(&'static str);
//!
//! impl View for Layout {
//! 	fn render(&self, outlet: &str) -> String {
//! 		format!("<section class=\"{}\">{}</section>", self.0, outlet)
//! 	}
//!
//! 	fn update(&mut self, _input: &ViewInput) {}
//! }
//!
//! # futures::executor::block_on(async {
//! let routes = vec![
//! 	RouteDefinition::new("/a", |_| Rendered::view(Layout("a")))
//! 		.child(RouteDefinition::new("/b", |_| Rendered::view(Layout("b")))),
//! ];
//! let router = Router::new(RouterOptions::new(routes).initial_path("/a/b"), History::new()).unwrap();
//! router.mount().await.unwrap();
//!
//! assert_eq!(router.stack_paths(), vec!["/a", "/a/b"]);
//! assert_eq!(
//! 	router.output(),
//! 	"<section class=\"a\"><section class=\"b\"></section></section>"
//! );
//! # });
//! ```

#[cfg(feature = "config")]
pub mod config;
pub mod error;
pub mod hooks;
pub mod placeholder;
pub mod reconciler;
pub mod resolver;
pub mod route;
pub mod router;
pub mod stack;
pub mod view;

#[cfg(feature = "config")]
pub use config::{ConfigError, RouteConfig, RouterConfig, ViewRegistry};
pub use error::{RouterError, RouterResult};
pub use hooks::{AfterHook, BeforeHook, Decision, Next};
pub use placeholder::{Placeholder, RenderContext};
pub use reconciler::{ReconcileSummary, Reconciler, ancestor_chain};
pub use resolver::{PathResolver, Resolution};
pub use route::{RouteDefinition, RouteLookup, RouteMatch, RoutePattern, RouteRecord, RouteTable};
pub use router::{
	EventKind, ListenerId, NavigationOutcome, Phase, Router, RouterEvent, RouterOptions,
};
pub use stack::{ComponentStack, StackEntry};
pub use view::{
	Markup, MountPoint, OUTLET_MARKER, Rendered, View, ViewFactory, ViewHandle, ViewId, ViewInput,
	view_factory,
};
