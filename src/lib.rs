//! # waypost
//!
//! A hierarchical client-side router.
//!
//! Routes form a tree of path-to-view mappings. On each navigation waypost
//! resolves the target, rebuilds its chain of ancestor routes and reconciles
//! the chain of mounted views against it, so ancestors shared by the old and
//! new route keep their identity and only receive an update.
//!
//! ## Crates
//!
//! - [`history`]: the in-memory navigation source (`History`, `RouterLink`)
//! - [`router`]: route table, resolver, reconciler and the `Router` itself
//!
//! ## Feature Flags
//!
//! - `config` (default): load router settings from TOML
//!
//! ## Quick Start
//!
//! ```
//! use waypost::prelude::*;
//!
//! struct Page(&'static str);
//!
//! impl View for Page {
//! 	fn render(&self, outlet: &str) -> String {
//! 		format!("<div id=\"{}\">{}</div>", self.0, outlet)
//! 	}
//!
//! 	fn update(&mut self, _input: &ViewInput) {}
//! }
//!
//! # futures::executor::block_on(async {
//! let routes = vec![
//! 	RouteDefinition::new("/users", |_| Rendered::view(Page("users")))
//! 		.child(RouteDefinition::new("/:id", |input| {
//! 			Rendered::markup(format!("user {}", input.param("id").unwrap_or_default()))
//! 		})),
//! ];
//! let router = Router::new(RouterOptions::new(routes), History::new()).unwrap();
//! router.mount().await.unwrap();
//!
//! router.push("/users/42").unwrap();
//! router.flush().await;
//!
//! assert_eq!(router.output(), "<div id=\"users\">user 42</div>");
//! # });
//! ```

pub use waypost_history as history;
pub use waypost_router as router;

pub use waypost_history::{History, HistoryError, HistoryMode, RouterLink, Subscription};
pub use waypost_router::{
	NavigationOutcome, Rendered, RouteDefinition, Router, RouterError, RouterEvent, RouterOptions,
	View, ViewInput,
};

#[cfg(feature = "config")]
pub use waypost_router::{ConfigError, RouterConfig, ViewRegistry};

/// Commonly used types.
pub mod prelude {
	pub use waypost_history::{History, HistoryMode, RouterLink};
	pub use waypost_router::{
		EventKind, NavigationOutcome, Next, Rendered, RouteDefinition, Router, RouterEvent,
		RouterOptions, View, ViewInput,
	};

	#[cfg(feature = "config")]
	pub use waypost_router::{RouterConfig, ViewRegistry};
}
