//! Navigation orchestrator.
//!
//! [`Router`] subscribes to a [`History`] and turns every `change-route`
//! notification into a transition:
//!
//! ```text
//! Idle -> Resolving (before_each, lookup, before_enter) -> Reconciling -> Idle
//! ```
//!
//! Paths emitted by the history are queued in an inbox. [`Router::flush`]
//! drains whatever is queued and [`Router::run`] processes paths as they
//! arrive until the router is destroyed. Transitions never overlap: a second
//! one waits until the first is back to `Idle`.

pub mod events;

pub use events::{EventKind, ListenerId, RouterEvent};

use crate::error::{RouterError, RouterResult};
use crate::hooks::{AfterHook, BeforeHook, Decision, Next, run_guard};
use crate::reconciler::{ReconcileSummary, Reconciler, ancestor_chain};
use crate::resolver::{PathResolver, Resolution};
use crate::route::definition::flatten;
use crate::route::{RouteDefinition, RouteLookup, RouteTable};
use crate::stack::ComponentStack;
use crate::view::MountPoint;
use events::Listeners;
use futures::channel::mpsc;
use futures::lock::Mutex;
use futures::{FutureExt, StreamExt};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use waypost_history::{History, Subscription};

/// Construction options.
#[derive(Debug, Default)]
pub struct RouterOptions {
	/// Route tree; must not be empty.
	pub routes: Vec<RouteDefinition>,
	/// Path pushed on [`Router::mount`].
	pub initial_path: Option<String>,
	/// Data copied into every view level's input.
	pub injected_input: Map<String, Value>,
}

impl RouterOptions {
	/// Creates options for `routes`.
	pub fn new(routes: Vec<RouteDefinition>) -> Self {
		Self {
			routes,
			..Self::default()
		}
	}

	/// Sets the path pushed on mount.
	pub fn initial_path(mut self, path: impl Into<String>) -> Self {
		self.initial_path = Some(path.into());
		self
	}

	/// Sets the data injected into every view.
	pub fn injected_input(mut self, input: Map<String, Value>) -> Self {
		self.injected_input = input;
		self
	}
}

/// Orchestrator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// No transition in progress.
	#[default]
	Idle,
	/// Running guards and looking up the target.
	Resolving,
	/// Reconciling the component stack.
	Reconciling,
}

/// What a call to [`Router::navigate`] ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The new stack is committed.
	Updated(ReconcileSummary),
	/// No route matched.
	NotFound,
	/// A guard halted the transition.
	Halted,
	/// A guard aborted the transition, or reconciliation failed.
	Errored,
	/// The router was destroyed before the transition could run.
	Ignored,
}

#[derive(Default)]
struct RouterState {
	phase: Phase,
	current_path: Option<String>,
	stack: ComponentStack,
	mount_point: MountPoint,
}

struct RouterInner {
	table: RefCell<Box<dyn RouteLookup>>,
	history: History,
	state: RefCell<RouterState>,
	before_each: RefCell<Option<BeforeHook>>,
	after_each: RefCell<Option<AfterHook>>,
	listeners: RefCell<Listeners>,
	subscription: RefCell<Option<Subscription>>,
	sender: mpsc::UnboundedSender<String>,
	inbox: RefCell<mpsc::UnboundedReceiver<String>>,
	transition: Mutex<()>,
	initial_path: Option<String>,
	injected: Map<String, Value>,
	destroyed: Cell<bool>,
}

/// Hierarchical router.
///
/// Cloning yields another handle to the same router.
///
/// # Overlapping navigations
///
/// Navigations are queued, not superseded: a path arriving while a
/// transition waits on a guard runs after that transition finishes, in
/// arrival order. This is a policy of this router, not a property of the
/// routing model; a guard that wants to drop a stale navigation must halt it
/// itself.
///
/// # Example
///
/// ```
/// use waypost_history::History;
/// use waypost_router::{RouteDefinition, Rendered, Router, RouterOptions};
///
/// # futures::executor::block_on(async {
/// let history = History::new();
/// let router = Router::new(
/// 	RouterOptions::new(vec![
/// 		RouteDefinition::new("/", |_| Rendered::markup("<h1>Home</h1>")),
/// 	])
/// 	.initial_path("/"),
/// 	history,
/// )
/// .unwrap();
///
/// router.mount().await.unwrap();
/// assert_eq!(router.output(), "<h1>Home</h1>");
/// # });
/// ```
#[derive(Clone)]
pub struct Router {
	inner: Rc<RouterInner>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.borrow();
		f.debug_struct("Router")
			.field("phase", &state.phase)
			.field("current_path", &state.current_path)
			.field("stack", &state.stack.paths())
			.field("routes", &self.inner.table.borrow().len())
			.field("listeners", &self.inner.listeners.borrow().len())
			.field("mounted", &self.inner.subscription.borrow().is_some())
			.field("destroyed", &self.inner.destroyed.get())
			.finish()
	}
}

impl Router {
	/// Creates a router over the default [`RouteTable`].
	///
	/// # Errors
	///
	/// [`RouterError::EmptyRoutes`] for an empty route list,
	/// [`RouterError::IncompleteRoute`] for a definition without path or view,
	/// plus the table's own insertion errors.
	pub fn new(options: RouterOptions, history: History) -> RouterResult<Self> {
		Self::with_table(options, history, Box::new(RouteTable::new()))
	}

	/// Creates a router over a custom route lookup.
	pub fn with_table(
		options: RouterOptions,
		history: History,
		mut table: Box<dyn RouteLookup>,
	) -> RouterResult<Self> {
		let RouterOptions {
			routes,
			initial_path,
			injected_input,
		} = options;

		if routes.is_empty() {
			return Err(RouterError::EmptyRoutes);
		}
		let mut records = Vec::new();
		flatten(routes, None, &mut records)?;
		for record in records {
			table.insert(record)?;
		}
		tracing::debug!(routes = table.len(), "route table built");

		let (sender, inbox) = mpsc::unbounded();
		Ok(Self {
			inner: Rc::new(RouterInner {
				table: RefCell::new(table),
				history,
				state: RefCell::new(RouterState::default()),
				before_each: RefCell::new(None),
				after_each: RefCell::new(None),
				listeners: RefCell::new(Listeners::default()),
				subscription: RefCell::new(None),
				sender,
				inbox: RefCell::new(inbox),
				transition: Mutex::new(()),
				initial_path,
				injected: injected_input,
				destroyed: Cell::new(false),
			}),
		})
	}

	/// Subscribes to the history, pushes the initial path and processes it.
	///
	/// Without an initial path, the history's active entry (if any) is
	/// rendered instead. Mounting twice is a no-op.
	///
	/// # Errors
	///
	/// [`RouterError::Destroyed`] after [`Router::destroy`], and
	/// [`RouterError::InitialRoute`] when the initial path cannot be pushed.
	pub async fn mount(&self) -> RouterResult<()> {
		if self.inner.destroyed.get() {
			return Err(RouterError::Destroyed);
		}
		if self.inner.subscription.borrow().is_some() {
			tracing::debug!("router already mounted");
			return Ok(());
		}

		let sender = self.inner.sender.clone();
		let subscription = self.inner.history.subscribe(move |path| {
			if sender.unbounded_send(path.to_string()).is_err() {
				tracing::trace!(path, "router inbox closed; change-route dropped");
			}
		});
		*self.inner.subscription.borrow_mut() = Some(subscription);
		tracing::info!(initial_path = ?self.inner.initial_path, "router mounted");

		match self.inner.initial_path.clone() {
			Some(initial) => {
				if let Err(source) = self.push_initial(&initial) {
					self.inner.subscription.borrow_mut().take();
					return Err(RouterError::InitialRoute {
						path: initial,
						source: Box::new(source),
					});
				}
			}
			None => {
				if let Some(active) = self.inner.history.current_path() {
					self.enqueue(active);
				}
			}
		}

		self.flush().await;
		Ok(())
	}

	fn push_initial(&self, path: &str) -> RouterResult<()> {
		self.ensure_routable(path)?;
		if !self.inner.history.push(path)? {
			// Already the active entry: no change-route fires.
			self.enqueue(path.to_string());
		}
		Ok(())
	}

	fn enqueue(&self, path: String) {
		if self.inner.sender.unbounded_send(path).is_err() {
			tracing::trace!("router inbox closed");
		}
	}

	/// Tears the router down: unsubscribes from the history, destroys every
	/// mounted view and stops [`Router::run`].
	pub fn destroy(&self) {
		if self.inner.destroyed.replace(true) {
			return;
		}
		self.inner.subscription.borrow_mut().take();
		// Closing from the sender side also wakes a pending `run`.
		self.inner.sender.close_channel();
		self.inner.inbox.borrow_mut().close();

		let mut state = self.inner.state.borrow_mut();
		let entries = state.stack.drain();
		for entry in &entries {
			entry.view.destroy();
		}
		state.mount_point.clear();
		tracing::info!(views = entries.len(), "router destroyed");
	}

	/// Returns `true` once [`Router::destroy`] ran.
	pub fn is_destroyed(&self) -> bool {
		self.inner.destroyed.get()
	}

	/// Processes every queued path; returns how many were handled.
	pub async fn flush(&self) -> usize {
		let mut handled = 0;
		loop {
			let next = self.inner.inbox.borrow_mut().next().now_or_never();
			match next {
				Some(Some(path)) => {
					self.navigate(&path).await;
					handled += 1;
				}
				_ => return handled,
			}
		}
	}

	/// Processes queued paths as they arrive until the router is destroyed.
	pub async fn run(&self) {
		loop {
			let next =
				futures::future::poll_fn(|cx| self.inner.inbox.borrow_mut().poll_next_unpin(cx))
					.await;
			match next {
				Some(path) => {
					self.navigate(&path).await;
				}
				None => return,
			}
		}
	}

	/// Runs one transition to `path`.
	///
	/// Transition failures are reported through events, not as errors. The
	/// committed stack is left untouched by every outcome but
	/// [`NavigationOutcome::Updated`].
	pub async fn navigate(&self, path: &str) -> NavigationOutcome {
		let _transition = self.inner.transition.lock().await;
		if self.inner.destroyed.get() {
			return NavigationOutcome::Ignored;
		}

		let previous = self.current_path();
		self.set_phase(Phase::Resolving);
		let outcome = self.transition(previous, path).await;
		self.set_phase(Phase::Idle);

		tracing::debug!(path, ?outcome, "navigation finished");
		outcome
	}

	async fn transition(&self, previous: Option<String>, path: &str) -> NavigationOutcome {
		let before_each = self.inner.before_each.borrow().clone();
		if let Some(hook) = before_each {
			if let Some(outcome) = self.guard(&hook, previous.as_deref(), path).await {
				return outcome;
			}
		}

		let resolution = PathResolver::new(&**self.inner.table.borrow()).resolve(path);
		let target = match resolution {
			Resolution::Match(target) => target,
			Resolution::NotFound => {
				self.emit(RouterEvent::NotFound {
					path: path.to_string(),
				});
				return NavigationOutcome::NotFound;
			}
		};

		if let Some(hook) = target.record.before_enter.clone() {
			if let Some(outcome) = self.guard(&hook, previous.as_deref(), path).await {
				return outcome;
			}
		}
		if self.inner.destroyed.get() {
			return NavigationOutcome::Ignored;
		}

		self.set_phase(Phase::Reconciling);
		// The table borrow ends here; views may change routes while rendering.
		let chain = ancestor_chain(&**self.inner.table.borrow(), &target);
		let result = chain.map(|chain| {
			// Views run during reconciliation; they must not observe a borrowed state.
			let (mut stack, mut mount_point) = {
				let mut state = self.inner.state.borrow_mut();
				(
					std::mem::take(&mut state.stack),
					std::mem::take(&mut state.mount_point),
				)
			};
			let summary = Reconciler::new(&self.inner.injected).reconcile(
				&target,
				&chain,
				&mut stack,
				&mut mount_point,
			);
			let mut state = self.inner.state.borrow_mut();
			state.stack = stack;
			state.mount_point = mount_point;
			summary
		});

		match result {
			Ok(summary) => {
				self.inner.state.borrow_mut().current_path = Some(path.to_string());
				tracing::debug!(
					path,
					previous = ?previous,
					created = summary.created,
					updated = summary.updated,
					destroyed = summary.destroyed,
					"transition committed"
				);
				self.emit(RouterEvent::Update {
					path: path.to_string(),
					previous: previous.clone(),
					summary,
				});

				let after_each = self.inner.after_each.borrow().clone();
				if let Some(hook) = after_each {
					hook(previous.as_deref(), path);
				}
				NavigationOutcome::Updated(summary)
			}
			Err(err) => {
				tracing::error!(path, error = %err, "reconciliation failed");
				self.emit(RouterEvent::Error {
					path: path.to_string(),
					error: err.into(),
				});
				NavigationOutcome::Errored
			}
		}
	}

	async fn guard(
		&self,
		hook: &BeforeHook,
		from: Option<&str>,
		to: &str,
	) -> Option<NavigationOutcome> {
		match run_guard(hook, from, to).await {
			Decision::Proceed => None,
			Decision::Halt => {
				tracing::debug!(from, to, "transition halted by guard");
				self.emit(RouterEvent::TransitionHalted {
					from: from.map(str::to_string),
					to: to.to_string(),
				});
				Some(NavigationOutcome::Halted)
			}
			Decision::Abort(error) => {
				tracing::debug!(from, to, error = %error, "transition aborted by guard");
				self.emit(RouterEvent::Error {
					path: to.to_string(),
					error,
				});
				Some(NavigationOutcome::Errored)
			}
		}
	}

	fn emit(&self, event: RouterEvent) {
		let listeners = self.inner.listeners.borrow().matching(event.kind());
		tracing::trace!(event = event.name(), listeners = listeners.len(), "emit");
		for listener in listeners {
			listener(&event);
		}
	}

	fn set_phase(&self, phase: Phase) {
		self.inner.state.borrow_mut().phase = phase;
	}

	fn ensure_routable(&self, path: &str) -> RouterResult<()> {
		match PathResolver::new(&**self.inner.table.borrow()).resolve(path) {
			Resolution::Match(_) => Ok(()),
			Resolution::NotFound => Err(RouterError::NotFound(path.to_string())),
		}
	}

	/// Pushes `path` onto the history; the transition runs on the next
	/// [`Router::flush`] (or inside [`Router::run`]).
	///
	/// # Errors
	///
	/// [`RouterError::NotFound`] when `path` matches no route.
	pub fn push(&self, path: &str) -> RouterResult<()> {
		self.ensure_routable(path)?;
		self.inner.history.push(path)?;
		Ok(())
	}

	/// Replaces the active history entry with `path`.
	///
	/// # Errors
	///
	/// [`RouterError::NotFound`] when `path` matches no route.
	pub fn replace(&self, path: &str) -> RouterResult<()> {
		self.ensure_routable(path)?;
		self.inner.history.replace(path)?;
		Ok(())
	}

	/// Steps the history back.
	pub fn back(&self) -> bool {
		self.inner.history.back()
	}

	/// Steps the history forward.
	pub fn forward(&self) -> bool {
		self.inner.history.forward()
	}

	/// Sets the guard run before every transition, replacing any previous one.
	pub fn before_each<F>(&self, hook: F)
	where
		F: Fn(Option<&str>, &str, Next) + 'static,
	{
		*self.inner.before_each.borrow_mut() = Some(Rc::new(hook));
	}

	/// Sets the callback run after every committed transition, replacing any
	/// previous one.
	pub fn after_each<F>(&self, hook: F)
	where
		F: Fn(Option<&str>, &str) + 'static,
	{
		*self.inner.after_each.borrow_mut() = Some(Rc::new(hook));
	}

	/// Listens for events of `kind`.
	pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
	where
		F: Fn(&RouterEvent) + 'static,
	{
		self.inner
			.listeners
			.borrow_mut()
			.add(Some(kind), Rc::new(listener))
	}

	/// Listens for every event.
	pub fn on_any<F>(&self, listener: F) -> ListenerId
	where
		F: Fn(&RouterEvent) + 'static,
	{
		self.inner.listeners.borrow_mut().add(None, Rc::new(listener))
	}

	/// Removes a listener; returns `false` if it was not registered.
	pub fn off(&self, id: ListenerId) -> bool {
		self.inner.listeners.borrow_mut().remove(id)
	}

	/// Registers additional root-level routes.
	///
	/// Either every route is registered or, on error, none is.
	pub fn add_routes(&self, routes: Vec<RouteDefinition>) -> RouterResult<()> {
		let mut records = Vec::new();
		flatten(routes, None, &mut records)?;
		let mut table = self.inner.table.borrow_mut();
		let mut inserted: Vec<String> = Vec::with_capacity(records.len());
		for record in records {
			let full_path = record.full_path.clone();
			if let Err(err) = table.insert(record) {
				for path in inserted.iter().rev() {
					table.remove(path);
				}
				tracing::debug!(
					error = %err,
					rolled_back = inserted.len(),
					"route registration failed"
				);
				return Err(err);
			}
			inserted.push(full_path);
		}
		tracing::debug!(added = inserted.len(), routes = table.len(), "routes added");
		Ok(())
	}

	/// Unregisters the record keyed `full_path`. Mounted views are unaffected
	/// until the next transition.
	pub fn remove_route(&self, full_path: &str) -> bool {
		self.inner.table.borrow_mut().remove(full_path).is_some()
	}

	/// Returns the number of registered routes.
	pub fn route_count(&self) -> usize {
		self.inner.table.borrow().len()
	}

	/// Returns the active path.
	pub fn current_path(&self) -> Option<String> {
		self.inner.state.borrow().current_path.clone()
	}

	/// Returns the current phase.
	pub fn phase(&self) -> Phase {
		self.inner.state.borrow().phase
	}

	/// Returns a snapshot of the component stack.
	pub fn stack(&self) -> ComponentStack {
		self.inner.state.borrow().stack.clone()
	}

	/// Returns the stack's route keys, root first.
	pub fn stack_paths(&self) -> Vec<String> {
		self.inner
			.state
			.borrow()
			.stack
			.iter()
			.map(|entry| entry.path.clone())
			.collect()
	}

	/// Renders the mounted output.
	pub fn output(&self) -> String {
		self.inner.state.borrow().mount_point.output()
	}

	/// Returns the navigation source.
	pub fn history(&self) -> &History {
		&self.inner.history
	}
}
