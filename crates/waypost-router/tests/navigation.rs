//! Integration tests for router navigation.
//!
//! These tests drive a [`Router`] through its [`History`] and verify:
//! - which views are created, updated and destroyed per transition
//! - the emitted lifecycle events
//! - guard semantics (`before_each`, `before_enter`, `after_each`)
//! - mount / destroy lifecycle

mod common;

use common::{Call, EventLog, Journal};
use rstest::{fixture, rstest};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use waypost_history::{History, RouterLink};
use waypost_router::{
	EventKind, NavigationOutcome, Next, Phase, Rendered, RouteDefinition, Router, RouterError,
	RouterEvent, RouterOptions,
};

// ============================================================
// Test Utilities
// ============================================================

struct Harness {
	router: Router,
	journal: Journal,
	events: EventLog,
}

impl Harness {
	async fn go(&self, path: &str) {
		self.router.push(path).unwrap();
		self.router.flush().await;
	}

	fn view_ids(&self) -> Vec<waypost_router::ViewId> {
		self.router.stack().iter().map(|e| e.view.id()).collect()
	}
}

/// Routes: `/a > /b > /c`, `/a > /d > /:id`, `/x`.
fn routes(journal: &Journal) -> Vec<RouteDefinition> {
	vec![
		journal.route("/a", "A").nested(vec![
			journal
				.route("/b", "B")
				.child(journal.route("/c", "C")),
			journal
				.route("/d", "D")
				.child(journal.route("/:id", "Item")),
		]),
		journal.route("/x", "X"),
	]
}

fn harness_with(options: impl FnOnce(Vec<RouteDefinition>) -> RouterOptions) -> Harness {
	let journal = Journal::new();
	let events = EventLog::new();
	let router = Router::new(options(routes(&journal)), History::new()).unwrap();
	router.on_any(events.listener());
	Harness {
		router,
		journal,
		events,
	}
}

#[fixture]
fn harness() -> Harness {
	harness_with(RouterOptions::new)
}

// ============================================================
// Reconciliation Scenarios
// ============================================================

/// Test Intent: deep link, step back to the parent, then return to the child
/// Integration Point: History + Router + Reconciler
#[rstest]
#[tokio::test]
async fn test_nested_round_trip_reuses_ancestors(harness: Harness) {
	harness.router.mount().await.unwrap();

	harness.go("/a/b/c").await;
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b", "/a/b/c"]);
	assert_eq!(harness.router.output(), "<A><B><C></C></B></A>");
	assert_eq!(
		harness.journal.take(),
		vec![Call::Created("A"), Call::Created("B"), Call::Created("C")]
	);
	let ids = harness.view_ids();

	harness.go("/a/b").await;
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b"]);
	assert_eq!(harness.router.output(), "<A><B></B></A>");
	assert_eq!(
		harness.journal.take(),
		vec![Call::Destroyed("C"), Call::Updated("B")]
	);
	assert_eq!(harness.view_ids(), ids[..2]);

	harness.go("/a/b/c").await;
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b", "/a/b/c"]);
	assert_eq!(
		harness.journal.take(),
		vec![Call::Updated("B"), Call::Created("C")]
	);
	let again = harness.view_ids();
	assert_eq!(again[..2], ids[..2]);
	assert_ne!(again[2], ids[2]);
}

/// Test Intent: navigating child -> parent destroys only the child
#[rstest]
#[tokio::test]
async fn test_child_to_parent_destroys_only_child(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/d/7").await;
	harness.journal.take();

	harness.go("/a/d").await;

	let calls = harness.journal.take();
	assert_eq!(calls, vec![Call::Destroyed("Item"), Call::Updated("D")]);
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/d"]);
}

/// Test Intent: switching between sibling subtrees keeps the shared root
#[rstest]
#[tokio::test]
async fn test_sibling_switch_keeps_root(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/b/c").await;
	harness.journal.take();

	harness.go("/a/d").await;

	assert_eq!(
		harness.journal.take(),
		vec![
			Call::Destroyed("C"),
			Call::Destroyed("B"),
			Call::Updated("A"),
			Call::Created("D"),
		]
	);
	assert_eq!(harness.router.output(), "<A><D></D></A>");
}

/// Test Intent: moving to a disjoint tree destroys the old chain before
/// creating the new one
#[rstest]
#[tokio::test]
async fn test_disjoint_tree_destroys_before_creating(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/b").await;
	harness.journal.take();

	harness.go("/x").await;

	assert_eq!(
		harness.journal.take(),
		vec![Call::Destroyed("B"), Call::Destroyed("A"), Call::Created("X")]
	);
	assert_eq!(harness.router.output(), "<X></X>");
}

/// Test Intent: a parameterized nested route yields one entry per level and
/// hands the extracted value to the deepest view
#[rstest]
#[tokio::test]
async fn test_param_route_depth_and_input(harness: Harness) {
	harness.router.mount().await.unwrap();

	harness.go("/a/d/42").await;

	assert_eq!(harness.router.stack().len(), 3);
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/d", "/a/d/:id"]);
	let input = harness.journal.input("Item").unwrap();
	assert_eq!(input.param("id"), Some("42"));

	// Same record, new params: updated in place.
	harness.journal.take();
	harness.go("/a/d/43").await;
	assert_eq!(harness.journal.take(), vec![Call::Updated("Item")]);
	assert_eq!(harness.journal.input("Item").unwrap().param("id"), Some("43"));
}

/// Test Intent: wildcard route nested under a parameterized one
#[rstest]
#[tokio::test]
async fn test_wildcard_nested_route() {
	let journal = Journal::new();
	let routes = vec![
		journal.route("/users", "Users").child(
			journal
				.route("/:id", "User")
				.child(journal.route("/files/**", "Files")),
		),
	];
	let router = Router::new(RouterOptions::new(routes), History::new()).unwrap();
	router.mount().await.unwrap();

	router.push("/users/42/files/docs/a.txt").unwrap();
	router.flush().await;

	assert_eq!(
		router.stack_paths(),
		vec!["/users", "/users/:id", "/users/:id/files/**"]
	);
	let input = journal.input("Files").unwrap();
	assert_eq!(input.param("**"), Some("docs/a.txt"));
	assert_eq!(input.param("id"), Some("42"));
	assert_eq!(
		journal.input("User").unwrap().nested_path(),
		Some("/users/:id/files/**")
	);
}

/// Test Intent: injected data reaches every level
#[rstest]
#[tokio::test]
async fn test_injected_input_reaches_every_level() {
	let mut data = Map::new();
	data.insert("title".to_string(), Value::from("Dashboard"));
	let harness = harness_with(|routes| RouterOptions::new(routes).injected_input(data));
	harness.router.mount().await.unwrap();

	harness.go("/a/b/c").await;

	for name in ["A", "B", "C"] {
		let input = harness.journal.input(name).unwrap();
		assert_eq!(input.data().get("title"), Some(&Value::from("Dashboard")));
	}
}

/// Test Intent: a route rendering plain markup goes untracked but still
/// renders and tracks the routes nested below it
#[rstest]
#[tokio::test]
async fn test_markup_route_hosts_nested_routes() {
	let journal = Journal::new();
	let routes = vec![
		RouteDefinition::new("/docs", |_| {
			Rendered::markup("<article><router-outlet></router-outlet></article>")
		})
		.child(journal.route("/intro", "Intro"))
		.child(journal.route("/usage", "Usage")),
	];
	let router = Router::new(RouterOptions::new(routes), History::new()).unwrap();
	router.mount().await.unwrap();

	router.push("/docs/intro").unwrap();
	assert_eq!(router.flush().await, 1);

	assert_eq!(router.stack_paths(), vec!["/docs/intro"]);
	assert_eq!(router.output(), "<article><Intro></Intro></article>");
	assert_eq!(journal.take(), vec![Call::Created("Intro")]);

	router.push("/docs/usage").unwrap();
	router.flush().await;

	assert_eq!(router.stack_paths(), vec!["/docs/usage"]);
	assert_eq!(router.output(), "<article><Usage></Usage></article>");
	assert_eq!(
		journal.take(),
		vec![Call::Destroyed("Intro"), Call::Created("Usage")]
	);
}

/// Test Intent: changing an ancestor's parameter updates that ancestor,
/// not just the leaf
#[rstest]
#[tokio::test]
async fn test_param_change_updates_parameterized_ancestor() {
	let journal = Journal::new();
	let routes = vec![journal.route("/u/:id", "User").child(journal.route("/tab", "Tab"))];
	let router = Router::new(RouterOptions::new(routes), History::new()).unwrap();
	router.mount().await.unwrap();

	router.push("/u/1/tab").unwrap();
	router.flush().await;
	let ids: Vec<_> = router.stack().iter().map(|e| e.view.id()).collect();
	journal.take();

	router.push("/u/2/tab").unwrap();
	router.flush().await;

	assert_eq!(
		journal.take(),
		vec![Call::Updated("User"), Call::Updated("Tab")]
	);
	assert_eq!(journal.input("User").unwrap().param("id"), Some("2"));
	assert_eq!(journal.input("Tab").unwrap().param("id"), Some("2"));
	assert_eq!(
		router.stack().iter().map(|e| e.view.id()).collect::<Vec<_>>(),
		ids
	);
}

/// Test Intent: a view may register routes while it is being rendered
#[rstest]
#[tokio::test]
async fn test_view_can_add_routes_while_rendering() {
	let handle: Rc<RefCell<Option<Router>>> = Rc::new(RefCell::new(None));
	let slot = Rc::clone(&handle);
	let routes = vec![RouteDefinition::new("/setup", move |_| {
		if let Some(router) = slot.borrow().as_ref() {
			router
				.add_routes(vec![RouteDefinition::new("/late", |_| Rendered::markup("late"))])
				.unwrap();
		}
		Rendered::markup("setup")
	})];
	let router = Router::new(RouterOptions::new(routes), History::new()).unwrap();
	*handle.borrow_mut() = Some(router.clone());
	router.mount().await.unwrap();

	router.push("/setup").unwrap();
	router.flush().await;
	assert_eq!(router.route_count(), 2);

	router.push("/late").unwrap();
	router.flush().await;
	assert_eq!(router.output(), "late");

	handle.borrow_mut().take();
}

// ============================================================
// Events
// ============================================================

/// Test Intent: pushing the active path twice fires no second update
#[rstest]
#[tokio::test]
async fn test_repeated_push_is_noop(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/b").await;
	let ids = harness.view_ids();
	harness.journal.take();

	harness.router.push("/a/b").unwrap();
	assert_eq!(harness.router.flush().await, 0);

	assert!(harness.journal.calls().is_empty());
	assert_eq!(harness.view_ids(), ids);
	assert_eq!(harness.events.count_prefix("update"), 1);
}

/// Test Intent: an unregistered path leaves everything as it was
#[rstest]
#[tokio::test]
async fn test_not_found_leaves_stack_untouched(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/b").await;
	let output = harness.router.output();
	let ids = harness.view_ids();
	harness.journal.take();

	// The router refuses to push it, but the history itself accepts it.
	assert_eq!(
		harness.router.push("/nope"),
		Err(RouterError::NotFound("/nope".to_string()))
	);
	harness.router.history().push("/nope").unwrap();
	harness.router.flush().await;

	assert_eq!(harness.events.events().last().map(String::as_str), Some("not-found /nope"));
	assert_eq!(harness.router.output(), output);
	assert_eq!(harness.view_ids(), ids);
	assert!(harness.journal.calls().is_empty());
	assert_eq!(harness.router.current_path().as_deref(), Some("/a/b"));
}

/// Test Intent: `update` carries the previous path and a summary
#[rstest]
#[tokio::test]
async fn test_update_event_payload(harness: Harness) {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	harness.router.on(EventKind::Update, move |event| {
		if let RouterEvent::Update {
			path,
			previous,
			summary,
		} = event
		{
			sink.borrow_mut()
				.push((path.clone(), previous.clone(), summary.created));
		}
	});
	harness.router.mount().await.unwrap();

	harness.go("/a/b").await;
	harness.go("/a/b/c").await;

	assert_eq!(
		*seen.borrow(),
		vec![
			("/a/b".to_string(), None, 2),
			("/a/b/c".to_string(), Some("/a/b".to_string()), 1),
		]
	);
}

// ============================================================
// Guards
// ============================================================

#[derive(Debug, thiserror::Error)]
#[error("access denied ({code})")]
struct Denied {
	code: u16,
}

/// Test Intent: a halting `before_each` emits `transition-halted` and mounts
/// nothing new
#[rstest]
#[tokio::test]
async fn test_before_each_halt(harness: Harness) {
	harness.router.before_each(|_, to, next| {
		if to == "/x" {
			next.halt();
		} else {
			next.proceed();
		}
	});
	harness.router.mount().await.unwrap();
	harness.go("/a").await;
	let output = harness.router.output();
	harness.journal.take();

	harness.go("/x").await;

	assert_eq!(
		harness.events.events().last().map(String::as_str),
		Some("transition-halted /x")
	);
	assert_eq!(harness.router.output(), output);
	assert!(harness.journal.calls().is_empty());
	assert_eq!(harness.router.current_path().as_deref(), Some("/a"));
}

/// Test Intent: an aborting `before_each` emits `error` with the exact value
#[rstest]
#[tokio::test]
async fn test_before_each_abort_carries_value(harness: Harness) {
	let codes = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&codes);
	harness.router.on(EventKind::Error, move |event| {
		if let RouterEvent::Error { error, .. } = event {
			if let Some(denied) = error.downcast_ref::<Denied>() {
				sink.borrow_mut().push(denied.code);
			}
		}
	});
	harness
		.router
		.before_each(|_, _, next| next.abort(Denied { code: 403 }));
	harness.router.mount().await.unwrap();

	harness.go("/a/b").await;

	assert_eq!(*codes.borrow(), vec![403]);
	assert_eq!(harness.events.events(), vec!["error /a/b access denied (403)"]);
	assert!(harness.router.stack().is_empty());
	assert_eq!(harness.router.output(), "");
	assert!(harness.journal.calls().is_empty());
}

/// Test Intent: a guard that drops its continuation halts the transition
#[rstest]
#[tokio::test]
async fn test_dropped_continuation_halts(harness: Harness) {
	harness.router.before_each(|_, _, next| drop(next));
	harness.router.mount().await.unwrap();

	harness.router.push("/x").unwrap();
	harness.router.flush().await;

	assert_eq!(harness.events.events(), vec!["transition-halted /x"]);
	assert!(harness.router.stack().is_empty());
}

/// Test Intent: the last registered `before_each` wins
#[rstest]
#[tokio::test]
async fn test_before_each_is_single_slot(harness: Harness) {
	harness.router.before_each(|_, _, next| next.halt());
	harness.router.before_each(|_, _, next| next.proceed());
	harness.router.mount().await.unwrap();

	harness.go("/x").await;

	assert_eq!(harness.events.events(), vec!["update /x"]);
}

/// Test Intent: a guard resolved later suspends the transition until then
#[rstest]
#[tokio::test]
async fn test_async_guard_suspends_transition(harness: Harness) {
	let parked: Rc<RefCell<Option<Next>>> = Rc::new(RefCell::new(None));
	let slot = Rc::clone(&parked);
	harness
		.router
		.before_each(move |_, _, next| *slot.borrow_mut() = Some(next));
	harness.router.mount().await.unwrap();
	harness.router.push("/a/b").unwrap();

	let router = harness.router.clone();
	let (handled, ()) = futures::join!(harness.router.flush(), async {
		tokio::task::yield_now().await;
		assert_eq!(router.phase(), Phase::Resolving);
		assert!(router.stack().is_empty());

		let next = parked.borrow_mut().take().expect("guard is waiting");
		next.proceed();
	});

	assert_eq!(handled, 1);
	assert_eq!(harness.router.phase(), Phase::Idle);
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b"]);
}

/// Test Intent: a second navigation waits for the first to finish
#[rstest]
#[tokio::test]
async fn test_navigations_do_not_overlap(harness: Harness) {
	let parked: Rc<RefCell<Option<Next>>> = Rc::new(RefCell::new(None));
	let slot = Rc::clone(&parked);
	harness.router.before_each(move |_, to, next| {
		if to == "/a/b" {
			*slot.borrow_mut() = Some(next);
		} else {
			next.proceed();
		}
	});

	let (first, second, ()) = futures::join!(
		harness.router.navigate("/a/b"),
		harness.router.navigate("/x"),
		async {
			tokio::task::yield_now().await;
			assert!(harness.router.stack().is_empty());
			let next = parked.borrow_mut().take().expect("first guard is waiting");
			next.proceed();
		}
	);

	assert!(matches!(first, NavigationOutcome::Updated(_)));
	assert!(matches!(second, NavigationOutcome::Updated(_)));
	assert_eq!(harness.events.events(), vec!["update /a/b", "update /x"]);
	assert_eq!(harness.router.stack_paths(), vec!["/x"]);
}

/// Test Intent: `before_enter` only runs for its own route
#[rstest]
#[tokio::test]
async fn test_before_enter_guards_its_route() {
	let journal = Journal::new();
	let routes = vec![
		journal
			.route("/public", "Public"),
		journal
			.route("/admin", "Admin")
			.with_before_enter(|_, _, next| next.abort(Denied { code: 401 })),
	];
	let events = EventLog::new();
	let router = Router::new(RouterOptions::new(routes), History::new()).unwrap();
	router.on_any(events.listener());
	router.mount().await.unwrap();

	router.push("/public").unwrap();
	router.push("/admin").unwrap();
	router.flush().await;

	assert_eq!(
		events.events(),
		vec!["update /public", "error /admin access denied (401)"]
	);
	assert_eq!(router.stack_paths(), vec!["/public"]);
}

/// Test Intent: `after_each` runs after commit with (previous, next)
#[rstest]
#[tokio::test]
async fn test_after_each_sees_previous_and_next(harness: Harness) {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	let router = harness.router.clone();
	harness.router.after_each(move |from, to| {
		// The new stack is already committed.
		assert_eq!(router.current_path().as_deref(), Some(to));
		sink.borrow_mut()
			.push((from.map(str::to_string), to.to_string()));
	});
	harness.router.before_each(|_, to, next| {
		if to == "/x" {
			next.halt();
		} else {
			next.proceed();
		}
	});
	harness.router.mount().await.unwrap();

	harness.go("/a").await;
	harness.go("/x").await;
	harness.go("/a/b").await;

	assert_eq!(
		*seen.borrow(),
		vec![
			(None, "/a".to_string()),
			(Some("/a".to_string()), "/a/b".to_string()),
		]
	);
}

// ============================================================
// Lifecycle
// ============================================================

/// Test Intent: the initial path is pushed and rendered on mount
#[rstest]
#[tokio::test]
async fn test_initial_path_rendered_on_mount() {
	let harness = harness_with(|routes| RouterOptions::new(routes).initial_path("/a/b"));

	harness.router.mount().await.unwrap();

	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b"]);
	assert_eq!(
		harness.router.history().current_path().as_deref(),
		Some("/a/b")
	);
}

/// Test Intent: an unresolvable initial path fails mount
#[rstest]
#[tokio::test]
async fn test_unresolvable_initial_path_fails_mount() {
	let harness = harness_with(|routes| RouterOptions::new(routes).initial_path("/missing"));

	let err = harness.router.mount().await.unwrap_err();

	assert_eq!(
		err,
		RouterError::InitialRoute {
			path: "/missing".to_string(),
			source: Box::new(RouterError::NotFound("/missing".to_string())),
		}
	);
	assert_eq!(harness.router.history().listener_count(), 0);
}

/// Test Intent: destroy unsubscribes and releases every view
#[rstest]
#[tokio::test]
async fn test_destroy_unsubscribes_and_releases_views(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/b/c").await;
	assert_eq!(harness.router.history().listener_count(), 1);

	harness.router.destroy();

	assert_eq!(harness.router.history().listener_count(), 0);
	assert_eq!(harness.journal.live(), 0);
	assert_eq!(harness.router.output(), "");

	let history = harness.router.history().clone();
	history.push("/x").unwrap();
	assert_eq!(harness.router.flush().await, 0);
	assert_eq!(harness.journal.count(&Call::Created("X")), 0);
}

/// Test Intent: back and forward replay history entries
#[rstest]
#[tokio::test]
async fn test_back_and_forward(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a/b/c").await;
	harness.go("/x").await;

	assert!(harness.router.back());
	harness.router.flush().await;
	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b", "/a/b/c"]);

	assert!(harness.router.forward());
	harness.router.flush().await;
	assert_eq!(harness.router.stack_paths(), vec!["/x"]);
}

/// Test Intent: replace swaps the active entry and transitions
#[rstest]
#[tokio::test]
async fn test_replace(harness: Harness) {
	harness.router.mount().await.unwrap();
	harness.go("/a").await;

	harness.router.replace("/x").unwrap();
	harness.router.flush().await;

	assert_eq!(harness.router.history().entries(), vec!["/x"]);
	assert_eq!(harness.router.current_path().as_deref(), Some("/x"));
}

/// Test Intent: clicking a link drives the router
#[rstest]
#[tokio::test]
async fn test_router_link_click(harness: Harness) {
	harness.router.mount().await.unwrap();
	let link = RouterLink::new(harness.router.history(), "/a/d/9")
		.unwrap()
		.content("Item 9");

	link.click().unwrap();
	harness.router.flush().await;

	assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/d", "/a/d/:id"]);
	assert_eq!(link.render(), "<a href=\"/a/d/9\" data-link=\"true\">Item 9</a>");
}

/// Test Intent: `run` processes paths as they arrive and stops on destroy
#[rstest]
#[tokio::test]
async fn test_run_until_destroyed(harness: Harness) {
	harness.router.mount().await.unwrap();

	futures::join!(harness.router.run(), async {
		harness.router.push("/x").unwrap();
		tokio::task::yield_now().await;
		assert_eq!(harness.router.current_path().as_deref(), Some("/x"));

		harness.router.push("/a/b").unwrap();
		tokio::task::yield_now().await;
		assert_eq!(harness.router.stack_paths(), vec!["/a", "/a/b"]);

		harness.router.destroy();
	});

	assert!(harness.router.is_destroyed());
}
