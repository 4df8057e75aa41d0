//! Component stack reconciliation.
//!
//! Given a resolved target, its ancestor chain and the live
//! [`ComponentStack`], the reconciler decides which views survive, which are
//! destroyed and which are created:
//!
//! 1. [`ancestor_chain`] rebuilds the chain from the string-keyed parent
//!    links. A broken chain fails before anything is touched.
//! 2. If the stack already holds the target record, the stack is cut back to
//!    it and that view is updated in place.
//! 3. Otherwise the chain is climbed from the leaf. Each level wraps the level
//!    below in a [`Placeholder`] and the climb stops at the deepest ancestor
//!    still on the stack.
//! 4. That ancestor is updated with the placeholder-bearing input, which
//!    mounts and registers every level below it.
//! 5. With no surviving ancestor, the whole stack is destroyed and the
//!    top-most ancestor is created and mounted at the router's mount point.
//! 6. Registrations, collected leaf first, are appended root first.
//!
//! Stack entries are keyed by route pattern, so in steps 2 and 4 the
//! surviving parameterized ancestors are updated with the new parameters as
//! well.

use super::error::{RouterError, RouterResult};
use super::placeholder::{Placeholder, RenderContext, apply_input, render_with_nested};
use super::route::{RouteLookup, RouteMatch, RouteRecord, is_parameterized};
use super::stack::{ComponentStack, StackEntry};
use super::view::{MountPoint, ViewFactory, ViewInput};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Counts of what a reconciliation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
	/// Views created.
	pub created: usize,
	/// Views updated in place.
	pub updated: usize,
	/// Views destroyed.
	pub destroyed: usize,
}

/// Returns the target's records from leaf to root.
///
/// The chain is cloned out of `table`, so the table is free again by the time
/// any view runs.
///
/// # Errors
///
/// [`RouterError::MissingParent`] when a parent key is not registered and
/// [`RouterError::CyclicParent`] when the walk revisits a record.
pub fn ancestor_chain(
	table: &dyn RouteLookup,
	target: &RouteMatch,
) -> RouterResult<Vec<Rc<RouteRecord>>> {
	let mut seen = HashSet::new();
	seen.insert(target.record.full_path.clone());

	let mut chain = vec![Rc::clone(&target.record)];
	let mut parent = target.record.parent_path.clone();
	while let Some(key) = parent {
		let record = table.get(&key).ok_or_else(|| RouterError::MissingParent {
			path: chain
				.last()
				.map(|r| r.full_path.clone())
				.unwrap_or_default(),
			parent: key.clone(),
		})?;
		if !seen.insert(record.full_path.clone()) {
			return Err(RouterError::CyclicParent(record.full_path.clone()));
		}
		parent = record.parent_path.clone();
		chain.push(record);
	}
	Ok(chain)
}

/// Computes stack transitions.
pub struct Reconciler<'a> {
	injected: &'a Map<String, Value>,
}

impl<'a> Reconciler<'a> {
	/// Creates a reconciler handing `injected` to every view level.
	pub fn new(injected: &'a Map<String, Value>) -> Self {
		Self { injected }
	}

	/// Moves `stack` (and `mount_point`) to the state for `target`.
	///
	/// `chain` is the target's [`ancestor_chain`], leaf first.
	pub fn reconcile(
		&self,
		target: &RouteMatch,
		chain: &[Rc<RouteRecord>],
		stack: &mut ComponentStack,
		mount_point: &mut MountPoint,
	) -> ReconcileSummary {
		let mut summary = ReconcileSummary::default();

		if let Some(index) = stack.find_from_top(target.key()) {
			tracing::trace!(route = %target.key(), "target already mounted; updating in place");
			summary.destroyed = destroy(stack.truncate(index + 1));
			summary.updated = self.refresh_ancestors(stack, index, &target.params);
			let mut cx = RenderContext::new(None);
			if let Some(view) = stack.top().map(|entry| entry.view.clone()) {
				apply_input(&view, self.input(&target.params), &mut cx);
				summary.updated += 1;
			}
			summary.created = cx.len();
			stack.append_registrations(cx.into_registrations());
			return summary;
		}

		let mut pending = Level {
			path: target.key().to_string(),
			factory: Rc::clone(&target.record.factory),
			input: self.input(&target.params),
		};
		let mut reusable = None;
		for record in chain.iter().skip(1) {
			let child = std::mem::replace(
				&mut pending,
				Level {
					path: record.full_path.clone(),
					factory: Rc::clone(&record.factory),
					input: ViewInput::default(),
				},
			);
			pending.input = self
				.input(&target.params)
				.with_nested(Placeholder::new(child.path, child.factory, child.input));

			if let Some(index) = stack.find_from_top(&record.full_path) {
				reusable = Some(index);
				break;
			}
		}

		match reusable {
			Some(index) => {
				tracing::trace!(route = %pending.path, "reusing mounted ancestor");
				summary.destroyed = destroy(stack.truncate(index + 1));
				summary.updated = self.refresh_ancestors(stack, index, &target.params);
				let mut cx = RenderContext::new(Some(&pending.path));
				if let Some(view) = stack.top().map(|entry| entry.view.clone()) {
					apply_input(&view, pending.input, &mut cx);
					summary.updated += 1;
				}
				summary.created = cx.len();
				stack.append_registrations(cx.into_registrations());
			}
			None => {
				tracing::trace!(route = %pending.path, "no reusable ancestor; mounting fresh tree");
				summary.destroyed = destroy(stack.drain());
				let mut cx = RenderContext::new(None);
				let rendered = render_with_nested(&pending.factory, pending.input, &mut cx);
				match rendered.as_view() {
					Some(view) => {
						stack.push(StackEntry::new(pending.path, view.clone()));
						summary.created = 1;
					}
					None => tracing::warn!(
						route = %pending.path,
						"No view to retrieve; route level is not trackable"
					),
				}
				mount_point.replace(rendered);
				summary.created += cx.len();
				stack.append_registrations(cx.into_registrations());
			}
		}

		summary
	}

	/// Updates the parameterized entries among the first `count` with the new
	/// parameters. Their outlets are left alone.
	fn refresh_ancestors(
		&self,
		stack: &ComponentStack,
		count: usize,
		params: &HashMap<String, String>,
	) -> usize {
		let mut updated = 0;
		for entry in stack.iter().take(count) {
			if is_parameterized(&entry.path) {
				tracing::trace!(
					route = %entry.path,
					view = %entry.view.id(),
					"refreshing ancestor params"
				);
				entry.view.update(&self.input(params));
				updated += 1;
			}
		}
		updated
	}

	fn input(&self, params: &HashMap<String, String>) -> ViewInput {
		ViewInput::new(params.clone(), self.injected.clone())
	}
}

struct Level {
	path: String,
	factory: ViewFactory,
	input: ViewInput,
}

fn destroy(entries: Vec<StackEntry>) -> usize {
	for entry in &entries {
		tracing::trace!(route = %entry.path, view = %entry.view.id(), "destroying view");
		entry.view.destroy();
	}
	entries.len()
}
