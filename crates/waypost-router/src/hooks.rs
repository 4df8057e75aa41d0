//! Navigation guards.
//!
//! A guard receives the current path, the next path and a single-shot
//! [`Next`] continuation. It may resolve the continuation immediately or hold
//! on to it and resolve it later; the router awaits the decision before it
//! touches the component stack.

use futures::channel::oneshot;
use std::rc::Rc;

/// Guard run before a transition (`before_each` or a route's `before_enter`).
pub type BeforeHook = Rc<dyn Fn(Option<&str>, &str, Next)>;

/// Callback run after a committed transition with `(previous, next)`.
pub type AfterHook = Rc<dyn Fn(Option<&str>, &str)>;

/// Outcome chosen by a guard.
#[derive(Debug)]
pub enum Decision {
	/// Continue the transition.
	Proceed,
	/// Stop the transition and emit `transition-halted`.
	Halt,
	/// Stop the transition and emit `error` with this value.
	Abort(anyhow::Error),
}

impl From<bool> for Decision {
	fn from(proceed: bool) -> Self {
		if proceed { Self::Proceed } else { Self::Halt }
	}
}

/// Single-shot continuation handed to a guard.
///
/// Dropping it without resolving counts as a halt.
#[must_use = "a guard must resolve its continuation, dropping it halts the transition"]
#[derive(Debug)]
pub struct Next {
	sender: oneshot::Sender<Decision>,
}

impl Next {
	pub(crate) fn channel() -> (Self, oneshot::Receiver<Decision>) {
		let (sender, receiver) = oneshot::channel();
		(Self { sender }, receiver)
	}

	/// Lets the transition continue.
	pub fn proceed(self) {
		self.resolve(Decision::Proceed);
	}

	/// Halts the transition.
	pub fn halt(self) {
		self.resolve(Decision::Halt);
	}

	/// Aborts the transition with `error`.
	pub fn abort<E>(self, error: E)
	where
		E: Into<anyhow::Error>,
	{
		self.resolve(Decision::Abort(error.into()));
	}

	/// Resolves with an explicit decision.
	pub fn resolve(self, decision: Decision) {
		// The receiver is gone only when the router was torn down mid-wait.
		let _ = self.sender.send(decision);
	}
}

/// Runs `hook` and waits for its decision.
pub(crate) async fn run_guard(hook: &BeforeHook, from: Option<&str>, to: &str) -> Decision {
	let (next, decision) = Next::channel();
	hook(from, to, next);
	match decision.await {
		Ok(decision) => decision,
		Err(oneshot::Canceled) => {
			tracing::warn!(to, "guard dropped its continuation; halting transition");
			Decision::Halt
		}
	}
}
