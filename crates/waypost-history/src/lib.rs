//! Navigation source for the waypost router.
//!
//! This crate provides the in-memory history the router observes:
//!
//! - [`History`]: an entry stack with a cursor that emits `change-route`
//!   notifications on `push`, `replace`, `back` and `forward`
//! - [`HistoryMode`]: path or hash URL rendering
//! - [`RouterLink`]: an anchor helper that pushes its path when clicked
//!
//! ## Example
//!
//! ```
//! use waypost_history::History;
//!
//! let history = History::new();
//! let _subscription = history.subscribe(|path| println!("navigated to {}", path));
//!
//! history.push("/users").unwrap();
//! assert_eq!(history.current_path().as_deref(), Some("/users"));
//! ```

mod error;
mod history;
mod link;
mod mode;

pub use error::{HistoryError, HistoryResult};
pub use history::{History, Subscription};
pub use link::RouterLink;
pub use mode::HistoryMode;
