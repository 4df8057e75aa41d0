//! Router link for declarative navigation.

use super::error::{HistoryError, HistoryResult};
use super::history::History;

/// A link that navigates through the shared [`History`] instead of reloading.
///
/// # Example
///
/// ```
/// use waypost_history::{History, HistoryMode, RouterLink};
///
/// let history = History::with_mode(HistoryMode::Hash);
/// let link = RouterLink::new(&history, "/users/42").unwrap().content("View User");
///
/// assert_eq!(link.render(), "<a href=\"#/users/42\" data-link=\"true\">View User</a>");
/// ```
#[derive(Debug, Clone)]
pub struct RouterLink {
	history: History,
	path: String,
	content: String,
	class: Option<String>,
	replace: bool,
}

impl RouterLink {
	/// Creates a link to `path`.
	///
	/// Fails with [`HistoryError::InvalidArgument`] when `path` is empty.
	pub fn new(history: &History, path: impl Into<String>) -> HistoryResult<Self> {
		let path = path.into();
		if path.is_empty() {
			return Err(HistoryError::InvalidArgument(
				"Path must be provided to router-link".to_string(),
			));
		}

		Ok(Self {
			history: history.clone(),
			path,
			content: String::new(),
			class: None,
			replace: false,
		})
	}

	/// Sets the link body.
	pub fn content(mut self, content: impl Into<String>) -> Self {
		self.content = content.into();
		self
	}

	/// Sets the CSS class.
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.class = Some(class.into());
		self
	}

	/// Sets whether clicking replaces the active entry instead of pushing.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Returns the destination path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the link target for the history's mode.
	pub fn href(&self) -> String {
		self.history.href(&self.path)
	}

	/// Renders the anchor markup.
	pub fn render(&self) -> String {
		let mut html = format!("<a href=\"{}\"", self.href());
		if let Some(ref class) = self.class {
			html.push_str(&format!(" class=\"{}\"", class));
		}
		html.push_str(" data-link=\"true\"");
		if self.replace {
			html.push_str(" data-replace=\"true\"");
		}
		html.push('>');
		html.push_str(&self.content);
		html.push_str("</a>");
		html
	}

	/// Handles a click: navigates to the link's path.
	pub fn click(&self) -> HistoryResult<()> {
		if self.replace {
			self.history.replace(self.path.clone())
		} else {
			self.history.push(self.path.clone()).map(|_| ())
		}
	}
}
