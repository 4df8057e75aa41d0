//! URL rendering modes.

use serde::Deserialize;

/// How history entries are rendered into link targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
	/// Plain paths (`/users/42`).
	#[default]
	Path,
	/// Fragment paths (`#/users/42`).
	Hash,
}

impl HistoryMode {
	/// Returns the link target for `path` in this mode.
	pub fn href(&self, path: &str) -> String {
		match self {
			Self::Path => path.to_string(),
			Self::Hash => format!("#{}", path),
		}
	}
}
