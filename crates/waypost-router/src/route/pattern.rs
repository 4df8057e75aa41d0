//! Route path patterns.

use crate::error::{RouterError, RouterResult};
use std::collections::HashMap;

/// Maximum allowed length for a route pattern in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Parameter name bound by a bare `**` segment.
pub const WILDCARD_PARAM: &str = "**";

/// Matching class of a pattern, in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PatternKind {
	/// Only literal segments.
	Static,
	/// At least one single-segment parameter, no wildcard.
	Param,
	/// Ends in a wildcard.
	Wildcard,
}

/// A compiled route pattern.
///
/// Syntax:
/// - `/users` - literal segments
/// - `/users/:id` or `/users/{id}` - captures one segment
/// - `/files/**` or `/files/{rest:*}` - captures the rest of the path,
///   separators included (`**` binds the parameter name `"**"`)
///
/// A wildcard must be the final segment and captures at least one character.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	pattern: String,
	regex: regex::Regex,
	param_names: Vec<String>,
	kind: PatternKind,
}

impl RoutePattern {
	/// Compiles `pattern`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] if the pattern does not start
	/// with `/`, exceeds the length or segment limits, has an empty or
	/// unterminated parameter, or places a wildcard before the last segment.
	pub fn new(pattern: &str) -> RouterResult<Self> {
		let invalid = |reason: String| RouterError::InvalidPattern {
			pattern: pattern.to_string(),
			reason,
		};

		if !pattern.starts_with('/') {
			return Err(invalid("pattern must start with '/'".to_string()));
		}
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"pattern length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}
		let segments: Vec<&str> = pattern[1..].split('/').collect();
		if segments.len() > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"pattern has {} path segments, exceeding maximum of {}",
				segments.len(),
				MAX_PATH_SEGMENTS
			)));
		}

		let mut param_names = Vec::new();
		let mut has_wildcard = false;
		let mut compiled = Vec::with_capacity(segments.len());
		for (index, segment) in segments.iter().enumerate() {
			if has_wildcard {
				return Err(invalid("wildcard must be the final segment".to_string()));
			}
			let (regex, wildcard) = compile_segment(segment, &mut param_names).map_err(&invalid)?;
			has_wildcard = wildcard;
			if wildcard && index + 1 != segments.len() {
				return Err(invalid("wildcard must be the final segment".to_string()));
			}
			compiled.push(regex);
		}

		let regex = regex::RegexBuilder::new(&format!("^/{}$", compiled.join("/")))
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| invalid(format!("failed to compile pattern regex: {}", e)))?;

		let kind = if has_wildcard {
			PatternKind::Wildcard
		} else if param_names.is_empty() {
			PatternKind::Static
		} else {
			PatternKind::Param
		};

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
			kind,
		})
	}

	/// Returns the pattern as written.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns the matching class.
	pub fn kind(&self) -> PatternKind {
		self.kind
	}

	/// Returns `true` when the pattern has no parameters.
	pub fn is_static(&self) -> bool {
		self.kind == PatternKind::Static
	}

	/// Matches `path`, returning the extracted parameters.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let caps = self.regex.captures(path)?;
		Some(
			self.param_names
				.iter()
				.enumerate()
				.filter_map(|(i, name)| {
					caps.get(i + 1)
						.map(|m| (name.clone(), m.as_str().to_string()))
				})
				.collect(),
		)
	}
}

/// Returns `true` when `pattern` captures anything, without compiling it.
pub fn is_parameterized(pattern: &str) -> bool {
	pattern
		.split('/')
		.any(|segment| {
			segment.starts_with(':') || segment == WILDCARD_PARAM || segment.contains('{')
		})
}

/// Compiles one segment; returns its regex and whether it is a wildcard.
fn compile_segment(segment: &str, names: &mut Vec<String>) -> Result<(String, bool), String> {
	if segment == WILDCARD_PARAM {
		names.push(WILDCARD_PARAM.to_string());
		return Ok(("(.+)".to_string(), true));
	}
	if let Some(name) = segment.strip_prefix(':') {
		if name.is_empty() {
			return Err("empty parameter name".to_string());
		}
		names.push(name.to_string());
		return Ok(("([^/]+)".to_string(), false));
	}

	let mut regex = String::new();
	let mut wildcard = false;
	let mut rest = segment;
	while let Some(open) = rest.find('{') {
		regex.push_str(&regex::escape(&rest[..open]));
		let close = rest[open..]
			.find('}')
			.map(|offset| open + offset)
			.ok_or_else(|| "unterminated '{' in segment".to_string())?;
		let inner = &rest[open + 1..close];
		let (name, is_wildcard) = match inner.strip_suffix(":*") {
			Some(name) => (name, true),
			None => (inner, false),
		};
		if name.is_empty() {
			return Err("empty parameter name".to_string());
		}
		names.push(name.to_string());
		if is_wildcard {
			regex.push_str("(.+)");
			wildcard = true;
		} else {
			regex.push_str("([^/]+)");
		}
		rest = &rest[close + 1..];
		if wildcard && !rest.is_empty() {
			return Err("wildcard must end the pattern".to_string());
		}
	}
	regex.push_str(&regex::escape(rest));
	Ok((regex, wildcard))
}
