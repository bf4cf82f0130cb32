//! Path pattern compilation and parameter extraction.

use std::collections::HashMap;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::{Regex, RegexBuilder};

/// Characters allowed inside a `{param}` segment: the pchar set, plus `%`
/// so percent-encoded values pass through and get decoded on extraction.
const PARAM_GROUP: &str = "([0-9A-Za-z\\-._~!$&'()*+,;=:@%]+)";

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\\\{([A-Za-z][A-Za-z0-9]*)\\\}").unwrap());

/// A compiled route path.
///
/// Patterns are literal paths with `{name}` placeholders, eg
/// `/books/{bookId}/chapters/{chapterId}`.  Each placeholder matches one
/// path segment.  Matching is anchored to the whole canonical path and is
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::PathPattern;
///
/// let pattern = PathPattern::compile("/foo/{bar}").unwrap();
/// assert!(pattern.is_match("/foo/bizzbuzz"));
/// assert!(!pattern.is_match("/foo"));
/// assert!(!pattern.is_match("/foo/bar/baz"));
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
	regex: Regex,
	// Placeholder names by capture group index; index 0 is the whole match.
	group_names: Vec<Option<String>>,
}

impl PathPattern {
	/// Compiles a `{name}` pattern into an anchored, case-insensitive regex.
	pub fn compile(path: &str) -> Result<Self, regex::Error> {
		let escaped = regex::escape(path);
		let mut group_names: Vec<Option<String>> = vec![None];
		let replaced = PLACEHOLDER.replace_all(&escaped, |caps: &regex::Captures| {
			group_names.push(Some(caps[1].to_string()));
			PARAM_GROUP.to_string()
		});
		let regex = RegexBuilder::new(&format!("^{replaced}$"))
			.case_insensitive(true)
			.build()?;
		Ok(PathPattern { regex, group_names })
	}

	/// Wraps a caller-supplied regex.  Captures are exposed under their
	/// numeric index only.
	pub fn from_regex(regex: Regex) -> Self {
		PathPattern { regex, group_names: vec![None] }
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Merges captured parameters into `params` without overwriting any
	/// key already present.  Every capture is stored under its 1-based
	/// index (as a string); named placeholders are stored under their name
	/// as well.  Values are percent-decoded.
	pub fn extract_params(&self, path: &str, params: &mut HashMap<String, String>) {
		let Some(caps) = self.regex.captures(path) else {
			return;
		};
		for index in 1..caps.len() {
			let Some(capture) = caps.get(index) else {
				continue;
			};
			let value = percent_decode_str(capture.as_str()).decode_utf8_lossy().into_owned();
			if let Some(Some(name)) = self.group_names.get(index) {
				params.entry(name.clone()).or_insert_with(|| value.clone());
			}
			params.entry(index.to_string()).or_insert(value);
		}
	}
}
