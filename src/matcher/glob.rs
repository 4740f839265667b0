use crate::matcher::PatternMatcher;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Glob-style matcher: `*` matches zero or more characters, everything else
/// is literal, and the whole subject must match.
///
/// Patterns are translated to anchored regexes and cached per pattern
/// string, since the registry re-presents the same patterns on every scan.
/// The cache uses `RefCell`; the matcher is not `Sync`, matching the
/// registry's single-threaded design.
#[derive(Debug, Default)]
pub struct GlobMatcher {
	cache: RefCell<HashMap<String, Regex>>,
}

impl GlobMatcher {
	pub fn new() -> Self {
		Self::default()
	}
}

impl PatternMatcher for GlobMatcher {
	fn is_match(&self, pattern: &str, subject: &str) -> bool {
		let mut cache = self.cache.borrow_mut();
		let regex = match cache.entry(pattern.to_string()) {
			Entry::Occupied(entry) => entry.into_mut(),
			Entry::Vacant(entry) => match Regex::new(&glob_to_regex(pattern)) {
				Ok(regex) => entry.insert(regex),
				// Patterns beyond the regex size limit compare literally.
				Err(_) => return pattern == subject,
			},
		};
		regex.is_match(subject)
	}
}

/// Translate a glob pattern into anchored regex source.
fn glob_to_regex(pattern: &str) -> String {
	let mut source = String::with_capacity(pattern.len() + 8);
	source.push('^');
	for (i, literal) in pattern.split('*').enumerate() {
		if i > 0 {
			source.push_str(".*");
		}
		source.push_str(&regex::escape(literal));
	}
	source.push('$');
	source
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_literal_pattern_is_exact() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("ExactSymbolName", "ExactSymbolName"));
		assert!(!matcher.is_match("ExactSymbolName", "ExactSymbolNameSuffix"));
		assert!(!matcher.is_match("ExactSymbolName", "xExactSymbolName"));
	}

	#[test]
	fn test_star_matches_any_run() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("*libfoo*", "libfoo_init"));
		assert!(matcher.is_match("*libfoo*", "in_libfoo_too"));
		assert!(matcher.is_match("lib*init", "libfoo_init"));
		assert!(!matcher.is_match("*libfoo*", "libbar_init"));
	}

	#[test]
	fn test_star_matches_empty_run() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("*", ""));
		assert!(matcher.is_match("foo*", "foo"));
		assert!(matcher.is_match("*foo", "foo"));
	}

	#[test]
	fn test_empty_pattern_matches_only_empty_subject() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("", ""));
		assert!(!matcher.is_match("", "anything"));
	}

	#[test]
	fn test_regex_metacharacters_are_literal() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("a.b", "a.b"));
		assert!(!matcher.is_match("a.b", "axb"));
		assert!(matcher.is_match("fn(x)+*", "fn(x)+anything"));
	}

	#[test]
	fn test_consecutive_stars() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("a**b", "ab"));
		assert!(matcher.is_match("a**b", "a_anything_b"));
	}

	#[test]
	fn test_repeated_patterns_reuse_the_cache() {
		let matcher = GlobMatcher::new();
		assert!(matcher.is_match("*foo*", "a_foo_b"));
		assert!(matcher.is_match("*foo*", "foo"));
		assert_eq!(matcher.cache.borrow().len(), 1);
	}

	#[test]
	fn test_glob_to_regex_translation() {
		assert_eq!(glob_to_regex("*foo*"), "^.*foo.*$");
		assert_eq!(glob_to_regex("a.b"), "^a\\.b$");
		assert_eq!(glob_to_regex(""), "^$");
	}
}
