use crate::matcher::{GlobMatcher, PatternMatcher};
use crate::reader;
use crate::suppressions::parser::{ParsedLine, parse_line};
use serde::Serialize;
use std::path::Path;

/// Maximum number of recognized suppression categories per registry.
pub const MAX_SUPPRESSION_TYPES: usize = 16;

/// A single suppression rule: ignore findings of `category` whose subject
/// string matches `pattern`.
#[derive(Debug, Serialize)]
pub struct Suppression<'t> {
	/// Category name. A reference into the registry's category table, never
	/// an owned copy.
	pub category: &'t str,

	/// Glob pattern the subject string is tested against.
	pub pattern: String,

	/// Number of queries this rule has matched. Every successful match
	/// increments it; used to report used vs. unused suppressions.
	pub hit_count: u32,

	/// Reserved for callers (e.g. accumulated suppressed bytes). Never
	/// touched by the registry itself.
	pub weight: u64,
}

/// Loading/query phase of a registry. `Locked` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Loading,
	Locked,
}

/// Registry of suppression rules for one diagnostic tool.
///
/// A registry recognizes a fixed set of category names supplied at
/// construction. Rules are loaded from line-oriented configuration text
/// while the registry is in its loading phase; the first match query
/// permanently locks it against further loading. Queries scan rules in
/// insertion order and the first matching rule wins.
pub struct SuppressionRegistry<'t> {
	tool: &'t str,
	types: &'t [&'t str],
	has_type: [bool; MAX_SUPPRESSION_TYPES],
	rules: Vec<Suppression<'t>>,
	phase: Phase,
	matcher: Box<dyn PatternMatcher>,
}

impl<'t> SuppressionRegistry<'t> {
	/// Create a registry recognizing the given category names, matching
	/// patterns with the default [`GlobMatcher`].
	///
	/// `tool` brands fatal diagnostics. The category list is borrowed, not
	/// copied; it must be non-empty and hold at most
	/// [`MAX_SUPPRESSION_TYPES`] entries.
	pub fn new(tool: &'t str, types: &'t [&'t str]) -> Self {
		Self::with_matcher(tool, types, Box::new(GlobMatcher::new()))
	}

	/// Create a registry with an injected pattern matcher.
	pub fn with_matcher(
		tool: &'t str,
		types: &'t [&'t str],
		matcher: Box<dyn PatternMatcher>,
	) -> Self {
		assert!(!types.is_empty(), "{tool}: no suppression types given");
		assert!(
			types.len() <= MAX_SUPPRESSION_TYPES,
			"{tool}: too many suppression types ({} > {MAX_SUPPRESSION_TYPES})",
			types.len()
		);
		SuppressionRegistry {
			tool,
			types,
			has_type: [false; MAX_SUPPRESSION_TYPES],
			rules: Vec::new(),
			phase: Phase::Loading,
			matcher,
		}
	}

	/// Load suppression rules from configuration text.
	///
	/// May be called any number of times before the first query; rules
	/// accumulate in order across calls. Panics if the registry is locked,
	/// or on a non-comment line with no recognized `category:` prefix.
	pub fn load(&mut self, text: &str) {
		assert!(
			self.phase == Phase::Loading,
			"{}: cannot load suppressions after matching has started",
			self.tool
		);
		for raw in text.split('\n') {
			match parse_line(raw, self.types) {
				ParsedLine::Ignored => {}
				ParsedLine::Rule { type_index, pattern } => {
					self.rules.push(Suppression {
						category: self.types[type_index],
						pattern: pattern.to_string(),
						hit_count: 0,
						weight: 0,
					});
					self.has_type[type_index] = true;
				}
				ParsedLine::Unrecognized => panic!(
					"{}: failed to parse suppressions: '{}'",
					self.tool,
					raw.trim()
				),
			}
		}
	}

	/// Load suppression rules from a file.
	///
	/// An empty path is a no-op. A file that is missing, unreadable, not
	/// UTF-8, or larger than [`reader::MAX_SUPPRESSIONS_FILE_LEN`] is fatal.
	pub fn load_file(&mut self, path: &Path) {
		if path.as_os_str().is_empty() {
			return;
		}
		match reader::read_to_string_bounded(path, reader::MAX_SUPPRESSIONS_FILE_LEN) {
			Ok(text) => self.load(&text),
			Err(err) => panic!(
				"{}: failed to read suppressions file '{}': {err}",
				self.tool,
				path.display()
			),
		}
	}

	/// Query whether some rule of `category` suppresses `subject`.
	///
	/// The first call locks the registry against further loading, whether or
	/// not it matches. Rules are scanned in insertion order; the first rule
	/// of the queried category whose pattern matches wins, gets its
	/// `hit_count` incremented, and is returned mutably so the caller can
	/// inspect it or update `weight`.
	pub fn find_match(&mut self, subject: &str, category: &str) -> Option<&mut Suppression<'t>> {
		self.phase = Phase::Locked;
		if !self.has_category(category) {
			return None;
		}
		let index = self.rules.iter().position(|rule| {
			rule.category == category && self.matcher.is_match(&rule.pattern, subject)
		})?;
		let rule = &mut self.rules[index];
		rule.hit_count += 1;
		Some(rule)
	}

	/// Number of loaded rules.
	pub fn count(&self) -> usize {
		self.rules.len()
	}

	/// True when no rules are loaded.
	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// True once the first query has been issued.
	pub fn is_locked(&self) -> bool {
		self.phase == Phase::Locked
	}

	/// True iff `name` is a recognized category with at least one rule.
	pub fn has_category(&self, name: &str) -> bool {
		match self.types.iter().position(|ty| *ty == name) {
			Some(index) => self.has_type[index],
			None => false,
		}
	}

	/// Rule at `index` in insertion order. Panics when out of range.
	pub fn rule_at(&self, index: usize) -> &Suppression<'t> {
		assert!(
			index < self.rules.len(),
			"{}: suppression index {index} out of range ({} rules)",
			self.tool,
			self.rules.len()
		);
		&self.rules[index]
	}

	/// All rules in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Suppression<'t>> {
		self.rules.iter()
	}

	/// Rules that have matched at least one query, in insertion order.
	pub fn collect_matched(&self) -> Vec<&Suppression<'t>> {
		self.rules.iter().filter(|rule| rule.hit_count > 0).collect()
	}
}
