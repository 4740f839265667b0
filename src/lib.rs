//! Muffle - suppression rule registry and checker for diagnostic tools.
//!
//! This library provides the core functionality for muffle, including:
//! - Parsing the line-oriented `category:pattern` suppression format
//! - Rule storage with first-match-wins querying and hit counting
//! - Glob-style pattern matching (`*` wildcard) behind an injectable trait
//! - Bounded suppression-file reading
//!
//! # Example
//!
//! ```
//! use muffle_cli::suppressions::SuppressionRegistry;
//!
//! let types = ["race", "leak"];
//! let mut registry = SuppressionRegistry::new("mytool", &types);
//! registry.load("# known-noisy library\nrace:*libfoo*\n");
//!
//! if let Some(rule) = registry.find_match("libfoo_init", "race") {
//!     println!("suppressed by {}:{}", rule.category, rule.pattern);
//! }
//! ```

pub mod error;
pub mod matcher;
pub mod reader;
pub mod suppressions;

pub use error::{MuffleError, Result};
