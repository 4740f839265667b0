//! Suppression rule parsing, storage, and matching.
//!
//! This module handles:
//! - The line-oriented `category:pattern` configuration grammar
//! - Rule storage with insertion-order, first-match-wins querying
//! - The loading → locked lifecycle of a registry

mod parser;
pub mod registry;

pub use registry::{MAX_SUPPRESSION_TYPES, Suppression, SuppressionRegistry};
