//! Core engine of `json-addition`: add or subtract JSON documents field by field.
//!
//! Documents are parsed into [`Node`] values and folded left to right by
//! [`merge_documents`]. A [`RulesConfig`] decides, per dotted field path,
//! whether values add up or subtract, how booleans combine, whether arrays
//! are sorted and deduplicated, and whether mismatched types abort the merge
//! or degrade to text.
//!
//! ```
//! use json_addition_core::{merge_documents, Node, RuleOverrides, RulesConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let docs = [
//!         Node::from_json_str(r#"{"uptime": "30 seconds", "ok": true, "ids": [2, 1]}"#)?,
//!         Node::from_json_str(r#"{"uptime": "20 seconds", "ok": false, "ids": [1, 3]}"#)?,
//!     ];
//!     let rules = RulesConfig::new()
//!         .with_path("ids", RuleOverrides::default().with_sort(true).with_unique(true));
//!
//!     let merged = merge_documents(&docs, &rules)?;
//!     assert_eq!(
//!         merged,
//!         Node::from_json_str(r#"{"uptime": "50 seconds", "ok": true, "ids": [1, 2, 3]}"#)?
//!     );
//!     println!("{}", merged.to_pretty_json()?);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod hash;
pub mod io;
pub mod merge;
mod node;
mod number;
pub mod rules;

pub use error::{InputError, MergeError, ParseError, RulesError};
pub use hash::HashCode;
pub use io::{expand_patterns, merge_files, read_documents, write_document};
pub use merge::{check_shapes, merge_documents, FieldPath, Merger, SUBTRACTION_MARK};
pub use node::{Map, Node, Shape};
pub use number::{Number, SIGNIFICANT_DIGITS};
pub use rules::{resolve, BinaryOperation, RuleOverrides, RuleSet, RulesConfig};

/// Returns the semantic version of the `json-addition-core` crate.
///
/// ```
/// assert!(!json_addition_core::version().is_empty());
/// ```
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
