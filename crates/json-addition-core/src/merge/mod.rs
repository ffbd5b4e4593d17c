//! The recursive merge engine.
//!
//! Documents fold left to right into an object that starts empty. For each
//! field, the rules in effect at its dotted path decide how the accumulated
//! value and the incoming value combine: numbers, quantity strings and
//! booleans add up (or subtract), arrays concatenate (or take a
//! difference), objects recurse, and mismatched types either fail the
//! whole merge or degrade to `"a, b"` text when `ignoreErrors` is set.

mod arrays;
mod combine;
mod object;
mod path;
mod strings;

pub use path::FieldPath;
pub use strings::SUBTRACTION_MARK;

use tracing::debug;

use crate::{node::Map, MergeError, Node, RulesConfig};

/// Result of combining one field.
#[derive(Debug)]
pub(crate) enum Combined {
    /// The value to store under the field.
    Value(Node),
    /// Leave the field as it is in the output (absent fields stay absent).
    Skip,
}

/// State shared by every field of one fold step.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MergeContext<'a> {
    /// Position of the incoming document in the sequence.
    pub(crate) document_index: usize,
    /// Path-specific overrides.
    pub(crate) rules: &'a RulesConfig,
}

/// Reusable front for the merge engine bound to one rules configuration.
///
/// ```
/// # use json_addition_core::{Merger, Node, RulesConfig};
/// let merger = Merger::new(RulesConfig::default());
/// let docs = [
///     Node::from_json_str(r#"{"visits": 3, "tags": ["a"]}"#)?,
///     Node::from_json_str(r#"{"visits": 4, "tags": ["b"]}"#)?,
/// ];
/// let merged = merger.merge(&docs)?;
/// assert_eq!(merged, Node::from_json_str(r#"{"visits": 7, "tags": ["a", "b"]}"#)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Merger {
    rules: RulesConfig,
}

impl Merger {
    /// Creates a merger using `rules`.
    #[must_use]
    pub fn new(rules: RulesConfig) -> Self {
        Self { rules }
    }

    /// Returns the rules configuration.
    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Merges `documents` in order. See [`merge_documents`].
    pub fn merge(&self, documents: &[Node]) -> Result<Node, MergeError> {
        merge_documents(documents, &self.rules)
    }
}

/// Folds a sequence of documents into one.
///
/// Every document must share the first one's [`Shape`](crate::Shape). The
/// result is always an object; an empty sequence yields `{}`.
///
/// ```
/// # use json_addition_core::{merge_documents, Node, RuleOverrides, RulesConfig};
/// let docs = [
///     Node::from_json_str(r#"{"e": 30, "f": "30 seconds"}"#)?,
///     Node::from_json_str(r#"{"e": 20, "f": "20 seconds"}"#)?,
/// ];
/// let rules = RulesConfig::new().with_global(RuleOverrides::default().with_subtract(true));
/// let merged = merge_documents(&docs, &rules)?;
/// assert_eq!(merged, Node::from_json_str(r#"{"e": 10, "f": "10 seconds"}"#)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge_documents(documents: &[Node], rules: &RulesConfig) -> Result<Node, MergeError> {
    let refs: Vec<&Node> = documents.iter().collect();
    merge_refs(&refs, rules)
}

/// Verifies that every document shares the first document's shape.
///
/// ```
/// # use json_addition_core::{check_shapes, MergeError, Node};
/// let docs = [Node::from_json_str("{}")?, Node::from_json_str("[]")?];
/// assert!(matches!(check_shapes(&docs), Err(MergeError::Inconsistent { index: 1, .. })));
/// # Ok::<(), json_addition_core::ParseError>(())
/// ```
pub fn check_shapes(documents: &[Node]) -> Result<(), MergeError> {
    let refs: Vec<&Node> = documents.iter().collect();
    check_ref_shapes(&refs)
}

pub(crate) fn merge_refs(documents: &[&Node], rules: &RulesConfig) -> Result<Node, MergeError> {
    check_ref_shapes(documents)?;
    let global = rules.effective_global();
    debug!(documents = documents.len(), rules = ?global, "merging documents");

    let mut output = Map::new();
    for (index, document) in documents.iter().enumerate() {
        debug!(index, shape = %document.shape(), "folding document");
        let ctx = MergeContext { document_index: index, rules };
        object::merge_fields(&mut output, document, &FieldPath::root(), &global, &ctx)?;
    }
    Ok(Node::Object(output))
}

fn check_ref_shapes(documents: &[&Node]) -> Result<(), MergeError> {
    let Some(first) = documents.first() else {
        return Ok(());
    };
    let expected = first.shape();
    for (index, document) in documents.iter().enumerate().skip(1) {
        let found = document.shape();
        if found != expected {
            return Err(MergeError::Inconsistent { index, expected, found });
        }
    }
    Ok(())
}

impl Node {
    /// Merges `other` into this document and returns the result.
    ///
    /// ```
    /// # use json_addition_core::{Node, RulesConfig};
    /// let lhs = Node::from_json_str(r#"{"a": true}"#)?;
    /// let rhs = Node::from_json_str(r#"{"b": true}"#)?;
    /// let merged = lhs.merge(&rhs, &RulesConfig::default())?;
    /// assert_eq!(merged, Node::from_json_str(r#"{"a": true, "b": true}"#)?);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn merge(&self, other: &Node, rules: &RulesConfig) -> Result<Node, MergeError> {
        merge_refs(&[self, other], rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleOverrides, Shape};

    fn docs(json: &[&str]) -> Vec<Node> {
        json.iter().map(|text| Node::from_json_str(text).unwrap()).collect()
    }

    fn subtracting() -> RulesConfig {
        RulesConfig::new().with_global(RuleOverrides::default().with_subtract(true))
    }

    #[test]
    fn empty_sequence_yields_empty_object() {
        let merged = merge_documents(&[], &RulesConfig::default()).unwrap();
        assert_eq!(merged, Node::empty_object());
    }

    #[test]
    fn three_documents_fold_left_to_right() {
        let merged =
            merge_documents(&docs(&["{\"a\":1}", "{\"a\":2}", "{\"a\":3}"]), &RulesConfig::default())
                .unwrap();
        assert_eq!(merged, Node::from_json_str("{\"a\":6}").unwrap());
    }

    #[test]
    fn shape_mismatch_aborts_before_merging() {
        let err = merge_documents(&docs(&["{\"a\":1}", "{\"a\":2}", "[1]"]), &RulesConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            MergeError::Inconsistent { index: 2, expected: Shape::Object, found: Shape::Array }
        );
    }

    #[test]
    fn subtraction_drops_fields_missing_from_minuend() {
        let merged = merge_documents(
            &docs(&["{\"a\":5,\"b\":{\"x\":1}}", "{\"a\":2,\"c\":9,\"b\":{\"x\":1,\"y\":2}}"]),
            &subtracting(),
        )
        .unwrap();
        assert_eq!(merged, Node::from_json_str("{\"a\":3,\"b\":{\"x\":0}}").unwrap());
    }

    #[test]
    fn subtraction_keeps_fields_introduced_after_the_first_subtrahend() {
        let merged = merge_documents(
            &docs(&["{\"a\":5}", "{\"a\":1,\"c\":7}", "{\"a\":1,\"b\":2,\"c\":null}"]),
            &subtracting(),
        )
        .unwrap();
        assert_eq!(merged, Node::from_json_str("{\"a\":3,\"b\":2}").unwrap());
    }

    #[test]
    fn subtraction_keeps_minuend_when_subtrahend_is_null() {
        let merged =
            merge_documents(&docs(&["{\"a\":5}", "{\"a\":null}"]), &subtracting()).unwrap();
        assert_eq!(merged, Node::from_json_str("{\"a\":5}").unwrap());
    }

    #[test]
    fn unmergeable_pair_aborts_the_fold() {
        let err = merge_documents(&docs(&["{\"a\":{\"b\":5}}", "{\"a\":{\"b\":false}}"]), &RulesConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            MergeError::Unmergeable { path: "a.b".to_string(), left: "number", right: "boolean" }
        );
    }

    #[test]
    fn path_override_enables_ignore_errors_for_one_field() {
        let rules = RulesConfig::new()
            .with_path("a.b", RuleOverrides::default().with_ignore_errors(true));
        let merged =
            merge_documents(&docs(&["{\"a\":{\"b\":5}}", "{\"a\":{\"b\":false}}"]), &rules).unwrap();
        assert_eq!(merged, Node::from_json_str("{\"a\":{\"b\":\"5, false\"}}").unwrap());
    }

    #[test]
    fn inputs_are_left_untouched() {
        let inputs = docs(&["{\"a\":{\"n\":1},\"l\":[1]}", "{\"a\":{\"n\":2},\"l\":[2]}"]);
        let before = inputs.clone();
        merge_documents(&inputs, &RulesConfig::default()).unwrap();
        assert_eq!(inputs, before);
    }

    #[test]
    fn merger_reuses_its_rules() {
        let merger = Merger::new(subtracting());
        assert!(merger.rules().effective_global().subtract());
        let merged = merger.merge(&docs(&["{\"n\":[1,2,3]}", "{\"n\":[2,3]}"])).unwrap();
        assert_eq!(merged, Node::from_json_str("{\"n\":[1]}").unwrap());
    }
}
