use tracing::trace;

use super::{combine::combine, Combined, MergeContext};
use crate::{node::Map, FieldPath, MergeError, Node, RuleSet};

/// Walks the fields of `incoming` and folds each one into `output`.
///
/// Arrays are walked as maps keyed by index strings; scalars carry no
/// fields. Keys new to `output` are appended in `incoming`'s order.
pub(super) fn merge_fields(
    output: &mut Map,
    incoming: &Node,
    prefix: &FieldPath,
    base: &RuleSet,
    ctx: &MergeContext<'_>,
) -> Result<(), MergeError> {
    match incoming {
        Node::Object(fields) => {
            for (key, value) in fields {
                merge_field(output, key, value, prefix, base, ctx)?;
            }
        }
        Node::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                merge_field(output, &index.to_string(), value, prefix, base, ctx)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn merge_field(
    output: &mut Map,
    key: &str,
    value: &Node,
    prefix: &FieldPath,
    base: &RuleSet,
    ctx: &MergeContext<'_>,
) -> Result<(), MergeError> {
    let path = prefix.child(key);
    let rules = ctx.rules.resolve(base, path.as_str());
    trace!(path = %path, document = ctx.document_index, ?rules, "combining field");
    match combine(output.get(key), value, &path, &rules, ctx)? {
        Combined::Value(combined) => {
            output.insert(key.to_string(), combined);
        }
        Combined::Skip => trace!(path = %path, "field skipped"),
    }
    Ok(())
}
