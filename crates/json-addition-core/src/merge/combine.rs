use tracing::warn;

use super::{arrays, object, strings, Combined, MergeContext};
use crate::{
    number::SIGNIFICANT_DIGITS, FieldPath, MergeError, Node, Number, RuleSet,
};

/// Combines the accumulated value of a field with the incoming one.
///
/// `existing` is `None` when the output has no such field yet.
pub(super) fn combine(
    existing: Option<&Node>,
    incoming: &Node,
    path: &FieldPath,
    rules: &RuleSet,
    ctx: &MergeContext<'_>,
) -> Result<Combined, MergeError> {
    let a = match existing {
        Some(Node::Null) | None => None,
        Some(value) => Some(value),
    };
    let (a, b) = match (a, incoming) {
        (None, _) | (Some(_), Node::Null) => {
            // Only the first subtrahend drops fields the minuend lacks.
            if rules.subtract() && ctx.document_index == 1 {
                return Ok(Combined::Skip);
            }
            return Ok(Combined::Value(a.unwrap_or(incoming).clone()));
        }
        (Some(a), b) => (a, b),
    };

    let value = match (a, b) {
        (Node::Number(x), Node::Number(y)) => Node::Number(combine_numbers(*x, *y, path, rules)?),
        (Node::String(x), Node::String(y)) => {
            Node::String(strings::combine_strings(x, y, rules.subtract()))
        }
        (Node::Bool(x), Node::Bool(y)) => {
            if rules.subtract() {
                let difference = f64::from(i8::from(*x) - i8::from(*y));
                Node::Number(Number::new(difference).map_err(|_| overflow(path))?)
            } else {
                Node::Bool(rules.binary_operation().apply(*x, *y))
            }
        }
        (Node::Array(x), Node::Array(y)) => Node::Array(arrays::combine_arrays(x, y, rules)),
        (Node::Object(x), Node::Object(_)) => {
            let mut output = x.clone();
            object::merge_fields(&mut output, b, path, rules, ctx)?;
            Node::Object(output)
        }
        (Node::Opaque(x), Node::Opaque(y))
        | (Node::String(x), Node::Opaque(y))
        | (Node::Opaque(x), Node::String(y)) => Node::String(strings::join(x, y)),
        (Node::Number(_), Node::String(_)) | (Node::String(_), Node::Number(_)) => {
            unmergeable(a, b, path, rules)?
        }
        (Node::String(_), _) | (_, Node::String(_)) => {
            Node::String(strings::join(&a.to_text(), &b.to_text()))
        }
        (a, b) => unmergeable(a, b, path, rules)?,
    };
    Ok(Combined::Value(value))
}

/// Degrades a pair with no defined combination to `"a, b"`, or fails.
fn unmergeable(a: &Node, b: &Node, path: &FieldPath, rules: &RuleSet) -> Result<Node, MergeError> {
    if !rules.ignore_errors() {
        return Err(MergeError::Unmergeable {
            path: path.as_str().to_string(),
            left: a.kind(),
            right: b.kind(),
        });
    }
    warn!(path = %path, left = a.kind(), right = b.kind(), "joining unmergeable values as text");
    Ok(Node::String(strings::join(&a.to_text(), &b.to_text())))
}

fn combine_numbers(
    a: Number,
    b: Number,
    path: &FieldPath,
    rules: &RuleSet,
) -> Result<Number, MergeError> {
    let raw = if rules.subtract() { a.get() - b.get() } else { a.get() + b.get() };
    let number = Number::new(raw).map_err(|_| overflow(path))?;
    if number.is_integral() {
        Ok(number)
    } else {
        Ok(number.round_significant(SIGNIFICANT_DIGITS))
    }
}

fn overflow(path: &FieldPath) -> MergeError {
    MergeError::NumericOverflow { path: path.as_str().to_string() }
}
