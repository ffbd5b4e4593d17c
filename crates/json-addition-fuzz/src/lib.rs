//! Fuzzing harnesses for the `json-addition` merge engine.
//!
//! Each public function accepts raw bytes, builds documents and rules from
//! them and runs the engine while swallowing recoverable errors. They are
//! shared by the `cargo fuzz` targets and the smoke tests below.
//!
//! # Examples
//!
//! ```
//! json_addition_fuzz::fuzz_parse(b"{\"a\":1}");
//! json_addition_fuzz::fuzz_merge(&[1, 2, 3, 4]);
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use json_addition_core::{
    merge_documents, BinaryOperation, MergeError, Node, RuleOverrides, RulesConfig,
};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const MAX_DEPTH: usize = 4;
const MAX_DOCUMENTS: u8 = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 6;
const MAX_STRING_LEN: u8 = 12;
const KEYS: &[&str] = &["a", "b", "c", "0", "1", "n"];

/// Feeds arbitrary bytes through JSON parsing and rules parsing.
///
/// ```
/// json_addition_fuzz::fuzz_parse(b"{\"globalAdditionRules\":{}}");
/// ```
pub fn fuzz_parse(data: &[u8]) {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(node) = Node::from_json_str(text) {
            let _ = node.to_pretty_json();
        }
        let _ = RulesConfig::from_json_str(text);
    }
}

/// Merges randomly generated documents under randomly generated rules.
///
/// Documents draw keys from a small pool so fields collide often. Panics
/// if a merge under `ignoreErrors` reports an unmergeable pair, or if a
/// shape-consistent sequence is rejected as inconsistent.
///
/// ```
/// json_addition_fuzz::fuzz_merge(b"merge fuzz");
/// ```
pub fn fuzz_merge(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Ok(rules) = random_rules(&mut unstructured) else {
        return;
    };
    let Ok(count) = unstructured.int_in_range::<u8>(0..=MAX_DOCUMENTS) else {
        return;
    };
    let mut documents = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let Ok(value) = random_object(&mut unstructured, 0) else {
            return;
        };
        let Ok(node) = Node::from_json_value(value) else {
            return;
        };
        documents.push(node);
    }

    let ignoring = rules.effective_global().ignore_errors() && rules.specific().is_empty();
    match merge_documents(&documents, &rules) {
        Ok(merged) => {
            let _ = merged.to_pretty_json();
        }
        Err(MergeError::Unmergeable { path, .. }) if ignoring => {
            panic!("ignoreErrors still rejected {path}");
        }
        Err(MergeError::Inconsistent { .. }) => panic!("object documents reported inconsistent"),
        Err(_) => {}
    }
}

fn random_rules(unstructured: &mut Unstructured<'_>) -> Result<RulesConfig, arbitrary::Error> {
    let mut rules = RulesConfig::new().with_global(random_overrides(unstructured)?);
    let paths = unstructured.int_in_range::<u8>(0..=2)?;
    for _ in 0..paths {
        let key = unstructured.choose(KEYS)?;
        rules = rules.with_path(*key, random_overrides(unstructured)?);
    }
    Ok(rules)
}

fn random_overrides(unstructured: &mut Unstructured<'_>) -> Result<RuleOverrides, arbitrary::Error> {
    let operation = if unstructured.arbitrary()? { BinaryOperation::And } else { BinaryOperation::Or };
    Ok(RuleOverrides {
        binary_operation: Some(operation),
        subtract: unstructured.arbitrary()?,
        ignore_errors: unstructured.arbitrary()?,
        sort: unstructured.arbitrary()?,
        unique: unstructured.arbitrary()?,
    })
}

fn random_object(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
    let mut map = JsonMap::new();
    for _ in 0..len {
        let key = unstructured.choose(KEYS)?;
        let value = json_value_from_unstructured(unstructured, depth + 1)?;
        map.insert((*key).to_string(), value);
    }
    Ok(JsonValue::Object(map))
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    match unstructured.int_in_range::<u8>(0..=5)? {
        0..=3 => json_leaf(unstructured),
        4 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => random_object(unstructured, depth),
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    match unstructured.int_in_range::<u8>(0..=4)? {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        3 => {
            let amount = unstructured.int_in_range::<u16>(0..=999)?;
            Ok(JsonValue::String(format!("{amount} seconds")))
        }
        _ => Ok(JsonValue::String(random_string(unstructured)?)),
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        let int = unstructured.arbitrary::<i32>()?;
        Ok(JsonNumber::from(int))
    } else {
        let numerator = f64::from(unstructured.arbitrary::<i32>()?);
        let denominator = f64::from(unstructured.int_in_range::<u16>(1..=1024)?);
        JsonNumber::from_f64(numerator / denominator).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

fn random_string(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_STRING_LEN)?);
    let mut string = String::with_capacity(len);
    for _ in 0..len {
        let byte = unstructured.int_in_range::<u8>(0x20..=0x7e)?;
        string.push(char::from(byte));
    }
    Ok(string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_harness_handles_utf8() {
        fuzz_parse(br"{}");
        fuzz_parse(b"\xff\xfe");
    }

    #[test]
    fn merge_harness_runs() {
        fuzz_merge(b"merge");
        fuzz_merge(&[0xff; 64]);
    }

    #[test]
    fn merge_harness_survives_many_seeds() {
        for seed in 0u8..=255 {
            let data: Vec<u8> = (0..128u16).map(|i| seed.wrapping_mul(31).wrapping_add(i as u8)).collect();
            fuzz_merge(&data);
        }
    }
}
