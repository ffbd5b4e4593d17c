use std::collections::HashMap;

use crate::{hash::HashCode, Node, RuleSet};

/// Combines two arrays, then applies the `sort` and `unique` rules.
pub(super) fn combine_arrays(a: &[Node], b: &[Node], rules: &RuleSet) -> Vec<Node> {
    let mut combined = if rules.subtract() {
        difference(a, b)
    } else {
        let mut joined = Vec::with_capacity(a.len() + b.len());
        joined.extend_from_slice(a);
        joined.extend_from_slice(b);
        joined
    };
    if rules.sort() {
        sort_by_text(&mut combined);
    }
    if rules.unique() {
        combined = unique(combined);
    }
    combined
}

/// Stable sort on the textual form of each element, compared as UTF-16 code
/// units, so `[10, 9, 1]` sorts to `[1, 10, 9]`.
pub(super) fn sort_by_text(values: &mut [Node]) {
    values.sort_by_cached_key(|value| value.to_text().encode_utf16().collect::<Vec<u16>>());
}

/// Elements of `a` that are not equal to any element of `b`, in `a`'s order.
pub(super) fn difference(a: &[Node], b: &[Node]) -> Vec<Node> {
    let index = ValueIndex::from_values(b);
    a.iter().filter(|value| !index.contains(value)).cloned().collect()
}

/// Drops every element equal to an earlier one.
pub(super) fn unique(values: Vec<Node>) -> Vec<Node> {
    let mut seen = ValueIndex::default();
    let mut kept: Vec<Node> = Vec::with_capacity(values.len());
    for value in values {
        let hash = value.hash_code();
        if seen.contains_hashed(hash, &value, &kept) {
            continue;
        }
        seen.positions.entry(hash).or_default().push(kept.len());
        kept.push(value);
    }
    kept
}

/// Hash buckets of positions into a backing slice, confirmed by `==`.
#[derive(Default)]
struct ValueIndex<'a> {
    values: &'a [Node],
    positions: HashMap<HashCode, Vec<usize>>,
}

impl<'a> ValueIndex<'a> {
    fn from_values(values: &'a [Node]) -> Self {
        let mut positions: HashMap<HashCode, Vec<usize>> = HashMap::new();
        for (position, value) in values.iter().enumerate() {
            positions.entry(value.hash_code()).or_default().push(position);
        }
        Self { values, positions }
    }

    fn contains(&self, value: &Node) -> bool {
        self.contains_hashed(value.hash_code(), value, self.values)
    }

    fn contains_hashed(&self, hash: HashCode, value: &Node, backing: &[Node]) -> bool {
        self.positions
            .get(&hash)
            .is_some_and(|bucket| bucket.iter().any(|position| backing[*position] == *value))
    }
}
