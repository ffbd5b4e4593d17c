//! Benchmark corpora for the `json-addition` merge engine.
//!
//! Corpora are generated deterministically so benchmarks and doctests run
//! without fixture files. Each corpus describes how many documents to fold
//! and how wide and deep each document is.
//!
//! # Examples
//!
//! ```
//! use json_addition_benches::available_corpora;
//! use json_addition_core::RulesConfig;
//!
//! let corpus = &available_corpora()[0];
//! let dataset = corpus.load().expect("corpus loads");
//! let merged = dataset.merge(&RulesConfig::default()).expect("corpus merges");
//! assert!(matches!(merged, json_addition_core::Node::Object(_)));
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use json_addition_core::{merge_documents, MergeError, Node, ParseError, RulesConfig};
use serde_json::{json, Map, Value};

/// Parameters of one generated corpus.
#[derive(Clone, Copy, Debug)]
pub struct Corpus {
    name: &'static str,
    documents: usize,
    width: usize,
    depth: usize,
}

const CORPORA: &[Corpus] = &[
    Corpus { name: "flat-metrics", documents: 8, width: 64, depth: 1 },
    Corpus { name: "nested-config", documents: 4, width: 6, depth: 4 },
    Corpus { name: "many-small", documents: 256, width: 4, depth: 2 },
];

/// Returns every registered corpus.
#[must_use]
pub fn available_corpora() -> &'static [Corpus] {
    CORPORA
}

impl Corpus {
    /// Name used as the benchmark id.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of documents folded per merge.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// Generates the documents of this corpus.
    pub fn load(&self) -> Result<Dataset, ParseError> {
        let mut documents = Vec::with_capacity(self.documents);
        for seed in 0..self.documents {
            documents.push(Node::from_json_value(self.object(seed, self.depth))?);
        }
        Ok(Dataset { documents })
    }

    fn object(&self, seed: usize, depth: usize) -> Value {
        let mut map = Map::new();
        for field in 0..self.width {
            let value = if depth > 1 && field % 3 == 0 {
                self.object(seed + field, depth - 1)
            } else {
                leaf(seed, field)
            };
            map.insert(format!("field_{field}"), value);
        }
        Value::Object(map)
    }
}

fn leaf(seed: usize, field: usize) -> Value {
    match field % 5 {
        0 => json!(seed * 7 + field),
        1 => json!((seed as f64) * 0.1 + 0.2),
        2 => json!(format!("{} seconds", seed + field)),
        3 => json!(seed % 2 == 0),
        _ => json!([seed % 4, field % 4, (seed + field) % 4]),
    }
}

/// A loaded corpus ready to be merged.
#[derive(Clone, Debug)]
pub struct Dataset {
    documents: Vec<Node>,
}

impl Dataset {
    /// The generated documents.
    #[must_use]
    pub fn documents(&self) -> &[Node] {
        &self.documents
    }

    /// Folds all documents with `rules`.
    pub fn merge(&self, rules: &RulesConfig) -> Result<Node, MergeError> {
        merge_documents(&self.documents, rules)
    }
}
