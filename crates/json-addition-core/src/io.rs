//! File-backed document source and sink.
//!
//! These helpers resolve glob patterns, parse every matched file before any
//! merging starts, and write merged documents back as two-space indented
//! JSON.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{merge::merge_refs, InputError, Node, RulesConfig};

/// Expands each glob pattern into the files it matches, in pattern order.
///
/// Matches of one pattern are sorted by path. A pattern matching nothing is
/// an error.
pub fn expand_patterns<I, S>(patterns: I) -> Result<Vec<PathBuf>, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let entries = glob::glob(pattern)
            .map_err(|source| InputError::Pattern { pattern: pattern.to_string(), source })?;
        let mut matched: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
        if matched.is_empty() {
            return Err(InputError::NoMatch { pattern: pattern.to_string() });
        }
        matched.sort();
        debug!(pattern, files = matched.len(), "expanded input pattern");
        files.extend(matched);
    }
    Ok(files)
}

/// Reads and parses every file, checking that all share one top-level shape.
pub fn read_documents<P>(paths: &[P]) -> Result<Vec<Node>, InputError>
where
    P: AsRef<Path>,
{
    let mut documents: Vec<Node> = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let document = read_document(path)?;
        if let Some(first) = documents.first() {
            let (expected, found) = (first.shape(), document.shape());
            if expected != found {
                return Err(InputError::Inconsistent { path: path.to_path_buf(), expected, found });
            }
        }
        documents.push(document);
    }
    Ok(documents)
}

/// Reads and parses one JSON file.
pub fn read_document(path: &Path) -> Result<Node, InputError> {
    let text = fs::read_to_string(path).map_err(|source| InputError::Io {
        action: "failed to read",
        path: path.to_path_buf(),
        source,
    })?;
    Node::from_json_str(&text)
        .map_err(|source| InputError::Parse { path: path.to_path_buf(), source })
}

/// Reads the files and merges them in order.
///
/// ```
/// # use json_addition_core::{merge_files, Node, RulesConfig};
/// # let dir = tempfile::tempdir()?;
/// let first = dir.path().join("1.json");
/// let second = dir.path().join("2.json");
/// std::fs::write(&first, r#"{"hits": 2}"#)?;
/// std::fs::write(&second, r#"{"hits": 3}"#)?;
/// let merged = merge_files(&[first, second], &RulesConfig::default())?;
/// assert_eq!(merged, Node::from_json_str(r#"{"hits": 5}"#)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn merge_files<P>(paths: &[P], rules: &RulesConfig) -> Result<Node, InputError>
where
    P: AsRef<Path>,
{
    let documents = read_documents(paths)?;
    let refs: Vec<&Node> = documents.iter().collect();
    Ok(merge_refs(&refs, rules)?)
}

/// Writes `document` as JSON indented with two spaces.
pub fn write_document(path: &Path, document: &Node) -> Result<(), InputError> {
    let io_error = |source: std::io::Error| InputError::Io {
        action: "error in writing data to file",
        path: path.to_path_buf(),
        source,
    };
    let rendered = document.to_pretty_json().map_err(|err| io_error(err.into()))?;
    fs::write(path, rendered).map_err(io_error)?;
    info!(path = %path.display(), "output written");
    Ok(())
}
