use std::path::PathBuf;

use thiserror::Error;

use crate::node::Shape;

/// Errors that can occur while turning external JSON text into a [`Node`](crate::Node).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The provided JSON input was invalid.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Encountered a number that cannot be represented as an IEEE-754 f64.
    #[error("number {value} cannot be represented as f64")]
    NumberOutOfRange {
        /// The textual representation of the offending number.
        value: String,
    },
    /// Attempted to construct a [`Number`](crate::Number) that is not finite.
    #[error("non-finite number encountered: {value}")]
    NotFinite {
        /// The offending numeric value.
        value: f64,
    },
}

/// Errors emitted while building or loading addition rules.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A rule option carried a value outside of its accepted set.
    #[error("unexpected value ({value}) in a rule for {option}")]
    InvalidRule {
        /// Name of the offending option, as spelled in rules files.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
    /// The rules document was not valid JSON or did not match the rules layout.
    #[error("invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The rules file could not be read.
    #[error("could not read rules file {path}: {source}")]
    Io {
        /// Location of the rules file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Fatal conditions raised by the merge engine.
///
/// Any of these aborts the whole fold; the engine never returns a partially
/// merged document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    /// Documents in one sequence do not share a top-level shape.
    #[error("an inconsistency was found in data structure: document {index} is {found}, expected {expected}")]
    Inconsistent {
        /// Position of the first offending document.
        index: usize,
        /// Shape of the first document.
        expected: Shape,
        /// Shape of the offending document.
        found: Shape,
    },
    /// Two values at the same path have no defined combination.
    #[error("cannot combine {left} with {right} at {path}")]
    Unmergeable {
        /// Dotted path of the field.
        path: String,
        /// Type name of the accumulated value.
        left: &'static str,
        /// Type name of the incoming value.
        right: &'static str,
    },
    /// Combining two numbers left the range of finite doubles.
    #[error("numeric result at {path} is not finite")]
    NumericOverflow {
        /// Dotted path of the field.
        path: String,
    },
}

/// Errors produced while resolving, reading or writing documents on disk.
#[derive(Debug, Error)]
pub enum InputError {
    /// The glob pattern itself was malformed.
    #[error("invalid file pattern \"{pattern}\": {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Parser failure reported by `glob`.
        #[source]
        source: glob::PatternError,
    },
    /// A pattern resolved to no files.
    #[error("could not load file(s) having pattern \"{pattern}\"")]
    NoMatch {
        /// The pattern that matched nothing.
        pattern: String,
    },
    /// Reading or writing a file failed.
    #[error("{action} {path}: {source}")]
    Io {
        /// Short description of the failed operation.
        action: &'static str,
        /// File involved.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A document was not valid JSON.
    #[error("could not parse {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: ParseError,
    },
    /// A document's top-level shape differs from the first document's.
    #[error("an inconsistency was found in data structure: {path} is {found}, expected {expected}")]
    Inconsistent {
        /// File with the mismatching shape.
        path: PathBuf,
        /// Shape of the first document.
        expected: Shape,
        /// Shape of the offending document.
        found: Shape,
    },
    /// The merge itself failed.
    #[error(transparent)]
    Merge(#[from] MergeError),
}
