//! Addition rules and their path-scoped resolution.
//!
//! A [`RulesConfig`] holds partial global overrides plus partial overrides
//! keyed by exact dotted field path. The engine starts every merge from
//! [`RuleSet::default`], overlays the global overrides once, then overlays
//! the entry for each field's path as it walks the documents.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::RulesError;

/// How two booleans combine when not subtracting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BinaryOperation {
    /// Logical or (default).
    #[default]
    Or,
    /// Logical and.
    And,
}

impl BinaryOperation {
    /// Applies the operation to two booleans.
    #[must_use]
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            Self::Or => a || b,
            Self::And => a && b,
        }
    }
}

impl FromStr for BinaryOperation {
    type Err = RulesError;

    /// Parses `"OR"` or `"AND"`.
    ///
    /// ```
    /// # use json_addition_core::BinaryOperation;
    /// assert_eq!("AND".parse::<BinaryOperation>().unwrap(), BinaryOperation::And);
    /// assert!("XOR".parse::<BinaryOperation>().is_err());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OR" => Ok(Self::Or),
            "AND" => Ok(Self::And),
            other => Err(RulesError::InvalidRule {
                option: "binaryOperation",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for BinaryOperation {
    type Error = RulesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BinaryOperation> for String {
    fn from(value: BinaryOperation) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Or => f.write_str("OR"),
            Self::And => f.write_str("AND"),
        }
    }
}

/// The complete rule set in effect for one field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    binary_operation: BinaryOperation,
    subtract: bool,
    ignore_errors: bool,
    sort: bool,
    unique: bool,
}

impl RuleSet {
    /// Boolean combination used when not subtracting.
    #[must_use]
    pub fn binary_operation(&self) -> BinaryOperation {
        self.binary_operation
    }

    /// Whether values combine as a difference instead of a sum.
    ///
    /// ```
    /// # use json_addition_core::RuleSet;
    /// assert!(!RuleSet::default().subtract());
    /// assert!(RuleSet::default().with_subtract(true).subtract());
    /// ```
    #[must_use]
    pub fn subtract(&self) -> bool {
        self.subtract
    }

    /// Whether unmergeable pairs degrade to `"a, b"` instead of failing.
    #[must_use]
    pub fn ignore_errors(&self) -> bool {
        self.ignore_errors
    }

    /// Whether combined arrays are sorted.
    #[must_use]
    pub fn sort(&self) -> bool {
        self.sort
    }

    /// Whether combined arrays are deduplicated.
    #[must_use]
    pub fn unique(&self) -> bool {
        self.unique
    }

    /// Sets the boolean combination.
    #[must_use]
    pub fn with_binary_operation(mut self, operation: BinaryOperation) -> Self {
        self.binary_operation = operation;
        self
    }

    /// Enables or disables subtraction.
    #[must_use]
    pub fn with_subtract(mut self, enabled: bool) -> Self {
        self.subtract = enabled;
        self
    }

    /// Enables or disables the degraded string fallback.
    #[must_use]
    pub fn with_ignore_errors(mut self, enabled: bool) -> Self {
        self.ignore_errors = enabled;
        self
    }

    /// Enables or disables array sorting.
    #[must_use]
    pub fn with_sort(mut self, enabled: bool) -> Self {
        self.sort = enabled;
        self
    }

    /// Enables or disables array deduplication.
    #[must_use]
    pub fn with_unique(mut self, enabled: bool) -> Self {
        self.unique = enabled;
        self
    }

    /// Returns a new rule set with every defined override applied.
    ///
    /// ```
    /// # use json_addition_core::{RuleOverrides, RuleSet};
    /// let base = RuleSet::default().with_sort(true);
    /// let rules = base.overlay(&RuleOverrides::default().with_subtract(true));
    /// assert!(rules.subtract());
    /// assert!(rules.sort());
    /// ```
    #[must_use]
    pub fn overlay(&self, overrides: &RuleOverrides) -> Self {
        Self {
            binary_operation: overrides.binary_operation.unwrap_or(self.binary_operation),
            subtract: overrides.subtract.unwrap_or(self.subtract),
            ignore_errors: overrides.ignore_errors.unwrap_or(self.ignore_errors),
            sort: overrides.sort.unwrap_or(self.sort),
            unique: overrides.unique.unwrap_or(self.unique),
        }
    }
}

/// A partial rule set; only the fields that are `Some` override a base.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleOverrides {
    /// Boolean combination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_operation: Option<BinaryOperation>,
    /// Subtraction mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtract: Option<bool>,
    /// Degraded string fallback for unmergeable pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_errors: Option<bool>,
    /// Array sorting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<bool>,
    /// Array deduplication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

impl RuleOverrides {
    /// Overrides the boolean combination.
    #[must_use]
    pub fn with_binary_operation(mut self, operation: BinaryOperation) -> Self {
        self.binary_operation = Some(operation);
        self
    }

    /// Overrides subtraction mode.
    #[must_use]
    pub fn with_subtract(mut self, enabled: bool) -> Self {
        self.subtract = Some(enabled);
        self
    }

    /// Overrides the degraded string fallback.
    #[must_use]
    pub fn with_ignore_errors(mut self, enabled: bool) -> Self {
        self.ignore_errors = Some(enabled);
        self
    }

    /// Overrides array sorting.
    #[must_use]
    pub fn with_sort(mut self, enabled: bool) -> Self {
        self.sort = Some(enabled);
        self
    }

    /// Overrides array deduplication.
    #[must_use]
    pub fn with_unique(mut self, enabled: bool) -> Self {
        self.unique = Some(enabled);
        self
    }

    /// Field-by-field overlay of `other` onto `self`.
    pub fn absorb(&mut self, other: &Self) {
        if other.binary_operation.is_some() {
            self.binary_operation = other.binary_operation;
        }
        if other.subtract.is_some() {
            self.subtract = other.subtract;
        }
        if other.ignore_errors.is_some() {
            self.ignore_errors = other.ignore_errors;
        }
        if other.sort.is_some() {
            self.sort = other.sort;
        }
        if other.unique.is_some() {
            self.unique = other.unique;
        }
    }
}

/// Global overrides plus overrides keyed by exact dotted field path.
///
/// Deserializes from the rules-file layout:
///
/// ```
/// # use json_addition_core::RulesConfig;
/// let rules = RulesConfig::from_json_str(r#"{
///     "globalAdditionRules": { "binaryOperation": "AND" },
///     "specificAdditionRules": { "tags": { "unique": true } }
/// }"#)?;
/// assert!(rules.resolve(&rules.effective_global(), "tags").unique());
/// # Ok::<(), json_addition_core::RulesError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default, rename = "globalAdditionRules")]
    global: RuleOverrides,
    #[serde(default, rename = "specificAdditionRules")]
    specific: IndexMap<String, RuleOverrides>,
}

impl RulesConfig {
    /// Creates a configuration that keeps every default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a rules document.
    pub fn from_json_str(input: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Reads and parses a rules file.
    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let text = fs::read_to_string(path)
            .map_err(|source| RulesError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }

    /// Replaces the global overrides.
    #[must_use]
    pub fn with_global(mut self, overrides: RuleOverrides) -> Self {
        self.global = overrides;
        self
    }

    /// Adds or replaces the overrides for one dotted path.
    #[must_use]
    pub fn with_path<S>(mut self, path: S, overrides: RuleOverrides) -> Self
    where
        S: Into<String>,
    {
        self.specific.insert(path.into(), overrides);
        self
    }

    /// Returns the global overrides.
    #[must_use]
    pub fn global(&self) -> &RuleOverrides {
        &self.global
    }

    /// Returns the path-specific overrides.
    #[must_use]
    pub fn specific(&self) -> &IndexMap<String, RuleOverrides> {
        &self.specific
    }

    /// Defaults with the global overrides applied.
    #[must_use]
    pub fn effective_global(&self) -> RuleSet {
        RuleSet::default().overlay(&self.global)
    }

    /// Effective rules for `path` on top of `base`.
    #[must_use]
    pub fn resolve(&self, base: &RuleSet, path: &str) -> RuleSet {
        resolve(base, &self.specific, path)
    }

    /// Layers `other` on top of this configuration.
    ///
    /// Global overrides combine field by field; a path entry in `other`
    /// combines with the existing entry for the same path.
    pub fn merge_from(&mut self, other: &Self) {
        self.global.absorb(&other.global);
        for (path, overrides) in &other.specific {
            self.specific.entry(path.clone()).or_default().absorb(overrides);
        }
    }
}

/// Path-scoped rule resolution: `base` overlaid with the exact-path entry of `specific`.
///
/// ```
/// # use indexmap::IndexMap;
/// # use json_addition_core::{resolve, RuleOverrides, RuleSet};
/// let mut specific = IndexMap::new();
/// specific.insert("a.b".to_string(), RuleOverrides::default().with_sort(true));
/// assert!(resolve(&RuleSet::default(), &specific, "a.b").sort());
/// assert!(!resolve(&RuleSet::default(), &specific, "a").sort());
/// ```
#[must_use]
pub fn resolve(base: &RuleSet, specific: &IndexMap<String, RuleOverrides>, path: &str) -> RuleSet {
    match specific.get(path) {
        Some(overrides) => base.overlay(overrides),
        None => *base,
    }
}
