//! Criteria data model for stacking rules.
//!
//! These types are produced by a configuration loader and consumed read-only by
//! the rest of the crate. They deserialize from the camelCase JSON/YAML layout
//! used by stacking configurations:
//!
//! ```yaml
//! - key: originalFileName
//!   split:
//!     delimiters: ["~", "."]
//!     index: 0
//! - key: localDateTime
//!   delta:
//!     milliseconds: 1000
//! ```

use serde::{Deserialize, Serialize};

/// Field name of the criterion whose split delimiters govern how an original
/// file name is partitioned for comparison.
pub const ORIGINAL_FILE_NAME_KEY: &str = "originalFileName";

/// A single matching rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    /// Logical name of the field this criterion matches against.
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<RegexSpec>,

    /// Time tolerance for date-valued fields. Interpreted by the matching engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<DeltaSpec>,
}

/// How to split a source string into comparable parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSpec {
    pub delimiters: Vec<String>,

    /// Which part, after splitting, participates in the key.
    #[serde(default)]
    pub index: usize,
}

/// Pattern-based extraction for a criterion.
///
/// The pattern is serialized under `key` to match existing configurations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegexSpec {
    #[serde(rename = "key")]
    pub pattern: String,

    /// Capture group extracted as the criterion value.
    #[serde(default)]
    pub index: usize,

    /// Capture group consulted when ordering items inside a stack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promote_index: Option<usize>,

    /// Values of the promote group, in descending priority.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promote_keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaSpec {
    pub milliseconds: u64,
}

/// Boolean combinator attached to groups and expression nodes.
///
/// This crate carries the operator for the matching engine and assigns it no
/// meaning of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
    Not,
}

/// An ordered cluster of criteria treated as one unit by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaGroup {
    #[serde(default)]
    pub operator: LogicalOperator,
    pub criteria: Vec<Criterion>,
}

/// A node of a criteria expression tree.
///
/// A well-formed node is either a leaf (`criteria` set, no children) or a
/// branch (`criteria` unset, non-empty `children`). Trees must be acyclic;
/// ownership through `Vec` guarantees that for values built in Rust.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CriteriaExpression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LogicalOperator>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Criterion>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CriteriaExpression>,
}

impl Criterion {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_split<I, S>(mut self, delimiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.split = Some(SplitSpec {
            delimiters: delimiters.into_iter().map(Into::into).collect(),
            index: 0,
        });
        self
    }

    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(RegexSpec {
            pattern: pattern.into(),
            ..Default::default()
        });
        self
    }

    pub fn with_delta(mut self, milliseconds: u64) -> Self {
        self.delta = Some(DeltaSpec { milliseconds });
        self
    }

    /// The configured pattern, or `None` when no regex is set or it is empty.
    pub fn regex_pattern(&self) -> Option<&str> {
        self.regex
            .as_ref()
            .map(|spec| spec.pattern.as_str())
            .filter(|pattern| !pattern.is_empty())
    }

    /// True for the reserved file-name criterion with a usable split spec.
    pub fn is_file_name_split(&self) -> bool {
        self.key == ORIGINAL_FILE_NAME_KEY
            && self
                .split
                .as_ref()
                .is_some_and(|split| !split.delimiters.is_empty())
    }
}

impl CriteriaGroup {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self {
            operator: LogicalOperator::And,
            criteria,
        }
    }

    pub fn with_operator(mut self, operator: LogicalOperator) -> Self {
        self.operator = operator;
        self
    }
}

impl CriteriaExpression {
    pub fn leaf(criterion: Criterion) -> Self {
        Self {
            operator: None,
            criteria: Some(criterion),
            children: Vec::new(),
        }
    }

    pub fn branch(operator: LogicalOperator, children: Vec<CriteriaExpression>) -> Self {
        Self {
            operator: Some(operator),
            criteria: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.criteria.is_some()
    }
}
