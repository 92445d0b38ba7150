//! Error types for the stacking criteria crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CriteriaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    /// A regex pattern reachable from the criteria failed to compile.
    #[error("invalid regex pattern '{pattern}': {cause}")]
    Compilation { pattern: String, cause: String },

    /// A dynamically-typed criteria value matched none of the four shapes.
    #[error("unsupported criteria source: {0}")]
    UnsupportedSourceShape(String),

    #[error("criteria expression nested deeper than {limit} levels")]
    ExpressionTooDeep { limit: usize },

    #[error("criteria deserialization error: {0}")]
    Deserialize(String),
}

impl CriteriaError {
    pub(crate) fn compilation(pattern: &str, cause: impl ToString) -> Self {
        CriteriaError::Compilation {
            pattern: pattern.to_string(),
            cause: cause.to_string(),
        }
    }

    /// The offending pattern, when this is a compilation failure.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            CriteriaError::Compilation { pattern, .. } => Some(pattern),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CriteriaError {
    fn from(err: serde_json::Error) -> Self {
        CriteriaError::Deserialize(err.to_string())
    }
}

impl From<serde_yaml::Error> for CriteriaError {
    fn from(err: serde_yaml::Error) -> Self {
        CriteriaError::Deserialize(err.to_string())
    }
}
