//! Eager regex warm-up for criteria configurations.
//!
//! Run once per loaded configuration, before any per-item matching. Every
//! regex pattern reachable from the criteria source is compiled through the
//! shared cache; the first malformed pattern aborts the pass so the run stops
//! before any file is touched.
//!
//! ```rust
//! use stacking_criteria::{precompile, Criterion, CriteriaSource, RegexCache};
//!
//! let cache = RegexCache::new();
//! let criteria = vec![
//!     Criterion::new("originalFileName").with_regex(r"^PXL_(\d{8})"),
//!     Criterion::new("localDateTime").with_delta(1000),
//! ];
//!
//! precompile(CriteriaSource::CriteriaList(&criteria), &cache)?;
//! assert!(cache.contains(r"^PXL_(\d{8})"));
//! # Ok::<(), stacking_criteria::CriteriaError>(())
//! ```

use crate::cache::RegexCompiler;
use crate::error::Result;
use crate::source::{CriteriaDocument, CriteriaSource, DEFAULT_MAX_DEPTH};

/// Summary of a successful warm-up pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WarmupReport {
    /// Criteria visited.
    pub visited: usize,
    /// Patterns submitted to the cache, repeats included.
    pub submitted: usize,
}

/// Regex warm-up pass with a configurable expression depth limit.
#[derive(Debug, Clone, Copy)]
pub struct Precompiler {
    max_depth: usize,
}

impl Default for Precompiler {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Precompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Compile every reachable pattern, failing on the first bad one.
    pub fn run<C>(&self, source: CriteriaSource<'_>, cache: &C) -> Result<WarmupReport>
    where
        C: RegexCompiler + ?Sized,
    {
        let mut report = WarmupReport::default();

        let outcome = source.try_for_each(self.max_depth, |criterion| {
            report.visited += 1;
            let Some(pattern) = criterion.regex_pattern() else {
                return Ok(());
            };
            report.submitted += 1;
            tracing::debug!(key = %criterion.key, pattern, "warming regex");
            cache.compile(pattern).map(|_| ())
        });

        if let Err(err) = outcome {
            tracing::warn!(shape = source.shape(), error = %err, "regex warm-up failed");
            return Err(err);
        }

        tracing::info!(
            shape = source.shape(),
            visited = report.visited,
            submitted = report.submitted,
            "regex warm-up complete"
        );
        Ok(report)
    }
}

/// Compile every regex pattern reachable from `source` through `cache`.
pub fn precompile<C>(source: CriteriaSource<'_>, cache: &C) -> Result<()>
where
    C: RegexCompiler + ?Sized,
{
    Precompiler::default().run(source, cache).map(|_| ())
}

/// Resolve an untyped configuration value and warm its patterns.
///
/// Values that are none of the four criteria shapes fail with
/// [`crate::CriteriaError::UnsupportedSourceShape`].
pub fn precompile_value<C>(value: serde_json::Value, cache: &C) -> Result<CriteriaDocument>
where
    C: RegexCompiler + ?Sized,
{
    let document = CriteriaDocument::from_json_value(value)?;
    precompile(document.as_source(), cache)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RegexCache;
    use crate::criteria::{CriteriaExpression, CriteriaGroup, Criterion, LogicalOperator};
    use crate::error::CriteriaError;

    #[test]
    fn test_report_counts_visits_and_patterns() {
        let cache = RegexCache::new();
        let groups = vec![
            CriteriaGroup::new(vec![
                Criterion::new("originalFileName").with_regex("^IMG"),
                Criterion::new("localDateTime"),
            ]),
            CriteriaGroup::new(vec![Criterion::new("originalPath").with_regex("^IMG")]),
        ];

        let report = Precompiler::new()
            .run(CriteriaSource::CriteriaGroupList(&groups), &cache)
            .unwrap();
        assert_eq!(
            report,
            WarmupReport {
                visited: 3,
                submitted: 2
            }
        );
        assert_eq!(cache.get_stats().compilations, 1);
    }

    #[test]
    fn test_empty_pattern_is_skipped() {
        let cache = RegexCache::new();
        let criterion = Criterion::new("originalFileName").with_regex("");
        precompile(CriteriaSource::SingleCriterion(&criterion), &cache).unwrap();
        assert_eq!(cache.get_stats().total_lookups, 0);
    }

    #[test]
    fn test_absent_expression_succeeds() {
        let cache = RegexCache::new();
        assert!(precompile(CriteriaSource::ExpressionTree(None), &cache).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let cache = RegexCache::new();
        let tree = CriteriaExpression::branch(
            LogicalOperator::And,
            vec![CriteriaExpression::leaf(
                Criterion::new("originalFileName").with_regex("x"),
            )],
        );

        let err = Precompiler::new()
            .with_max_depth(1)
            .run(CriteriaSource::from(&tree), &cache)
            .unwrap_err();
        assert_eq!(err, CriteriaError::ExpressionTooDeep { limit: 1 });
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_precompile_value_rejects_scalar() {
        let cache = RegexCache::new();
        let err = precompile_value(serde_json::json!(3), &cache).unwrap_err();
        assert_eq!(
            err,
            CriteriaError::UnsupportedSourceShape("number".to_string())
        );
    }

    #[test]
    fn test_precompile_value_warms_patterns() {
        let cache = RegexCache::new();
        let document = precompile_value(
            serde_json::json!([
                {"key": "originalFileName", "regex": {"key": "^PXL_(\\d+)", "index": 1}}
            ]),
            &cache,
        )
        .unwrap();

        assert!(matches!(document, CriteriaDocument::CriteriaList(_)));
        assert!(cache.contains(r"^PXL_(\d+)"));
    }
}
