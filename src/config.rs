//! Configuration for the stacking criteria layer.
//!
//! [`StackingConfig`] gathers the tuning knobs for the regex cache, criteria
//! traversal and parallel key construction. It can be built in code with the
//! `with_*` methods or deserialized from YAML, where every field is optional.
//!
//! # Examples
//!
//! ```rust
//! use stacking_criteria::StackingConfig;
//!
//! let config = StackingConfig::default()
//!     .with_max_depth(32)
//!     .with_parallel_processing(true);
//! assert_eq!(config.traversal.max_depth, 32);
//!
//! let parsed = StackingConfig::from_yaml_str("traversal:\n  max_depth: 16\n")?;
//! assert_eq!(parsed.traversal.max_depth, 16);
//! # Ok::<(), stacking_criteria::CriteriaError>(())
//! ```

use crate::cache::RegexCacheConfig;
use crate::error::Result;
use crate::precompile::Precompiler;
use crate::source::DEFAULT_MAX_DEPTH;
use serde::Deserialize;

/// Criteria traversal limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Deepest expression nesting accepted by the warm-up pass.
    pub max_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parallel key construction settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Build keys on the rayon thread pool.
    pub enabled: bool,

    /// Below this many items keys are built sequentially.
    pub min_items_for_parallelism: usize,

    /// Initial scratch capacity of each worker's key buffer.
    pub scratch_capacity: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min_items_for_parallelism: 1024,
            scratch_capacity: 128,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StackingConfig {
    pub cache: RegexCacheConfig,
    pub traversal: TraversalConfig,
    pub parallel: ParallelConfig,
}

impl StackingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Configuration for large libraries: parallel keys with a low threshold.
    pub fn high_throughput() -> Self {
        Self {
            parallel: ParallelConfig {
                enabled: true,
                min_items_for_parallelism: 256,
                scratch_capacity: 256,
            },
            ..Default::default()
        }
    }

    /// Configuration for development: sequential, shallow trees, failures retried.
    pub fn development() -> Self {
        Self {
            cache: RegexCacheConfig {
                memoize_failures: false,
                ..Default::default()
            },
            traversal: TraversalConfig { max_depth: 32 },
            parallel: ParallelConfig::default(),
        }
    }

    /// A warm-up pass honoring the configured depth limit.
    pub fn precompiler(&self) -> Precompiler {
        Precompiler::new().with_max_depth(self.traversal.max_depth)
    }

    // Builder methods

    /// Set the expression nesting limit used during traversal.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.traversal.max_depth = max_depth;
        self
    }

    /// Enable or disable rayon-backed key building.
    pub fn with_parallel_processing(mut self, enable: bool) -> Self {
        self.parallel.enabled = enable;
        self
    }

    /// Set the batch size at which key building goes parallel.
    pub fn with_min_items_for_parallelism(mut self, min_items: usize) -> Self {
        self.parallel.min_items_for_parallelism = min_items;
        self
    }

    /// Set the initial capacity of each worker's key buffer.
    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.parallel.scratch_capacity = capacity;
        self
    }

    /// Set the compiled program size limit for cached regexes.
    pub fn with_regex_size_limit(mut self, bytes: usize) -> Self {
        self.cache.size_limit = Some(bytes);
        self
    }

    /// Enable or disable remembering patterns that failed to compile.
    pub fn with_failure_memoization(mut self, enable: bool) -> Self {
        self.cache.memoize_failures = enable;
        self
    }
}
