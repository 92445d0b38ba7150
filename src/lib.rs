//! # Stacking Criteria
//!
//! Support layer for file stacking engines: turns user-authored matching
//! criteria into canonical group keys and validates every regex pattern they
//! carry before any per-item matching starts.
//!
//! Criteria come in four shapes (a single criterion, a flat list, a list of
//! groups, or a boolean expression tree). [`CriteriaSource`] treats them
//! uniformly.
//!
//! ## Quick Start
//!
//! ```rust
//! use stacking_criteria::{
//!     build_key, find_split_delimiters, flatten, global_regex_cache, precompile,
//!     CriteriaDocument,
//! };
//!
//! let document = CriteriaDocument::from_yaml_str(
//!     r#"
//! - operator: AND
//!   criteria:
//!     - key: originalFileName
//!       split:
//!         delimiters: ["~", "."]
//!     - key: originalFileName
//!       regex:
//!         key: "^PXL_(\\d{8})"
//!         index: 1
//! "#,
//! )?;
//!
//! // Fail fast on malformed patterns.
//! precompile(document.as_source(), global_regex_cache())?;
//!
//! if let CriteriaDocument::CriteriaGroupList(groups) = &document {
//!     let criteria = flatten(groups);
//!     let delimiters = find_split_delimiters(&criteria);
//!     assert_eq!(delimiters.map(|d| d.len()), Some(2));
//! }
//!
//! let mut scratch = String::new();
//! assert_eq!(build_key(&["PXL_20240501", "jpg"], &mut scratch), "PXL_20240501|jpg");
//! # Ok::<(), stacking_criteria::CriteriaError>(())
//! ```

pub mod cache;
pub mod config;
pub mod criteria;
pub mod error;
pub mod grouping;
pub mod key;
pub mod precompile;
pub mod source;
pub mod traversal;

// Criteria model
pub use criteria::{
    CriteriaExpression, CriteriaGroup, Criterion, DeltaSpec, LogicalOperator, RegexSpec,
    SplitSpec, ORIGINAL_FILE_NAME_KEY,
};

// Key construction
pub use grouping::{build_keys, cluster_by_key, group_rows, par_build_keys, KeyCluster};
pub use key::{build_key, join_key, KeyBuilder, KEY_SEPARATOR};

// Traversal and warm-up
pub use precompile::{precompile, precompile_value, Precompiler, WarmupReport};
pub use source::{CriteriaDocument, CriteriaSource, DEFAULT_MAX_DEPTH};
pub use traversal::{find_split_delimiters, find_split_spec, flatten, flatten_refs};

// Regex cache
pub use cache::{
    global_regex_cache, init_global_cache, CacheStats, RegexCache, RegexCacheConfig,
    RegexCompiler,
};

// Configuration and errors
pub use config::{ParallelConfig, StackingConfig, TraversalConfig};
pub use error::{CriteriaError, Result};
