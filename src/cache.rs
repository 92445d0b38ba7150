//! Process-wide regex compilation cache.
//!
//! Patterns are compiled once per exact pattern string and shared as
//! `Arc<Regex>` between the warm-up pass and later matching. Failed
//! compilations are remembered as well, so a malformed pattern reports the
//! same diagnostic every time without being recompiled.

use crate::error::{CriteriaError, Result};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Compile-by-pattern abstraction consumed by the warm-up pass.
///
/// Implementations must memoize by exact pattern string and be safe to call
/// from several threads at once.
pub trait RegexCompiler: Send + Sync {
    fn compile(&self, pattern: &str) -> Result<Arc<Regex>>;
}

/// Thread-safe memoizing regex cache.
///
/// Lookups take a shared read lock. A miss upgrades to the write lock and
/// checks again before compiling, so concurrent requests for the same new
/// pattern produce exactly one compilation and every caller sees the same
/// outcome.
#[derive(Debug)]
pub struct RegexCache {
    patterns: RwLock<HashMap<String, CachedEntry>>,
    counters: Counters,
    config: RegexCacheConfig,
}

#[derive(Debug, Clone)]
enum CachedEntry {
    Compiled(Arc<Regex>),
    Failed(String),
}

#[derive(Debug, Default)]
struct Counters {
    lookups: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    compilations: AtomicUsize,
    failures: AtomicUsize,
}

/// Regex cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegexCacheConfig {
    /// Compiled program size limit in bytes, passed to the regex builder.
    pub size_limit: Option<usize>,

    /// Lazy DFA cache size limit in bytes, passed to the regex builder.
    pub dfa_size_limit: Option<usize>,

    /// Remember failed compilations instead of retrying them on every request.
    pub memoize_failures: bool,
}

/// Cache performance statistics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub total_lookups: usize,
    pub hits: usize,
    pub misses: usize,
    pub compilations: usize,
    pub failures: usize,
}

impl Default for RegexCacheConfig {
    fn default() -> Self {
        Self {
            size_limit: None,
            dfa_size_limit: None,
            memoize_failures: true,
        }
    }
}

impl RegexCache {
    pub fn new() -> Self {
        Self::with_config(RegexCacheConfig::default())
    }

    pub fn with_config(config: RegexCacheConfig) -> Self {
        Self {
            patterns: RwLock::new(HashMap::new()),
            counters: Counters::default(),
            config,
        }
    }

    pub fn config(&self) -> &RegexCacheConfig {
        &self.config
    }

    /// Get or compile a regex pattern.
    pub fn get_regex(&self, pattern: &str) -> Result<Arc<Regex>> {
        self.counters.lookups.fetch_add(1, Ordering::Relaxed);

        {
            let patterns = self.patterns.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = patterns.get(pattern) {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                return entry.to_result(pattern);
            }
        }

        let mut patterns = self
            .patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        // Another thread may have compiled it while we waited for the lock.
        if let Some(entry) = patterns.get(pattern) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return entry.to_result(pattern);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        self.counters.compilations.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(pattern, "compiling regex");

        match self.build(pattern) {
            Ok(regex) => {
                let regex = Arc::new(regex);
                patterns.insert(pattern.to_string(), CachedEntry::Compiled(regex.clone()));
                Ok(regex)
            }
            Err(err) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                let cause = err.to_string();
                if self.config.memoize_failures {
                    patterns.insert(pattern.to_string(), CachedEntry::Failed(cause.clone()));
                }
                Err(CriteriaError::compilation(pattern, cause))
            }
        }
    }

    fn build(&self, pattern: &str) -> std::result::Result<Regex, regex::Error> {
        let mut builder = RegexBuilder::new(pattern);
        if let Some(limit) = self.config.size_limit {
            builder.size_limit(limit);
        }
        if let Some(limit) = self.config.dfa_size_limit {
            builder.dfa_size_limit(limit);
        }
        builder.build()
    }

    /// Compile a list of raw patterns, stopping at the first failure.
    pub fn precompile_patterns(&self, patterns: &[&str]) -> Result<()> {
        for &pattern in patterns {
            self.get_regex(pattern)?;
        }
        Ok(())
    }

    /// Whether `pattern` has been compiled successfully.
    pub fn contains(&self, pattern: &str) -> bool {
        let patterns = self.patterns.read().unwrap_or_else(PoisonError::into_inner);
        matches!(patterns.get(pattern), Some(CachedEntry::Compiled(_)))
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            total_lookups: self.counters.lookups.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            compilations: self.counters.compilations.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }

    pub fn hit_ratio(&self) -> f64 {
        let stats = self.get_stats();
        if stats.total_lookups == 0 {
            return 0.0;
        }
        stats.hits as f64 / stats.total_lookups as f64
    }

    /// Number of cached entries, failures included.
    pub fn size(&self) -> usize {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl CachedEntry {
    fn to_result(&self, pattern: &str) -> Result<Arc<Regex>> {
        match self {
            CachedEntry::Compiled(regex) => Ok(regex.clone()),
            CachedEntry::Failed(cause) => Err(CriteriaError::compilation(pattern, cause)),
        }
    }
}

impl RegexCompiler for RegexCache {
    fn compile(&self, pattern: &str) -> Result<Arc<Regex>> {
        self.get_regex(pattern)
    }
}

impl<T: RegexCompiler + ?Sized> RegexCompiler for &T {
    fn compile(&self, pattern: &str) -> Result<Arc<Regex>> {
        (**self).compile(pattern)
    }
}

impl<T: RegexCompiler + ?Sized> RegexCompiler for Arc<T> {
    fn compile(&self, pattern: &str) -> Result<Arc<Regex>> {
        (**self).compile(pattern)
    }
}

impl Default for RegexCache {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_CACHE: OnceLock<RegexCache> = OnceLock::new();

/// The process-wide regex cache, created with default configuration on first use.
pub fn global_regex_cache() -> &'static RegexCache {
    GLOBAL_CACHE.get_or_init(RegexCache::new)
}

/// Initialize the process-wide cache with a custom configuration.
///
/// Returns `false` if the cache was already initialized; the existing cache is
/// kept so compiled patterns are never discarded mid-run.
pub fn init_global_cache(config: RegexCacheConfig) -> bool {
    GLOBAL_CACHE.set(RegexCache::with_config(config)).is_ok()
}
