//! Group key construction over many items.
//!
//! Each item contributes one row of extracted per-criterion values. Keys are
//! built sequentially or on the rayon pool depending on [`ParallelConfig`];
//! in the parallel path every worker owns its own [`KeyBuilder`], so scratch
//! buffers are never shared between threads. Output order always follows
//! input order.

use crate::config::ParallelConfig;
use crate::key::KeyBuilder;
use rayon::prelude::*;
use std::collections::HashMap;

/// Items sharing one group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCluster {
    pub key: String,
    /// Indices into the input rows, ascending.
    pub members: Vec<usize>,
}

impl KeyCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Build one key per row, in row order.
pub fn build_keys<R, S>(rows: &[R], config: &ParallelConfig) -> Vec<String>
where
    R: AsRef<[S]> + Sync,
    S: AsRef<str>,
{
    if config.enabled && rows.len() >= config.min_items_for_parallelism {
        par_build_keys(rows, config.scratch_capacity)
    } else {
        let mut builder = KeyBuilder::with_capacity(config.scratch_capacity);
        rows.iter().map(|row| builder.build(row.as_ref())).collect()
    }
}

/// Build keys on the rayon pool with one scratch buffer per worker.
pub fn par_build_keys<R, S>(rows: &[R], scratch_capacity: usize) -> Vec<String>
where
    R: AsRef<[S]> + Sync,
    S: AsRef<str>,
{
    rows.par_iter()
        .map_init(
            || KeyBuilder::with_capacity(scratch_capacity),
            |builder, row| builder.build(row.as_ref()),
        )
        .collect()
}

/// Cluster item indices by key, in order of each key's first appearance.
pub fn cluster_by_key<K: AsRef<str>>(keys: &[K]) -> Vec<KeyCluster> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut clusters: Vec<KeyCluster> = Vec::new();

    for (item, key) in keys.iter().enumerate() {
        let key = key.as_ref();
        match index.get(key) {
            Some(&slot) => clusters[slot].members.push(item),
            None => {
                index.insert(key, clusters.len());
                clusters.push(KeyCluster {
                    key: key.to_string(),
                    members: vec![item],
                });
            }
        }
    }

    tracing::debug!(items = keys.len(), clusters = clusters.len(), "clustered items by key");
    clusters
}

/// Build keys for `rows` and cluster them.
pub fn group_rows<R, S>(rows: &[R], config: &ParallelConfig) -> Vec<KeyCluster>
where
    R: AsRef<[S]> + Sync,
    S: AsRef<str>,
{
    cluster_by_key(&build_keys(rows, config))
}
