//! Shared data generation for stacking criteria benchmarks.

#![allow(dead_code)]

use stacking_criteria::{CriteriaExpression, CriteriaGroup, Criterion, LogicalOperator};

/// Rows of extracted values resembling a camera roll.
pub fn generate_rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|i| {
            vec![
                format!("PXL_2024{:04}_{:06}", i % 365, i / 3),
                format!("2024-05-{:02}T10:00:00", i % 28 + 1),
                if i % 2 == 0 { "jpg" } else { "dng" }.to_string(),
            ]
        })
        .collect()
}

/// Criteria groups with `count` distinct regex patterns.
pub fn generate_groups(count: usize) -> Vec<CriteriaGroup> {
    (0..count)
        .map(|i| {
            CriteriaGroup::new(vec![
                Criterion::new("originalFileName").with_regex(format!(r"^PXL_(\d{{8}})_{i}")),
                Criterion::new("localDateTime").with_delta(1000),
            ])
        })
        .collect()
}

/// A balanced expression tree of the given depth with regex leaves.
pub fn generate_tree(depth: usize) -> anyhow::Result<CriteriaExpression> {
    if depth == 0 {
        anyhow::bail!("tree depth must be at least 1");
    }
    Ok(build_tree(depth, &mut 0))
}

fn build_tree(depth: usize, next: &mut usize) -> CriteriaExpression {
    if depth == 1 {
        *next += 1;
        return CriteriaExpression::leaf(
            Criterion::new("originalFileName").with_regex(format!(r"^IMG_{}_(\d+)", *next)),
        );
    }
    CriteriaExpression::branch(
        LogicalOperator::Or,
        vec![build_tree(depth - 1, next), build_tree(depth - 1, next)],
    )
}
