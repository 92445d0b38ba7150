//! Read-only queries over criteria collections.

use crate::criteria::{CriteriaGroup, Criterion, SplitSpec};

/// Concatenate every group's criteria, in group order then in-group order.
pub fn flatten(groups: &[CriteriaGroup]) -> Vec<Criterion> {
    groups
        .iter()
        .flat_map(|group| group.criteria.iter().cloned())
        .collect()
}

/// Borrowing form of [`flatten`].
pub fn flatten_refs(groups: &[CriteriaGroup]) -> Vec<&Criterion> {
    groups.iter().flat_map(|group| group.criteria.iter()).collect()
}

/// Delimiters of the first reserved file-name criterion with a non-empty split
/// spec. Earlier declarations win over later ones.
pub fn find_split_delimiters(criteria: &[Criterion]) -> Option<&[String]> {
    find_split_spec(criteria).map(|split| split.delimiters.as_slice())
}

/// The whole split spec selected by [`find_split_delimiters`].
pub fn find_split_spec(criteria: &[Criterion]) -> Option<&SplitSpec> {
    criteria
        .iter()
        .find(|criterion| criterion.is_file_name_split())
        .and_then(|criterion| criterion.split.as_ref())
}
