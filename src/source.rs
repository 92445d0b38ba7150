//! The four criteria representations and their uniform traversal.
//!
//! Stacking configurations express criteria in one of four shapes:
//!
//! - a single [`Criterion`]
//! - a flat list of criteria
//! - a list of [`CriteriaGroup`]s
//! - a [`CriteriaExpression`] tree (possibly absent)
//!
//! [`CriteriaSource`] borrows any of them and visits every reachable leaf
//! criterion in a fixed order. [`CriteriaDocument`] owns one, resolved from an
//! untyped JSON/YAML value by inspecting its shape.

use crate::criteria::{CriteriaExpression, CriteriaGroup, Criterion};
use crate::error::{CriteriaError, Result};
use serde_json::Value;

/// Default limit on expression nesting during traversal.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Borrowed view over one of the four criteria shapes.
#[derive(Debug, Clone, Copy)]
pub enum CriteriaSource<'a> {
    SingleCriterion(&'a Criterion),
    CriteriaList(&'a [Criterion]),
    CriteriaGroupList(&'a [CriteriaGroup]),
    ExpressionTree(Option<&'a CriteriaExpression>),
}

impl<'a> CriteriaSource<'a> {
    /// Name of the shape, for logs and diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            CriteriaSource::SingleCriterion(_) => "criterion",
            CriteriaSource::CriteriaList(_) => "criteria list",
            CriteriaSource::CriteriaGroupList(_) => "criteria group list",
            CriteriaSource::ExpressionTree(_) => "expression tree",
        }
    }

    /// Visit every reachable criterion in traversal order.
    ///
    /// Lists are visited in order, groups group by group, and expression trees
    /// depth-first, left to right. A node carrying both a criterion and
    /// children yields the criterion before its children. The first error
    /// returned by `visit` stops the walk and is propagated.
    ///
    /// Expression nesting beyond `max_depth` fails with
    /// [`CriteriaError::ExpressionTooDeep`] before any deeper node is visited.
    pub fn try_for_each<F>(&self, max_depth: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(&'a Criterion) -> Result<()>,
    {
        match *self {
            CriteriaSource::SingleCriterion(criterion) => visit(criterion),
            CriteriaSource::CriteriaList(criteria) => criteria.iter().try_for_each(visit),
            CriteriaSource::CriteriaGroupList(groups) => groups
                .iter()
                .flat_map(|group| group.criteria.iter())
                .try_for_each(visit),
            CriteriaSource::ExpressionTree(None) => Ok(()),
            CriteriaSource::ExpressionTree(Some(root)) => {
                walk_expression(root, 1, max_depth, &mut visit)
            }
        }
    }

    /// All reachable criteria, in traversal order.
    pub fn criteria(&self) -> Result<Vec<&'a Criterion>> {
        let mut out = Vec::new();
        self.try_for_each(DEFAULT_MAX_DEPTH, |criterion| {
            out.push(criterion);
            Ok(())
        })?;
        Ok(out)
    }
}

fn walk_expression<'a, F>(
    node: &'a CriteriaExpression,
    depth: usize,
    max_depth: usize,
    visit: &mut F,
) -> Result<()>
where
    F: FnMut(&'a Criterion) -> Result<()>,
{
    if depth > max_depth {
        return Err(CriteriaError::ExpressionTooDeep { limit: max_depth });
    }
    if let Some(criterion) = &node.criteria {
        visit(criterion)?;
    }
    for child in &node.children {
        walk_expression(child, depth + 1, max_depth, visit)?;
    }
    Ok(())
}

impl<'a> From<&'a Criterion> for CriteriaSource<'a> {
    fn from(criterion: &'a Criterion) -> Self {
        CriteriaSource::SingleCriterion(criterion)
    }
}

impl<'a> From<&'a [Criterion]> for CriteriaSource<'a> {
    fn from(criteria: &'a [Criterion]) -> Self {
        CriteriaSource::CriteriaList(criteria)
    }
}

impl<'a> From<&'a Vec<Criterion>> for CriteriaSource<'a> {
    fn from(criteria: &'a Vec<Criterion>) -> Self {
        CriteriaSource::CriteriaList(criteria)
    }
}

impl<'a> From<&'a [CriteriaGroup]> for CriteriaSource<'a> {
    fn from(groups: &'a [CriteriaGroup]) -> Self {
        CriteriaSource::CriteriaGroupList(groups)
    }
}

impl<'a> From<&'a Vec<CriteriaGroup>> for CriteriaSource<'a> {
    fn from(groups: &'a Vec<CriteriaGroup>) -> Self {
        CriteriaSource::CriteriaGroupList(groups)
    }
}

impl<'a> From<&'a CriteriaExpression> for CriteriaSource<'a> {
    fn from(expr: &'a CriteriaExpression) -> Self {
        CriteriaSource::ExpressionTree(Some(expr))
    }
}

impl<'a> From<Option<&'a CriteriaExpression>> for CriteriaSource<'a> {
    fn from(expr: Option<&'a CriteriaExpression>) -> Self {
        CriteriaSource::ExpressionTree(expr)
    }
}

/// Owned criteria in one of the four shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CriteriaDocument {
    SingleCriterion(Criterion),
    CriteriaList(Vec<Criterion>),
    CriteriaGroupList(Vec<CriteriaGroup>),
    ExpressionTree(Option<CriteriaExpression>),
}

impl CriteriaDocument {
    /// Resolve an untyped value into one of the four shapes.
    ///
    /// - `null` is an absent expression tree
    /// - an object with `key` is a single criterion
    /// - an object with `criteria`, `children` or `operator` is an expression node
    /// - an array of objects with `key` is a criteria list
    /// - an array of objects with a `criteria` array is a group list
    /// - an empty array is an empty criteria list
    ///
    /// Everything else is rejected with
    /// [`CriteriaError::UnsupportedSourceShape`] naming what was found.
    pub fn from_json_value(value: Value) -> Result<Self> {
        Ok(match detect_shape(&value)? {
            Shape::Absent => CriteriaDocument::ExpressionTree(None),
            Shape::Criterion => CriteriaDocument::SingleCriterion(serde_json::from_value(value)?),
            Shape::Criteria => CriteriaDocument::CriteriaList(serde_json::from_value(value)?),
            Shape::Groups => CriteriaDocument::CriteriaGroupList(serde_json::from_value(value)?),
            Shape::Expression => {
                CriteriaDocument::ExpressionTree(Some(serde_json::from_value(value)?))
            }
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::from_json_value(serde_yaml::from_str(text)?)
    }

    pub fn as_source(&self) -> CriteriaSource<'_> {
        match self {
            CriteriaDocument::SingleCriterion(criterion) => {
                CriteriaSource::SingleCriterion(criterion)
            }
            CriteriaDocument::CriteriaList(criteria) => CriteriaSource::CriteriaList(criteria),
            CriteriaDocument::CriteriaGroupList(groups) => {
                CriteriaSource::CriteriaGroupList(groups)
            }
            CriteriaDocument::ExpressionTree(expr) => {
                CriteriaSource::ExpressionTree(expr.as_ref())
            }
        }
    }
}

enum Shape {
    Absent,
    Criterion,
    Criteria,
    Groups,
    Expression,
}

fn is_group(map: &serde_json::Map<String, Value>) -> bool {
    matches!(map.get("criteria"), Some(Value::Array(_)))
}

fn is_expression(map: &serde_json::Map<String, Value>) -> bool {
    ["criteria", "children", "operator"]
        .iter()
        .any(|field| map.contains_key(*field))
}

fn detect_shape(value: &Value) -> Result<Shape> {
    match value {
        Value::Null => Ok(Shape::Absent),
        Value::Object(map) if map.contains_key("key") => Ok(Shape::Criterion),
        Value::Object(map) if is_group(map) => Err(CriteriaError::UnsupportedSourceShape(
            "bare criteria group (expected a sequence of groups)".to_string(),
        )),
        Value::Object(map) if is_expression(map) => Ok(Shape::Expression),
        Value::Object(_) => Err(CriteriaError::UnsupportedSourceShape(
            "mapping".to_string(),
        )),
        Value::Array(items) => sequence_shape(items),
        other => Err(CriteriaError::UnsupportedSourceShape(
            value_kind(other).to_string(),
        )),
    }
}

fn sequence_shape(items: &[Value]) -> Result<Shape> {
    let mut shape = None;
    for (i, item) in items.iter().enumerate() {
        let item_shape = match item {
            Value::Object(map) if map.contains_key("key") => Shape::Criteria,
            Value::Object(map) if is_group(map) => Shape::Groups,
            other => {
                return Err(CriteriaError::UnsupportedSourceShape(format!(
                    "sequence containing {} at index {i}",
                    value_kind(other)
                )))
            }
        };
        match (&shape, &item_shape) {
            (None, _) => shape = Some(item_shape),
            (Some(Shape::Criteria), Shape::Criteria) | (Some(Shape::Groups), Shape::Groups) => {}
            _ => {
                return Err(CriteriaError::UnsupportedSourceShape(format!(
                    "sequence mixing criteria and groups at index {i}"
                )))
            }
        }
    }
    Ok(shape.unwrap_or(Shape::Criteria))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(map) if map.contains_key("key") => "criterion",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::LogicalOperator;

    fn keys(source: CriteriaSource<'_>) -> Vec<String> {
        source
            .criteria()
            .unwrap()
            .into_iter()
            .map(|c| c.key.clone())
            .collect()
    }

    #[test]
    fn test_single_and_list_traversal() {
        let criterion = Criterion::new("a");
        assert_eq!(keys((&criterion).into()), vec!["a"]);

        let list = vec![Criterion::new("a"), Criterion::new("b")];
        assert_eq!(keys((&list).into()), vec!["a", "b"]);
    }

    #[test]
    fn test_group_traversal_is_group_by_group() {
        let groups = vec![
            CriteriaGroup::new(vec![Criterion::new("a"), Criterion::new("b")]),
            CriteriaGroup::new(vec![Criterion::new("c")]),
        ];
        assert_eq!(keys((&groups).into()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_expression_traversal_depth_first() {
        let tree = CriteriaExpression::branch(
            LogicalOperator::And,
            vec![
                CriteriaExpression::branch(
                    LogicalOperator::Or,
                    vec![
                        CriteriaExpression::leaf(Criterion::new("a")),
                        CriteriaExpression::leaf(Criterion::new("b")),
                    ],
                ),
                CriteriaExpression::leaf(Criterion::new("c")),
            ],
        );
        assert_eq!(keys((&tree).into()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_absent_and_empty_expressions_contribute_nothing() {
        assert!(keys(CriteriaSource::ExpressionTree(None)).is_empty());

        let empty = CriteriaExpression::default();
        assert!(keys((&empty).into()).is_empty());
    }

    #[test]
    fn test_depth_guard() {
        let mut tree = CriteriaExpression::leaf(Criterion::new("deep"));
        for _ in 0..4 {
            tree = CriteriaExpression::branch(LogicalOperator::Not, vec![tree]);
        }

        let source = CriteriaSource::from(&tree);
        assert!(source.try_for_each(5, |_| Ok(())).is_ok());
        assert_eq!(
            source.try_for_each(4, |_| Ok(())),
            Err(CriteriaError::ExpressionTooDeep { limit: 4 })
        );
    }

    #[test]
    fn test_visit_error_stops_walk() {
        let list = vec![Criterion::new("a"), Criterion::new("b"), Criterion::new("c")];
        let mut seen = Vec::new();
        let result = CriteriaSource::from(&list).try_for_each(DEFAULT_MAX_DEPTH, |c| {
            seen.push(c.key.clone());
            if c.key == "b" {
                Err(CriteriaError::compilation("b", "stop"))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_document_shapes_from_yaml() {
        let single = CriteriaDocument::from_yaml_str("key: originalFileName").unwrap();
        assert!(matches!(single, CriteriaDocument::SingleCriterion(_)));

        let list = CriteriaDocument::from_yaml_str(
            "- key: originalFileName\n- key: localDateTime\n",
        )
        .unwrap();
        assert!(matches!(list, CriteriaDocument::CriteriaList(ref c) if c.len() == 2));

        let groups = CriteriaDocument::from_yaml_str(
            "- operator: AND\n  criteria:\n    - key: originalFileName\n",
        )
        .unwrap();
        assert!(matches!(groups, CriteriaDocument::CriteriaGroupList(ref g) if g.len() == 1));

        let expr = CriteriaDocument::from_yaml_str(
            "operator: OR\nchildren:\n  - criteria:\n      key: originalFileName\n",
        )
        .unwrap();
        assert!(matches!(expr, CriteriaDocument::ExpressionTree(Some(_))));

        let absent = CriteriaDocument::from_yaml_str("~").unwrap();
        assert_eq!(absent, CriteriaDocument::ExpressionTree(None));
    }

    #[test]
    fn test_document_rejects_unsupported_shapes() {
        for (text, expected) in [
            ("\"originalFileName\"", "string"),
            ("42", "number"),
            ("true", "boolean"),
        ] {
            assert_eq!(
                CriteriaDocument::from_json_str(text),
                Err(CriteriaError::UnsupportedSourceShape(expected.to_string()))
            );
        }

        assert!(matches!(
            CriteriaDocument::from_json_str(r#"["originalFileName"]"#),
            Err(CriteriaError::UnsupportedSourceShape(ref s)) if s.contains("string at index 0")
        ));
        assert!(matches!(
            CriteriaDocument::from_json_str(
                r#"[{"key": "a"}, {"criteria": [{"key": "b"}]}]"#
            ),
            Err(CriteriaError::UnsupportedSourceShape(ref s)) if s.contains("mixing")
        ));
        assert!(matches!(
            CriteriaDocument::from_json_str(r#"{"criteria": [{"key": "a"}]}"#),
            Err(CriteriaError::UnsupportedSourceShape(_))
        ));
    }

    #[test]
    fn test_document_rejects_mappings_of_no_known_shape() {
        for text in [r#"{"regex": {"key": "PXL_("}}"#, r#"{"foo": 1}"#, "{}"] {
            assert_eq!(
                CriteriaDocument::from_json_str(text),
                Err(CriteriaError::UnsupportedSourceShape("mapping".to_string()))
            );
        }
    }

    #[test]
    fn test_document_rejects_misspelled_expression_fields() {
        assert!(matches!(
            CriteriaDocument::from_yaml_str(
                "operator: OR\nchildrn:\n  - criteria:\n      key: originalFileName\n"
            ),
            Err(CriteriaError::Deserialize(_))
        ));
    }

    #[test]
    fn test_node_with_criterion_and_children_visits_criterion_first() {
        let node = CriteriaExpression {
            operator: Some(LogicalOperator::And),
            criteria: Some(Criterion::new("root")),
            children: vec![CriteriaExpression::leaf(Criterion::new("child"))],
        };
        assert_eq!(keys((&node).into()), vec!["root", "child"]);
    }

    #[test]
    fn test_document_reports_malformed_fields() {
        assert!(matches!(
            CriteriaDocument::from_json_str(r#"{"key": 7}"#),
            Err(CriteriaError::Deserialize(_))
        ));
    }

    #[test]
    fn test_empty_sequence_is_empty_list() {
        assert_eq!(
            CriteriaDocument::from_json_str("[]").unwrap(),
            CriteriaDocument::CriteriaList(Vec::new())
        );
    }
}
