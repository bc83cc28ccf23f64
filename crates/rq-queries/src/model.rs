//! Built query model
//!
//! Freshly allocated by every build. Both sequences keep declaration order,
//! not request order.

use serde::Serialize;

use crate::sorts::{SortCriterion, SortDirection, SortOrder};
use crate::value::QueryValue;

/// An accepted query element and its filtered value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryElement {
    pub key: String,
    pub value: QueryValue,
}

/// An accepted sort element and its resolved direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortElement {
    pub key: String,
    pub sort_type: String,
    pub direction: SortDirection,
    pub is_default: bool,
    /// Whether the request named this key, as opposed to a default inclusion
    pub requested: bool,
}

/// A query element excluded because a validator rejected its value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedQueryElement {
    pub key: String,
    pub validator: String,
    pub message: String,
    pub value: QueryValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryModel {
    query_elements: Vec<QueryElement>,
    sort_elements: Vec<SortElement>,
    rejected: Vec<RejectedQueryElement>,
}

impl QueryModel {
    pub fn new(
        query_elements: Vec<QueryElement>,
        sort_elements: Vec<SortElement>,
        rejected: Vec<RejectedQueryElement>,
    ) -> Self {
        Self {
            query_elements,
            sort_elements,
            rejected,
        }
    }

    pub fn query_elements(&self) -> &[QueryElement] {
        &self.query_elements
    }

    pub fn sort_elements(&self) -> &[SortElement] {
        &self.sort_elements
    }

    /// Validator rejections of this build, in declaration order
    pub fn rejected(&self) -> &[RejectedQueryElement] {
        &self.rejected
    }

    /// Value of an accepted query element
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.query_elements
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_sorted_by(&self, key: &str) -> bool {
        self.sort_elements.iter().any(|s| s.key == key)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_elements
            .iter()
            .map(|s| SortCriterion::new(s.key.clone(), s.direction))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.query_elements.is_empty() && self.sort_elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryModel {
        QueryModel::new(
            vec![QueryElement {
                key: "status".into(),
                value: "open".into(),
            }],
            vec![
                SortElement {
                    key: "id".into(),
                    sort_type: "integer".into(),
                    direction: SortDirection::Asc,
                    is_default: true,
                    requested: false,
                },
                SortElement {
                    key: "name".into(),
                    sort_type: "string".into(),
                    direction: SortDirection::Desc,
                    is_default: false,
                    requested: true,
                },
            ],
            vec![],
        )
    }

    #[test]
    fn test_lookup() {
        let model = sample();
        assert_eq!(model.get("status"), Some(&QueryValue::from("open")));
        assert!(!model.contains("page"));
        assert!(model.is_sorted_by("name"));
        assert!(!model.is_sorted_by("price"));
        assert!(!model.is_empty());
        assert!(QueryModel::default().is_empty());
    }

    #[test]
    fn test_sort_order_keeps_declaration_order() {
        let order = sample().sort_order();
        assert_eq!(
            order.criteria(),
            &[
                SortCriterion::new("id", SortDirection::Asc),
                SortCriterion::new("name", SortDirection::Desc),
            ]
        );
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["query_elements"][0]["value"], "open");
        assert_eq!(json["sort_elements"][1]["direction"], "desc");
        assert_eq!(json["rejected"], serde_json::json!([]));
    }
}
