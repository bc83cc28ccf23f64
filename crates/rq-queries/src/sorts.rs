//! Sort orders and sort element declarations
//!
//! A `SortQueryElementModel` declares one sort key an endpoint accepts. At
//! build time the requested keys resolve into `SortCriterion`s of a
//! `SortOrder`.

use rq_core::{RestError, RestResult};
use serde::Serialize;
use std::cmp::Ordering;

/// Well-known sort key types
pub mod sort_types {
    pub const STRING: &str = "string";
    pub const NUMBER: &str = "number";
    pub const INTEGER: &str = "integer";
    pub const FLOAT: &str = "float";
    pub const BOOLEAN: &str = "boolean";
    pub const DATE: &str = "date";
    pub const DATETIME: &str = "datetime";
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, Self::Desc)
    }

    /// Orient an ascending comparison
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// One resolved sort key and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    pub attribute: String,
    pub direction: SortDirection,
}

impl SortCriterion {
    pub fn new(attribute: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            attribute: attribute.into(),
            direction,
        }
    }
}

/// Resolved sort criteria, most significant first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    /// Compare two records criterion by criterion.
    ///
    /// `compare_attribute` gives the ascending ordering of one attribute; later
    /// criteria only decide ties of earlier ones.
    pub fn compare<T, F>(&self, a: &T, b: &T, compare_attribute: F) -> Ordering
    where
        F: Fn(&str, &T, &T) -> Ordering,
    {
        self.criteria.iter().fold(Ordering::Equal, |acc, criterion| {
            acc.then_with(|| {
                criterion
                    .direction
                    .apply(compare_attribute(&criterion.attribute, a, b))
            })
        })
    }
}

impl FromIterator<SortCriterion> for SortOrder {
    fn from_iter<I: IntoIterator<Item = SortCriterion>>(iter: I) -> Self {
        Self {
            criteria: iter.into_iter().collect(),
        }
    }
}

/// Declaration of one accepted sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortQueryElementModel {
    query_key: String,
    sort_type: String,
    is_default: bool,
    direction: SortDirection,
}

impl SortQueryElementModel {
    /// Ascending, non-default sort key of type `string`
    pub fn new(query_key: impl Into<String>) -> RestResult<Self> {
        let query_key = query_key.into();
        if query_key.is_empty() {
            return Err(RestError::empty_argument("sort_query_element"));
        }

        Ok(Self {
            query_key,
            sort_type: sort_types::STRING.to_string(),
            is_default: false,
            direction: SortDirection::Asc,
        })
    }

    pub fn with_type(mut self, sort_type: impl Into<String>) -> Self {
        self.sort_type = sort_type.into();
        self
    }

    /// Include this key even when the request does not ask for it
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Direction used when the key is included as a default
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn query_key(&self) -> &str {
        &self.query_key
    }

    pub fn sort_type(&self) -> &str {
        &self.sort_type
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}
