//! Query values
//!
//! A raw query-string value is always a string. Filters may turn it into any
//! of the typed variants below.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    List(Vec<String>),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Integer(i) => Some(*i as f64),
            QueryValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            QueryValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            QueryValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Empty strings and empty lists are empty; every other value is not
    pub fn is_empty(&self) -> bool {
        match self {
            QueryValue::String(s) => s.is_empty(),
            QueryValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            QueryValue::String(_) => "string",
            QueryValue::Integer(_) => "integer",
            QueryValue::Float(_) => "float",
            QueryValue::Boolean(_) => "boolean",
            QueryValue::Date(_) => "date",
            QueryValue::List(_) => "list",
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::String(s) => f.write_str(s),
            QueryValue::Integer(i) => write!(f, "{}", i),
            QueryValue::Float(v) => write!(f, "{}", v),
            QueryValue::Boolean(b) => write!(f, "{}", b),
            QueryValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            QueryValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Integer(i)
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        QueryValue::Float(f)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Boolean(b)
    }
}

impl From<NaiveDate> for QueryValue {
    fn from(d: NaiveDate) -> Self {
        QueryValue::Date(d)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(items: Vec<String>) -> Self {
        QueryValue::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(QueryValue::from("open").as_str(), Some("open"));
        assert_eq!(QueryValue::from(3i64).as_i64(), Some(3));
        assert_eq!(QueryValue::from(3i64).as_f64(), Some(3.0));
        assert_eq!(QueryValue::from(true).as_str(), None);
        assert!(QueryValue::from("").is_empty());
        assert!(QueryValue::List(vec![]).is_empty());
        assert!(!QueryValue::from(0i64).is_empty());
        assert_eq!(QueryValue::from(true).as_bool(), Some(true));
        assert_eq!(QueryValue::from("true").as_bool(), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(QueryValue::from("open").type_name(), "string");
        assert_eq!(QueryValue::from(2.5).type_name(), "float");
        assert_eq!(QueryValue::List(vec![]).type_name(), "list");
    }

    #[test]
    fn test_serializes_untagged() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let json = serde_json::to_value(QueryValue::from(date)).unwrap();
        assert_eq!(json, serde_json::json!("2024-02-29"));

        let json = serde_json::to_value(QueryValue::List(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(json, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryValue::List(vec!["a".into(), "b".into()]).to_string(), "a,b");
        assert_eq!(QueryValue::from(false).to_string(), "false");
    }
}
