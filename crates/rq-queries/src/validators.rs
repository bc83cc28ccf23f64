//! Query element validators
//!
//! Validators run in declaration order against the filtered value of a query
//! element. The first one to report `false` rejects the element.

use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use validator::{validate_length, validate_range};

use crate::value::QueryValue;

pub trait Validator: Send + Sync + fmt::Debug {
    /// Short identifier used in rejection reports and logs
    fn name(&self) -> &str;

    fn is_valid(&self, value: &QueryValue) -> bool;

    fn message(&self) -> String {
        format!("failed {} validation", self.name())
    }
}

/// Rejects empty strings and empty lists
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Validator for NotEmpty {
    fn name(&self) -> &str {
        "not_empty"
    }

    fn is_valid(&self, value: &QueryValue) -> bool {
        !value.is_empty()
    }

    fn message(&self) -> String {
        "must not be empty".to_string()
    }
}

/// Bounds the character count of a string or the item count of a list
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Length {
    pub fn between(min: usize, max: usize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn max(max: usize) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }
}

impl Validator for Length {
    fn name(&self) -> &str {
        "length"
    }

    fn is_valid(&self, value: &QueryValue) -> bool {
        let min = self.min.map(|min| min as u64);
        let max = self.max.map(|max| max as u64);
        match value {
            QueryValue::String(s) => validate_length(s, min, max, None),
            QueryValue::List(items) => validate_length(items, min, max, None),
            _ => false,
        }
    }

    fn message(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("length must be between {} and {}", min, max),
            (Some(min), None) => format!("length must be at least {}", min),
            (None, Some(max)) => format!("length must be at most {}", max),
            (None, None) => "invalid length".to_string(),
        }
    }
}

/// Bounds a numeric value (integer or float); non-numeric values are invalid
#[derive(Debug, Clone, Copy, Default)]
pub struct Range {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Range {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

}

impl Validator for Range {
    fn name(&self) -> &str {
        "range"
    }

    fn is_valid(&self, value: &QueryValue) -> bool {
        value
            .as_f64()
            .map_or(false, |n| validate_range(n, self.min, self.max))
    }

    fn message(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
            (Some(min), None) => format!("must be at least {}", min),
            (None, Some(max)) => format!("must be at most {}", max),
            (None, None) => "must be a number".to_string(),
        }
    }
}

/// Accepts strings (or lists whose every item is) from a fixed set
#[derive(Debug, Clone, Default)]
pub struct OneOf {
    allowed: BTreeSet<String>,
}

impl OneOf {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for OneOf {
    fn name(&self) -> &str {
        "one_of"
    }

    fn is_valid(&self, value: &QueryValue) -> bool {
        match value {
            QueryValue::String(s) => self.allowed.contains(s),
            QueryValue::List(items) => items.iter().all(|item| self.allowed.contains(item)),
            _ => false,
        }
    }

    fn message(&self) -> String {
        let allowed: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        format!("must be one of: {}", allowed.join(", "))
    }
}

/// Matches the string form of a value against a regular expression
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Validator for Pattern {
    fn name(&self) -> &str {
        "pattern"
    }

    fn is_valid(&self, value: &QueryValue) -> bool {
        match value {
            QueryValue::String(s) => self.regex.is_match(s),
            other => self.regex.is_match(&other.to_string()),
        }
    }

    fn message(&self) -> String {
        format!("must match {}", self.regex.as_str())
    }
}

/// Validator backed by a closure
#[derive(Clone)]
pub struct FnValidator {
    name: String,
    check: Arc<dyn Fn(&QueryValue) -> bool + Send + Sync>,
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").field("name", &self.name).finish()
    }
}

impl Validator for FnValidator {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_valid(&self, value: &QueryValue) -> bool {
        (self.check)(value)
    }
}

pub fn from_fn<F>(name: impl Into<String>, check: F) -> FnValidator
where
    F: Fn(&QueryValue) -> bool + Send + Sync + 'static,
{
    FnValidator {
        name: name.into(),
        check: Arc::new(check),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(NotEmpty.is_valid(&"open".into()));
        assert!(!NotEmpty.is_valid(&"".into()));
        assert!(!NotEmpty.is_valid(&QueryValue::List(vec![])));
        assert_eq!(NotEmpty.message(), "must not be empty");
    }

    #[test]
    fn test_length() {
        let length = Length::between(2, 4);
        assert!(length.is_valid(&"abc".into()));
        assert!(!length.is_valid(&"a".into()));
        assert!(!length.is_valid(&"abcde".into()));
        assert!(Length::max(1).is_valid(&QueryValue::List(vec!["x".into()])));
        assert!(!length.is_valid(&QueryValue::Integer(3)));
        // counts characters, not bytes
        assert!(Length::max(2).is_valid(&"äö".into()));
    }

    #[test]
    fn test_range() {
        let range = Range::between(1.0, 100.0);
        assert!(range.is_valid(&QueryValue::Integer(1)));
        assert!(range.is_valid(&QueryValue::Float(99.5)));
        assert!(!range.is_valid(&QueryValue::Integer(0)));
        assert!(!range.is_valid(&"5".into()));
        assert_eq!(Range::at_least(1.0).message(), "must be at least 1");
    }

    #[test]
    fn test_one_of() {
        let one_of = OneOf::new(["open", "closed"]);
        assert!(one_of.is_valid(&"open".into()));
        assert!(!one_of.is_valid(&"archived".into()));
        assert!(one_of.is_valid(&QueryValue::List(vec!["open".into(), "closed".into()])));
        assert!(!one_of.is_valid(&QueryValue::List(vec!["open".into(), "x".into()])));
        assert_eq!(one_of.message(), "must be one of: closed, open");
    }

    #[test]
    fn test_pattern() {
        let pattern = Pattern::new(r"^[a-z]+$").unwrap();
        assert!(pattern.is_valid(&"abc".into()));
        assert!(!pattern.is_valid(&"abc1".into()));
        assert!(Pattern::new(r"^\d+$").unwrap().is_valid(&QueryValue::Integer(12)));
        assert!(Pattern::new("(").is_err());
    }

    #[test]
    fn test_from_fn() {
        let even = from_fn("even", |v| v.as_i64().map_or(false, |i| i % 2 == 0));
        assert_eq!(even.name(), "even");
        assert!(even.is_valid(&QueryValue::Integer(4)));
        assert!(!even.is_valid(&QueryValue::Integer(3)));
        assert_eq!(even.message(), "failed even validation");
    }
}
