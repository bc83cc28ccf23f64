//! Query value filters
//!
//! A filter turns the raw query-string value of an element into the value the
//! validators and the application see. Any `Fn(&str) -> Result<QueryValue, FilterError>`
//! works; the functions below cover the common conversions.

use chrono::NaiveDate;
use std::sync::Arc;

pub use rq_core::FilterError;

use crate::value::QueryValue;

pub type FilterResult = Result<QueryValue, FilterError>;

/// Shared filter function stored on a query element declaration
pub type Filter = Arc<dyn Fn(&str) -> FilterResult + Send + Sync>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn trim(raw: &str) -> FilterResult {
    Ok(QueryValue::String(raw.trim().to_string()))
}

pub fn lowercase(raw: &str) -> FilterResult {
    Ok(QueryValue::String(raw.trim().to_lowercase()))
}

pub fn integer(raw: &str) -> FilterResult {
    raw.trim()
        .parse::<i64>()
        .map(QueryValue::Integer)
        .map_err(|_| FilterError::new(format!("{:?} is not an integer", raw)))
}

pub fn float(raw: &str) -> FilterResult {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(QueryValue::Float)
        .ok_or_else(|| FilterError::new(format!("{:?} is not a number", raw)))
}

pub fn boolean(raw: &str) -> FilterResult {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(QueryValue::Boolean(true)),
        "false" | "0" | "no" | "off" => Ok(QueryValue::Boolean(false)),
        _ => Err(FilterError::new(format!("{:?} is not a boolean", raw))),
    }
}

/// Calendar date in `YYYY-MM-DD` form
pub fn date(raw: &str) -> FilterResult {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(QueryValue::Date)
        .map_err(|_| FilterError::new(format!("{:?} is not a date ({})", raw, DATE_FORMAT)))
}

/// Comma separated list; items are trimmed and empty items dropped
pub fn comma_list(raw: &str) -> FilterResult {
    Ok(QueryValue::List(
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    ))
}
