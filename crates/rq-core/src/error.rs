//! Core error types for rest-query
//!
//! Declaration mistakes fail fast with `InvalidArgument` or
//! `SortTypeNotAllowed`. Per-element validation failures are never errors;
//! they are reported on the built model instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Core error type for all rest-query operations
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Invalid argument {argument}: {message}")]
    InvalidArgument {
        argument: &'static str,
        message: String,
    },

    #[error("Sort key type {sort_type:?} is not allowed, expected one of [{allowed}]")]
    SortTypeNotAllowed { sort_type: String, allowed: String },

    #[error("Filter for query element {query_key:?} failed: {source}")]
    Filter {
        query_key: String,
        #[source]
        source: FilterError,
    },

    #[error("Unprocessable entity: {} validation error(s)", .0.len())]
    UnprocessableEntity(Vec<ValidationErrorModel>),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RestError {
    pub fn empty_argument(argument: &'static str) -> Self {
        RestError::InvalidArgument {
            argument,
            message: "must be a non-empty string".to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RestError::InvalidArgument { .. }
            | RestError::SortTypeNotAllowed { .. }
            | RestError::Config(_) => 500,
            RestError::Filter { .. } => 400,
            RestError::UnprocessableEntity(_) => 422,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RestError::InvalidArgument { .. } => "invalid_argument",
            RestError::SortTypeNotAllowed { .. } => "sort_type_not_allowed",
            RestError::Filter { .. } => "invalid_query",
            RestError::UnprocessableEntity(_) => "unprocessable_entity",
            RestError::Config(_) => "configuration_error",
        }
    }
}

/// Error raised by a query element filter while transforming a raw value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FilterError {
    pub message: String,
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Client-facing description of a single validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorModel {
    pub field: String,
    pub message: String,
}

impl ValidationErrorModel {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type RestResult<T> = Result<T, RestError>;
