//! # rq-api
//!
//! Axum integration: HAL-style JSON error responses, a query parameter
//! extractor feeding the query model builder, and a JSON body extractor that
//! validates the denormalized object.

pub mod error;
pub mod extractors;

pub use error::{ApiError, ApiResult};
pub use extractors::{QueryParams, ValidatedJson};
