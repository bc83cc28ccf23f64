//! # rq-core
//!
//! Core types shared by every rest-query crate:
//! - The error taxonomy (`RestError`) and the client-facing
//!   `ValidationErrorModel`
//! - Configuration types (`QueryConfig`, `AppConfig`)

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError, QueryConfig, QueryConfigBuilder, ServerConfig};
pub use error::*;
