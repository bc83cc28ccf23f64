//! # rq-contracts
//!
//! Object-graph validation for deserialized request bodies.
//!
//! Once a request body has been denormalized, the top-level object is run
//! through an [`ObjectValidator`]. Any reported error fails the request with
//! `RestError::UnprocessableEntity` carrying one `ValidationErrorModel` per
//! error.

pub mod base;
pub mod listener;
pub mod rules;

pub use base::*;
pub use listener::{DenormalizationFinished, DenormalizationListener, Listener};
pub use rules::RuleValidator;
