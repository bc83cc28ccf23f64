//! # rq-queries
//!
//! Binds request query strings to validated, typed query models.
//!
//! An endpoint declares once which query parameters and sort keys it accepts;
//! every request is then resolved against those declarations into a fresh
//! [`QueryModel`].
//!
//! ## Structure
//!
//! - `value` - Typed values produced by filters
//! - `bag` - Parameter bag abstraction over query strings
//! - `filters` - Stock value-transforming filters
//! - `validators` - The `Validator` trait and stock validators
//! - `element` - Query element declarations
//! - `sorts` - Sort directions, orders and sort element declarations
//! - `model` - The built query model
//! - `builder` - Declaration and resolution
//!
//! ## Example
//!
//! ```
//! use rq_queries::{filters, validators, QueryElementModel, QueryModelBuilder, QueryParameters};
//!
//! let builder = QueryModelBuilder::new()
//!     .add_query_element_model(
//!         QueryElementModel::new("page")?
//!             .with_filter(filters::integer)
//!             .with_validator(validators::Range::at_least(1.0)),
//!     )
//!     .add_query_element("status")?
//!     .add_default_sort_query_element("id")?
//!     .add_sort_query_element("name")?;
//!
//! let params = QueryParameters::parse("page=2&sort_by_descending=name");
//! let model = builder.build_from_query_parameters_bag(&params)?;
//!
//! assert_eq!(model.get("page").and_then(|v| v.as_i64()), Some(2));
//! assert!(!model.contains("status"));
//! assert!(model.is_sorted_by("id"));
//! assert!(model.is_sorted_by("name"));
//! # Ok::<(), rq_core::RestError>(())
//! ```

pub mod bag;
pub mod builder;
pub mod element;
pub mod filters;
pub mod model;
pub mod sorts;
pub mod validators;
pub mod value;

// Re-exports for convenience
pub use bag::{ParameterBag, QueryParameters};
pub use builder::QueryModelBuilder;
pub use element::{QueryElementModel, ValidationFailed};
pub use model::{QueryElement, QueryModel, RejectedQueryElement, SortElement};
pub use rq_core::{QueryConfig, RestError, RestResult};
pub use sorts::{SortCriterion, SortDirection, SortOrder, SortQueryElementModel};
pub use validators::Validator;
pub use value::QueryValue;
