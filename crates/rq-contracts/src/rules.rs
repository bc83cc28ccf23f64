//! Rule-based object validator
//!
//! Bridges `validator` rule errors into `ValidationErrorModel`s. Fields are
//! reported in name order; nested structs become `parent.child` and list items
//! `parent[index].child`. Struct-level errors (`__all__`) are reported on the
//! enclosing path, or on `base` at the top level.

use rq_core::ValidationErrorModel;
use std::collections::BTreeMap;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::base::{ObjectValidator, Validatable};

const SCHEMA_FIELD: &str = "__all__";
const BASE_FIELD: &str = "base";

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl ObjectValidator for RuleValidator {
    fn validate(&self, object: &dyn Validatable) -> Vec<ValidationErrorModel> {
        match object.run_validation() {
            Ok(()) => vec![],
            Err(errors) => flatten(&errors),
        }
    }
}

/// Flatten nested rule errors into client-facing models
pub fn flatten(errors: &ValidationErrors) -> Vec<ValidationErrorModel> {
    let mut models = Vec::new();
    flatten_into(errors, "", &mut models);
    models
}

fn flatten_into(errors: &ValidationErrors, prefix: &str, models: &mut Vec<ValidationErrorModel>) {
    let sorted: BTreeMap<&str, &ValidationErrorsKind> =
        errors.errors().iter().map(|(field, kind)| (*field, kind)).collect();

    for (field, kind) in sorted {
        let path = field_path(prefix, field);
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    models.push(ValidationErrorModel::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_into(inner, &path, models),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_into(inner, &format!("{}[{}]", path, index), models);
                }
            }
        }
    }
}

fn field_path(prefix: &str, field: &str) -> String {
    match (prefix.is_empty(), field == SCHEMA_FIELD) {
        (true, true) => BASE_FIELD.to_string(),
        (true, false) => field.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, field),
    }
}
