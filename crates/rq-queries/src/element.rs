//! Query element declarations
//!
//! A `QueryElementModel` describes one accepted query parameter: its key, an
//! optional filter, the validators its filtered value must pass and the
//! listeners notified when a validator rejects it. Declarations are never
//! mutated by a build; resolved values live on the built `QueryModel`.

use rq_core::{RestError, RestResult};
use std::fmt;
use std::sync::Arc;

use crate::filters::{Filter, FilterResult};
use crate::validators::Validator;
use crate::value::QueryValue;

/// Notification sent when a validator rejects a query element value
#[derive(Debug, Clone, Copy)]
pub struct ValidationFailed<'a> {
    pub query_key: &'a str,
    pub validator: &'a dyn Validator,
    pub value: &'a QueryValue,
}

type ValidationFailedListener = Arc<dyn Fn(&ValidationFailed<'_>) + Send + Sync>;

#[derive(Clone)]
pub struct QueryElementModel {
    query_key: String,
    filter: Option<Filter>,
    validators: Vec<Arc<dyn Validator>>,
    listeners: Vec<ValidationFailedListener>,
}

impl QueryElementModel {
    pub fn new(query_key: impl Into<String>) -> RestResult<Self> {
        let query_key = query_key.into();
        if query_key.is_empty() {
            return Err(RestError::empty_argument("query_element"));
        }

        Ok(Self {
            query_key,
            filter: None,
            validators: vec![],
            listeners: vec![],
        })
    }

    /// Replace the raw value with `filter(raw)` before validation
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> FilterResult + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Append a validator; validators run in the order they were added
    pub fn with_validator<V: Validator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Append an already shared validator
    pub fn with_shared_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Register a listener for rejected values
    pub fn on_validation_failed<F>(mut self, listener: F) -> Self
    where
        F: Fn(&ValidationFailed<'_>) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(listener));
        self
    }

    pub fn query_key(&self) -> &str {
        &self.query_key
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub(crate) fn fire_validation_failed(&self, validator: &dyn Validator, value: &QueryValue) {
        let event = ValidationFailed {
            query_key: &self.query_key,
            validator,
            value,
        };
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for QueryElementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryElementModel")
            .field("query_key", &self.query_key)
            .field("has_filter", &self.filter.is_some())
            .field("validators", &self.validators)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters;
    use crate::validators::NotEmpty;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_rejects_empty_key() {
        let err = QueryElementModel::new("").unwrap_err();
        assert!(matches!(
            err,
            RestError::InvalidArgument { argument: "query_element", .. }
        ));
    }

    #[test]
    fn test_declaration() {
        let model = QueryElementModel::new("page")
            .unwrap()
            .with_filter(filters::integer)
            .with_validator(NotEmpty);

        assert_eq!(model.query_key(), "page");
        assert!(model.has_filter());
        assert_eq!(model.validators().len(), 1);
        assert_eq!(model.validators()[0].name(), "not_empty");
    }

    #[test]
    fn test_fire_validation_failed_notifies_every_listener() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = calls.clone();
        let second = calls.clone();

        let model = QueryElementModel::new("status")
            .unwrap()
            .on_validation_failed(move |event| {
                assert_eq!(event.query_key, "status");
                assert_eq!(event.validator.name(), "not_empty");
                first.fetch_add(1, Ordering::SeqCst);
            })
            .on_validation_failed(move |_| {
                second.fetch_add(1, Ordering::SeqCst);
            });

        model.fire_validation_failed(&NotEmpty, &QueryValue::from(""));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
