//! Denormalization validation listener
//!
//! Only depth 0 (the top-level object) is validated; nested objects are
//! covered by their parent's rules.

use rq_core::{RestError, RestResult};
use tracing::{debug, warn};

use crate::base::{ObjectValidator, Validatable};
use crate::rules::RuleValidator;

/// Receives events published on a channel
pub trait Listener<E: ?Sized> {
    fn channel(&self) -> &'static str;

    fn on_event(&self, event: &E) -> RestResult<()>;
}

/// Fired once an object of the request body graph has been deserialized
#[derive(Clone, Copy)]
pub struct DenormalizationFinished<'a> {
    depth: usize,
    type_name: &'static str,
    validatable: Option<&'a dyn Validatable>,
}

impl<'a> DenormalizationFinished<'a> {
    pub const CHANNEL: &'static str = "denormalization_finished";

    /// Event for an object without validation rules
    pub fn of<T: ?Sized>(depth: usize) -> Self {
        Self {
            depth,
            type_name: std::any::type_name::<T>(),
            validatable: None,
        }
    }

    pub fn validatable<T: Validatable>(depth: usize, object: &'a T) -> Self {
        Self {
            depth,
            type_name: std::any::type_name::<T>(),
            validatable: Some(object),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn denormalized_object(&self) -> Option<&'a dyn Validatable> {
        self.validatable
    }
}

impl std::fmt::Debug for DenormalizationFinished<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenormalizationFinished")
            .field("depth", &self.depth)
            .field("type_name", &self.type_name)
            .field("validatable", &self.validatable.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DenormalizationListener<V = RuleValidator> {
    validator: V,
}

impl<V: ObjectValidator> DenormalizationListener<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }
}

impl<'a, V: ObjectValidator> Listener<DenormalizationFinished<'a>> for DenormalizationListener<V> {
    fn channel(&self) -> &'static str {
        DenormalizationFinished::CHANNEL
    }

    fn on_event(&self, event: &DenormalizationFinished<'a>) -> RestResult<()> {
        if event.depth() != 0 {
            return Ok(());
        }

        let Some(object) = event.denormalized_object() else {
            return Ok(());
        };

        let errors = self.validator.validate(object);
        if errors.is_empty() {
            debug!(object = event.type_name(), "Denormalized object is valid");
            return Ok(());
        }

        warn!(
            object = event.type_name(),
            error_count = errors.len(),
            "Denormalized object failed validation"
        );
        Err(RestError::UnprocessableEntity(errors))
    }
}
