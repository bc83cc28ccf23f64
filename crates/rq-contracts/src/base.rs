//! Base contract system

use rq_core::ValidationErrorModel;

/// An object that carries validation rules.
///
/// Every `validator::Validate` type is validatable.
pub trait Validatable {
    fn run_validation(&self) -> Result<(), validator::ValidationErrors>;
}

impl<T: validator::Validate> Validatable for T {
    fn run_validation(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

/// Runs an object's rules and reports the errors in a stable order
pub trait ObjectValidator: Send + Sync {
    fn validate(&self, object: &dyn Validatable) -> Vec<ValidationErrorModel>;
}

impl<V: ObjectValidator + ?Sized> ObjectValidator for std::sync::Arc<V> {
    fn validate(&self, object: &dyn Validatable) -> Vec<ValidationErrorModel> {
        (**self).validate(object)
    }
}
