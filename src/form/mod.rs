mod binding;
mod controller;
mod validation;


pub use binding::{ControllerBinding, FieldBinding};
pub use controller::{
    ErrorDisplay, FieldKey, FieldMeta, FormController, FormError, FormOptions, FormResult,
    FormSnapshot, SubmitState, ValidationMode,
};
pub use loginkit_form_derive::FormModel;
pub use validation::{FieldLens, FieldValidator, FormModel, ValidationError};
