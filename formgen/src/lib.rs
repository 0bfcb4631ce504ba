//! Schema-driven form engine.
//!
//! Given a JSON-Schema-like tree, the engine collapses union types into
//! renderable nodes, derives the empty value of every field, and walks
//! the schema recursively to emit input descriptors bound to a
//! path-addressed form state: current data tree, validation issues,
//! dirty/touched sets and the submission lifecycle.
//!
//! Validation and phone-number handling are collaborators behind the
//! [`validator::Validator`] and [`phone::PhoneNumberKit`] traits; the
//! engine implements neither. Rendering goes through the
//! [`render::FormSlots`] contract, with a default HTML implementation.

pub mod controller;
pub mod defaults;
pub mod fields;
pub mod normalize;
pub mod options;
pub mod path;
pub mod phone;
pub mod render;
pub mod schema;
pub mod state;
pub mod validator;

pub use controller::{
    ErrorAnchor, ErrorSink, FormController, RawInput, SubmitOutcome, SubmitStart,
};
pub use fields::{FieldNode, GenerateError};
pub use normalize::{collapse_union, NormalizeError};
pub use options::{FormErrorPosition, FormOptions, PhoneFieldOptions, ShowFieldErrors};
pub use phone::{PhoneEdit, PhoneFieldState, PhoneNumberKit};
pub use render::{FormSlots, HtmlSlots};
pub use schema::{InputHint, Metadata, SchemaNode, TypeTag};
pub use state::{FormState, Issue, IssueCode};
pub use validator::{Validated, Validator};
