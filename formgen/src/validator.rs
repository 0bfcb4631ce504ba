/// The validation seam. The engine never validates anything itself: it
/// asks an external validator for a whole-tree pass on every mutation
/// and replaces its issue list with whatever comes back.
use crate::schema::SchemaNode;
use crate::state::Issue;
use serde_json::Value;

/// Outcome of one whole-tree validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    /// The fully-typed value; `Some` exactly when `issues` is empty.
    pub value: Option<Value>,
    pub issues: Vec<Issue>,
}

impl Validated {
    pub fn ok(value: Value) -> Validated {
        Validated {
            value: Some(value),
            issues: Vec::new(),
        }
    }

    pub fn fail(issues: Vec<Issue>) -> Validated {
        Validated {
            value: None,
            issues,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }
}

/// A schema plus the ability to validate candidate values against it.
pub trait Validator {
    /// The input-shape (pre-transform) schema tree the form renders from.
    fn schema(&self) -> &SchemaNode;

    /// Validate a candidate value tree against the whole schema.
    fn validate(&self, candidate: &Value) -> Validated;
}
