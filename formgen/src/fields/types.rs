/// The slot prop contract: plain data describing each input the walk
/// emits. Rendering layers consume these; nothing here knows HTML.
use crate::state::Issue;
use serde_json::Value;

/// Stable data-attribute hooks the default renderer stamps on markup.
pub const DATA_FORM: &str = "data-formgen-form";
pub const DATA_INPUT: &str = "data-formgen-input";
pub const DATA_INPUT_PHONE: &str = "data-formgen-input-phone";
pub const DATA_SELECT: &str = "data-formgen-select";
pub const DATA_CHECKBOX: &str = "data-formgen-checkbox";
pub const DATA_FIELDSET: &str = "data-formgen-fieldset";
pub const DATA_FIELD_ERROR: &str = "data-formgen-field-error";
pub const DATA_FORM_ERROR: &str = "data-formgen-form-error";

/// Props every field kind shares.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCommon {
    pub key: String,
    pub path: Vec<String>,
    /// Identity key for dirty/touched/error lookups and DOM attributes.
    pub dot_path: String,
    /// Title when the schema has one, otherwise the property key.
    pub label: String,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub auto_complete: Option<String>,
    pub input_mode: Option<String>,
    /// In the parent's required set and not nullable.
    pub required: bool,
    pub disabled: bool,
    pub read_only: bool,
    pub show_required_asterisk: bool,
    /// Issues to display: flattened, truncated and visibility-gated.
    pub errors: Vec<Issue>,
    /// Whether issues exist at all, ignoring the visibility gate.
    pub has_error: bool,
    pub dirty: bool,
    pub touched: bool,
    /// aria-invalid: issues exist and are currently visible.
    pub invalid: bool,
}

/// Concrete `type=` of a text-like input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Text,
    Email,
    Password,
    Date,
}

impl TextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextKind::Text => "text",
            TextKind::Email => "email",
            TextKind::Password => "password",
            TextKind::Date => "date",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextInputProps {
    pub common: FieldCommon,
    pub kind: TextKind,
    pub value: String,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberInputProps {
    pub common: FieldCommon,
    pub value: String,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxProps {
    pub common: FieldCommon,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectProps {
    pub common: FieldCommon,
    pub value: String,
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryOption {
    pub code: String,
    pub name: String,
    pub calling_code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhoneInputProps {
    pub common: FieldCommon,
    /// Currently selected country code.
    pub country: String,
    /// Display text of the national-number half.
    pub national: String,
    /// Countries pinned to the top of the selector.
    pub common_countries: Vec<CountryOption>,
    pub other_countries: Vec<CountryOption>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldsetProps {
    pub key: String,
    pub path: Vec<String>,
    pub dot_path: String,
    pub legend: Option<String>,
    /// Issues addressed to the container itself.
    pub errors: Vec<Issue>,
}

/// One node of the generated field tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldNode {
    Fieldset {
        props: FieldsetProps,
        children: Vec<FieldNode>,
    },
    Text(TextInputProps),
    Number(NumberInputProps),
    Checkbox(CheckboxProps),
    Select(SelectProps),
    Phone(PhoneInputProps),
}

impl FieldNode {
    /// Shared props of a leaf; `None` for containers.
    pub fn common(&self) -> Option<&FieldCommon> {
        match self {
            FieldNode::Fieldset { .. } => None,
            FieldNode::Text(p) => Some(&p.common),
            FieldNode::Number(p) => Some(&p.common),
            FieldNode::Checkbox(p) => Some(&p.common),
            FieldNode::Select(p) => Some(&p.common),
            FieldNode::Phone(p) => Some(&p.common),
        }
    }
}

/// JS-style truthiness, used to coerce whatever is stored into a
/// checkbox's checked state.
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Display form of a stored value: strings pass through, numbers
/// stringify, everything else (including null and absent) is empty.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
