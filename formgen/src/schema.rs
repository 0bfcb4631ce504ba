/// Schema tree model: the JSON-Schema-like representation the engine
/// renders from. Nodes are plain serde values so a host can hand the
/// engine the output of whatever schema library it already uses.
///
/// UI metadata is a first-class struct on every node rather than an
/// ambient extension of some third-party type: unknown hints are
/// rejected when the schema is deserialized, not at render time.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The six type tags a node can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Object,
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

impl TypeTag {
    pub fn parse(s: &str) -> Option<TypeTag> {
        match s {
            "object" => Some(TypeTag::Object),
            "string" => Some(TypeTag::String),
            "number" => Some(TypeTag::Number),
            "integer" => Some(TypeTag::Integer),
            "boolean" => Some(TypeTag::Boolean),
            "null" => Some(TypeTag::Null),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Object => "object",
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Integer => "integer",
            TypeTag::Boolean => "boolean",
            TypeTag::Null => "null",
        }
    }
}

/// Rendering hint for string fields that need a non-default input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputHint {
    Tel,
    Password,
    Date,
    Radio,
}

/// UI metadata attached to a schema node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_complete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_mode: Option<String>,
    /// `"inputType"` in the wire form: tel, password, date or radio.
    #[serde(rename = "inputType", skip_serializing_if = "Option::is_none")]
    pub input_hint: Option<InputHint>,
    /// Render an object's children without fieldset chrome.
    pub unwrap: bool,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_labels: Option<IndexMap<String, String>>,
}

/// One node of the schema tree. Every field is optional; which fields
/// are meaningful depends on the resolved type tag.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TypeTag>,
    /// Unresolved union; collapsed by normalization before rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,
    /// Child nodes, in declaration order. Declaration order is field order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub nullable: bool,
    #[serde(flatten)]
    pub meta: Metadata,
}

impl SchemaNode {
    /// A bare node with just a type tag; normalization and tests build on this.
    pub fn of_kind(kind: TypeTag) -> SchemaNode {
        SchemaNode {
            kind: Some(kind),
            ..SchemaNode::default()
        }
    }

    pub fn is_union(&self) -> bool {
        self.any_of.is_some()
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|r| r == key)
    }
}
