/// Initial-value derivation: the empty form a schema implies, before the
/// caller's partial initial data is merged over it.
use crate::normalize::{collapse_union, NormalizeError};
use crate::schema::{SchemaNode, TypeTag};
use serde_json::{Map, Value};

/// The "empty" value of one leaf, ignoring any explicit default.
///
/// `None` means the key is left out entirely -- "no value yet", distinct
/// from null. This is also the value committed when an input is cleared
/// or numeric parsing fails.
pub fn empty_value(node: &SchemaNode, required: bool) -> Option<Value> {
    if node.nullable {
        return Some(Value::Null);
    }
    if !required {
        return None;
    }
    match node.kind {
        Some(TypeTag::Boolean) => Some(Value::Bool(false)),
        // Required strings and numbers start empty, not "" or 0.
        _ => Some(Value::Null),
    }
}

/// Walk the schema depth-first and build the initial value tree:
/// explicit defaults win, then nullability, then required-ness.
pub fn derive_defaults(schema: &SchemaNode) -> Result<Value, NormalizeError> {
    let mut out = Map::new();
    let Some(props) = &schema.properties else {
        return Ok(Value::Object(out));
    };

    for (key, prop) in props {
        let node = collapse_union(prop)?;

        if node.kind == Some(TypeTag::Object) && node.properties.is_some() {
            out.insert(key.clone(), derive_defaults(&node)?);
            continue;
        }

        if let Some(default) = &node.default {
            out.insert(key.clone(), default.clone());
        } else if let Some(v) = empty_value(&node, schema.is_required(key)) {
            out.insert(key.clone(), v);
        }
    }

    Ok(Value::Object(out))
}

/// Deep-merge caller-supplied partial initial data over derived
/// defaults. The caller wins at every level; objects merge recursively,
/// everything else replaces.
pub fn merge_defaults(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => {
            let mut out = b.clone();
            for (key, ov) in o {
                let merged = match b.get(key) {
                    Some(bv) => merge_defaults(bv, ov),
                    None => ov.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        _ => overlay.clone(),
    }
}
