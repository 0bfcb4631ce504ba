/// Union collapsing: rewrites an `anyOf` node into a single renderable
/// node, or refuses. A union must resolve to exactly one concrete type
/// family -- one non-null member, all-string members with compatible
/// enum-ness and format, or all-numeric members. Anything else is a
/// schema-authoring mistake and fails loudly.
use crate::schema::{SchemaNode, TypeTag};

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error(
        "cannot generate a single input for a union with mixed string formats; \
         check that union members do not mix formats (eg. email and plain strings)"
    )]
    MixedStringFormats,
    #[error("cannot generate a single input for a union mixing enum and non-enum strings")]
    MixedEnumStrings,
    #[error("unsupported union: members do not share a renderable type family")]
    UnsupportedUnion,
}

/// Collapse a union node into one renderable node.
///
/// Non-union nodes pass through untouched. One level of nested unions is
/// flattened first; the null member only contributes the `nullable` flag.
pub fn collapse_union(node: &SchemaNode) -> Result<SchemaNode, NormalizeError> {
    let members = match &node.any_of {
        None => return Ok(node.clone()),
        Some(members) => members,
    };

    // Everything on the union node except the union itself is metadata
    // that survives the merge.
    let mut metadata = node.clone();
    metadata.any_of = None;

    let flattened: Vec<&SchemaNode> = members
        .iter()
        .flat_map(|m| match &m.any_of {
            Some(inner) => inner.iter().collect::<Vec<_>>(),
            None => vec![m],
        })
        .collect();

    let nullable = flattened.iter().any(|m| m.kind == Some(TypeTag::Null));
    let non_null: Vec<&SchemaNode> = flattened
        .into_iter()
        .filter(|m| m.kind != Some(TypeTag::Null))
        .collect();

    metadata.nullable = nullable;

    if non_null.is_empty() {
        // Pure-null union: resolves to the null type, which renders nothing.
        metadata.kind = Some(TypeTag::Null);
        return Ok(metadata);
    }

    if non_null.len() == 1 {
        let mut out = overlay(metadata, non_null[0]);
        out.nullable = nullable;
        return Ok(out);
    }

    if non_null.iter().all(|m| m.kind == Some(TypeTag::String)) {
        return merge_strings(metadata, &non_null);
    }

    if non_null
        .iter()
        .all(|m| matches!(m.kind, Some(TypeTag::Number) | Some(TypeTag::Integer)))
    {
        let mut out = metadata;
        out.kind = Some(TypeTag::Number);
        out.minimum = pick(&non_null, |m| m.minimum.unwrap_or(0.0), true).minimum;
        out.maximum = pick(&non_null, |m| m.maximum.unwrap_or(f64::INFINITY), false).maximum;
        return Ok(out);
    }

    Err(NormalizeError::UnsupportedUnion)
}

fn merge_strings(
    metadata: SchemaNode,
    members: &[&SchemaNode],
) -> Result<SchemaNode, NormalizeError> {
    let first_format = members[0].format.clone();
    if members.iter().any(|m| m.format != first_format) {
        return Err(NormalizeError::MixedStringFormats);
    }

    let with_enum = members.iter().filter(|m| m.enum_values.is_some()).count();
    if with_enum > 0 && with_enum < members.len() {
        return Err(NormalizeError::MixedEnumStrings);
    }

    let mut out = metadata;
    out.kind = Some(TypeTag::String);
    out.format = first_format;

    if with_enum == members.len() {
        // Member order, duplicates preserved.
        let merged: Vec<serde_json::Value> = members
            .iter()
            .flat_map(|m| m.enum_values.clone().unwrap_or_default())
            .collect();
        out.enum_values = Some(merged);
    } else {
        // Loosest bounds win; a member without a bound counts as unbounded.
        out.min_length = pick(members, |m| m.min_length.unwrap_or(0), true).min_length;
        out.max_length = pick(members, |m| m.max_length.unwrap_or(u64::MAX), false).max_length;
    }

    Ok(out)
}

/// The member with the smallest (or largest) key; first member wins ties.
fn pick<'a, K: PartialOrd>(
    members: &[&'a SchemaNode],
    key: impl Fn(&SchemaNode) -> K,
    smallest: bool,
) -> &'a SchemaNode {
    let mut best = members[0];
    let mut best_key = key(best);
    for &m in &members[1..] {
        let k = key(m);
        let better = if smallest { k < best_key } else { k > best_key };
        if better {
            best = m;
            best_key = k;
        }
    }
    best
}

/// Layer a member's fields over the union node's metadata: the member
/// wins wherever it says something, the metadata fills the rest.
fn overlay(base: SchemaNode, member: &SchemaNode) -> SchemaNode {
    let m = member.clone();
    let mut out = base;

    out.kind = m.kind.or(out.kind);
    out.any_of = m.any_of.or(out.any_of);
    out.properties = m.properties.or(out.properties);
    if !m.required.is_empty() {
        out.required = m.required;
    }
    out.enum_values = m.enum_values.or(out.enum_values);
    out.format = m.format.or(out.format);
    out.pattern = m.pattern.or(out.pattern);
    out.min_length = m.min_length.or(out.min_length);
    out.max_length = m.max_length.or(out.max_length);
    out.minimum = m.minimum.or(out.minimum);
    out.maximum = m.maximum.or(out.maximum);
    out.default = m.default.or(out.default);

    out.meta.title = m.meta.title.or(out.meta.title);
    out.meta.description = m.meta.description.or(out.meta.description);
    out.meta.placeholder = m.meta.placeholder.or(out.meta.placeholder);
    out.meta.auto_complete = m.meta.auto_complete.or(out.meta.auto_complete);
    out.meta.input_mode = m.meta.input_mode.or(out.meta.input_mode);
    out.meta.input_hint = m.meta.input_hint.or(out.meta.input_hint);
    out.meta.unwrap = m.meta.unwrap || out.meta.unwrap;
    out.meta.read_only = m.meta.read_only || out.meta.read_only;
    out.meta.enum_labels = m.meta.enum_labels.or(out.meta.enum_labels);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(v: serde_json::Value) -> SchemaNode {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_non_union_passes_through() {
        let n = node(json!({"type": "string", "minLength": 2, "title": "Name"}));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out, n);
    }

    #[test]
    fn test_single_member_merges_metadata() {
        let n = node(json!({
            "title": "Age",
            "description": "Years",
            "anyOf": [{"type": "integer", "minimum": 0}]
        }));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.kind, Some(TypeTag::Integer));
        assert_eq!(out.minimum, Some(0.0));
        assert_eq!(out.meta.title.as_deref(), Some("Age"));
        assert_eq!(out.meta.description.as_deref(), Some("Years"));
        assert!(!out.nullable);
    }

    #[test]
    fn test_single_member_equivalent_to_member() {
        // A one-member union with no extra metadata is the member itself.
        let n = node(json!({"anyOf": [{"type": "string", "format": "email"}]}));
        let direct = node(json!({"type": "string", "format": "email"}));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out, direct);
    }

    #[test]
    fn test_null_member_sets_nullable() {
        let n = node(json!({"anyOf": [{"type": "string"}, {"type": "null"}]}));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.kind, Some(TypeTag::String));
        assert!(out.nullable);
    }

    #[test]
    fn test_nested_union_flattened_one_level() {
        let n = node(json!({
            "anyOf": [
                {"anyOf": [{"type": "string"}, {"type": "null"}]}
            ]
        }));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.kind, Some(TypeTag::String));
        assert!(out.nullable);
    }

    #[test]
    fn test_pure_null_union() {
        let n = node(json!({"anyOf": [{"type": "null"}]}));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.kind, Some(TypeTag::Null));
        assert!(out.nullable);
    }

    #[test]
    fn test_enum_union_concatenates_in_member_order() {
        let n = node(json!({
            "anyOf": [
                {"type": "string", "enum": ["b", "a"]},
                {"type": "string", "enum": ["c", "a"]}
            ]
        }));
        let out = collapse_union(&n).unwrap();
        assert_eq!(
            out.enum_values.unwrap(),
            vec![json!("b"), json!("a"), json!("c"), json!("a")]
        );
    }

    #[test]
    fn test_string_union_widens_bounds() {
        let n = node(json!({
            "anyOf": [
                {"type": "string", "minLength": 2, "maxLength": 5},
                {"type": "string", "minLength": 1, "maxLength": 10}
            ]
        }));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.kind, Some(TypeTag::String));
        assert_eq!(out.min_length, Some(1));
        assert_eq!(out.max_length, Some(10));
    }

    #[test]
    fn test_string_union_unbounded_member_wins() {
        let n = node(json!({
            "anyOf": [
                {"type": "string", "minLength": 2, "maxLength": 5},
                {"type": "string"}
            ]
        }));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.min_length, None);
        assert_eq!(out.max_length, None);
    }

    #[test]
    fn test_mixed_formats_fail() {
        let n = node(json!({
            "anyOf": [
                {"type": "string", "format": "email"},
                {"type": "string"}
            ]
        }));
        let err = collapse_union(&n).unwrap_err();
        assert!(matches!(err, NormalizeError::MixedStringFormats));
    }

    #[test]
    fn test_enum_and_non_enum_fail() {
        let n = node(json!({
            "anyOf": [
                {"type": "string", "enum": ["a"]},
                {"type": "string"}
            ]
        }));
        let err = collapse_union(&n).unwrap_err();
        assert!(matches!(err, NormalizeError::MixedEnumStrings));
    }

    #[test]
    fn test_numeric_union_widens_bounds() {
        let n = node(json!({
            "anyOf": [
                {"type": "integer", "minimum": 0, "maximum": 10},
                {"type": "number", "minimum": -1.5, "maximum": 3.0}
            ]
        }));
        let out = collapse_union(&n).unwrap();
        assert_eq!(out.kind, Some(TypeTag::Number));
        assert_eq!(out.minimum, Some(-1.5));
        assert_eq!(out.maximum, Some(10.0));
    }

    #[test]
    fn test_heterogeneous_union_fails() {
        let n = node(json!({
            "anyOf": [{"type": "string"}, {"type": "boolean"}]
        }));
        let err = collapse_union(&n).unwrap_err();
        assert!(matches!(err, NormalizeError::UnsupportedUnion));
    }
}
