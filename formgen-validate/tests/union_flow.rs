/// Union-typed fields end to end: enum unions concatenate into one
/// select, invalid-union failures flatten into sibling field errors,
/// and unions the engine cannot collapse fail loudly at build time.
use formgen::{FieldNode, FormController, FormOptions, NormalizeError, RawInput};
use formgen_validate::BasicValidator;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_enum_union_renders_one_select_with_concatenated_options() {
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "size": {
                "anyOf": [
                    {"type": "string", "enum": ["xs", "s"]},
                    {"type": "string", "enum": ["m", "l"]}
                ]
            }
        },
        "required": ["size"]
    }))
    .unwrap();
    let form = FormController::new(validator, None, FormOptions::default()).unwrap();

    let fields = form.fields().unwrap();
    match &fields[0] {
        FieldNode::Select(p) => {
            let values: Vec<&str> = p.options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(values, ["xs", "s", "m", "l"]);
        }
        other => panic!("expected select, got {other:?}"),
    }
}

#[test]
fn test_union_failure_flattens_into_sibling_errors() {
    // Neither branch accepts "x": too short for one, wrong shape for
    // the other. Both failures surface side by side on the field.
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "code": {
                "anyOf": [
                    {"type": "string", "minLength": 5},
                    {"type": "string", "pattern": "^[0-9]+$"}
                ]
            }
        },
        "required": ["code"]
    }))
    .unwrap();
    let mut form = FormController::new(validator, None, FormOptions::default()).unwrap();

    form.change(&["code"], RawInput::Text("x".into())).unwrap();
    form.submit(|_, _| true);

    let fields = form.fields().unwrap();
    let common = fields[0].common().unwrap();
    assert_eq!(common.errors.len(), 2);
    assert!(common.errors[0].message.contains("at least 5"));
    assert!(common.errors[1].message.contains("pattern"));
}

#[test]
fn test_union_passes_when_any_branch_matches() {
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "code": {
                "anyOf": [
                    {"type": "string", "minLength": 5},
                    {"type": "string", "pattern": "^[0-9]+$"}
                ]
            }
        },
        "required": ["code"]
    }))
    .unwrap();
    let mut form = FormController::new(validator, None, FormOptions::default()).unwrap();

    form.change(&["code"], RawInput::Text("42".into())).unwrap();
    assert_eq!(form.state().errors, None);
}

#[test]
fn test_nullable_union_field_defaults_to_null() {
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "nickname": {"anyOf": [{"type": "string"}, {"type": "null"}]}
        },
        "required": ["nickname"]
    }))
    .unwrap();
    let form = FormController::new(validator, None, FormOptions::default()).unwrap();

    assert_eq!(form.state().data, json!({"nickname": null}));
    // Null satisfies the union, so the form starts clean.
    assert_eq!(form.state().errors, None);

    // Nullable removes the required marker from the rendered field.
    let fields = form.fields().unwrap();
    assert!(!fields[0].common().unwrap().required);
}

#[test]
fn test_mixed_format_union_fails_at_build_time() {
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "contact": {
                "anyOf": [
                    {"type": "string", "format": "email"},
                    {"type": "string"}
                ]
            }
        }
    }))
    .unwrap();
    let err = FormController::new(validator, None, FormOptions::default()).unwrap_err();
    assert!(matches!(err, NormalizeError::MixedStringFormats));
}

#[test]
fn test_heterogeneous_union_fails_at_build_time() {
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "odd": {"anyOf": [{"type": "string"}, {"type": "boolean"}]}
        }
    }))
    .unwrap();
    let err = FormController::new(validator, None, FormOptions::default()).unwrap_err();
    assert!(matches!(err, NormalizeError::UnsupportedUnion));
}
