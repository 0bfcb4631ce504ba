/// End-to-end scenarios: the controller wired to the reference
/// validator, driven from first render through submission.
use formgen::{FormController, FormOptions, RawInput, SubmitOutcome, Validator};
use formgen_validate::BasicValidator;
use pretty_assertions::assert_eq;
use serde_json::json;

fn person_validator() -> BasicValidator {
    BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "age": {"type": "integer", "minimum": 0}
        },
        "required": ["name"]
    }))
    .unwrap()
}

fn person_form() -> FormController<BasicValidator> {
    FormController::new(person_validator(), None, FormOptions::default()).unwrap()
}

#[test]
fn test_initial_state_from_defaults() {
    let form = person_form();
    // Required name starts empty, optional age starts absent.
    assert_eq!(form.state().data, json!({"name": null}));
    // The initial validation pass already knows the form is incomplete.
    assert_eq!(form.state().errors.as_ref().unwrap().len(), 1);
    assert!(!form.state().is_dirty);
    assert!(!form.state().has_attempted_submit());
}

#[test]
fn test_submit_empty_rejects_and_never_calls_handler() {
    let mut form = person_form();
    let mut handler_ran = false;

    let outcome = form.submit(|_, _| {
        handler_ran = true;
        true
    });

    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert!(!handler_ran);

    let issues = form.state().errors.as_ref().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, vec!["name"]);
}

#[test]
fn test_fill_then_submit_succeeds() {
    let mut form = person_form();
    form.change(&["name"], RawInput::Text("Ada".into())).unwrap();
    form.change(&["age"], RawInput::Text("36".into())).unwrap();

    let mut seen = None;
    let outcome = form.submit(|data, _| {
        seen = Some(data.clone());
        true
    });

    assert_eq!(outcome, SubmitOutcome::Completed { success: true });
    assert_eq!(seen, Some(json!({"name": "Ada", "age": 36})));
}

#[test]
fn test_every_change_revalidates_the_whole_tree() {
    let mut form = person_form();

    form.change(&["name"], RawInput::Text("Ada".into())).unwrap();
    assert_eq!(form.state().errors, None);

    // Clearing commits the empty placeholder and brings the issue back.
    form.change(&["name"], RawInput::Text("".into())).unwrap();
    assert_eq!(form.state().data, json!({"name": null}));
    assert_eq!(form.state().errors.as_ref().unwrap().len(), 1);

    // An unrelated field's change still re-checks name.
    form.change(&["age"], RawInput::Text("30".into())).unwrap();
    assert_eq!(form.state().errors.as_ref().unwrap().len(), 1);
}

#[test]
fn test_clearing_numeric_field_commits_placeholder() {
    let mut form = person_form();
    form.change(&["age"], RawInput::Text("42".into())).unwrap();
    assert_eq!(form.state().data["age"], json!(42));

    form.change(&["age"], RawInput::Text("".into())).unwrap();
    // Optional integer: "no value yet", not NaN and not zero.
    assert!(form.state().data.as_object().unwrap().get("age").is_none());
    assert_eq!(form.state().errors, None);
}

#[test]
fn test_error_visibility_follows_dirty_and_touched() {
    let mut form = person_form();

    // The name issue exists from the start but stays hidden.
    let fields = form.fields().unwrap();
    let name = fields[0].common().unwrap();
    assert!(name.has_error);
    assert!(name.errors.is_empty());

    // Touch the field, then dirty the form through another field.
    form.blur(&["name"]);
    form.change(&["age"], RawInput::Text("30".into())).unwrap();

    let fields = form.fields().unwrap();
    let name = fields[0].common().unwrap();
    assert!(!name.errors.is_empty());
    assert!(name.invalid);
}

#[test]
fn test_server_reported_errors_append_and_allow_retry() {
    let validator = BasicValidator::from_json(&json!({
        "type": "object",
        "properties": {"email": {"type": "string", "format": "email"}},
        "required": ["email"]
    }))
    .unwrap();
    let mut form = FormController::new(validator, None, FormOptions::default()).unwrap();
    form.change(&["email"], RawInput::Text("ada@example.com".into()))
        .unwrap();

    let outcome = form.submit(|_, errors| {
        errors.add(&["email"], "Already taken");
        false
    });
    assert_eq!(outcome, SubmitOutcome::Completed { success: false });

    // The email field now shows the server's message.
    let fields = form.fields().unwrap();
    let email = fields[0].common().unwrap();
    assert_eq!(email.errors.len(), 1);
    assert_eq!(email.errors[0].message, "Already taken");

    // No fatal state: the user can retry.
    assert!(!form.submit_disabled());
}

#[test]
fn test_reset_after_submission_restores_snapshot() {
    let options = FormOptions {
        reset_after_submission: true,
        ..FormOptions::default()
    };
    let mut form = FormController::new(person_validator(), None, options).unwrap();

    form.change(&["name"], RawInput::Text("Ada".into())).unwrap();
    form.change(&["age"], RawInput::Text("36".into())).unwrap();
    let outcome = form.submit(|_, _| true);

    assert_eq!(outcome, SubmitOutcome::Completed { success: true });
    assert_eq!(form.state().data, json!({"name": null}));
    assert!(!form.state().is_dirty);
    assert!(form.state().dirty_fields.is_empty());
}

#[test]
fn test_initial_data_merges_over_defaults() {
    let form = FormController::new(
        person_validator(),
        Some(json!({"name": "Grace"})),
        FormOptions::default(),
    )
    .unwrap();
    assert_eq!(form.state().data, json!({"name": "Grace"}));
    assert_eq!(form.state().errors, None);
}

#[test]
fn test_validation_is_idempotent_through_the_oracle() {
    let validator = person_validator();
    let data = json!({"name": null});
    assert_eq!(validator.validate(&data), validator.validate(&data));
}

#[test]
fn test_render_html_end_to_end() {
    let mut form = person_form();
    form.submit(|_, _| true);

    let html = form.render_html().unwrap();
    assert!(html.contains("<form data-formgen-form=\"\" novalidate>"));
    assert!(html.contains("name=\"name\""));
    assert!(html.contains("type=\"number\""));
    // After the rejected submission the required-name issue is visible.
    assert!(html.contains("data-formgen-field-error"));
    assert!(html.contains("expected string, received null"));
    // The submit control is locked until the schema errors clear.
    assert!(html.contains("<button type=\"submit\" disabled>"));
}
