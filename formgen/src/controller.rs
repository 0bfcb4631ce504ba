/// The form controller: builds the initial state once, owns every
/// mutation, and drives the submission lifecycle as an explicit
/// idle -> in-flight state machine.
///
/// All mutation is synchronous and event-driven: change, blur and submit
/// map onto the host UI's events. The single in-flight flag is the only
/// concurrency guard; a submit while one is pending is simply
/// ineffective. Dropping the controller mid-flight abandons the
/// submission -- there is nothing to cancel, the host just never calls
/// `finish_submit`.
use crate::defaults::{derive_defaults, empty_value, merge_defaults};
use crate::fields::{generate_fields, FieldContext, FieldNode, GenerateError};
use crate::normalize::{collapse_union, NormalizeError};
use crate::options::FormOptions;
use crate::path;
use crate::phone::{PhoneCommit, PhoneEdit, PhoneFieldState};
use crate::render::{render_form, ButtonProps, FormSlots, FormView, HtmlSlots};
use crate::schema::{SchemaNode, TypeTag};
use crate::state::{FormState, Issue, IssueCode};
use crate::validator::Validator;
use log::{debug, warn};
use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Raw input from a control: what the DOM event would carry.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Text(String),
    Checked(bool),
}

/// Outcome of the validation phase of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitStart {
    /// Disabled, or a submission is already in flight.
    Blocked,
    /// Validation found issues; they are committed and the handler must
    /// not run.
    Invalid,
    /// The fully-typed data to hand to the submit handler. The
    /// controller is now in flight until `finish_submit`.
    Ready(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blocked before validation; nothing happened.
    Skipped,
    /// Validation failed; the handler never ran.
    Rejected,
    Completed {
        success: bool,
    },
}

/// Where to scroll/focus after a submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorAnchor {
    /// Dot path of the first field with a visible error.
    Field(String),
    /// No field error; a form-level banner is showing.
    Form,
}

/// Collects issues the submit handler reports (server-side failures).
#[derive(Debug, Default)]
pub struct ErrorSink {
    issues: Vec<Issue>,
}

impl ErrorSink {
    /// Report a failure against a field (or the form, with an empty
    /// path). Tagged with the synthetic `custom` code.
    pub fn add<S: AsRef<str>>(&mut self, path: &[S], message: &str) {
        self.issues.push(Issue::custom(
            path.iter().map(|s| s.as_ref().to_string()).collect(),
            message,
        ));
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

#[derive(Debug)]
pub struct FormController<V: Validator> {
    validator: V,
    options: FormOptions,
    state: FormState,
    /// Snapshot the form reverts to on reset.
    initial: FormState,
    /// Display state of tel fields, keyed by dot path.
    phones: BTreeMap<String, PhoneFieldState>,
    in_flight: bool,
}

impl<V: Validator> FormController<V> {
    /// Build the initial state: derived defaults, caller-supplied
    /// partial data merged over them, then one validation pass. This
    /// happens once; later schema changes are invisible to a mounted
    /// form.
    pub fn new(
        validator: V,
        initial_data: Option<Value>,
        options: FormOptions,
    ) -> Result<FormController<V>, NormalizeError> {
        let root = collapse_union(validator.schema())?;
        let defaults = derive_defaults(&root)?;
        let data = match &initial_data {
            Some(provided) => merge_defaults(&defaults, provided),
            None => defaults,
        };

        let mut state = FormState::new(data);
        let validated = validator.validate(&state.data);
        state.record_issues(validated.issues);

        let initial = state.clone();
        Ok(FormController {
            validator,
            options,
            state,
            initial,
            phones: BTreeMap::new(),
            in_flight: false,
        })
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn schema(&self) -> &SchemaNode {
        self.validator.schema()
    }

    /// A field changed. Coerce the raw input per the field's resolved
    /// type, write it through, re-validate the whole tree and mark the
    /// field dirty.
    pub fn change<S: AsRef<str>>(&mut self, path: &[S], input: RawInput) -> Result<(), GenerateError> {
        let (node, required) = self.resolve_leaf(path)?;

        let committed = match input {
            RawInput::Checked(checked) => Some(Value::Bool(checked)),
            RawInput::Text(text) => match node.kind {
                Some(TypeTag::Integer) => parse_integer_prefix(&text)
                    .map(|n| Value::Number(Number::from(n)))
                    .or_else(|| empty_value(&node, required)),
                Some(TypeTag::Number) => parse_float_prefix(&text)
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .or_else(|| empty_value(&node, required)),
                _ => {
                    if text.is_empty() {
                        empty_value(&node, required)
                    } else {
                        Some(Value::String(text))
                    }
                }
            },
        };

        self.write(path, committed);
        Ok(())
    }

    /// An edit to either half of a tel field's composite input.
    pub fn change_phone<S: AsRef<str>>(
        &mut self,
        path: &[S],
        edit: PhoneEdit,
    ) -> Result<(), GenerateError> {
        let (node, required) = self.resolve_leaf(path)?;
        let dot_path = path::dot_join(path);

        let mut display = self
            .phones
            .get(&dot_path)
            .cloned()
            .unwrap_or_else(|| PhoneFieldState::new(&self.options.phone.default_country));
        let commit = display.apply(
            edit,
            self.options.phone.kit.as_ref(),
            &self.options.phone.allowed_countries,
        );
        self.phones.insert(dot_path, display);

        let committed = match commit {
            PhoneCommit::Value(text) if !text.is_empty() => Some(Value::String(text)),
            _ => empty_value(&node, required),
        };

        self.write(path, committed);
        Ok(())
    }

    /// A field lost focus. No-op once a submission was attempted --
    /// errors are already showing and another pass would be redundant.
    pub fn blur<S: AsRef<str>>(&mut self, path: &[S]) {
        if self.state.has_attempted_submit() {
            return;
        }

        let dot_path = path::dot_join(path);
        let validated = self.validator.validate(&self.state.data);
        self.state.record_issues(validated.issues);
        self.state.mark_touched(&dot_path);

        if self.options.debug {
            debug!("field '{dot_path}' touched");
        }
    }

    /// Validation phase of a submission. Marks the attempt, clears the
    /// error list, re-validates; on failure commits the issues and
    /// stops. On success the controller is in flight until
    /// `finish_submit`.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.options.disabled || self.in_flight {
            if self.options.debug {
                debug!("submission blocked (disabled or in flight)");
            }
            return SubmitStart::Blocked;
        }

        self.state.mark_submission_attempt();
        self.state.errors = None;

        let validated = self.validator.validate(&self.state.data);
        if !validated.is_ok() {
            warn!("submission rejected: {} issue(s)", validated.issues.len());
            self.state.record_issues(validated.issues);
            return SubmitStart::Invalid;
        }

        self.in_flight = true;
        if self.options.debug {
            debug!("submission accepted; handler pending");
        }
        let data = self.state.data.clone();
        SubmitStart::Ready(validated.value.unwrap_or(data))
    }

    /// Completion phase: clears the in-flight flag and, on success,
    /// reverts to the initial snapshot when configured to.
    pub fn finish_submit(&mut self, success: bool) {
        self.in_flight = false;
        self.state.mark_submission_attempt();

        if success && self.options.reset_after_submission {
            self.reset();
        }
    }

    /// Drive a whole submission synchronously. The handler gets the
    /// validated data and a sink for server-side failures; it returns
    /// whether the submission succeeded.
    pub fn submit<F>(&mut self, handler: F) -> SubmitOutcome
    where
        F: FnOnce(&Value, &mut ErrorSink) -> bool,
    {
        match self.begin_submit() {
            SubmitStart::Blocked => SubmitOutcome::Skipped,
            SubmitStart::Invalid => SubmitOutcome::Rejected,
            SubmitStart::Ready(data) => {
                let mut sink = ErrorSink::default();
                let success = handler(&data, &mut sink);
                self.add_errors(sink.into_issues());
                self.finish_submit(success);
                SubmitOutcome::Completed { success }
            }
        }
    }

    /// Append handler-reported issues to the current error list.
    pub fn add_errors(&mut self, issues: Vec<Issue>) {
        self.state.append_issues(issues);
    }

    /// Revert to the initial snapshot.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.phones.clear();
        if self.options.debug {
            debug!("form reset to initial state");
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Whether the submit control should be inert: disabled, in flight,
    /// or an attempted submission left schema-level field errors.
    /// Handler-reported (`custom`) issues don't count -- the user should
    /// be able to retry.
    pub fn submit_disabled(&self) -> bool {
        if self.options.disabled || self.in_flight {
            return true;
        }
        self.state.has_attempted_submit()
            && self
                .state
                .errors
                .iter()
                .flatten()
                .any(|i| !i.path.is_empty() && i.code != IssueCode::Custom)
    }

    /// True while the form is dirty and the leave guard is enabled; the
    /// host wires this to its navigation layer.
    pub fn should_block_navigation(&self) -> bool {
        self.options.prevent_leaving_when_dirty && self.state.is_dirty
    }

    /// Where to scroll after a submission attempt: the first field with
    /// a visible error, else the form-level banner if one is showing.
    pub fn first_error_anchor(&self) -> Option<ErrorAnchor> {
        let fields = self.fields().ok()?;
        if let Some(dot_path) = first_visible_field_error(&fields) {
            return Some(ErrorAnchor::Field(dot_path));
        }
        if !self.state.form_errors().is_empty() || any_fieldset_errors(&fields) {
            return Some(ErrorAnchor::Form);
        }
        None
    }

    /// Run the generator against the current state.
    pub fn fields(&self) -> Result<Vec<FieldNode>, GenerateError> {
        let root = collapse_union(self.validator.schema())?;
        let ctx = FieldContext::root(&self.state, &self.options, &self.phones);
        generate_fields(&root, &ctx)
    }

    /// Everything a rendering pass needs.
    pub fn view(&self) -> Result<FormView, GenerateError> {
        Ok(FormView {
            fields: self.fields()?,
            form_errors: self.state.form_errors().into_iter().cloned().collect(),
            error_position: self.options.form_error_position,
            buttons: self.buttons(),
        })
    }

    pub fn buttons(&self) -> Vec<ButtonProps> {
        let config = &self.options.buttons;
        let mut out = vec![ButtonProps {
            label: if self.in_flight {
                config.busy_label.clone()
            } else {
                config.submit_label.clone()
            },
            name: None,
            submit: true,
            disabled: self.submit_disabled(),
            busy: self.in_flight,
        }];
        for b in &config.secondary {
            out.push(ButtonProps {
                label: b.label.clone(),
                name: Some(b.name.clone()),
                submit: false,
                disabled: self.options.disabled,
                busy: false,
            });
        }
        out
    }

    pub fn render_with<S: FormSlots>(&self, slots: &S) -> Result<String, GenerateError> {
        Ok(render_form(&self.view()?, slots))
    }

    pub fn render_html(&self) -> Result<String, GenerateError> {
        self.render_with(&HtmlSlots)
    }

    /// The normalized leaf node at `path` and whether its parent
    /// requires it.
    fn resolve_leaf<S: AsRef<str>>(
        &self,
        path: &[S],
    ) -> Result<(SchemaNode, bool), GenerateError> {
        let mut node = collapse_union(self.validator.schema())?;
        let mut required = false;

        for key in path {
            let key = key.as_ref();
            let child = node
                .properties
                .as_ref()
                .and_then(|props| props.get(key))
                .ok_or_else(|| GenerateError::UnknownField {
                    dot_path: path::dot_join(path),
                })?;
            required = node.is_required(key);
            node = collapse_union(child)?;
        }

        Ok((node, required))
    }

    /// Commit a coerced value (or its absence), re-validate the whole
    /// tree and mark the field dirty.
    fn write<S: AsRef<str>>(&mut self, path: &[S], value: Option<Value>) {
        let dot_path = path::dot_join(path);

        self.state.data = match value {
            Some(v) => path::set(&self.state.data, path, v),
            None => path::remove(&self.state.data, path),
        };

        let validated = self.validator.validate(&self.state.data);
        let issue_count = validated.issues.len();
        self.state.record_issues(validated.issues);
        self.state.mark_dirty(&dot_path);

        if self.options.debug {
            debug!("field '{dot_path}' changed; {issue_count} issue(s)");
        }
    }
}

fn first_visible_field_error(nodes: &[FieldNode]) -> Option<String> {
    for node in nodes {
        match node {
            FieldNode::Fieldset { children, .. } => {
                if let Some(found) = first_visible_field_error(children) {
                    return Some(found);
                }
            }
            leaf => {
                if let Some(common) = leaf.common() {
                    if !common.errors.is_empty() {
                        return Some(common.dot_path.clone());
                    }
                }
            }
        }
    }
    None
}

fn any_fieldset_errors(nodes: &[FieldNode]) -> bool {
    nodes.iter().any(|node| match node {
        FieldNode::Fieldset { props, children } => {
            !props.errors.is_empty() || any_fieldset_errors(children)
        }
        _ => false,
    })
}

/// JS `parseInt` semantics: longest leading integer, or nothing.
fn parse_integer_prefix(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }

    t[..i].parse::<i64>().ok()
}

/// JS `parseFloat` semantics: longest leading decimal, or nothing.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;
    let mut digits = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    let mut end = i;
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    t[..end].parse::<f64>().ok()
}
