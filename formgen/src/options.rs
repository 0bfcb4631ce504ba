/// The caller-facing configuration bag. Everything has a sensible
/// default; hosts set only what they need.
use crate::phone::{PassthroughKit, PhoneNumberKit};
use serde_json::Value;
use std::fmt;

/// Where form-level error banners render relative to fields and buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormErrorPosition {
    Top,
    #[default]
    AboveButtons,
    Bottom,
}

/// How many issues a single field displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShowFieldErrors {
    #[default]
    All,
    First,
}

/// Flags handed to the error-visibility predicate for one field.
#[derive(Debug, Clone)]
pub struct ErrorVisibility {
    pub form_is_touched: bool,
    pub form_is_dirty: bool,
    pub form_has_error: bool,
    pub field_value: Value,
    pub field_is_touched: bool,
    pub field_is_dirty: bool,
    pub field_has_error: bool,
    pub submission_attempted: bool,
}

pub type ShowErrorWhen = Box<dyn Fn(&ErrorVisibility) -> bool + Send + Sync>;

/// Default policy: show errors after a submission attempt, or once the
/// form is dirty and this particular field has been touched.
pub fn default_show_error_when(v: &ErrorVisibility) -> bool {
    v.submission_attempted || (v.form_is_dirty && v.field_is_touched)
}

/// A named secondary button (cancel, back, ...). The submit button is
/// configured separately.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryButton {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonsConfig {
    pub submit_label: String,
    /// Label shown while a submission is in flight.
    pub busy_label: String,
    pub secondary: Vec<SecondaryButton>,
}

impl Default for ButtonsConfig {
    fn default() -> ButtonsConfig {
        ButtonsConfig {
            submit_label: "Submit".to_string(),
            busy_label: "Submitting...".to_string(),
            secondary: Vec::new(),
        }
    }
}

/// Configuration of tel fields: which countries are selectable and which
/// library does the parsing/formatting.
pub struct PhoneFieldOptions {
    /// Empty means every country the kit knows about.
    pub allowed_countries: Vec<String>,
    pub default_country: String,
    /// Pinned to the top of the country selector.
    pub common_countries: Vec<String>,
    pub kit: Box<dyn PhoneNumberKit + Send + Sync>,
}

impl Default for PhoneFieldOptions {
    fn default() -> PhoneFieldOptions {
        PhoneFieldOptions {
            allowed_countries: Vec::new(),
            default_country: "US".to_string(),
            common_countries: Vec::new(),
            kit: Box::new(PassthroughKit),
        }
    }
}

impl fmt::Debug for PhoneFieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneFieldOptions")
            .field("allowed_countries", &self.allowed_countries)
            .field("default_country", &self.default_country)
            .field("common_countries", &self.common_countries)
            .finish_non_exhaustive()
    }
}

/// Everything the caller can tune about a form.
pub struct FormOptions {
    pub form_error_position: FormErrorPosition,
    pub show_field_errors: ShowFieldErrors,
    /// Overrides the default visibility policy when set.
    pub show_field_error_when: Option<ShowErrorWhen>,
    pub show_required_asterisk: bool,
    pub prevent_leaving_when_dirty: bool,
    pub reset_after_submission: bool,
    pub debug: bool,
    /// Disables every control and blocks submission.
    pub disabled: bool,
    pub buttons: ButtonsConfig,
    pub phone: PhoneFieldOptions,
}

impl Default for FormOptions {
    fn default() -> FormOptions {
        FormOptions {
            form_error_position: FormErrorPosition::default(),
            show_field_errors: ShowFieldErrors::default(),
            show_field_error_when: None,
            show_required_asterisk: false,
            prevent_leaving_when_dirty: false,
            reset_after_submission: false,
            debug: false,
            disabled: false,
            buttons: ButtonsConfig::default(),
            phone: PhoneFieldOptions::default(),
        }
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("form_error_position", &self.form_error_position)
            .field("show_field_errors", &self.show_field_errors)
            .field("show_required_asterisk", &self.show_required_asterisk)
            .field("prevent_leaving_when_dirty", &self.prevent_leaving_when_dirty)
            .field("reset_after_submission", &self.reset_after_submission)
            .field("debug", &self.debug)
            .field("disabled", &self.disabled)
            .field("buttons", &self.buttons)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

impl FormOptions {
    /// Evaluate the visibility policy for one field.
    pub fn error_visible(&self, v: &ErrorVisibility) -> bool {
        match &self.show_field_error_when {
            Some(predicate) => predicate(v),
            None => default_show_error_when(v),
        }
    }
}
