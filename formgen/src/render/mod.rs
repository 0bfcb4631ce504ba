/// The pluggable rendering layer. The engine emits field descriptors;
/// slots turn them into markup. One method per presentational role, all
/// with defaults, so a host overrides only what it restyles.
pub mod html;
pub mod writer;

use crate::fields::types::{
    CheckboxProps, FieldCommon, FieldNode, FieldsetProps, NumberInputProps, PhoneInputProps,
    SelectProps, TextInputProps,
};
use crate::options::FormErrorPosition;
use crate::state::Issue;

pub use writer::{escape_html, MarkupWriter};

/// Props of one button in the button row.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
    pub label: String,
    /// `None` for the submit button, the configured name otherwise.
    pub name: Option<String>,
    pub submit: bool,
    pub disabled: bool,
    /// A submission is in flight.
    pub busy: bool,
}

/// Everything one render pass needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub fields: Vec<FieldNode>,
    /// Issues with an empty path, rendered as banners.
    pub form_errors: Vec<Issue>,
    pub error_position: FormErrorPosition,
    pub buttons: Vec<ButtonProps>,
}

/// The slot contract. Defaults emit the built-in HTML.
pub trait FormSlots {
    fn form(&self, view: &FormView, body: &str) -> String {
        let _ = view;
        html::form(body)
    }

    fn fieldset(&self, props: &FieldsetProps, children: &str) -> String {
        html::fieldset(self, props, children)
    }

    fn label(&self, common: &FieldCommon) -> String {
        html::label(common)
    }

    fn description(&self, common: &FieldCommon) -> String {
        html::description(common)
    }

    fn field_error(&self, issue: &Issue) -> String {
        html::field_error(issue)
    }

    fn form_error(&self, issue: &Issue) -> String {
        html::form_error(issue)
    }

    fn text_input(&self, props: &TextInputProps) -> String {
        html::text_input(self, props)
    }

    fn number_input(&self, props: &NumberInputProps) -> String {
        html::number_input(self, props)
    }

    fn checkbox(&self, props: &CheckboxProps) -> String {
        html::checkbox(self, props)
    }

    fn select(&self, props: &SelectProps) -> String {
        html::select(self, props)
    }

    fn phone_input(&self, props: &PhoneInputProps) -> String {
        html::phone_input(self, props)
    }

    fn button(&self, props: &ButtonProps) -> String {
        html::button(props)
    }

    fn button_container(&self, body: &str) -> String {
        html::button_container(body)
    }
}

/// The built-in renderer: every slot at its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSlots;

impl FormSlots for HtmlSlots {}

/// Render one field node, recursing through fieldsets.
pub fn render_node<S: FormSlots + ?Sized>(node: &FieldNode, slots: &S) -> String {
    match node {
        FieldNode::Fieldset { props, children } => {
            let mut inner = String::new();
            for child in children {
                inner.push_str(&render_node(child, slots));
            }
            slots.fieldset(props, &inner)
        }
        FieldNode::Text(p) => slots.text_input(p),
        FieldNode::Number(p) => slots.number_input(p),
        FieldNode::Checkbox(p) => slots.checkbox(p),
        FieldNode::Select(p) => slots.select(p),
        FieldNode::Phone(p) => slots.phone_input(p),
    }
}

/// Render the whole form: fields, form-level banners at their configured
/// position, and the button row.
pub fn render_form<S: FormSlots + ?Sized>(view: &FormView, slots: &S) -> String {
    let mut banners = String::new();
    for issue in &view.form_errors {
        banners.push_str(&slots.form_error(issue));
        banners.push('\n');
    }

    let mut fields = String::new();
    for node in &view.fields {
        fields.push_str(&render_node(node, slots));
    }

    let mut row = String::new();
    for b in &view.buttons {
        row.push_str(&slots.button(b));
        row.push('\n');
    }
    let buttons = slots.button_container(&row);

    let mut w = MarkupWriter::new();
    match view.error_position {
        FormErrorPosition::Top => {
            w.fragment(&banners);
            w.fragment(&fields);
            w.fragment(&buttons);
        }
        FormErrorPosition::AboveButtons => {
            w.fragment(&fields);
            w.fragment(&banners);
            w.fragment(&buttons);
        }
        FormErrorPosition::Bottom => {
            w.fragment(&fields);
            w.fragment(&buttons);
            w.fragment(&banners);
        }
    }

    slots.form(view, &w.finish())
}
