/// Default HTML emission, one function per slot role. The `FormSlots`
/// trait methods delegate here, so hosts that override one role still
/// get the built-in markup for the rest.
use crate::fields::types::*;
use crate::render::writer::{escape_html, MarkupWriter};
use crate::render::{ButtonProps, FormSlots};
use crate::state::Issue;

/// DOM id of a field control, derived from its dot path.
pub fn field_id(dot_path: &str) -> String {
    format!("formgen-{}", dot_path.replace('.', "-"))
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_html(value));
    out.push('"');
}

fn push_flag(out: &mut String, name: &str) {
    out.push(' ');
    out.push_str(name);
}

/// Identity, constraint and state attributes every control carries.
fn common_attrs(c: &FieldCommon) -> String {
    let id = field_id(&c.dot_path);
    let mut a = String::new();
    push_attr(&mut a, "id", &id);
    push_attr(&mut a, "name", &c.dot_path);
    if let Some(p) = &c.placeholder {
        push_attr(&mut a, "placeholder", p);
    }
    if let Some(m) = &c.input_mode {
        push_attr(&mut a, "inputmode", m);
    }
    if let Some(ac) = &c.auto_complete {
        push_attr(&mut a, "autocomplete", ac);
    }
    if c.required {
        push_flag(&mut a, "required");
        push_attr(&mut a, "aria-required", "true");
    }
    if c.disabled {
        push_flag(&mut a, "disabled");
    }
    if c.read_only {
        push_flag(&mut a, "readonly");
    }
    if c.invalid {
        push_attr(&mut a, "aria-invalid", "true");
    }
    if !c.errors.is_empty() {
        push_attr(&mut a, "aria-describedby", &format!("{id}-errors"));
    }
    if c.dirty {
        push_flag(&mut a, "data-dirty");
    }
    if c.touched {
        push_flag(&mut a, "data-touched");
    }
    if c.has_error {
        push_flag(&mut a, "data-error");
    }
    a
}

/// Standard field chrome: label, description, the control, then the
/// error list the control's aria-describedby points at.
fn wrap_field<S: FormSlots + ?Sized>(
    slots: &S,
    c: &FieldCommon,
    marker: &str,
    control: &str,
) -> String {
    let mut w = MarkupWriter::new();
    w.open(&format!("<div {marker}=\"\">"));
    w.fragment(&slots.label(c));
    if c.description.is_some() {
        w.fragment(&slots.description(c));
    }
    w.fragment(control);
    if !c.errors.is_empty() {
        w.open(&format!("<div id=\"{}-errors\">", field_id(&c.dot_path)));
        for issue in &c.errors {
            w.fragment(&slots.field_error(issue));
        }
        w.close("div");
    }
    w.close("div");
    w.finish()
}

pub(crate) fn label(c: &FieldCommon) -> String {
    let asterisk = if c.required && c.show_required_asterisk {
        "<span aria-hidden=\"true\">*</span>"
    } else {
        ""
    };
    format!(
        "<label for=\"{}\">{}{asterisk}</label>",
        field_id(&c.dot_path),
        escape_html(&c.label)
    )
}

pub(crate) fn description(c: &FieldCommon) -> String {
    format!(
        "<p data-formgen-description=\"\">{}</p>",
        escape_html(c.description.as_deref().unwrap_or(""))
    )
}

pub(crate) fn field_error(issue: &Issue) -> String {
    format!(
        "<p {DATA_FIELD_ERROR}=\"\">{}</p>",
        escape_html(&issue.message)
    )
}

pub(crate) fn form_error(issue: &Issue) -> String {
    format!(
        "<p {DATA_FORM_ERROR}=\"\">{}</p>",
        escape_html(&issue.message)
    )
}

pub(crate) fn text_input<S: FormSlots + ?Sized>(slots: &S, p: &TextInputProps) -> String {
    let mut a = String::new();
    push_attr(&mut a, "type", p.kind.as_str());
    a.push_str(&common_attrs(&p.common));
    push_attr(&mut a, "value", &p.value);
    if let Some(n) = p.min_length {
        push_attr(&mut a, "minlength", &n.to_string());
    }
    if let Some(n) = p.max_length {
        push_attr(&mut a, "maxlength", &n.to_string());
    }
    if let Some(pattern) = &p.pattern {
        push_attr(&mut a, "pattern", pattern);
    }
    wrap_field(slots, &p.common, DATA_INPUT, &format!("<input{a}>"))
}

pub(crate) fn number_input<S: FormSlots + ?Sized>(slots: &S, p: &NumberInputProps) -> String {
    let mut a = String::new();
    push_attr(&mut a, "type", "number");
    a.push_str(&common_attrs(&p.common));
    push_attr(&mut a, "value", &p.value);
    if let Some(n) = p.minimum {
        push_attr(&mut a, "min", &n.to_string());
    }
    if let Some(n) = p.maximum {
        push_attr(&mut a, "max", &n.to_string());
    }
    wrap_field(slots, &p.common, DATA_INPUT, &format!("<input{a}>"))
}

pub(crate) fn checkbox<S: FormSlots + ?Sized>(slots: &S, p: &CheckboxProps) -> String {
    let mut a = String::new();
    push_attr(&mut a, "type", "checkbox");
    a.push_str(&common_attrs(&p.common));
    if p.checked {
        push_flag(&mut a, "checked");
    }

    // Checkboxes put the control first and the label beside it.
    let mut w = MarkupWriter::new();
    w.open(&format!("<div {DATA_CHECKBOX}=\"\">"));
    w.line(&format!("<input{a}>"));
    w.fragment(&slots.label(&p.common));
    if p.common.description.is_some() {
        w.fragment(&slots.description(&p.common));
    }
    if !p.common.errors.is_empty() {
        w.open(&format!(
            "<div id=\"{}-errors\">",
            field_id(&p.common.dot_path)
        ));
        for issue in &p.common.errors {
            w.fragment(&slots.field_error(issue));
        }
        w.close("div");
    }
    w.close("div");
    w.finish()
}

pub(crate) fn select<S: FormSlots + ?Sized>(slots: &S, p: &SelectProps) -> String {
    let mut a = String::new();
    a.push_str(&common_attrs(&p.common));

    let mut control = MarkupWriter::new();
    control.open(&format!("<select{a}>"));

    // Unselectable default: required fields can't pick it back.
    let mut d = String::new();
    push_attr(&mut d, "value", "");
    if p.common.required {
        push_flag(&mut d, "disabled");
        push_flag(&mut d, "hidden");
    }
    if p.value.is_empty() {
        push_flag(&mut d, "selected");
    }
    control.line(&format!("<option{d}>Select an option...</option>"));

    for opt in &p.options {
        let mut o = String::new();
        push_attr(&mut o, "value", &opt.value);
        if opt.value == p.value {
            push_flag(&mut o, "selected");
        }
        control.line(&format!("<option{o}>{}</option>", escape_html(&opt.label)));
    }
    control.close("select");

    wrap_field(slots, &p.common, DATA_SELECT, &control.finish())
}

pub(crate) fn phone_input<S: FormSlots + ?Sized>(slots: &S, p: &PhoneInputProps) -> String {
    let mut control = MarkupWriter::new();
    control.open(&format!("<div {DATA_INPUT_PHONE}=\"\">"));

    let mut s = String::new();
    push_attr(&mut s, "aria-label", "Phone country code");
    push_attr(&mut s, "autocomplete", "country");
    if p.common.disabled {
        push_flag(&mut s, "disabled");
    }
    control.open(&format!("<select{s}>"));
    for group in [&p.common_countries, &p.other_countries] {
        if group.is_empty() {
            continue;
        }
        control.open("<optgroup>");
        for country in group.iter() {
            let mut o = String::new();
            push_attr(&mut o, "value", &country.code);
            if country.code == p.country {
                push_flag(&mut o, "selected");
            }
            control.line(&format!(
                "<option{o}>{} (+{})</option>",
                escape_html(&country.name),
                escape_html(&country.calling_code)
            ));
        }
        control.close("optgroup");
    }
    control.close("select");

    let mut a = String::new();
    push_attr(&mut a, "type", "tel");
    a.push_str(&common_attrs(&p.common));
    push_attr(&mut a, "value", &p.national);
    control.line(&format!("<input{a}>"));
    control.close("div");

    wrap_field(slots, &p.common, DATA_INPUT, &control.finish())
}

pub(crate) fn button(p: &ButtonProps) -> String {
    let mut a = String::new();
    push_attr(&mut a, "type", if p.submit { "submit" } else { "button" });
    if let Some(name) = &p.name {
        push_attr(&mut a, "name", name);
    }
    if p.disabled {
        push_flag(&mut a, "disabled");
    }
    if p.busy {
        push_flag(&mut a, "data-busy");
    }
    format!("<button{a}>{}</button>", escape_html(&p.label))
}

pub(crate) fn button_container(body: &str) -> String {
    let mut w = MarkupWriter::new();
    w.open("<div data-formgen-buttons=\"\">");
    w.fragment(body);
    w.close("div");
    w.finish()
}

pub(crate) fn fieldset<S: FormSlots + ?Sized>(
    slots: &S,
    props: &FieldsetProps,
    children: &str,
) -> String {
    let mut w = MarkupWriter::new();
    w.open(&format!(
        "<fieldset {DATA_FIELDSET}=\"\" name=\"{}\">",
        escape_html(&props.dot_path)
    ));
    if let Some(legend) = &props.legend {
        w.line(&format!("<legend>{}</legend>", escape_html(legend)));
    }
    for issue in &props.errors {
        w.fragment(&slots.form_error(issue));
    }
    w.fragment(children);
    w.close("fieldset");
    w.finish()
}

pub(crate) fn form(body: &str) -> String {
    let mut w = MarkupWriter::new();
    w.open(&format!("<form {DATA_FORM}=\"\" novalidate>"));
    w.fragment(body);
    w.close("form");
    w.finish()
}
