/// The recursive walk: for every schema property, collapse its union,
/// decide the rendering category, and emit an input descriptor bound to
/// the form state. This is the dispatcher the whole engine hangs off.
use crate::fields::context::FieldContext;
use crate::fields::types::*;
use crate::normalize::{collapse_union, NormalizeError};
use crate::options::ErrorVisibility;
use crate::path;
use crate::phone::PhoneFieldState;
use crate::schema::{InputHint, SchemaNode, TypeTag};
use crate::state::Issue;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(
        "unsupported input type {kind:?} (hint {hint:?}) at '{dot_path}': \
         cannot generate an input for this schema"
    )]
    UnsupportedType {
        kind: Option<TypeTag>,
        hint: Option<InputHint>,
        dot_path: String,
    },
    #[error("no field at path '{dot_path}'")]
    UnknownField { dot_path: String },
}

/// Walk one container's properties and emit its field nodes.
pub fn generate_fields(
    schema: &SchemaNode,
    ctx: &FieldContext,
) -> Result<Vec<FieldNode>, GenerateError> {
    let Some(properties) = &schema.properties else {
        return Ok(Vec::new());
    };

    let mut out = Vec::new();

    for (key, prop) in properties {
        let node = collapse_union(prop)?;

        // Nothing to render for a type-less or pure-null property.
        match node.kind {
            None | Some(TypeTag::Null) => continue,
            _ => {}
        }

        if node.kind == Some(TypeTag::Object) && node.properties.is_some() {
            if node.meta.unwrap {
                // Children splice in directly: no chrome, no legend,
                // no container error slot.
                out.extend(generate_fields(&node, &ctx.descend(key))?);
            } else {
                let dot_path = ctx.dot_path(key);
                let errors = ctx.issues_at(&dot_path);
                let children = generate_fields(&node, &ctx.descend(key))?;
                out.push(FieldNode::Fieldset {
                    props: FieldsetProps {
                        key: key.clone(),
                        path: ctx.child_path(key),
                        dot_path,
                        legend: node.meta.title.clone(),
                        errors,
                    },
                    children,
                });
            }
            continue;
        }

        if let Some(field) = generate_leaf(schema, key, &node, ctx)? {
            out.push(field);
        }
    }

    Ok(out)
}

fn generate_leaf(
    parent: &SchemaNode,
    key: &str,
    node: &SchemaNode,
    ctx: &FieldContext,
) -> Result<Option<FieldNode>, GenerateError> {
    let common = leaf_common(parent, key, node, ctx);
    let raw = path::get(&ctx.state.data, &common.path);
    let value = display_value(raw);

    let field = match node.kind {
        Some(TypeTag::String) => {
            if let Some(enum_values) = &node.enum_values {
                if node.meta.input_hint == Some(InputHint::Radio) {
                    // Radio is its own rendering category and has no
                    // renderer yet; it deliberately emits nothing.
                    return Ok(None);
                }
                FieldNode::Select(SelectProps {
                    value,
                    options: enum_options(node, enum_values),
                    common,
                })
            } else {
                match node.meta.input_hint {
                    Some(InputHint::Tel) => phone_field(node, common, ctx),
                    Some(InputHint::Date) => FieldNode::Text(TextInputProps {
                        common,
                        kind: TextKind::Date,
                        value,
                        min_length: node.min_length,
                        max_length: node.max_length,
                        pattern: node.pattern.clone(),
                    }),
                    _ => text_field(node, common, value),
                }
            }
        }
        Some(TypeTag::Number) | Some(TypeTag::Integer) => {
            let mut common = common;
            common.input_mode = common.input_mode.or_else(|| Some("numeric".to_string()));
            FieldNode::Number(NumberInputProps {
                common,
                value,
                minimum: node.minimum,
                maximum: node.maximum,
            })
        }
        Some(TypeTag::Boolean) => FieldNode::Checkbox(CheckboxProps {
            checked: truthy(raw),
            common,
        }),
        kind => {
            // Refuse to guess at a shape there is no input for.
            return Err(GenerateError::UnsupportedType {
                kind,
                hint: node.meta.input_hint,
                dot_path: common.dot_path,
            });
        }
    };

    Ok(Some(field))
}

fn leaf_common(
    parent: &SchemaNode,
    key: &str,
    node: &SchemaNode,
    ctx: &FieldContext,
) -> FieldCommon {
    let path = ctx.child_path(key);
    let dot_path = path.join(".");
    let raw = path::get(&ctx.state.data, &path);

    let field_errors = ctx.issues_at(&dot_path);
    let flattened: Vec<Issue> = field_errors.iter().flat_map(Issue::flatten).collect();
    let has_error = !flattened.is_empty();

    let dirty = ctx.state.dirty_fields.contains(&dot_path);
    let touched = ctx.state.touched_fields.contains(&dot_path);

    let show = ctx.options.error_visible(&ErrorVisibility {
        form_is_touched: ctx.state.is_touched,
        form_is_dirty: ctx.state.is_dirty,
        form_has_error: ctx.state.has_errors(),
        field_value: raw.cloned().unwrap_or(Value::Null),
        field_is_touched: touched,
        field_is_dirty: dirty,
        field_has_error: has_error,
        submission_attempted: ctx.state.has_attempted_submit(),
    });

    FieldCommon {
        key: key.to_string(),
        label: node.meta.title.clone().unwrap_or_else(|| key.to_string()),
        description: node.meta.description.clone(),
        placeholder: node.meta.placeholder.clone(),
        auto_complete: node.meta.auto_complete.clone(),
        input_mode: node.meta.input_mode.clone(),
        required: parent.is_required(key) && !node.nullable,
        disabled: ctx.options.disabled,
        read_only: node.meta.read_only,
        show_required_asterisk: ctx.options.show_required_asterisk,
        errors: if show { flattened.clone() } else { Vec::new() },
        has_error,
        dirty,
        touched,
        invalid: show && has_error,
        path,
        dot_path,
    }
}

fn text_field(node: &SchemaNode, mut common: FieldCommon, value: String) -> FieldNode {
    let format = node.format.as_deref();

    let kind = if node.meta.input_hint == Some(InputHint::Password) {
        TextKind::Password
    } else if format == Some("email") {
        TextKind::Email
    } else {
        TextKind::Text
    };

    common.input_mode = common.input_mode.or_else(|| {
        Some(
            match format {
                Some("email") => "email",
                Some("uri") => "url",
                _ => "text",
            }
            .to_string(),
        )
    });

    FieldNode::Text(TextInputProps {
        common,
        kind,
        value,
        min_length: node.min_length,
        max_length: node.max_length,
        pattern: node.pattern.clone(),
    })
}

fn phone_field(node: &SchemaNode, mut common: FieldCommon, ctx: &FieldContext) -> FieldNode {
    let phone_options = &ctx.options.phone;

    common.input_mode = Some("tel".to_string());
    common.auto_complete = node
        .meta
        .auto_complete
        .clone()
        .or_else(|| Some("tel-national".to_string()));

    let display = ctx
        .phones
        .get(&common.dot_path)
        .cloned()
        .unwrap_or_else(|| PhoneFieldState::new(&phone_options.default_country));

    let kit = phone_options.kit.as_ref();
    let mut countries: Vec<CountryOption> = kit
        .countries()
        .into_iter()
        .filter(|c| {
            phone_options.allowed_countries.is_empty()
                || phone_options.allowed_countries.contains(c)
        })
        .map(|code| CountryOption {
            name: kit.country_name(&code).unwrap_or_else(|| code.clone()),
            calling_code: kit.calling_code(&code).unwrap_or_default(),
            code,
        })
        .collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));

    let (common_countries, other_countries) = countries
        .into_iter()
        .partition(|c| phone_options.common_countries.contains(&c.code));

    FieldNode::Phone(PhoneInputProps {
        common,
        country: display.country,
        national: display.national,
        common_countries,
        other_countries,
    })
}

fn enum_options(node: &SchemaNode, enum_values: &[Value]) -> Vec<SelectOption> {
    enum_values
        .iter()
        .map(|v| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let label = node
                .meta
                .enum_labels
                .as_ref()
                .and_then(|labels| labels.get(&value).cloned())
                .unwrap_or_else(|| value.clone());
            SelectOption { value, label }
        })
        .collect()
}
