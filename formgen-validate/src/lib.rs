/// Reference implementation of the engine's validation seam: a
/// structural validator over the same schema tree the engine renders
/// from. Checks type tags, required properties, string/numeric bounds,
/// patterns, formats, enum membership and unions; every failure becomes
/// a path-qualified issue, never an error.
use chrono::NaiveDate;
use formgen::schema::{InputHint, SchemaNode, TypeTag};
use formgen::state::{Issue, IssueCode};
use formgen::validator::{Validated, Validator};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug)]
pub struct BasicValidator {
    schema: SchemaNode,
}

impl BasicValidator {
    pub fn new(schema: SchemaNode) -> BasicValidator {
        BasicValidator { schema }
    }

    /// Build from the wire form of a schema.
    pub fn from_json(schema: &Value) -> Result<BasicValidator, serde_json::Error> {
        Ok(BasicValidator::new(serde_json::from_value(schema.clone())?))
    }
}

impl Validator for BasicValidator {
    fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    fn validate(&self, candidate: &Value) -> Validated {
        let mut issues = Vec::new();
        let mut path = Vec::new();
        check_node(&self.schema, Some(candidate), &mut path, &mut issues);
        if issues.is_empty() {
            Validated::ok(candidate.clone())
        } else {
            Validated::fail(issues)
        }
    }
}

fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

fn invalid_type(expected: &str, value: Option<&Value>, path: &[String]) -> Issue {
    Issue::new(
        path.to_vec(),
        format!("expected {expected}, received {}", type_name(value)),
        IssueCode::InvalidType,
    )
}

fn check_node(
    schema: &SchemaNode,
    value: Option<&Value>,
    path: &mut Vec<String>,
    issues: &mut Vec<Issue>,
) {
    // Unions validate against the raw members: the first branch that
    // passes wins; when every branch fails, one invalid_union issue
    // carries each branch's failures for the display layer to flatten.
    if let Some(members) = &schema.any_of {
        let mut branches = Vec::new();
        for member in members {
            let mut branch = Vec::new();
            check_node(member, value, path, &mut branch);
            if branch.is_empty() {
                return;
            }
            branches.push(branch);
        }
        issues.push(Issue {
            path: path.clone(),
            message: "invalid input: no union member matched".to_string(),
            code: IssueCode::InvalidUnion,
            branches,
        });
        return;
    }

    if schema.nullable && matches!(value, Some(Value::Null)) {
        return;
    }

    let Some(kind) = schema.kind else {
        return;
    };

    match kind {
        TypeTag::Object => check_object(schema, value, path, issues),
        TypeTag::String => check_string(schema, value, path, issues),
        TypeTag::Number | TypeTag::Integer => check_number(schema, kind, value, path, issues),
        TypeTag::Boolean => {
            if !matches!(value, Some(Value::Bool(_))) {
                issues.push(invalid_type("boolean", value, path));
            }
        }
        TypeTag::Null => {
            if !matches!(value, Some(Value::Null)) {
                issues.push(invalid_type("null", value, path));
            }
        }
    }
}

fn check_object(
    schema: &SchemaNode,
    value: Option<&Value>,
    path: &mut Vec<String>,
    issues: &mut Vec<Issue>,
) {
    let Some(Value::Object(map)) = value else {
        issues.push(invalid_type("object", value, path));
        return;
    };

    let Some(props) = &schema.properties else {
        return;
    };

    for (key, child) in props {
        let child_value = map.get(key);
        if child_value.is_none() && !schema.is_required(key) {
            continue;
        }
        path.push(key.clone());
        check_node(child, child_value, path, issues);
        path.pop();
    }
}

fn check_string(
    schema: &SchemaNode,
    value: Option<&Value>,
    path: &mut Vec<String>,
    issues: &mut Vec<Issue>,
) {
    let Some(Value::String(s)) = value else {
        issues.push(invalid_type("string", value, path));
        return;
    };

    if let Some(allowed) = &schema.enum_values {
        let matched = allowed.iter().any(|v| match v {
            Value::String(candidate) => candidate == s,
            other => other.to_string() == *s,
        });
        if !matched {
            let options: Vec<String> = allowed
                .iter()
                .map(|v| match v {
                    Value::String(candidate) => format!("\"{candidate}\""),
                    other => other.to_string(),
                })
                .collect();
            issues.push(Issue::new(
                path.to_vec(),
                format!("invalid option: expected one of {}", options.join(", ")),
                IssueCode::InvalidValue,
            ));
        }
        return;
    }

    let len = s.chars().count() as u64;
    if let Some(min) = schema.min_length {
        if len < min {
            issues.push(Issue::new(
                path.to_vec(),
                format!("must contain at least {min} character(s)"),
                IssueCode::TooSmall,
            ));
        }
    }
    if let Some(max) = schema.max_length {
        if len > max {
            issues.push(Issue::new(
                path.to_vec(),
                format!("must contain at most {max} character(s)"),
                IssueCode::TooBig,
            ));
        }
    }

    if let Some(pattern) = &schema.pattern {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(s) {
                    issues.push(Issue::new(
                        path.to_vec(),
                        format!("invalid string: must match pattern {pattern}"),
                        IssueCode::InvalidFormat,
                    ));
                }
            }
            Err(_) => issues.push(Issue::new(
                path.to_vec(),
                "schema pattern is not a valid regular expression".to_string(),
                IssueCode::InvalidFormat,
            )),
        }
    }

    match schema.format.as_deref() {
        Some("email") => {
            if !email_re().is_match(s) {
                issues.push(Issue::new(
                    path.to_vec(),
                    "invalid email address".to_string(),
                    IssueCode::InvalidFormat,
                ));
            }
        }
        Some("uri") => {
            if !uri_re().is_match(s) {
                issues.push(Issue::new(
                    path.to_vec(),
                    "invalid url".to_string(),
                    IssueCode::InvalidFormat,
                ));
            }
        }
        Some("date") => check_date(s, path, issues),
        _ => match schema.meta.input_hint {
            Some(InputHint::Date) => check_date(s, path, issues),
            Some(InputHint::Tel) => {
                if !e164_re().is_match(s) {
                    issues.push(Issue::new(
                        path.to_vec(),
                        "invalid phone number".to_string(),
                        IssueCode::InvalidFormat,
                    ));
                }
            }
            _ => {}
        },
    }
}

fn check_date(s: &str, path: &[String], issues: &mut Vec<Issue>) {
    if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
        issues.push(Issue::new(
            path.to_vec(),
            "invalid date: expected YYYY-MM-DD".to_string(),
            IssueCode::InvalidFormat,
        ));
    }
}

fn check_number(
    schema: &SchemaNode,
    kind: TypeTag,
    value: Option<&Value>,
    path: &mut Vec<String>,
    issues: &mut Vec<Issue>,
) {
    let Some(Value::Number(n)) = value else {
        issues.push(invalid_type(kind.as_str(), value, path));
        return;
    };

    let Some(f) = n.as_f64() else {
        return;
    };

    if kind == TypeTag::Integer && f.fract() != 0.0 {
        issues.push(Issue::new(
            path.to_vec(),
            "expected integer, received a fractional number".to_string(),
            IssueCode::InvalidType,
        ));
    }

    if let Some(min) = schema.minimum {
        if f < min {
            issues.push(Issue::new(
                path.to_vec(),
                format!("must be at least {min}"),
                IssueCode::TooSmall,
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if f > max {
            issues.push(Issue::new(
                path.to_vec(),
                format!("must be at most {max}"),
                IssueCode::TooBig,
            ));
        }
    }
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn uri_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").unwrap())
}

fn e164_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").unwrap())
}
