/// Validation issues and the per-form mutable state record.
///
/// Issues are data, never errors: the whole list is re-derived on every
/// mutation so it always reflects the current value tree. The state
/// record is replaced wholesale on each transition; there is no partial
/// update.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Instant;

/// Machine code of one validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidFormat,
    InvalidValue,
    InvalidUnion,
    /// Reported by the submit handler after the fact, not by the schema.
    Custom,
}

/// One validation failure: where, what, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
    pub code: IssueCode,
    /// Per-branch failures of a union that matched no member.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Vec<Issue>>,
}

impl Issue {
    pub fn new(path: Vec<String>, message: impl Into<String>, code: IssueCode) -> Issue {
        Issue {
            path,
            message: message.into(),
            code,
            branches: Vec::new(),
        }
    }

    pub fn custom(path: Vec<String>, message: impl Into<String>) -> Issue {
        Issue::new(path, message, IssueCode::Custom)
    }

    pub fn dot_path(&self) -> String {
        self.path.join(".")
    }

    /// A union failure reports each branch's failures; surface them as
    /// siblings rather than one nested blob. Everything else is itself.
    pub fn flatten(&self) -> Vec<Issue> {
        if self.code == IssueCode::InvalidUnion && !self.branches.is_empty() {
            self.branches.iter().flatten().cloned().collect()
        } else {
            vec![self.clone()]
        }
    }
}

/// The path-addressed record of one mounted form.
#[derive(Debug, Clone)]
pub struct FormState {
    /// Current value tree, shaped like the schema with every leaf nullable.
    pub data: Value,
    /// Issues from the last validation pass; `None` when it found none.
    pub errors: Option<Vec<Issue>>,
    pub is_dirty: bool,
    pub dirty_fields: BTreeSet<String>,
    pub is_touched: bool,
    pub touched_fields: BTreeSet<String>,
    /// When the user last attempted to submit; drives error visibility
    /// and the scroll-to-first-error anchor.
    pub last_submission_attempt: Option<Instant>,
}

impl FormState {
    pub fn new(data: Value) -> FormState {
        FormState {
            data,
            errors: None,
            is_dirty: false,
            dirty_fields: BTreeSet::new(),
            is_touched: false,
            touched_fields: BTreeSet::new(),
            last_submission_attempt: None,
        }
    }

    /// Replace the issue list wholesale; an empty list means clean.
    pub fn record_issues(&mut self, issues: Vec<Issue>) {
        self.errors = if issues.is_empty() { None } else { Some(issues) };
    }

    pub fn append_issues(&mut self, issues: Vec<Issue>) {
        if issues.is_empty() {
            return;
        }
        self.errors.get_or_insert_with(Vec::new).extend(issues);
    }

    pub fn mark_dirty(&mut self, dot_path: &str) {
        self.is_dirty = true;
        self.dirty_fields.insert(dot_path.to_string());
    }

    pub fn mark_touched(&mut self, dot_path: &str) {
        self.is_touched = true;
        self.touched_fields.insert(dot_path.to_string());
    }

    pub fn mark_submission_attempt(&mut self) {
        self.last_submission_attempt = Some(Instant::now());
    }

    pub fn has_attempted_submit(&self) -> bool {
        self.last_submission_attempt.is_some()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().map(|e| !e.is_empty()).unwrap_or(false)
    }

    /// Issues addressed to exactly this field.
    pub fn field_errors(&self, dot_path: &str) -> Vec<&Issue> {
        self.errors
            .iter()
            .flatten()
            .filter(|i| i.dot_path() == dot_path)
            .collect()
    }

    /// Issues with an empty path: form-level, rendered as a banner.
    pub fn form_errors(&self) -> Vec<&Issue> {
        self.errors
            .iter()
            .flatten()
            .filter(|i| i.path.is_empty())
            .collect()
    }

    /// Whether any issue is addressed to a specific field.
    pub fn has_field_errors(&self) -> bool {
        self.errors
            .iter()
            .flatten()
            .any(|i| !i.path.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_record_empty_is_none() {
        let mut state = FormState::new(json!({}));
        state.record_issues(vec![]);
        assert_eq!(state.errors, None);
        assert!(!state.has_errors());
    }

    #[test]
    fn test_field_and_form_errors_split() {
        let mut state = FormState::new(json!({}));
        state.record_issues(vec![
            Issue::new(vec![], "form broke", IssueCode::Custom),
            Issue::new(vec!["name".into()], "required", IssueCode::InvalidType),
        ]);
        assert_eq!(state.form_errors().len(), 1);
        assert_eq!(state.field_errors("name").len(), 1);
        assert_eq!(state.field_errors("other").len(), 0);
        assert!(state.has_field_errors());
    }

    #[test]
    fn test_flatten_union_issue() {
        let issue = Issue {
            path: vec!["pet".into()],
            message: "invalid input".into(),
            code: IssueCode::InvalidUnion,
            branches: vec![
                vec![Issue::new(vec!["pet".into()], "not a cat", IssueCode::InvalidValue)],
                vec![Issue::new(vec!["pet".into()], "not a dog", IssueCode::InvalidValue)],
            ],
        };
        let flat = issue.flatten();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].message, "not a cat");
        assert_eq!(flat[1].message, "not a dog");
    }

    #[test]
    fn test_flatten_plain_issue_is_itself() {
        let issue = Issue::new(vec!["a".into()], "nope", IssueCode::TooSmall);
        assert_eq!(issue.flatten(), vec![issue.clone()]);
    }

    #[test]
    fn test_dirty_and_touched_tracking() {
        let mut state = FormState::new(json!({}));
        assert!(!state.is_dirty);
        state.mark_dirty("a.b");
        state.mark_touched("a.b");
        assert!(state.is_dirty);
        assert!(state.is_touched);
        assert!(state.dirty_fields.contains("a.b"));
        assert!(state.touched_fields.contains("a.b"));
    }

    #[test]
    fn test_issue_serde_codes() {
        let issue = Issue::new(vec!["x".into()], "too short", IssueCode::TooSmall);
        let v = serde_json::to_value(&issue).unwrap();
        assert_eq!(v["code"], json!("too_small"));
    }
}
