/// The data threaded through the recursive walk: form state, options,
/// phone display registry and the path so far. Descent produces a new
/// context; nothing here mutates.
use crate::options::{FormOptions, ShowFieldErrors};
use crate::phone::PhoneFieldState;
use crate::state::{FormState, Issue};
use std::collections::BTreeMap;

pub struct FieldContext<'a> {
    pub state: &'a FormState,
    pub options: &'a FormOptions,
    pub phones: &'a BTreeMap<String, PhoneFieldState>,
    pub path: Vec<String>,
}

impl<'a> FieldContext<'a> {
    pub fn root(
        state: &'a FormState,
        options: &'a FormOptions,
        phones: &'a BTreeMap<String, PhoneFieldState>,
    ) -> FieldContext<'a> {
        FieldContext {
            state,
            options,
            phones,
            path: Vec::new(),
        }
    }

    /// Context for walking into one property.
    pub fn descend(&self, key: &str) -> FieldContext<'a> {
        let mut path = self.path.clone();
        path.push(key.to_string());
        FieldContext {
            state: self.state,
            options: self.options,
            phones: self.phones,
            path,
        }
    }

    /// Path of a child property of the current container.
    pub fn child_path(&self, key: &str) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(key.to_string());
        path
    }

    pub fn dot_path(&self, key: &str) -> String {
        self.child_path(key).join(".")
    }

    /// Issues addressed to exactly `dot_path`, truncated per options.
    pub fn issues_at(&self, dot_path: &str) -> Vec<Issue> {
        let mut found: Vec<Issue> = self
            .state
            .errors
            .iter()
            .flatten()
            .filter(|i| i.dot_path() == dot_path)
            .cloned()
            .collect();
        if self.options.show_field_errors == ShowFieldErrors::First {
            found.truncate(1);
        }
        found
    }
}
