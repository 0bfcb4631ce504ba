/// Path-addressed access to nested `serde_json::Value` trees.
///
/// A path is an ordered sequence of property keys; its dot-joined form
/// is the stable identity used to correlate a field with its issues and
/// dirty/touched membership. Writes rebuild the spine copy-on-write and
/// carry sibling branches over untouched; "no value yet" is an absent
/// key, which `remove` restores.
use serde_json::{Map, Value};

/// Stable identity of a path: keys joined with `.`.
pub fn dot_join<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// Read the value at `path`. `None` for any missing segment or
/// non-object intermediate; the empty path is the tree itself.
pub fn get<'a, S: AsRef<str>>(tree: &'a Value, path: &[S]) -> Option<&'a Value> {
    let mut current = tree;
    for key in path {
        current = current.as_object()?.get(key.as_ref())?;
    }
    Some(current)
}

/// Replace the value at `path`, creating intermediate objects as needed.
/// The empty path returns the input unchanged.
pub fn set<S: AsRef<str>>(tree: &Value, path: &[S], value: Value) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return tree.clone();
    };

    let mut map = match tree.as_object() {
        Some(m) => m.clone(),
        None => Map::new(),
    };

    if rest.is_empty() {
        map.insert(first.as_ref().to_string(), value);
    } else {
        let child = map.get(first.as_ref()).cloned().unwrap_or(Value::Null);
        map.insert(first.as_ref().to_string(), set(&child, rest, value));
    }

    Value::Object(map)
}

/// Delete the key at `path`, restoring the absent ("no value yet")
/// state. Missing intermediates make this a structural no-op.
pub fn remove<S: AsRef<str>>(tree: &Value, path: &[S]) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return tree.clone();
    };

    let Some(obj) = tree.as_object() else {
        return tree.clone();
    };

    let mut map = obj.clone();
    if rest.is_empty() {
        map.remove(first.as_ref());
    } else if let Some(child) = obj.get(first.as_ref()) {
        map.insert(first.as_ref().to_string(), remove(child, rest));
    }

    Value::Object(map)
}
