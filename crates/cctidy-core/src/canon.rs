//! Canonical form for configuration JSON.
//!
//! Canonicalization runs after sweeping: every object's keys are sorted in
//! lexicographic byte order, and (for settings files only) homogeneous
//! primitive arrays are sorted. Output is encoded with 2-space indentation
//! and a trailing newline; HTML characters are not escaped and numbers keep
//! their original integer/float representation.

use std::cmp::Ordering;

use serde_json::{
    Map,
    Value,
};

use crate::util::error::Error;

/// Sorts `value` into canonical form, recursively.
///
/// `sort_arrays` is false for the root file: Claude Code writes some of its
/// arrays in a meaningful (recently-used) order, so only settings files get
/// the array sort.
pub fn canonicalize(value: &mut Value, sort_arrays: bool) {
    match value {
        Value::Object(map) => {
            sort_object_keys(map);
            for child in map.values_mut() {
                canonicalize(child, sort_arrays);
            }
        },
        Value::Array(items) => {
            for child in items.iter_mut() {
                canonicalize(child, sort_arrays);
            }
            if sort_arrays {
                sort_primitive_array(items);
            }
        },
        _ => {},
    }
}

/// Encodes canonical JSON: 2-space indent, no HTML-entity escaping, trailing
/// newline.
pub fn to_canonical_bytes(value: &Value) -> Result<Vec<u8>, Error> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn sort_object_keys(map: &mut Map<String, Value>) {
    let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    for (key, value) in entries {
        map.insert(key, value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrimitiveKind {
    String,
    Number,
    Bool,
}

fn primitive_kind(value: &Value) -> Option<PrimitiveKind> {
    match value {
        Value::String(_) => Some(PrimitiveKind::String),
        Value::Number(_) => Some(PrimitiveKind::Number),
        Value::Bool(_) => Some(PrimitiveKind::Bool),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Sorts an array in place iff every element has the same primitive type.
/// Mixed arrays and arrays containing objects, arrays, or nulls keep their
/// original order. The sort is stable.
fn sort_primitive_array(items: &mut [Value]) {
    let Some(first) = items.first() else {
        return;
    };
    let Some(kind) = primitive_kind(first) else {
        return;
    };
    if !items.iter().all(|item| primitive_kind(item) == Some(kind)) {
        return;
    }

    match kind {
        PrimitiveKind::String => items.sort_by(|a, b| a.as_str().cmp(&b.as_str())),
        PrimitiveKind::Number => items.sort_by(compare_numbers),
        PrimitiveKind::Bool => items.sort_by(|a, b| a.as_bool().cmp(&b.as_bool())),
    }
}

fn compare_numbers(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}
