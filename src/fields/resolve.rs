//! Field path resolution against a [`BindingContext`].
//!
//! [`resolve`] never fails. Each strategy below is tried in order and the
//! first non-empty string wins; if none produces one the result is `""`.
//!
//! 1. normalize a bare `CustomFieldNN` path to `Employee.CustomField.CustomFieldNN`
//! 2. `ctx[path]`
//! 3. the normalized path, as a key and as a dotted walk
//! 4. for custom-field slots, the zero-padded and unpadded suffix spellings
//! 5. for `FullName`: `FullName`, then `Name + SurName`, then `EmployeeName`
//! 6. dotted walk of the original path
//! 7. for `Employee.<key>`, the flattened `<key>` (computed names live there)
//! 8. `""`

use serde_json::Value;
use tracing::debug;

use super::context::{BindingContext, full_name_of};
use super::path::{CUSTOM_FIELD_PATH, custom_field_variants, normalize_field_path};

/// Object keys tried, in order, when an object must be shown as text.
pub const DISPLAY_NAME_KEYS: &[&str] = &[
    "CompanyName",
    "DepartmentName",
    "FacultyName",
    "Name",
    "Text",
];

const EMPLOYEE_PREFIX: &str = "Employee.";

/// Resolve a field path to its display string. Misses yield `""`.
pub fn resolve(path: &str, ctx: Option<&BindingContext>) -> String {
    let Some(ctx) = ctx else {
        return String::new();
    };
    let path = path.trim();
    if path.is_empty() {
        return String::new();
    }

    let normalized = normalize_field_path(path);

    if let Some(value) = lookup(ctx, path) {
        return value;
    }

    if normalized != path
        && let Some(value) = lookup(ctx, &normalized).or_else(|| walk(ctx, &normalized))
    {
        return value;
    }

    for variant in custom_field_variants(&normalized) {
        let nested = format!("{}.{}", CUSTOM_FIELD_PATH, variant);
        if let Some(value) = lookup(ctx, &variant).or_else(|| walk(ctx, &nested)) {
            return value;
        }
    }

    if path == "FullName"
        && let Some(value) = full_name(ctx)
    {
        return value;
    }

    if let Some(value) = walk(ctx, path) {
        return value;
    }

    if let Some(key) = path.strip_prefix(EMPLOYEE_PREFIX)
        && !key.contains('.')
        && let Some(value) = lookup(ctx, key)
    {
        return value;
    }

    debug!(path, "field did not resolve");
    String::new()
}

/// Coerce a JSON value to display text.
///
/// Strings pass through, numbers and booleans are formatted, objects use the
/// first non-empty [`DISPLAY_NAME_KEYS`] entry. Everything else is `""`.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(obj) => DISPLAY_NAME_KEYS
            .iter()
            .filter_map(|key| obj.get(*key))
            .filter(|v| !v.is_object() && !v.is_array())
            .map(display_string)
            .find(|s| !s.is_empty())
            .unwrap_or_default(),
        Value::Null | Value::Array(_) => String::new(),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Direct key lookup.
fn lookup(ctx: &BindingContext, key: &str) -> Option<String> {
    ctx.get(key).map(display_string).and_then(non_empty)
}

/// Walk `a.b.c` through nested objects; any missing or non-object segment
/// short-circuits to `None`.
fn walk(ctx: &BindingContext, path: &str) -> Option<String> {
    if !path.contains('.') {
        return None;
    }
    let mut segments = path.split('.');
    let mut current = ctx.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    non_empty(display_string(current))
}

fn full_name(ctx: &BindingContext) -> Option<String> {
    if let Some(name) = lookup(ctx, "FullName") {
        return Some(name);
    }
    let map: serde_json::Map<String, Value> = ["Name", "SurName"]
        .iter()
        .filter_map(|k| ctx.get(k).map(|v| (k.to_string(), v.clone())))
        .collect();
    non_empty(full_name_of(&map)).or_else(|| lookup(ctx, "EmployeeName"))
}
