//! Per-record binding context.
//!
//! A raw record arrives as nested JSON shaped roughly like
//!
//! ```text
//! { "CardID": 7, "CardCode": "C-7", "TagCode": "A1B2", "PersonInfo01": "...",
//!   "Employee": { "Name": "Ada", "SurName": "Lovelace",
//!                 "EmployeeDepartments": [ { "Department": { "DepartmentName": "R&D" } } ],
//!                 "Faculty": { "FacultyName": "Maths" }, "Company": { "CompanyName": "AE" },
//!                 "CustomField": { "CustomField01": "0+" } } }
//! ```
//!
//! and is flattened into a [`BindingContext`]: card fields, then employee
//! fields, then computed overrides, then custom-field values. Any part of the
//! record may be missing or oddly shaped; that only makes fields absent.

use serde::Serialize;
use serde_json::{Map, Value};

use super::resolve::display_string;

/// Keys of the custom-field object that are never copied into the context.
const CUSTOM_FIELD_SKIP_KEYS: &[&str] = &["EmployeeID", "Id"];

/// Straight-through card-level person info slots.
const PERSON_INFO_SLOTS: usize = 10;

/// Flattened, read-only key → value lookup for one record.
///
/// Built fresh for every record and dropped after the render pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BindingContext(Map<String, Value>);

impl BindingContext {
    /// Flatten a raw record. Non-object input yields an empty context.
    pub fn from_record(record: &Value) -> Self {
        let Some(record) = record.as_object() else {
            return Self::default();
        };

        // Card fields first; `Employee` stays available for dotted paths.
        let mut ctx = record.clone();

        let employee = record.get("Employee").and_then(Value::as_object);
        if let Some(employee) = employee {
            for (key, value) in employee {
                ctx.insert(key.clone(), value.clone());
            }
        }

        let mut set = |key: &str, value: String| {
            if !value.is_empty() {
                ctx.insert(key.to_string(), Value::String(value));
            }
        };

        if let Some(employee) = employee {
            set("FullName", full_name_of(employee));
            set("DepartmentName", department_names(employee));
            set("FacultyName", employee.get("Faculty").map(display_string).unwrap_or_default());
            set("CompanyName", employee.get("Company").map(display_string).unwrap_or_default());
        }

        for slot in 1..=PERSON_INFO_SLOTS {
            let key = format!("PersonInfo{:02}", slot);
            if let Some(value) = record.get(&key) {
                ctx.insert(key, value.clone());
            }
        }

        if let Some(custom) = custom_field_object(record, employee) {
            for (key, value) in custom {
                if !CUSTOM_FIELD_SKIP_KEYS.contains(&key.as_str()) {
                    ctx.insert(key.clone(), value.clone());
                }
            }
        }

        Self(ctx)
    }

    /// Wrap an already-flat map (used for ad-hoc contexts and tests).
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for BindingContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BindingContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// `trim(Name + " " + SurName)` over an object with those keys.
pub(crate) fn full_name_of(obj: &Map<String, Value>) -> String {
    let name = obj.get("Name").map(display_string).unwrap_or_default();
    let surname = obj.get("SurName").map(display_string).unwrap_or_default();
    format!("{} {}", name, surname).trim().to_string()
}

/// Comma-joined distinct department names from `EmployeeDepartments[].Department`.
fn department_names(employee: &Map<String, Value>) -> String {
    let Some(links) = employee.get("EmployeeDepartments").and_then(Value::as_array) else {
        return String::new();
    };
    let mut names: Vec<String> = Vec::new();
    for link in links {
        let name = link.get("Department").map(display_string).unwrap_or_default();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names.join(", ")
}

/// The custom-field object: `CustomField` or `EmployeeCustomFields`, on the
/// employee or the record, either an object or an array whose first element
/// is used.
fn custom_field_object<'a>(
    record: &'a Map<String, Value>,
    employee: Option<&'a Map<String, Value>>,
) -> Option<&'a Map<String, Value>> {
    let candidates = ["CustomField", "EmployeeCustomFields"];
    let sources = employee.into_iter().chain(std::iter::once(record));
    for source in sources {
        for key in candidates {
            let found = match source.get(key) {
                Some(Value::Object(obj)) => Some(obj),
                Some(Value::Array(list)) => list.first().and_then(Value::as_object),
                _ => None,
            };
            if found.is_some() {
                return found;
            }
        }
    }
    None
}
