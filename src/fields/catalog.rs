//! Field catalog: the bindable fields offered by the editor.
//!
//! Built once at editor start from the employee and card schemas plus the
//! externally configured custom-field settings, then held immutable. The
//! catalog is never persisted with a template.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use super::path::{CUSTOM_FIELD_PATH, custom_field_name, custom_field_variants, normalize_field_path};
use crate::error::{CardError, Result};

/// Synthetic entry for author-typed text.
pub const FIX_FIELD: &str = "Fix";

/// Synthetic computed full-name entry.
pub const FULL_NAME_FIELD: &str = "FullName";

/// Computed association names, set at the top level of a binding context.
pub const COMPUTED_FIELDS: &[&str] = &["DepartmentName", "FacultyName", "CompanyName"];

/// Number of generic custom-field slots used when no settings are available.
pub const FALLBACK_CUSTOM_FIELDS: u32 = 20;

/// Employee columns known to the record service.
pub const EMPLOYEE_COLUMNS: &[&str] = &[
    "EmployeeID",
    "Name",
    "SurName",
    "EmployeeName",
    "RegistrationNumber",
    "IdentificationNumber",
    "Title",
    "Email",
    "Phone",
    "BloodGroup",
    "BirthDate",
    "StartDate",
    "PictureID",
    "CompanyID",
    "FacultyID",
];

/// Card columns known to the record service.
pub const CARD_COLUMNS: &[&str] = &[
    "CardID",
    "CardCode",
    "CardUID",
    "TagCode",
    "CardTypeID",
    "ExpiryDate",
    "PersonInfo01",
    "PersonInfo02",
    "PersonInfo03",
    "PersonInfo04",
    "PersonInfo05",
    "PersonInfo06",
    "PersonInfo07",
    "PersonInfo08",
    "PersonInfo09",
    "PersonInfo10",
];

/// One bindable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub field_path: String,
    pub display_name: String,
}

impl FieldOption {
    pub fn new(field_path: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            display_name: display_name.into(),
        }
    }
}

/// One entry of the external custom-field settings list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFieldSetting {
    /// Slot name (`CustomField03`). Missing means "position in the list".
    #[serde(default, alias = "FieldName", alias = "fieldName")]
    pub field: Option<String>,
    #[serde(alias = "Label", alias = "DisplayName", alias = "displayName")]
    pub label: String,
}

impl CustomFieldSetting {
    /// Load a settings list from a JSON file.
    pub fn load(path: &Path) -> Result<Vec<Self>> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| CardError::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Immutable list of bindable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    options: Vec<FieldOption>,
}

impl FieldCatalog {
    /// Build the catalog.
    ///
    /// Columns whose name ends in `ID`/`Id` are skipped. Employee columns are
    /// namespaced `Employee.<field>`, card columns stay bare. `custom` of
    /// `None` or an empty list falls back to `CustomField01..20`.
    pub fn build(
        employee_columns: &[&str],
        card_columns: &[&str],
        custom: Option<&[CustomFieldSetting]>,
    ) -> Self {
        let mut options = vec![
            FieldOption::new(FIX_FIELD, "Fixed Text"),
            FieldOption::new(FULL_NAME_FIELD, "Full Name"),
        ];
        options.extend(
            COMPUTED_FIELDS
                .iter()
                .map(|field| FieldOption::new(*field, humanize(field))),
        );

        for column in employee_columns.iter().filter(|c| !is_key_column(c)) {
            options.push(FieldOption::new(
                format!("Employee.{}", column),
                humanize(column),
            ));
        }
        for column in card_columns.iter().filter(|c| !is_key_column(c)) {
            options.push(FieldOption::new(*column, humanize(column)));
        }

        match custom.filter(|list| !list.is_empty()) {
            Some(settings) => {
                for (index, setting) in settings.iter().enumerate() {
                    let slot = setting
                        .field
                        .as_deref()
                        .and_then(super::path::custom_field_number)
                        .unwrap_or(index as u32 + 1);
                    let label = if setting.label.trim().is_empty() {
                        humanize(&custom_field_name(slot))
                    } else {
                        setting.label.trim().to_string()
                    };
                    options.push(FieldOption::new(custom_field_path(slot), label));
                }
            }
            None => {
                for slot in 1..=FALLBACK_CUSTOM_FIELDS {
                    options.push(FieldOption::new(
                        custom_field_path(slot),
                        humanize(&custom_field_name(slot)),
                    ));
                }
            }
        }

        Self { options }
    }

    /// Catalog over the built-in employee and card schemas.
    pub fn standard(custom: Option<&[CustomFieldSetting]>) -> Self {
        Self::build(EMPLOYEE_COLUMNS, CARD_COLUMNS, custom)
    }

    /// Catalog whose custom fields come from a settings file.
    ///
    /// A missing, unreadable or empty file falls back to the generic slots.
    pub fn from_settings_file(path: Option<&Path>) -> Self {
        let settings = match path.map(CustomFieldSetting::load) {
            Some(Ok(list)) => {
                info!(count = list.len(), "loaded custom-field settings");
                Some(list)
            }
            Some(Err(e)) => {
                warn!(error = %e, "custom-field settings unavailable, using generic slots");
                None
            }
            None => None,
        };
        Self::standard(settings.as_deref())
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Human-readable name for a field path, accepting legacy spellings.
    pub fn display_name(&self, path: &str) -> Option<&str> {
        let normalized = normalize_field_path(path);
        let find = |p: &str| {
            self.options
                .iter()
                .find(|o| o.field_path == p)
                .map(|o| o.display_name.as_str())
        };
        find(&normalized)
            .or_else(|| find(path.trim()))
            .or_else(|| {
                custom_field_variants(&normalized)
                    .iter()
                    .find_map(|v| find(&format!("{}.{}", CUSTOM_FIELD_PATH, v)))
            })
            .or_else(|| find(&format!("Employee.{}", path.trim())))
    }
}

fn custom_field_path(slot: u32) -> String {
    format!("{}.{}", CUSTOM_FIELD_PATH, custom_field_name(slot))
}

/// Primary/foreign-key shaped column names.
fn is_key_column(name: &str) -> bool {
    name.ends_with("ID") || name.ends_with("Id")
}

/// `SurName` → `Sur Name`, `PersonInfo01` → `Person Info 01`.
fn humanize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        if let Some(p) = prev {
            let boundary = (c.is_uppercase() && p.is_lowercase())
                || (c.is_ascii_digit() && !p.is_ascii_digit());
            if boundary {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
