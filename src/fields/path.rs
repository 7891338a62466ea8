//! Field path helpers: legacy custom-field normalization and suffix variants.
//!
//! Older templates bind custom fields with a bare `CustomField07` path; newer
//! ones use `Employee.CustomField.CustomField07`. Loaders normalize the
//! former into the latter and writers only ever emit the latter.

/// Prefix of the normalized custom-field path.
pub const CUSTOM_FIELD_PATH: &str = "Employee.CustomField";

/// Bare name prefix of a custom-field slot.
pub const CUSTOM_FIELD_PREFIX: &str = "CustomField";

/// Parse `CustomField<digits>` and return the numeric suffix.
///
/// Only matches the whole string, so `Employee.CustomField.CustomField07`
/// returns `None` (use [`custom_field_number`] for the last segment).
pub fn bare_custom_field(path: &str) -> Option<u32> {
    let digits = path.strip_prefix(CUSTOM_FIELD_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Numeric suffix of the last path segment when it is a custom-field slot.
pub fn custom_field_number(path: &str) -> Option<u32> {
    let last = path.rsplit('.').next().unwrap_or(path);
    bare_custom_field(last)
}

/// Canonical slot name: `CustomField01`.
pub fn custom_field_name(number: u32) -> String {
    format!("{}{:02}", CUSTOM_FIELD_PREFIX, number)
}

/// Normalize a legacy bare `CustomFieldNN` path to its nested form.
///
/// Every other path is returned unchanged, so normalizing twice equals
/// normalizing once.
pub fn normalize_field_path(path: &str) -> String {
    let trimmed = path.trim();
    if bare_custom_field(trimmed).is_some() {
        format!("{}.{}", CUSTOM_FIELD_PATH, trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Zero-padded and unpadded spellings of a custom-field slot name.
///
/// `CustomField7` and `CustomField07` both yield `["CustomField07", "CustomField7"]`.
/// Returns an empty list for non custom-field paths.
pub fn custom_field_variants(path: &str) -> Vec<String> {
    let Some(number) = custom_field_number(path) else {
        return Vec::new();
    };
    let padded = custom_field_name(number);
    let unpadded = format!("{}{}", CUSTOM_FIELD_PREFIX, number);
    if padded == unpadded {
        vec![padded]
    } else {
        vec![padded, unpadded]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_custom_field() {
        assert_eq!(bare_custom_field("CustomField07"), Some(7));
        assert_eq!(bare_custom_field("CustomField12"), Some(12));
        assert_eq!(bare_custom_field("CustomField"), None);
        assert_eq!(bare_custom_field("CustomFieldX"), None);
        assert_eq!(bare_custom_field("Employee.CustomField.CustomField07"), None);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_field_path("CustomField03"),
            "Employee.CustomField.CustomField03"
        );
        assert_eq!(normalize_field_path("Employee.Name"), "Employee.Name");
        assert_eq!(normalize_field_path("TagCode"), "TagCode");
        assert_eq!(normalize_field_path(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for path in ["CustomField3", "CustomField03", "FullName", "Employee.CustomField.CustomField9", ""] {
            let once = normalize_field_path(path);
            assert_eq!(normalize_field_path(&once), once);
        }
    }

    #[test]
    fn test_variants() {
        assert_eq!(
            custom_field_variants("Employee.CustomField.CustomField7"),
            vec!["CustomField07", "CustomField7"]
        );
        assert_eq!(custom_field_variants("CustomField07"), vec!["CustomField07", "CustomField7"]);
        assert_eq!(custom_field_variants("CustomField12"), vec!["CustomField12"]);
        assert!(custom_field_variants("Employee.Name").is_empty());
    }
}
