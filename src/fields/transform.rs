//! Text case transformation for labels.

use crate::document::TextTransform;

/// Apply a [`TextTransform`] to a display value.
///
/// `Capitalize` lowercases everything, then uppercases the first letter of
/// the string and every letter directly after whitespace or a period.
pub fn text_transform(value: &str, mode: TextTransform) -> String {
    match mode {
        TextTransform::None => value.to_string(),
        TextTransform::Upper => value.to_uppercase(),
        TextTransform::Lower => value.to_lowercase(),
        TextTransform::Capitalize => capitalize(value),
    }
}

fn capitalize(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut boundary = true;
    for c in value.to_lowercase().chars() {
        if boundary && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        boundary = c.is_whitespace() || c == '.';
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(text_transform("ada LOVELACE", TextTransform::Capitalize), "Ada Lovelace");
        assert_eq!(text_transform("j.r.r. tolkien", TextTransform::Capitalize), "J.R.R. Tolkien");
        assert_eq!(text_transform("  two  spaces", TextTransform::Capitalize), "  Two  Spaces");
        assert_eq!(text_transform("ömer çelik", TextTransform::Capitalize), "Ömer Çelik");
        assert_eq!(text_transform("", TextTransform::Capitalize), "");
    }

    #[test]
    fn test_other_modes() {
        assert_eq!(text_transform("Ada", TextTransform::None), "Ada");
        assert_eq!(text_transform("Ada", TextTransform::Upper), "ADA");
        assert_eq!(text_transform("Ada", TextTransform::Lower), "ada");
    }
}
