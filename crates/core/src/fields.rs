//! Per-field validation error collection.
//!
//! Handlers and the room aggregate accumulate every problem with a request
//! before rejecting it, so the client sees all offending fields at once.
//! Serializes as `{ "field": ["message", ...] }`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

/// Ordered map of field name to the messages raised against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a rejection with exactly one message.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first message in field order, used as the envelope's summary line.
    pub fn first_message(&self) -> Option<&str> {
        self.0
            .values()
            .find_map(|msgs| msgs.first())
            .map(String::as_str)
    }

    /// `Ok(())` when nothing was collected, otherwise a validation error.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, msgs) in &self.0 {
            for msg in msgs {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {msg}")?;
                first = false;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message wording
// ---------------------------------------------------------------------------

/// Human-readable attribute name: `property_id` becomes `property id`.
pub fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

pub fn required(field: &str) -> String {
    format!("The {} field is required.", attribute(field))
}

pub fn too_long(field: &str, max_chars: usize) -> String {
    format!(
        "The {} field must not be greater than {max_chars} characters.",
        attribute(field)
    )
}

pub fn at_least(field: &str, min: i64) -> String {
    format!("The {} field must be at least {min}.", attribute(field))
}

pub fn not_integer(field: &str) -> String {
    format!("The {} field must be an integer.", attribute(field))
}

pub fn not_boolean(field: &str) -> String {
    format!("The {} field must be true or false.", attribute(field))
}

pub fn not_string(field: &str) -> String {
    format!("The {} field must be a string.", attribute(field))
}

pub fn not_image(field: &str) -> String {
    format!("The {} field must be an image.", attribute(field))
}

pub fn not_email(field: &str) -> String {
    format!("The {} field must be a valid email address.", attribute(field))
}

pub fn invalid_selection(field: &str) -> String {
    format!("The selected {} is invalid.", attribute(field))
}

/// Push a `required` error when `value` is absent or blank.
pub fn check_required(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    if value.map_or(true, |v| v.trim().is_empty()) {
        errors.add(field, required(field));
    }
}

/// Push a `too_long` error when `value` exceeds `max_chars` characters.
pub fn check_max_chars(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) {
    if value.is_some_and(|v| v.chars().count() > max_chars) {
        errors.add(field, too_long(field, max_chars));
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_collection_is_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required.");
        errors.add("images", "One room can have maximum 3 images.");
        errors.add("name", "The name must be a string.");

        assert_eq!(errors.messages("name").len(), 2);
        assert!(errors.contains("images"));
        assert!(errors.messages("description").is_empty());
    }

    #[test]
    fn first_message_follows_field_order() {
        let mut errors = FieldErrors::new();
        errors.add("name", "name problem");
        errors.add("description", "description problem");
        assert_eq!(errors.first_message(), Some("description problem"));
    }

    #[test]
    fn into_result_wraps_as_validation() {
        let result = FieldErrors::single("images", "bad").into_result();
        assert_matches!(result, Err(CoreError::Validation(e)) if e.contains("images"));
    }

    #[test]
    fn wording_uses_spaced_attribute_names() {
        assert_eq!(
            invalid_selection("property_id"),
            "The selected property id is invalid."
        );
        assert_eq!(required("name"), "The name field is required.");
        assert_eq!(at_least("sort_order", 0), "The sort order field must be at least 0.");
    }

    #[test]
    fn required_rejects_blank_values() {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, "name", Some("   "));
        check_required(&mut errors, "description", None);
        check_required(&mut errors, "title", Some("Hero"));
        assert!(errors.contains("name"));
        assert!(errors.contains("description"));
        assert!(!errors.contains("title"));
    }

    #[test]
    fn max_chars_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        check_max_chars(&mut errors, "name", Some(&"é".repeat(255)), 255);
        assert!(errors.is_empty());
        check_max_chars(&mut errors, "name", Some(&"a".repeat(256)), 255);
        assert_eq!(
            errors.messages("name"),
            ["The name field must not be greater than 255 characters."]
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let errors = FieldErrors::single("images.0", "wrong type");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "images.0": ["wrong type"] }));
    }
}
