//! Field rules shared by the form-backed handlers.
//!
//! Each helper reads one key from a [`FormData`], records any problem in the
//! caller's [`FieldErrors`] and returns the value in the shape the DTOs want.

use staydesk_core::fields::{self, FieldErrors};
use validator::ValidateEmail;

use crate::form::FormData;

/// A value that must be present and non-blank (create semantics).
pub fn required_text(
    form: &FormData,
    errors: &mut FieldErrors,
    key: &str,
    max_chars: usize,
) -> Option<String> {
    let reported = errors.messages(key).len();
    let value = form.text(key, errors);
    if errors.messages(key).len() > reported {
        return None;
    }
    fields::check_required(errors, key, value.as_deref());
    fields::check_max_chars(errors, key, value.as_deref(), max_chars);
    value.filter(|v| !v.is_empty())
}

/// A value that may be omitted but not blanked (update semantics).
pub fn sometimes_text(
    form: &FormData,
    errors: &mut FieldErrors,
    key: &str,
    max_chars: usize,
) -> Option<String> {
    if !form.has(key) {
        return None;
    }
    required_text(form, errors, key, max_chars)
}

/// An optional value for a column with a default. Blank reads as absent.
pub fn optional_text(
    form: &FormData,
    errors: &mut FieldErrors,
    key: &str,
    max_chars: usize,
) -> Option<String> {
    let value = form.text(key, errors).filter(|v| !v.is_empty());
    fields::check_max_chars(errors, key, value.as_deref(), max_chars);
    value
}

/// An optional value for a nullable column. Blank or `null` clears it.
pub fn nullable_text(
    form: &FormData,
    errors: &mut FieldErrors,
    key: &str,
    max_chars: Option<usize>,
) -> Option<Option<String>> {
    let value = form.nullable_text(key, errors);
    if let (Some(max), Some(Some(v))) = (max_chars, &value) {
        fields::check_max_chars(errors, key, Some(v), max);
    }
    value
}

/// Record an error unless `value` is absent or a valid e-mail address.
pub fn check_email(errors: &mut FieldErrors, key: &str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.validate_email() {
            errors.add(key, fields::not_email(key));
        }
    }
}

/// Whether a login identifier should be matched as an e-mail address.
pub fn looks_like_email(value: &str) -> bool {
    value.validate_email()
}
