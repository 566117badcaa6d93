//! Request form extraction.
//!
//! Write endpoints accept `multipart/form-data`, `application/json` or
//! `application/x-www-form-urlencoded`. [`FormData`] normalises all three into
//! one model of text values, file parts and field presence, so each handler
//! validates a single shape regardless of how the client encoded it.
//!
//! Part names such as `images[]` or `images[2]` are folded onto their base
//! key (`images`). A file part with no file name and no content, or a JSON
//! empty array, submits a key as a file field with zero files; that is how a
//! client clears an image set. Any other non-blank value sent under a key is
//! kept as a [`FilePart::NotAFile`] so that file rules can reject it by
//! position. `null` and blank text leave a file field untouched.

use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Form;
use serde_json::Value;
use staydesk_core::fields::{self, FieldErrors};

use crate::error::AppError;

/// One uploaded file part.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, if any.
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// One entry submitted under a key, in submission order.
#[derive(Debug, Clone)]
pub enum FilePart {
    File(UploadedFile),
    /// A text or JSON value where a file could have been.
    NotAFile,
}

/// Normalised request form.
#[derive(Debug, Default)]
pub struct FormData {
    values: HashMap<String, Value>,
    parts: HashMap<String, Vec<FilePart>>,
    present: HashSet<String>,
}

/// Fold `images[]` and `images[0]` onto `images`.
fn base_key(name: &str) -> &str {
    match name.find('[') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn rejection(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(text)
    } else {
        AppError::BadRequest(text)
    }
}

impl FormData {
    /// Build from a decoded JSON body. The top level must be an object.
    pub fn from_json(value: Value) -> Result<Self, AppError> {
        let Value::Object(map) = value else {
            return Err(AppError::BadRequest(
                "Request body must be a JSON object".into(),
            ));
        };

        let mut form = Self::default();
        for (key, value) in map {
            match &value {
                Value::Null => {}
                Value::String(s) if s.trim().is_empty() => {}
                Value::Array(items) => form
                    .parts
                    .entry(key.clone())
                    .or_default()
                    .extend(items.iter().map(|_| FilePart::NotAFile)),
                _ => form.note_text_part(&key),
            }
            form.present.insert(key.clone());
            form.values.insert(key, value);
        }
        Ok(form)
    }

    /// Build from `key=value` pairs.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (name, value) in pairs {
            let key = base_key(&name).to_string();
            if !value.trim().is_empty() {
                form.note_text_part(&key);
            }
            form.present.insert(key.clone());
            form.values.insert(key, Value::String(value));
        }
        form
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let key = base_key(&name).to_string();
            form.present.insert(key.clone());

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| rejection(e.status(), e.body_text()))?;
                    let parts = form.parts.entry(key).or_default();
                    // Browsers send an empty, unnamed part for an untouched file input.
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    parts.push(FilePart::File(UploadedFile {
                        file_name: Some(file_name).filter(|n| !n.is_empty()),
                        bytes,
                    }));
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| rejection(e.status(), e.body_text()))?;
                    if !text.trim().is_empty() {
                        form.note_text_part(&key);
                    }
                    form.values.insert(key, Value::String(text));
                }
            }
        }

        Ok(form)
    }

    fn note_text_part(&mut self, key: &str) {
        self.parts
            .entry(key.to_string())
            .or_default()
            .push(FilePart::NotAFile);
    }

    /// Whether the request mentioned `key` at all.
    pub fn has(&self, key: &str) -> bool {
        self.present.contains(key)
    }

    /// Entries submitted under `key` when it is read as a file field.
    ///
    /// `None` means the field was left untouched; `Some(&[])` means it was
    /// submitted empty.
    pub fn file_parts(&self, key: &str) -> Option<&[FilePart]> {
        self.parts.get(key).map(Vec::as_slice)
    }

    /// The raw string value, untrimmed. `null` reads as an empty string and
    /// non-string JSON values are rejected.
    pub fn raw_text(&self, key: &str, errors: &mut FieldErrors) -> Option<String> {
        match self.values.get(key)? {
            Value::Null => Some(String::new()),
            Value::String(s) => Some(s.clone()),
            _ => {
                errors.add(key, fields::not_string(key));
                None
            }
        }
    }

    /// The string value, trimmed.
    pub fn text(&self, key: &str, errors: &mut FieldErrors) -> Option<String> {
        self.raw_text(key, errors).map(|s| s.trim().to_string())
    }

    /// Text for a nullable column: absent is `None`, blank or `null` is
    /// `Some(None)`.
    pub fn nullable_text(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<String>> {
        self.text(key, errors)
            .map(|s| Some(s).filter(|s| !s.is_empty()))
    }

    /// The raw JSON value, for fields that accept structured input.
    pub fn json(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Scalar text for number and boolean parsing. JSON numbers and booleans
    /// read as their literal spelling.
    fn scalar(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|value| match value {
            Value::Null => String::new(),
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        })
    }

    /// Parse a boolean. `null` and blank read as absent.
    pub fn boolean(&self, key: &str, errors: &mut FieldErrors) -> Option<bool> {
        let text = self.scalar(key).filter(|s| !s.is_empty())?;
        match parse_bool(&text) {
            Some(v) => Some(v),
            None => {
                errors.add(key, fields::not_boolean(key));
                None
            }
        }
    }

    /// Parse a base-10 integer. `null` and blank read as absent.
    pub fn integer(&self, key: &str, errors: &mut FieldErrors) -> Option<i64> {
        let text = self.scalar(key).filter(|s| !s.is_empty())?;
        match text.parse::<i64>() {
            Ok(v) => Some(v),
            Err(_) => {
                errors.add(key, fields::not_integer(key));
                None
            }
        }
    }

    /// Parse an `i32` column value, reporting out-of-range input as not an integer.
    pub fn small_integer(&self, key: &str, errors: &mut FieldErrors) -> Option<i32> {
        let value = self.integer(key, errors)?;
        match i32::try_from(value) {
            Ok(v) => Some(v),
            Err(_) => {
                errors.add(key, fields::not_integer(key));
                None
            }
        }
    }

    /// Parse a nullable id: absent is `None`, blank or `null` is `Some(None)`.
    pub fn nullable_id(&self, key: &str, errors: &mut FieldErrors) -> Option<Option<i64>> {
        let text = self.scalar(key)?;
        if text.is_empty() || text == "null" {
            return Some(None);
        }
        match text.parse::<i64>() {
            Ok(v) => Some(Some(v)),
            Err(_) => {
                errors.add(key, fields::not_integer(key));
                None
            }
        }
    }
}

/// Accepts `true/false/1/0/on/off/yes/no`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| rejection(e.status(), e.body_text()))?;
            return Ok(Self::from_pairs(pairs));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {e}")))?;
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::body::Body;
    use serde_json::json;

    use super::*;

    #[test]
    fn bracketed_names_fold_onto_base_key() {
        assert_eq!(base_key("images[]"), "images");
        assert_eq!(base_key("images[1]"), "images");
        assert_eq!(base_key("name"), "name");
    }

    #[test]
    fn booleans_accept_common_spellings() {
        for yes in ["true", "1", "on", "YES"] {
            assert_eq!(parse_bool(yes), Some(true), "{yes}");
        }
        for no in ["false", "0", "off", "No"] {
            assert_eq!(parse_bool(no), Some(false), "{no}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn json_values_are_typed_on_access() {
        let form = FormData::from_json(json!({
            "name": "  Deluxe King ",
            "is_active": false,
            "sort_order": 5,
            "property_id": null,
            "images": [],
        }))
        .unwrap();

        let mut errors = FieldErrors::new();
        assert_eq!(form.text("name", &mut errors).as_deref(), Some("Deluxe King"));
        assert_eq!(form.boolean("is_active", &mut errors), Some(false));
        assert_eq!(form.small_integer("sort_order", &mut errors), Some(5));
        assert_eq!(form.nullable_id("property_id", &mut errors), Some(None));
        assert!(form.has("images"));
        assert_eq!(form.file_parts("images").map(<[FilePart]>::len), Some(0));
        assert!(!form.has("description"));
        assert!(errors.is_empty());
    }

    #[test]
    fn json_values_under_a_file_key_are_not_files() {
        let form = FormData::from_json(json!({
            "images": ["not-a-file", "second"],
            "logo": "junk",
            "image": null,
        }))
        .unwrap();

        let images = form.file_parts("images").unwrap();
        assert_eq!(images.len(), 2);
        assert!(images.iter().all(|p| matches!(p, FilePart::NotAFile)));
        assert_eq!(form.file_parts("logo").map(<[FilePart]>::len), Some(1));
        assert!(form.file_parts("image").is_none());
    }

    #[test]
    fn text_rejects_non_string_json() {
        let form = FormData::from_json(json!({
            "description": 123,
            "name": true,
            "notes": null,
        }))
        .unwrap();

        let mut errors = FieldErrors::new();
        assert_eq!(form.text("description", &mut errors), None);
        assert_eq!(form.text("name", &mut errors), None);
        assert_eq!(form.nullable_text("notes", &mut errors), Some(None));
        assert_eq!(
            errors.messages("description"),
            ["The description field must be a string."]
        );
        assert!(errors.contains("name"));
        assert!(!errors.contains("notes"));
    }

    #[test]
    fn malformed_scalars_collect_errors() {
        let form = FormData::from_json(json!({
            "is_active": "sometimes",
            "sort_order": "first",
            "property_id": "abc",
        }))
        .unwrap();

        let mut errors = FieldErrors::new();
        assert_eq!(form.boolean("is_active", &mut errors), None);
        assert_eq!(form.small_integer("sort_order", &mut errors), None);
        assert_eq!(form.nullable_id("property_id", &mut errors), None);
        assert_eq!(
            errors.messages("is_active"),
            ["The is active field must be true or false."]
        );
        assert!(errors.contains("sort_order"));
        assert!(errors.contains("property_id"));
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(FormData::from_json(json!([1, 2, 3])).is_err());
    }

    #[tokio::test]
    async fn multipart_files_and_presence() {
        let boundary = "X-STAYDESK";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\r\n\
             Suite\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"images[]\"; filename=\"a.png\"\r\n\
             Content-Type: image/png\r\n\r\n\
             AAA\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"images[]\"; filename=\"b.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n\
             BBB\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"logo\"; filename=\"\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             \r\n\
             --{boundary}--\r\n"
        );
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let form = FormData::from_request(req, &()).await.unwrap();
        let mut errors = FieldErrors::new();
        assert_eq!(form.text("name", &mut errors).as_deref(), Some("Suite"));

        let images = form.file_parts("images").unwrap();
        assert_eq!(images.len(), 2);
        assert_matches!(&images[0], FilePart::File(f) if f.file_name.as_deref() == Some("a.png"));
        assert_matches!(&images[1], FilePart::File(f) if &f.bytes[..] == b"BBB");

        assert!(form.has("logo"));
        assert_eq!(form.file_parts("logo").map(<[FilePart]>::len), Some(0));
    }

    #[tokio::test]
    async fn multipart_text_under_a_file_key_is_kept_as_not_a_file() {
        let boundary = "X-STAYDESK";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"images[]\"\r\n\r\n\
             junk\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"logo\"\r\n\r\n\
             \r\n\
             --{boundary}--\r\n"
        );
        let req = Request::builder()
            .method("PATCH")
            .uri("/")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        let form = FormData::from_request(req, &()).await.unwrap();
        let images = form.file_parts("images").unwrap();
        assert_eq!(images.len(), 1);
        assert_matches!(images[0], FilePart::NotAFile);
        // Blank text leaves a file field untouched.
        assert!(form.has("logo"));
        assert!(form.file_parts("logo").is_none());
    }

    #[tokio::test]
    async fn empty_body_is_an_empty_form() {
        let req = Request::builder()
            .method("PATCH")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let form = FormData::from_request(req, &()).await.unwrap();
        assert!(!form.has("images"));
    }

    #[tokio::test]
    async fn urlencoded_pairs() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Welcome&is_active=on"))
            .unwrap();
        let form = FormData::from_request(req, &()).await.unwrap();
        let mut errors = FieldErrors::new();
        assert_eq!(form.text("title", &mut errors).as_deref(), Some("Welcome"));
        assert_eq!(form.boolean("is_active", &mut errors), Some(true));
    }
}
