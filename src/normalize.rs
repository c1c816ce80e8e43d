//! Record normalization
//!
//! Turns a plain document record into a [`FileObject`]. The adapter calls
//! [`Normalize::normalize`] once per record and never mutates the record.

use crate::file::FileObject;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Normalization error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("record must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Converts a document record into a file object
pub trait Normalize: Send + Sync {
    fn normalize(&self, record: &Value) -> Result<FileObject, NormalizeError>;
}

impl<F> Normalize for F
where
    F: Fn(&Value) -> Result<FileObject, NormalizeError> + Send + Sync,
{
    fn normalize(&self, record: &Value) -> Result<FileObject, NormalizeError> {
        self(record)
    }
}

/// Name of a JSON value's kind, used in error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Default normalizer producing vinyl-style file objects.
///
/// `path`, `cwd` and `base` are taken from the record when present. String
/// `contents` (or `content`) become UTF-8 bytes, arrays of byte values are
/// copied as-is and `null` leaves the file without contents. Every other
/// field lands in [`FileObject::data`].
#[derive(Debug, Clone)]
pub struct VinylNormalizer {
    cwd: PathBuf,
}

impl VinylNormalizer {
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { cwd }
    }

    /// Use a fixed working directory instead of the process one
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    fn string_field(
        record: &Map<String, Value>,
        field: &'static str,
    ) -> Result<Option<String>, NormalizeError> {
        match record.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(NormalizeError::InvalidField {
                field,
                expected: "a string",
            }),
        }
    }

    fn contents_field(
        value: &Value,
        field: &'static str,
    ) -> Result<Option<Vec<u8>>, NormalizeError> {
        let invalid = NormalizeError::InvalidField {
            field,
            expected: "a string, an array of bytes or null",
        };
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.as_bytes().to_vec())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| invalid.clone())
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(Some),
            _ => Err(invalid),
        }
    }
}

impl Default for VinylNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for VinylNormalizer {
    fn normalize(&self, record: &Value) -> Result<FileObject, NormalizeError> {
        let fields = record
            .as_object()
            .ok_or_else(|| NormalizeError::NotAnObject(kind_of(record)))?;

        let cwd = Self::string_field(fields, "cwd")?
            .map(PathBuf::from)
            .unwrap_or_else(|| self.cwd.clone());
        let mut file = FileObject::empty().with_cwd(cwd);

        if let Some(base) = Self::string_field(fields, "base")? {
            file = file.with_base(base);
        }
        if let Some(path) = Self::string_field(fields, "path")? {
            file.set_path(path);
        }

        // `contents` wins over the template-style `content` field
        let contents = match (fields.get("contents"), fields.get("content")) {
            (Some(value), _) => Self::contents_field(value, "contents")?,
            (None, Some(value)) => Self::contents_field(value, "content")?,
            (None, None) => None,
        };
        file.set_contents(contents);

        for (key, value) in fields {
            match key.as_str() {
                "cwd" | "base" | "path" | "contents" | "content" => {}
                _ => {
                    file.data_mut().insert(key.clone(), value.clone());
                }
            }
        }

        Ok(file)
    }
}
