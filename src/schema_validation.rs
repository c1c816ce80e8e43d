//! Strict record validation for push streams

use jsonschema::{validator_for, Validator};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

lazy_static::lazy_static! {
    /// Minimal document shape: an object with a string `path`
    pub static ref DOCUMENT_SCHEMA: Value = json!({
        "type": "object",
        "required": ["path"],
        "properties": {
            "path": { "type": "string", "minLength": 1 },
            "cwd": { "type": "string" },
            "base": { "type": "string" }
        }
    });
}

/// JSON Schema validator applied to each record before normalization.
#[derive(Clone)]
pub struct RecordValidator {
    schema_id: String,
    compiled: Arc<Validator>,
}

impl RecordValidator {
    /// Compile a validator from a JSON schema value.
    pub fn new(schema_id: &str, schema: &Value) -> Result<Self, SchemaError> {
        let compiled =
            validator_for(schema).map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        Ok(Self {
            schema_id: schema_id.to_string(),
            compiled: Arc::new(compiled),
        })
    }

    /// Validator for [`DOCUMENT_SCHEMA`]
    pub fn document() -> Result<Self, SchemaError> {
        Self::new("document", &DOCUMENT_SCHEMA)
    }

    pub fn validate(&self, record: &Value) -> Result<(), SchemaError> {
        if let Err(error) = self.compiled.validate(record) {
            return Err(SchemaError::ValidationFailed(error.to_string()));
        }
        Ok(())
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }
}

impl std::fmt::Debug for RecordValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordValidator")
            .field("schema_id", &self.schema_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_schema() {
        let validator = RecordValidator::document().unwrap();
        assert_eq!(validator.schema_id(), "document");
        assert!(validator.validate(&json!({"path": "one.hbs"})).is_ok());
        assert!(validator.validate(&json!({"content": "no path"})).is_err());
        assert!(validator.validate(&json!({"path": ""})).is_err());
        assert!(validator.validate(&json!("one.hbs")).is_err());
    }

    #[test]
    fn test_invalid_schema() {
        let result = RecordValidator::new("broken", &json!({"type": 12}));
        assert!(matches!(result, Err(SchemaError::InvalidSchema(_))));
    }
}
