//! Collection selectors

use crate::error::{PushError, PushResult};
use crate::host::Collection;
use crate::normalize::kind_of;
use serde_json::Value;

/// What a push call streams: a named host collection or records given inline
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Name(String),
    Collection(Collection),
}

impl Selector {
    /// Identifier recorded in the session load-log
    pub fn to_log_entry(&self) -> Value {
        match self {
            Selector::Name(name) => Value::String(name.clone()),
            Selector::Collection(records) => Value::Object(records.clone()),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Selector::Name(name) => Some(name),
            Selector::Collection(_) => None,
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}

impl From<Collection> for Selector {
    fn from(records: Collection) -> Self {
        Selector::Collection(records)
    }
}

impl TryFrom<Value> for Selector {
    type Error = PushError;

    fn try_from(value: Value) -> PushResult<Self> {
        match value {
            Value::String(name) => Ok(Selector::Name(name)),
            Value::Object(records) => Ok(Selector::Collection(records)),
            other => Err(PushError::InvalidSelector {
                found: kind_of(&other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selector_from_value() {
        assert_eq!(
            Selector::try_from(json!("pages")).unwrap(),
            Selector::Name("pages".into())
        );
        assert!(matches!(
            Selector::try_from(json!({"a": {"path": "a.md"}})),
            Ok(Selector::Collection(_))
        ));

        for bad in [json!(null), json!(1), json!(true), json!(["a"])] {
            assert!(matches!(
                Selector::try_from(bad),
                Err(PushError::InvalidSelector { .. })
            ));
        }
    }

    #[test]
    fn test_log_entry() {
        assert_eq!(Selector::from("posts").to_log_entry(), json!("posts"));
        assert_eq!(Selector::from("posts").name(), Some("posts"));
        let records = json!({"a": {"path": "a.md"}}).as_object().cloned().unwrap();
        let selector = Selector::from(records);
        assert_eq!(selector.name(), None);
        assert_eq!(selector.to_log_entry(), json!({"a": {"path": "a.md"}}));
    }
}
