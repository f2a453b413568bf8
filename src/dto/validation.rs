use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::ValidationErrors;

use std::collections::BTreeMap;

/// A string field of a JSON body as the client sent it.
///
/// Decoding never fails on the field's type, so a wrong type can be reported
/// next to the other field errors instead of rejecting the whole body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TextField {
    #[default]
    Absent,
    /// Surrounding whitespace already removed.
    Text(String),
    /// Present but not a string; holds the JSON type that was received.
    Invalid(&'static str),
}

impl<'de> Deserialize<'de> for TextField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Self::Text(text.trim().to_owned()),
            Value::Null => Self::Invalid("null"),
            Value::Bool(_) => Self::Invalid("boolean"),
            Value::Number(_) => Self::Invalid("number"),
            Value::Array(_) => Self::Invalid("array"),
            Value::Object(_) => Self::Invalid("object"),
        })
    }
}

impl TextField {
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Absent | Self::Invalid(_) => None,
        }
    }

    pub fn type_error(&self) -> Option<String> {
        match self {
            Self::Invalid(received) => Some(format!("Expected string, received {received}")),
            Self::Absent | Self::Text(_) => None,
        }
    }
}

/// Field-level validation failures, returned to clients as
/// `{"formErrors": [...], "fieldErrors": {"title": [...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    /// A problem with the request body as a whole.
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            field_errors: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }
}

impl From<ValidationErrors> for ValidationReport {
    fn from(errors: ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            form_errors: Vec::new(),
            field_errors,
        }
    }
}
