//! String-list codec for list-valued columns
//!
//! Company records keep `target_markets`, `countries_of_operation` and
//! `previously_used_payment_gateways` as JSON-encoded text. This module is the
//! only place that knows that representation.
//!
//! # Rules
//!
//! - The stored form is always a JSON array of strings; an empty list is `[]`
//! - Order is preserved in both directions
//! - Malformed input is an [`EncodingError`], never an empty list
//!
//! # Example
//!
//! ```
//! use orderly_shared::codec::{decode_list, encode_list};
//!
//! let stored = encode_list("target_markets", &["EU".to_string(), "ASIA".to_string()]).unwrap();
//! assert_eq!(stored, r#"["EU","ASIA"]"#);
//! assert_eq!(decode_list("target_markets", &stored).unwrap(), vec!["EU", "ASIA"]);
//! ```

use serde_json::Value;

/// Error raised when a list field cannot be encoded or decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct EncodingError {
    /// Name of the offending field
    pub field: &'static str,

    /// What was wrong with it
    pub reason: String,
}

impl EncodingError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Encodes a list of strings into its stored text form
pub fn encode_list(field: &'static str, values: &[String]) -> Result<String, EncodingError> {
    serde_json::to_string(values)
        .map_err(|e| EncodingError::new(field, format!("failed to encode list: {}", e)))
}

/// Decodes stored text back into a list of strings
///
/// # Errors
///
/// Returns [`EncodingError`] if the text is not a JSON array of strings.
pub fn decode_list(field: &'static str, stored: &str) -> Result<Vec<String>, EncodingError> {
    serde_json::from_str::<Vec<String>>(stored)
        .map_err(|e| EncodingError::new(field, format!("stored list is corrupt: {}", e)))
}

/// Interprets an untrusted request value as a list of strings
///
/// Accepted shapes:
/// - absent or `null` → empty list
/// - a JSON array whose every element is a string
/// - a string holding such an array (form-encoded bodies send lists this way)
pub fn list_from_value(field: &'static str, value: Option<&Value>) -> Result<Vec<String>, EncodingError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(elements)) => elements
            .iter()
            .enumerate()
            .map(|(index, element)| match element {
                Value::String(s) => Ok(s.clone()),
                other => Err(EncodingError::new(
                    field,
                    format!("element {} must be a string, got {}", index, kind_of(other)),
                )),
            })
            .collect(),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if !trimmed.starts_with('[') {
                return Err(EncodingError::new(
                    field,
                    "expected a list of strings, got a plain string",
                ));
            }
            let parsed: Value = serde_json::from_str(trimmed)
                .map_err(|e| EncodingError::new(field, format!("invalid list encoding: {}", e)))?;
            list_from_value(field, Some(&parsed))
        }
        Some(other) => Err(EncodingError::new(
            field,
            format!("expected a list of strings, got {}", kind_of(other)),
        )),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
