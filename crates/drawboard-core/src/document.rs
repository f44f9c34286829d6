//! Save/Open document format: `{ "elements": [...], "timestamp": <ms> }`.

use crate::elements::Element;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why a document could not be opened or saved.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document has no `elements` array")]
    InvalidElements,
    #[error("Invalid element at index {index}: {message}")]
    InvalidElement { index: usize, message: String },
}

/// A saved board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<Element>,
    /// Save time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: f64,
}

impl Document {
    pub fn new(elements: Vec<Element>, timestamp: f64) -> Self {
        Self { elements, timestamp }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a document, checking the shape before decoding any element so a
    /// bad payload reports exactly what is wrong.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        let Some(items) = value.get("elements").and_then(Value::as_array) else {
            return Err(DocumentError::InvalidElements);
        };

        let elements = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Element::deserialize(item).map_err(|e| DocumentError::InvalidElement {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let timestamp = value.get("timestamp").and_then(Value::as_f64).unwrap_or_default();
        Ok(Self { elements, timestamp })
    }
}
