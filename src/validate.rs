//! Shape validation for untrusted entries and export documents
//!
//! Stored collections and imported files are plain JSON. Nothing read from
//! them is trusted until it has passed through here; a successful check
//! yields the typed value, so callers never hold an unchecked `Entry`.

use serde_json::Value;

use crate::error::{JournalError, JournalResult};
use crate::export::EXPORT_VERSION;
use crate::models::{Confidence, Entry, Timestamp};

/// Check the shape of a single entry and convert it
pub fn validate_entry(value: &Value) -> JournalResult<Entry> {
    let obj = value
        .as_object()
        .ok_or_else(|| shape("prompt must be an object"))?;

    let id = obj.get("id").filter(|id| is_truthy(id));
    match id {
        None => return Err(shape("prompt.id is required")),
        Some(Value::String(_)) => {}
        Some(_) => return Err(shape("prompt.id must be a string")),
    }

    match obj.get("model") {
        Some(Value::String(model)) if !model.is_empty() => {}
        Some(Value::String(_)) => return Err(shape("prompt.model must be a non-empty string")),
        _ => return Err(shape("prompt.model must be a string")),
    }

    for field in ["createdAt", "updatedAt"] {
        let canonical = obj
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(Timestamp::is_canonical);
        if !canonical {
            return Err(shape(format!(
                "prompt.{} must be valid ISO 8601 with ms and Z",
                field
            )));
        }
    }

    validate_token_estimate(obj.get("tokenEstimate"))?;

    match obj.get("rating") {
        None | Some(Value::Null) | Some(Value::Number(_)) => {}
        Some(_) => return Err(shape("prompt.rating must be a number")),
    }

    let entry: Entry = serde_json::from_value(value.clone())
        .map_err(|e| shape(format!("prompt could not be read: {}", e)))?;

    entry
        .validate()
        .map_err(|e| JournalError::Shape(e.to_string()))?;

    Ok(entry)
}

fn validate_token_estimate(value: Option<&Value>) -> JournalResult<()> {
    let te = value
        .and_then(Value::as_object)
        .ok_or_else(|| shape("tokenEstimate is required"))?;

    let numeric = |key: &str| te.get(key).is_some_and(Value::is_number);
    if !numeric("min") || !numeric("max") {
        return Err(shape("tokenEstimate.min and .max must be numbers"));
    }

    let confidence = te.get("confidence").and_then(Value::as_str);
    if confidence.and_then(Confidence::parse).is_none() {
        return Err(shape(format!(
            "tokenEstimate.confidence must be one of {}",
            Confidence::NAMES.join("|")
        )));
    }

    Ok(())
}

/// Check an export document and return its entries
///
/// Fails with `UnsupportedVersion` when the document was produced by a
/// different format version, and with `Shape` for anything else malformed.
pub fn validate_export_document(doc: &Value) -> JournalResult<Vec<Entry>> {
    let obj = doc
        .as_object()
        .ok_or_else(|| shape("export document must be an object"))?;

    let version = match obj.get("version") {
        Some(Value::String(v)) if !v.is_empty() => v,
        Some(Value::String(_)) | None | Some(Value::Null) => {
            return Err(shape("export file missing version"))
        }
        Some(other) => {
            return Err(JournalError::UnsupportedVersion {
                found: other.to_string(),
                expected: EXPORT_VERSION.to_string(),
            })
        }
    };

    if version != EXPORT_VERSION {
        return Err(JournalError::UnsupportedVersion {
            found: version.clone(),
            expected: EXPORT_VERSION.to_string(),
        });
    }

    let prompts = obj
        .get("prompts")
        .and_then(Value::as_array)
        .ok_or_else(|| shape("exported prompts array missing"))?;

    prompts
        .iter()
        .enumerate()
        .map(|(index, prompt)| {
            validate_entry(prompt).map_err(|e| match e {
                JournalError::Shape(msg) => shape(format!("prompts[{}]: {}", index, msg)),
                other => other,
            })
        })
        .collect()
}

/// JavaScript-style truthiness, used for the presence check on ids
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn shape(msg: impl Into<String>) -> JournalError {
    JournalError::Shape(msg.into())
}
