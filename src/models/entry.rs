//! Journal entry model
//!
//! An entry records which model produced a prompt, when it was created and
//! last touched, an estimated token range, and an optional rating. Any other
//! fields (prompt content, title, notes, ...) are carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{EntryId, Timestamp};

/// Confidence attached to a token estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    High,
    Medium,
    Low,
}

impl Confidence {
    /// All accepted wire names
    pub const NAMES: [&'static str; 3] = ["high", "medium", "low"];

    /// Parse a wire name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated token range for a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TokenEstimate {
    #[serde(serialize_with = "serialize_number")]
    pub min: f64,
    #[serde(serialize_with = "serialize_number")]
    pub max: f64,
    pub confidence: Confidence,
}

impl TokenEstimate {
    pub fn new(min: f64, max: f64, confidence: Confidence) -> Self {
        Self {
            min,
            max,
            confidence,
        }
    }

    /// The zero-valued, high-confidence estimate used when none is supplied
    pub fn zero() -> Self {
        Self::default()
    }

    /// Midpoint of the range
    pub fn average(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl fmt::Display for TokenEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.min, self.max, self.confidence)
    }
}

/// A single journal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub model: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub token_estimate: TokenEstimate,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_number"
    )]
    pub rating: Option<f64>,
    /// Fields this crate doesn't interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// Create an entry stamped with the current time
    pub fn new(model: impl Into<String>, token_estimate: TokenEstimate) -> Self {
        let now = Timestamp::now();
        Self {
            id: EntryId::generate(),
            model: model.into(),
            created_at: now,
            updated_at: now,
            token_estimate,
            rating: None,
            extra: Map::new(),
        }
    }

    /// Read an uninterpreted string field such as `content` or `title`
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.extra.get(name).and_then(Value::as_str)
    }

    /// Set an uninterpreted field
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(name.into(), value.into());
    }

    /// Validate the typed invariants of the entry
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.is_empty() {
            return Err(EntryValidationError::EmptyId);
        }

        if self.model.is_empty() {
            return Err(EntryValidationError::EmptyModel);
        }

        if self.updated_at < self.created_at {
            return Err(EntryValidationError::UpdatedBeforeCreated);
        }

        let estimate = &self.token_estimate;
        for (name, value) in [("min", estimate.min), ("max", estimate.max)] {
            if !value.is_finite() || value < 0.0 {
                return Err(EntryValidationError::InvalidEstimate(name));
            }
        }

        if let Some(rating) = self.rating {
            if !rating.is_finite() {
                return Err(EntryValidationError::InvalidRating);
            }
        }

        Ok(())
    }
}

/// An entry as supplied to `save`: id, timestamps and estimate may be missing
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(default)]
    pub id: Option<EntryId>,
    pub model: String,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub token_estimate: Option<TokenEstimate>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntryDraft {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Fill missing fields: `created_at` defaults to `now`, `updated_at` to
    /// `created_at`, and the estimate to zero with high confidence
    pub fn complete(self, id: EntryId, now: Timestamp) -> Entry {
        let created_at = self.created_at.unwrap_or(now);
        Entry {
            id,
            model: self.model,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
            token_estimate: self.token_estimate.unwrap_or_else(TokenEstimate::zero),
            rating: self.rating,
            extra: self.extra,
        }
    }
}

impl From<Entry> for EntryDraft {
    fn from(entry: Entry) -> Self {
        Self {
            id: Some(entry.id),
            model: entry.model,
            created_at: Some(entry.created_at),
            updated_at: Some(entry.updated_at),
            token_estimate: Some(entry.token_estimate),
            rating: entry.rating,
            extra: entry.extra,
        }
    }
}

/// Validation errors for entries
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValidationError {
    EmptyId,
    EmptyModel,
    UpdatedBeforeCreated,
    InvalidEstimate(&'static str),
    InvalidRating,
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "prompt.id is required"),
            Self::EmptyModel => write!(f, "prompt.model must be a non-empty string"),
            Self::UpdatedBeforeCreated => {
                write!(f, "prompt.updatedAt must not precede prompt.createdAt")
            }
            Self::InvalidEstimate(field) => write!(
                f,
                "tokenEstimate.{} must be a non-negative finite number",
                field
            ),
            Self::InvalidRating => write!(f, "prompt.rating must be a finite number"),
        }
    }
}

impl std::error::Error for EntryValidationError {}

/// Write integral values without a fractional part, the way JSON producers
/// that only know one number type do
pub(crate) fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub(crate) fn serialize_optional_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serialize_number(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_entry() -> Entry {
        Entry {
            id: EntryId::new("p_1"),
            model: "gpt".into(),
            created_at: Timestamp::parse("2025-01-15T10:30:00.000Z").unwrap(),
            updated_at: Timestamp::parse("2025-01-15T10:31:00.000Z").unwrap(),
            token_estimate: TokenEstimate::new(12.0, 20.0, Confidence::High),
            rating: Some(4.0),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_serializes_camel_case_with_integral_numbers() {
        let value = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "p_1",
                "model": "gpt",
                "createdAt": "2025-01-15T10:30:00.000Z",
                "updatedAt": "2025-01-15T10:31:00.000Z",
                "tokenEstimate": {"min": 12, "max": 20, "confidence": "high"},
                "rating": 4
            })
        );
    }

    #[test]
    fn test_extra_fields_preserved() {
        let value = json!({
            "id": "p_1",
            "model": "gpt",
            "createdAt": "2025-01-15T10:30:00.000Z",
            "updatedAt": "2025-01-15T10:30:00.000Z",
            "tokenEstimate": {"min": 1, "max": 2, "confidence": "low"},
            "content": "hello world",
            "tags": ["a", "b"]
        });

        let entry: Entry = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(entry.text_field("content"), Some("hello world"));
        assert!(entry.rating.is_none());
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }

    #[test]
    fn test_validate() {
        let entry = sample_entry();
        assert!(entry.validate().is_ok());

        let mut empty_model = sample_entry();
        empty_model.model = String::new();
        assert_eq!(
            empty_model.validate(),
            Err(EntryValidationError::EmptyModel)
        );

        let mut spaced_model = sample_entry();
        spaced_model.model = "   ".into();
        assert!(spaced_model.validate().is_ok());

        let mut backwards = sample_entry();
        backwards.updated_at = backwards.created_at.plus_millis(-1);
        assert_eq!(
            backwards.validate(),
            Err(EntryValidationError::UpdatedBeforeCreated)
        );

        let mut negative = sample_entry();
        negative.token_estimate.min = -1.0;
        assert_eq!(
            negative.validate(),
            Err(EntryValidationError::InvalidEstimate("min"))
        );
    }

    #[test]
    fn test_new_entry_has_equal_timestamps() {
        let entry = Entry::new("claude", TokenEstimate::zero());
        assert_eq!(entry.created_at, entry.updated_at);
        assert!(entry.id.as_str().starts_with("p_"));
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_draft_complete_fills_defaults() {
        let now = Timestamp::parse("2025-01-15T10:30:00.000Z").unwrap();
        let entry = EntryDraft::new("gpt").complete(EntryId::new("p_9"), now);

        assert_eq!(entry.id.as_str(), "p_9");
        assert_eq!(entry.created_at, now);
        assert_eq!(entry.updated_at, now);
        assert_eq!(entry.token_estimate, TokenEstimate::zero());
        assert_eq!(entry.token_estimate.confidence, Confidence::High);
    }

    #[test]
    fn test_draft_keeps_supplied_created_at() {
        let created = Timestamp::parse("2024-06-01T00:00:00.000Z").unwrap();
        let now = Timestamp::parse("2025-01-15T10:30:00.000Z").unwrap();
        let draft = EntryDraft {
            created_at: Some(created),
            ..EntryDraft::new("gpt")
        };

        let entry = draft.complete(EntryId::new("p_9"), now);
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.updated_at, created);
    }

    #[test]
    fn test_confidence_parse() {
        for name in Confidence::NAMES {
            assert_eq!(Confidence::parse(name).unwrap().as_str(), name);
        }
        assert!(Confidence::parse("HIGH").is_none());
    }
}
