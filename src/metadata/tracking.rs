//! Model tracking and timestamp maintenance

use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};
use crate::models::{Entry, EntryDraft, Timestamp, TokenEstimate};

use super::estimate::{detect_code, estimate_tokens};

/// Longest accepted model name, in characters
pub const MAX_MODEL_NAME_LEN: usize = 100;

/// Metadata recorded when a prompt is first tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMetadata {
    pub model: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub token_estimate: TokenEstimate,
}

impl From<EntryMetadata> for EntryDraft {
    fn from(metadata: EntryMetadata) -> Self {
        Self {
            created_at: Some(metadata.created_at),
            updated_at: Some(metadata.updated_at),
            token_estimate: Some(metadata.token_estimate),
            ..EntryDraft::new(metadata.model)
        }
    }
}

/// Anything carrying a creation and last-update time
pub trait Timestamped {
    fn created_at(&self) -> Timestamp;
    fn set_updated_at(&mut self, at: Timestamp);
}

impl Timestamped for EntryMetadata {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}

impl Timestamped for Entry {
    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn set_updated_at(&mut self, at: Timestamp) {
        self.updated_at = at;
    }
}

/// Check a model name: non-blank and at most `MAX_MODEL_NAME_LEN` characters
pub fn validate_model_name(name: &str) -> JournalResult<()> {
    if name.trim().is_empty() {
        return Err(JournalError::Shape(
            "modelName must be a non-empty string".into(),
        ));
    }

    if name.chars().count() > MAX_MODEL_NAME_LEN {
        return Err(JournalError::Shape(format!(
            "modelName must be at most {} characters",
            MAX_MODEL_NAME_LEN
        )));
    }

    Ok(())
}

/// Build fresh metadata for `content` produced by `model_name`
pub fn track_model(model_name: &str, content: &str) -> JournalResult<EntryMetadata> {
    validate_model_name(model_name)?;

    let created_at = Timestamp::now();
    let token_estimate = estimate_tokens(content, detect_code(content));

    Ok(EntryMetadata {
        model: model_name.to_string(),
        created_at,
        updated_at: created_at,
        token_estimate,
    })
}

/// Return a copy of `item` with its update time set to now
pub fn update_timestamps<T: Timestamped + Clone>(item: &T) -> JournalResult<T> {
    touch_at(item, Timestamp::now())
}

fn touch_at<T: Timestamped + Clone>(item: &T, now: Timestamp) -> JournalResult<T> {
    if now < item.created_at() {
        return Err(JournalError::Shape(
            "updatedAt must be greater than or equal to createdAt".into(),
        ));
    }

    let mut updated = item.clone();
    updated.set_updated_at(now);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Confidence;

    #[test]
    fn test_track_model() {
        let metadata = track_model("gpt-4o", "Summarize this article").unwrap();

        assert_eq!(metadata.model, "gpt-4o");
        assert_eq!(metadata.created_at, metadata.updated_at);
        assert_eq!(metadata.token_estimate.min, 2.0);
        assert_eq!(metadata.token_estimate.confidence, Confidence::High);
    }

    #[test]
    fn test_track_model_detects_code() {
        let prose = track_model("m", "let x equal one").unwrap();
        let code = track_model("m", "let x = 1;").unwrap();

        // Same word count, but the code path is scaled up
        assert_eq!(prose.token_estimate.min, 3.0);
        assert_eq!(code.token_estimate.min, 4.0);
    }

    #[test]
    fn test_model_name_rules() {
        assert!(track_model("  ", "x").unwrap_err().is_shape());
        assert!(track_model(&"m".repeat(101), "x").is_err());
        assert!(track_model(&"m".repeat(100), "x").is_ok());
    }

    #[test]
    fn test_update_timestamps() {
        let created = Timestamp::parse("2024-01-01T00:00:00.000Z").unwrap();
        let metadata = EntryMetadata {
            model: "m".into(),
            created_at: created,
            updated_at: created,
            token_estimate: TokenEstimate::zero(),
        };

        let updated = update_timestamps(&metadata).unwrap();
        assert_eq!(updated.created_at, created);
        assert!(updated.updated_at > created);
        // Original untouched
        assert_eq!(metadata.updated_at, created);
    }

    #[test]
    fn test_update_before_creation_rejected() {
        let created = Timestamp::parse("2030-01-01T00:00:00.000Z").unwrap();
        let metadata = EntryMetadata {
            model: "m".into(),
            created_at: created,
            updated_at: created,
            token_estimate: TokenEstimate::zero(),
        };

        let earlier = Timestamp::parse("2029-12-31T23:59:59.999Z").unwrap();
        assert!(touch_at(&metadata, earlier).unwrap_err().is_shape());
    }

    #[test]
    fn test_metadata_into_draft() {
        let metadata = track_model("claude", "hello there").unwrap();
        let draft: EntryDraft = metadata.clone().into();

        assert_eq!(draft.model, "claude");
        assert!(draft.id.is_none());
        assert_eq!(draft.created_at, Some(metadata.created_at));
        assert_eq!(draft.token_estimate, Some(metadata.token_estimate));
    }
}
