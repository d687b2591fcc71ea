//! Prompt metadata helpers
//!
//! Token estimation and model tracking. These are pure functions: nothing
//! here touches the store.

pub mod estimate;
pub mod tracking;

pub use estimate::{detect_code, estimate_tokens};
pub use tracking::{
    track_model, update_timestamps, validate_model_name, EntryMetadata, Timestamped,
};
