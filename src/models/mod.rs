//! Core data models for the prompt journal
//!
//! Entries, their identifiers, token estimates and canonical timestamps.

pub mod entry;
pub mod ids;
pub mod timestamp;

pub use entry::{Confidence, Entry, EntryDraft, EntryValidationError, TokenEstimate};
pub use ids::EntryId;
pub use timestamp::Timestamp;
