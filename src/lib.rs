//! Prompt Journal - a local journal of LLM prompts
//!
//! Every prompt is stored as an entry carrying the model it was written for,
//! creation and update timestamps, and a token estimate. The whole collection
//! lives in a key-value store as one JSON array, with timestamped snapshots
//! taken before any destructive change.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `store`: Key-value store abstraction (file-backed and in-memory)
//! - `models`: Entries, ids and canonical timestamps
//! - `metadata`: Token estimation and model tracking
//! - `validate`: Shape checks for entries and export documents
//! - `storage`: Entry persistence over a store
//! - `backup`: Snapshot management
//! - `export`: Export documents and delivery
//! - `services`: Import and export of the whole journal
//! - `cli` / `display`: Command handlers and terminal output
//!
//! # Example
//!
//! ```rust,ignore
//! use prompt_journal::models::EntryDraft;
//! use prompt_journal::storage::Storage;
//! use prompt_journal::store::MemoryStore;
//!
//! let storage = Storage::new(MemoryStore::new());
//! let entry = storage.entries().save(EntryDraft::new("gpt-4o"))?;
//! let document = storage.exchange().export()?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod metadata;
pub mod models;
pub mod services;
pub mod storage;
pub mod store;
pub mod validate;

pub use error::{JournalError, JournalResult};
