//! Service layer for the prompt journal
//!
//! Operations that coordinate several storage components.

pub mod exchange;

pub use exchange::{DuplicateResolver, ExchangeService, ImportOptions, ImportSummary};
