//! Journal entry identifiers
//!
//! Entry ids are opaque strings: imported documents may carry ids produced
//! by any exporter. Freshly generated ids follow the `p_<time>_<random>`
//! layout, a base-36 millisecond prefix plus seven random base-36 characters.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Timestamp;

const ID_PREFIX: &str = "p_";
const RANDOM_SUFFIX_LEN: u32 = 7;

/// Identifier of a journal entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a fresh, collision-resistant id
    ///
    /// Uniqueness is not guaranteed; callers that need it check against the
    /// ids they already hold.
    pub fn generate() -> Self {
        Self::generate_at(Timestamp::now())
    }

    /// Generate an id whose time prefix encodes `at`
    pub fn generate_at(at: Timestamp) -> Self {
        let millis = at.timestamp_millis().max(0) as u128;
        let random = Uuid::new_v4().as_u128() % 36u128.pow(RANDOM_SUFFIX_LEN);

        Self(format!(
            "{}{}_{:0>width$}",
            ID_PREFIX,
            to_base36(millis),
            to_base36(random),
            width = RANDOM_SUFFIX_LEN as usize
        ))
    }

    /// Wrap an existing id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty (never valid for a stored entry)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
