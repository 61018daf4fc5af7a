//! Identifier types and generators for loop records.

use super::LoopDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Prefix shared by every generated loop identifier.
pub const LOOP_ID_PREFIX: &str = "loop-";

/// Number of hexadecimal characters following [`LOOP_ID_PREFIX`].
const LOOP_ID_HEX_LEN: usize = 8;

/// Unique identifier for a loop record.
///
/// Generated identifiers follow the `loop-<8 hex chars>` format, but any
/// non-blank identifier is accepted so records created by other backends can
/// be addressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoopId(String);

impl LoopId {
    /// Creates a validated loop identifier.
    ///
    /// The value is stored exactly as given so that identifiers written by
    /// other backends keep addressing the same entry.
    ///
    /// # Errors
    ///
    /// Returns [`LoopDomainError::EmptyLoopId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, LoopDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(LoopDomainError::EmptyLoopId);
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the identifier matches the generated
    /// `loop-<8 hex chars>` format.
    #[must_use]
    pub fn is_generated_format(&self) -> bool {
        self.0.strip_prefix(LOOP_ID_PREFIX).is_some_and(|suffix| {
            suffix.len() == LOOP_ID_HEX_LEN
                && suffix
                    .chars()
                    .all(|ch| ch.is_ascii_digit() || ('a'..='f').contains(&ch))
        })
    }
}

impl TryFrom<String> for LoopId {
    type Error = LoopDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LoopId> for String {
    fn from(value: LoopId) -> Self {
        value.0
    }
}

impl AsRef<str> for LoopId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh loop identifiers.
pub trait LoopIdGenerator: Send + Sync {
    /// Returns a new identifier that has not been handed out before.
    fn next_id(&self) -> LoopId;
}

/// Generates `loop-<8 hex chars>` identifiers from random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomLoopIdGenerator;

impl LoopIdGenerator for RandomLoopIdGenerator {
    fn next_id(&self) -> LoopId {
        let hex = Uuid::new_v4().simple().to_string();
        let suffix: String = hex.chars().take(LOOP_ID_HEX_LEN).collect();
        LoopId(format!("{LOOP_ID_PREFIX}{suffix}"))
    }
}

/// Generates `loop-00000001`, `loop-00000002`, ... in order.
///
/// Intended for tests that need stable identifiers.
#[derive(Debug, Default)]
pub struct SequentialLoopIdGenerator {
    counter: AtomicU32,
}

impl SequentialLoopIdGenerator {
    /// Creates a generator whose first identifier is `loop-00000001`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicU32::new(0),
        }
    }
}

impl LoopIdGenerator for SequentialLoopIdGenerator {
    fn next_id(&self) -> LoopId {
        let next = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        LoopId(format!("{LOOP_ID_PREFIX}{next:08x}"))
    }
}
