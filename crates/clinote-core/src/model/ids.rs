use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Last millisecond value handed out as a session ID in this process.
static LAST_SESSION_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Identifier of a group or assessment session.
///
/// Derived from the creation time in epoch milliseconds. Two sessions created
/// within the same millisecond get consecutive values, so an ID is never issued
/// twice in one process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self::issued_at(Utc::now())
    }

    /// Issue an ID for a session created at `created_at`.
    pub fn issued_at(created_at: DateTime<Utc>) -> Self {
        let wanted = created_at.timestamp_millis();
        let previous = LAST_SESSION_MILLIS
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wanted.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        Self(wanted.max(previous + 1).to_string())
    }

    /// Parse an ID supplied from outside (history lookups, exports).
    pub fn parse(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidId("ID must not be empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a group member. UUID v4 hex, no dashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().as_simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Position of an entry within one session's log, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl EntryId {
    pub const FIRST: EntryId = EntryId(1);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_session_ids_are_unique_within_one_millisecond() {
        let now = Utc::now();
        let ids: HashSet<_> = (0..100).map(|_| SessionId::issued_at(now)).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_session_id_never_goes_backwards() {
        let later = SessionId::new();
        let earlier = SessionId::issued_at(Utc::now() - chrono::Duration::days(1));
        let later: i64 = later.as_str().parse().unwrap();
        let earlier: i64 = earlier.as_str().parse().unwrap();
        assert!(earlier > later);
    }

    #[test]
    fn test_session_id_parse_validation() {
        assert!(SessionId::parse("1700000000000").is_ok());
        assert!(SessionId::parse("  ").is_err());
        assert_eq!(SessionId::parse(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn test_member_id_generation() {
        let id = MemberId::new();
        assert_eq!(id.as_str().len(), 32);
        assert_ne!(id, MemberId::new());
    }

    #[test]
    fn test_entry_id_ordering() {
        assert!(EntryId::FIRST < EntryId::FIRST.next());
        assert_eq!(format!("{}", EntryId(7)), "#7");
    }
}
