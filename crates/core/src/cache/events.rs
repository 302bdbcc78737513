use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of mutation a cache entry went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheEventKind {
    /// A value was stored under a key that held no live value.
    Created,
    /// A live value was replaced.
    Updated,
    /// A value was removed explicitly.
    Removed,
    /// A value was found past its TTL and dropped.
    Expired,
}

impl fmt::Display for CacheEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheEventKind::Created => "CREATED",
            CacheEventKind::Updated => "UPDATED",
            CacheEventKind::Removed => "REMOVED",
            CacheEventKind::Expired => "EXPIRED",
        };
        f.write_str(name)
    }
}

/// A mutation observed on a named cache.
///
/// Values are carried as the JSON text stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEvent {
    pub cache: String,
    pub key: String,
    pub kind: CacheEventKind,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl CacheEvent {
    /// Builds the event for a write, choosing `Created` or `Updated`
    /// depending on whether a live value was replaced.
    pub fn stored(
        cache: impl Into<String>,
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: String,
    ) -> Self {
        let kind = if old_value.is_some() {
            CacheEventKind::Updated
        } else {
            CacheEventKind::Created
        };
        Self {
            cache: cache.into(),
            key: key.into(),
            kind,
            old_value,
            new_value: Some(new_value),
        }
    }

    /// Builds the event for an explicit removal.
    pub fn removed(cache: impl Into<String>, key: impl Into<String>, old_value: String) -> Self {
        Self {
            cache: cache.into(),
            key: key.into(),
            kind: CacheEventKind::Removed,
            old_value: Some(old_value),
            new_value: None,
        }
    }

    /// Builds the event for a value dropped after its TTL.
    pub fn expired(cache: impl Into<String>, key: impl Into<String>, old_value: String) -> Self {
        Self {
            cache: cache.into(),
            key: key.into(),
            kind: CacheEventKind::Expired,
            old_value: Some(old_value),
            new_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_without_old_value_is_created() {
        let event = CacheEvent::stored("findAllCache", "ALL", None, "[]".to_string());
        assert_eq!(event.kind, CacheEventKind::Created);
        assert_eq!(event.old_value, None);
        assert_eq!(event.new_value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_stored_with_old_value_is_updated() {
        let event = CacheEvent::stored(
            "findAllCache",
            "ALL",
            Some("[]".to_string()),
            "[1]".to_string(),
        );
        assert_eq!(event.kind, CacheEventKind::Updated);
        assert_eq!(event.old_value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_removed_and_expired_carry_no_new_value() {
        let removed = CacheEvent::removed("deleteCache", "DELETED", "{}".to_string());
        assert_eq!(removed.kind, CacheEventKind::Removed);
        assert_eq!(removed.new_value, None);

        let expired = CacheEvent::expired("updateCache", "UPDATED", "{}".to_string());
        assert_eq!(expired.kind, CacheEventKind::Expired);
        assert_eq!(expired.new_value, None);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(CacheEventKind::Created.to_string(), "CREATED");
        assert_eq!(CacheEventKind::Expired.to_string(), "EXPIRED");
    }

    #[test]
    fn test_kind_serializes_uppercase() {
        let json = serde_json::to_string(&CacheEventKind::Removed).unwrap();
        assert_eq!(json, "\"REMOVED\"");
    }
}
