use std::fmt;
use std::sync::Arc;

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// an entity identifier scoped to the feed that declared it.
///
/// ids are only unique within one data source, so every cross-feed lookup key
/// in the model carries its feed id. both halves are shared strings: trips,
/// patterns and stop times clone ids freely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeedScopedId {
    feed_id: Arc<str>,
    id: Arc<str>,
}

impl FeedScopedId {
    pub fn new(feed_id: &str, id: &str) -> FeedScopedId {
        FeedScopedId {
            feed_id: Arc::from(feed_id),
            id: Arc::from(id),
        }
    }

    pub fn feed_id(&self) -> &str {
        &self.feed_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for FeedScopedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feed_id, self.id)
    }
}

impl Serialize for FeedScopedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FeedScopedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (feed_id, id) = raw
            .split_once(':')
            .ok_or_else(|| D::Error::custom(format!("expected `feed:id`, found `{raw}`")))?;
        Ok(FeedScopedId::new(feed_id, id))
    }
}

#[cfg(test)]
mod test {
    use super::FeedScopedId;

    #[test]
    fn test_display_round_trip() {
        let id = FeedScopedId::new("vbb", "17478_109");
        assert_eq!(id.to_string(), "vbb:17478_109");
        let json = serde_json::to_string(&id).expect("serializes");
        assert_eq!(json, "\"vbb:17478_109\"");
        let back: FeedScopedId = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_may_contain_colons() {
        let back: FeedScopedId = serde_json::from_str("\"hsl:1001:2:a\"").expect("deserializes");
        assert_eq!(back.feed_id(), "hsl");
        assert_eq!(back.id(), "1001:2:a");
    }

    #[test]
    fn test_unscoped_id_is_rejected() {
        let result: Result<FeedScopedId, _> = serde_json::from_str("\"no-feed-prefix\"");
        assert!(result.is_err());
    }
}
