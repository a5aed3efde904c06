use super::source_list::SourceList;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Three-way result of a source-list lookup.
///
/// `Denied` and `Unsupported` describe the video, not a failure, and both
/// are legitimate cacheable payloads. On the wire the variants map to JSON
/// `false`, `null` and the source-list object respectively, and the mapping
/// round-trips losslessly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Video is private, removed or blocked.
    Denied,
    /// Page was reachable, but no extraction rule matched.
    Unsupported,
    /// At least one playable source was extracted.
    Found(SourceList),
}

impl Outcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn sources(&self) -> Option<&SourceList> {
        match self {
            Outcome::Found(list) => Some(list),
            _ => None,
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Denied => serializer.serialize_bool(false),
            Outcome::Unsupported => serializer.serialize_unit(),
            Outcome::Found(list) => list.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Outcome {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Bool(false) => Ok(Outcome::Denied),
            serde_json::Value::Null => Ok(Outcome::Unsupported),
            serde_json::Value::Object(_) => serde_json::from_value(value)
                .map(Outcome::Found)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected false, null or a source-list object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Quality;
    use std::collections::BTreeMap;

    fn sample_list() -> SourceList {
        let mut static_sources = BTreeMap::new();
        static_sources.insert(Quality::P240, "http://x/240.mp4".to_string());
        SourceList {
            static_sources,
            embed: Some("http://x/embed".to_string()),
            stream: Some("http://x/s.m3u8".to_string()),
        }
    }

    #[test]
    fn test_denied_serializes_to_false() {
        assert_eq!(serde_json::to_string(&Outcome::Denied).unwrap(), "false");
    }

    #[test]
    fn test_unsupported_serializes_to_null() {
        assert_eq!(serde_json::to_string(&Outcome::Unsupported).unwrap(), "null");
    }

    #[test]
    fn test_round_trip_all_variants() {
        for outcome in [
            Outcome::Denied,
            Outcome::Unsupported,
            Outcome::Found(sample_list()),
        ] {
            let raw = serde_json::to_string(&outcome).unwrap();
            let back: Outcome = serde_json::from_str(&raw).unwrap();
            assert_eq!(back, outcome);
        }
    }

    #[test]
    fn test_rejects_foreign_shapes() {
        assert!(serde_json::from_str::<Outcome>("true").is_err());
        assert!(serde_json::from_str::<Outcome>("\"denied\"").is_err());
        assert!(serde_json::from_str::<Outcome>("42").is_err());
        assert!(serde_json::from_str::<Outcome>("[1,2]").is_err());
    }
}
