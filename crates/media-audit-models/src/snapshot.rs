use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::library::MediaKind;
use crate::watch::WatchStatus;

pub const UNRESOLVED_SIZE: &str = "unresolved";

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Resolved on-disk size of a stale candidate. `Unresolved` means the fuzzy
/// title match did not clear the confidence threshold; it is deliberately
/// distinct from a confirmed zero bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum SizeOnDisk {
    Gibibytes(f64),
    Unresolved,
}

impl SizeOnDisk {
    pub fn from_bytes(bytes: u64) -> Self {
        SizeOnDisk::Gibibytes(bytes as f64 / BYTES_PER_GIB)
    }
}

impl Serialize for SizeOnDisk {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SizeOnDisk::Gibibytes(gib) => serializer.serialize_str(&format!("{:.2}", gib)),
            SizeOnDisk::Unresolved => serializer.serialize_str(UNRESOLVED_SIZE),
        }
    }
}

impl<'de> Deserialize<'de> for SizeOnDisk {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == UNRESOLVED_SIZE {
            return Ok(SizeOnDisk::Unresolved);
        }
        raw.parse::<f64>().map(SizeOnDisk::Gibibytes).map_err(|_| {
            D::Error::custom(format!(
                "expected a decimal size in GiB or \"{}\", got \"{}\"",
                UNRESOLVED_SIZE, raw
            ))
        })
    }
}

/// A library entry the classifier marked stale, with everything the
/// downstream consumers need to decide its fate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaleCandidate {
    pub title: String,
    pub original_title: Option<String>,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub added_at: NaiveDate,
    pub plex_id: String,
    pub requester: String,
    pub size: SizeOnDisk,
    pub watch_status: WatchStatus,
    pub total_episodes: Option<u32>,
    pub requester_watched: bool,
    pub poster_url: Option<String>,
}

/// The full result set of one audit run. Each run fully replaces the
/// previous snapshot; there is no merge and no history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub content: Vec<StaleCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn movie_candidate() -> StaleCandidate {
        let mut watch_status = WatchStatus::new();
        watch_status.insert("alice".to_string(), "Watched".to_string());
        StaleCandidate {
            title: "Heat".to_string(),
            original_title: None,
            kind: MediaKind::Movie,
            added_at: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            plex_id: "12345".to_string(),
            requester: "alice".to_string(),
            size: SizeOnDisk::Gibibytes(23.47),
            watch_status,
            total_episodes: None,
            requester_watched: true,
            poster_url: Some("http://plex.local:32400/library/metadata/12345/thumb/1".to_string()),
        }
    }

    fn show_candidate() -> StaleCandidate {
        StaleCandidate {
            title: "Severance".to_string(),
            original_title: Some("Severance".to_string()),
            kind: MediaKind::Show,
            added_at: NaiveDate::from_ymd_opt(2024, 11, 20).unwrap(),
            plex_id: "67890".to_string(),
            requester: "Unknown".to_string(),
            size: SizeOnDisk::Unresolved,
            watch_status: WatchStatus::new(),
            total_episodes: Some(19),
            requester_watched: false,
            poster_url: None,
        }
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snapshot = Snapshot {
            timestamp: Utc.with_ymd_and_hms(2026, 2, 14, 8, 30, 0).unwrap(),
            content: vec![movie_candidate(), show_candidate()],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, restored);
    }

    #[test]
    fn test_candidate_wire_format() {
        let value = serde_json::to_value(movie_candidate()).unwrap();
        assert_eq!(value["type"], "movie");
        assert_eq!(value["added_at"], "2025-03-01");
        assert_eq!(value["size"], "23.47");
        assert_eq!(value["watch_status"]["alice"], "Watched");
        assert_eq!(value["total_episodes"], serde_json::Value::Null);
        assert_eq!(value["requester_watched"], true);

        let value = serde_json::to_value(show_candidate()).unwrap();
        assert_eq!(value["type"], "show");
        assert_eq!(value["size"], "unresolved");
        assert_eq!(value["total_episodes"], 19);
    }

    #[test]
    fn test_size_rejects_garbage() {
        let err = serde_json::from_str::<SizeOnDisk>("\"lots\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_size_from_bytes() {
        let size = SizeOnDisk::from_bytes(3 * 1024 * 1024 * 1024);
        assert_eq!(serde_json::to_value(&size).unwrap(), "3.00");
    }
}
