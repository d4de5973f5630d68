use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a media-server library section. Owned by the media server;
/// read-only to the audit engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryItem {
    pub rating_key: String,
    pub title: String,
    pub original_title: Option<String>,
    pub kind: MediaKind,
    pub added_at: DateTime<Utc>,
    /// Total episode count. Populated iff `kind == Show`.
    pub leaf_count: Option<u32>,
    /// Poster path on the media server, e.g. "/library/metadata/123/thumb/456".
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
        }
    }
}

/// A media-server account, enumerated once per audit run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAccount {
    pub id: String,
    pub name: String,
}
