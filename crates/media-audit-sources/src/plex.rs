use chrono::{DateTime, TimeZone, Utc};
use media_audit_models::{LibraryItem, MediaKind, UserAccount};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SourceError;
use crate::json::id_string;

const SERVICE: &str = "plex";

/// A library section qualifying for the audit (movie or show).
#[derive(Debug, Clone)]
pub struct LibrarySection {
    pub key: String,
    pub kind: MediaKind,
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct PlexResponse {
    #[serde(rename = "MediaContainer", default)]
    media_container: MediaContainer,
}

/// Envelope shared by every server endpoint. Which array is populated
/// depends on the endpoint and the server version; the JSON API folds most
/// listings into `Metadata`, older servers answer with `Video`/`Directory`.
#[derive(Debug, Default, Deserialize)]
struct MediaContainer {
    #[serde(rename = "Account")]
    account: Option<Vec<Value>>,
    #[serde(rename = "Directory")]
    directory: Option<Vec<Value>>,
    #[serde(rename = "Metadata")]
    metadata: Option<Vec<Value>>,
    #[serde(rename = "Video")]
    video: Option<Vec<Value>>,
    size: Option<u64>,
}

pub struct PlexClient {
    client: Client,
    base_url: String,
}

impl PlexClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static("x-plex-token"),
            HeaderValue::from_str(token).map_err(|_| SourceError::Config {
                service: SERVICE,
                detail: "token is not a valid header value".to_string(),
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| SourceError::http(SERVICE, e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_container(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<MediaContainer, SourceError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::http(SERVICE, e))?
            .error_for_status()
            .map_err(|e| SourceError::http(SERVICE, e))?;

        let parsed: PlexResponse = response
            .json()
            .await
            .map_err(|e| SourceError::http(SERVICE, e))?;
        Ok(parsed.media_container)
    }

    /// All accounts known to the server.
    pub async fn get_accounts(&self) -> Result<Vec<UserAccount>, SourceError> {
        let url = format!("{}/accounts", self.base_url);
        let container = self.get_container(&url, &[]).await?;

        let mut accounts = Vec::new();
        for entry in container.account.unwrap_or_default() {
            let id = entry.get("id").and_then(id_string);
            let name = entry.get("name").and_then(|n| n.as_str());
            match (id, name) {
                (Some(id), Some(name)) if !name.is_empty() => {
                    accounts.push(UserAccount {
                        id,
                        name: name.to_string(),
                    });
                }
                _ => debug!("Skipping account entry without id or name"),
            }
        }
        debug!("Plex reports {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Library sections filtered to the kinds the audit covers.
    pub async fn get_sections(&self) -> Result<Vec<LibrarySection>, SourceError> {
        let url = format!("{}/library/sections", self.base_url);
        let container = self.get_container(&url, &[]).await?;

        let mut sections = Vec::new();
        for entry in container.directory.unwrap_or_default() {
            let key = entry.get("key").and_then(id_string);
            let kind = entry
                .get("type")
                .and_then(|t| t.as_str())
                .and_then(parse_kind);
            let title = entry
                .get("title")
                .and_then(|t| t.as_str())
                .unwrap_or("")
                .to_string();
            if let (Some(key), Some(kind)) = (key, kind) {
                sections.push(LibrarySection { key, kind, title });
            }
        }
        Ok(sections)
    }

    /// Full item listing for one section. Malformed entries are skipped,
    /// not fatal to the listing.
    pub async fn get_section_items(
        &self,
        section: &LibrarySection,
    ) -> Result<Vec<LibraryItem>, SourceError> {
        let url = format!("{}/library/sections/{}/all", self.base_url, section.key);
        let container = self.get_container(&url, &[]).await?;

        let entries = container
            .metadata
            .or(container.video)
            .or(container.directory)
            .unwrap_or_default();

        let mut items = Vec::new();
        for entry in entries {
            match parse_library_item(&entry, section.kind) {
                Some(item) => items.push(item),
                None => warn!(
                    "Skipping malformed library entry in section '{}'",
                    section.title
                ),
            }
        }
        Ok(items)
    }

    /// Number of playback-history entries for one (account, item) pair.
    pub async fn history_entry_count(
        &self,
        account_id: &str,
        rating_key: &str,
    ) -> Result<usize, SourceError> {
        let url = format!("{}/status/sessions/history/all", self.base_url);
        let container = self
            .get_container(
                &url,
                &[("accountID", account_id), ("metadataItemID", rating_key)],
            )
            .await?;

        let count = match (&container.metadata, &container.video) {
            (Some(metadata), _) => metadata.len(),
            (None, Some(video)) => video.len(),
            (None, None) => container.size.unwrap_or(0) as usize,
        };
        Ok(count)
    }
}

fn parse_kind(raw: &str) -> Option<MediaKind> {
    match raw {
        "movie" => Some(MediaKind::Movie),
        "show" => Some(MediaKind::Show),
        _ => None,
    }
}

fn parse_library_item(entry: &Value, section_kind: MediaKind) -> Option<LibraryItem> {
    let rating_key = entry.get("ratingKey").and_then(id_string)?;
    let title = entry.get("title").and_then(|t| t.as_str())?.to_string();
    let kind = entry
        .get("type")
        .and_then(|t| t.as_str())
        .and_then(parse_kind)
        .unwrap_or(section_kind);

    let added_at = entry
        .get("addedAt")
        .and_then(|a| a.as_i64())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .unwrap_or(DateTime::UNIX_EPOCH);

    // leaf_count is the show's total episode count; movies never carry one.
    let leaf_count = match kind {
        MediaKind::Show => Some(entry.get("leafCount").and_then(|l| l.as_u64()).unwrap_or(0) as u32),
        MediaKind::Movie => None,
    };

    Some(LibraryItem {
        rating_key,
        title,
        original_title: entry
            .get("originalTitle")
            .and_then(|t| t.as_str())
            .map(str::to_string),
        kind,
        added_at,
        leaf_count,
        thumb: entry.get("thumb").and_then(|t| t.as_str()).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_library_item_show() {
        let entry = json!({
            "ratingKey": "42",
            "title": "The Expanse",
            "type": "show",
            "addedAt": 1714521600,
            "leafCount": 62,
            "thumb": "/library/metadata/42/thumb/1"
        });

        let item = parse_library_item(&entry, MediaKind::Show).unwrap();
        assert_eq!(item.rating_key, "42");
        assert_eq!(item.kind, MediaKind::Show);
        assert_eq!(item.leaf_count, Some(62));
        assert_eq!(item.added_at.timestamp(), 1714521600);
        assert_eq!(item.thumb.as_deref(), Some("/library/metadata/42/thumb/1"));
    }

    #[test]
    fn test_parse_library_item_movie_has_no_episode_count() {
        let entry = json!({
            "ratingKey": 7,
            "title": "Heat",
            "type": "movie",
            "addedAt": 1714521600,
            "leafCount": 99
        });

        let item = parse_library_item(&entry, MediaKind::Movie).unwrap();
        assert_eq!(item.rating_key, "7");
        assert_eq!(item.leaf_count, None);
        assert_eq!(item.original_title, None);
    }

    #[test]
    fn test_parse_library_item_missing_title_is_rejected() {
        let entry = json!({ "ratingKey": "7", "addedAt": 1714521600 });
        assert!(parse_library_item(&entry, MediaKind::Movie).is_none());
    }

    #[test]
    fn test_parse_library_item_defaults_to_section_kind() {
        let entry = json!({ "ratingKey": "9", "title": "Untyped", "addedAt": 0 });
        let item = parse_library_item(&entry, MediaKind::Show).unwrap();
        assert_eq!(item.kind, MediaKind::Show);
        assert_eq!(item.leaf_count, Some(0));
    }
}
