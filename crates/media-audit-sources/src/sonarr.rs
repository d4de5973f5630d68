use std::collections::BTreeMap;

use media_audit_models::ManagedMediaRecord;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::SourceError;
use crate::http::{api_key_client, normalize_base_url};

const SERVICE: &str = "sonarr";

pub struct SonarrClient {
    client: Client,
    base_url: String,
}

impl SonarrClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: api_key_client(SERVICE, api_key)?,
            base_url: normalize_base_url(base_url),
        })
    }

    /// The complete series catalog in one call, keyed by title.
    pub async fn get_series(&self) -> Result<BTreeMap<String, ManagedMediaRecord>, SourceError> {
        let url = format!("{}/series", self.base_url);
        let entries: Vec<Value> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::http(SERVICE, e))?
            .error_for_status()
            .map_err(|e| SourceError::http(SERVICE, e))?
            .json()
            .await
            .map_err(|e| SourceError::http(SERVICE, e))?;

        let catalog = project_catalog(&entries);
        debug!("Sonarr catalog holds {} titles", catalog.len());
        Ok(catalog)
    }
}

fn project_catalog(entries: &[Value]) -> BTreeMap<String, ManagedMediaRecord> {
    let mut catalog = BTreeMap::new();
    for entry in entries {
        if let Some(record) = parse_series(entry) {
            catalog.insert(record.title.clone(), record);
        }
    }
    catalog
}

/// Sonarr nests the disk footprint under `statistics`, unlike Radarr.
fn parse_series(entry: &Value) -> Option<ManagedMediaRecord> {
    let title = entry.get("title")?.as_str()?.to_string();
    let size_on_disk = entry
        .get("statistics")
        .and_then(|s| s.get("sizeOnDisk"))
        .and_then(|s| s.as_u64())
        .unwrap_or(0);
    Some(ManagedMediaRecord { title, size_on_disk })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_series_reads_nested_statistics() {
        let record = parse_series(&json!({
            "title": "Dark",
            "statistics": { "sizeOnDisk": 42_949_672_960u64 }
        }))
        .unwrap();
        assert_eq!(record.size_on_disk, 42_949_672_960);
    }

    #[test]
    fn test_parse_series_missing_statistics_defaults_to_zero() {
        let record = parse_series(&json!({ "title": "Dark" })).unwrap();
        assert_eq!(record.size_on_disk, 0);
    }

    #[test]
    fn test_project_catalog_last_write_wins() {
        let entries = vec![
            json!({ "title": "Dark", "statistics": { "sizeOnDisk": 1 } }),
            json!({ "title": "Dark", "statistics": { "sizeOnDisk": 2 } }),
        ];
        let catalog = project_catalog(&entries);
        assert_eq!(catalog["Dark"].size_on_disk, 2);
    }
}
