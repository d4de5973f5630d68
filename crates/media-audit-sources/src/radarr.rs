use std::collections::BTreeMap;

use media_audit_models::ManagedMediaRecord;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::SourceError;
use crate::http::{api_key_client, normalize_base_url};

const SERVICE: &str = "radarr";

pub struct RadarrClient {
    client: Client,
    base_url: String,
}

impl RadarrClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: api_key_client(SERVICE, api_key)?,
            base_url: normalize_base_url(base_url),
        })
    }

    /// The complete movie catalog in one call, keyed by title.
    pub async fn get_movies(&self) -> Result<BTreeMap<String, ManagedMediaRecord>, SourceError> {
        let url = format!("{}/movie", self.base_url);
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
        debug!("Radarr catalog holds {} titles", catalog.len());
        Ok(catalog)
    }
}

/// Title is not a unique key in the source system; a duplicate title keeps
/// the record listed last.
fn project_catalog(entries: &[Value]) -> BTreeMap<String, ManagedMediaRecord> {
    let mut catalog = BTreeMap::new();
    for entry in entries {
        if let Some(record) = parse_movie(entry) {
            catalog.insert(record.title.clone(), record);
        }
    }
    catalog
}

fn parse_movie(entry: &Value) -> Option<ManagedMediaRecord> {
    let title = entry.get("title")?.as_str()?.to_string();
    let size_on_disk = entry.get("sizeOnDisk").and_then(|s| s.as_u64()).unwrap_or(0);
    Some(ManagedMediaRecord { title, size_on_disk })
}
