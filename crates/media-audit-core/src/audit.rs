use anyhow::Result;
use chrono::{DateTime, Utc};
use media_audit_config::Config;
use media_audit_models::{
    LibraryItem, ManagedMediaRecord, MediaKind, SizeOnDisk, Snapshot, StaleCandidate, UserAccount,
    WatchStatus,
};
use media_audit_sources::{OverseerrClient, PlexClient, RadarrClient, SonarrClient};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info, warn};

use crate::classify::is_stale;
use crate::matching::find_best_match;
use crate::requester::build_requester_map;
use crate::store::SnapshotStore;
use crate::watch::aggregate_watch_status;

const UNKNOWN_REQUESTER: &str = "Unknown";

/// The audit orchestrator. Pulls each source once per run, walks the
/// library strictly sequentially (one item at a time, one user-history
/// query at a time) and persists the resulting snapshot through the
/// injected store.
pub struct StaleAudit {
    stale_months: u32,
    plex: PlexClient,
    overseerr: OverseerrClient,
    radarr: RadarrClient,
    sonarr: SonarrClient,
    store: Box<dyn SnapshotStore>,
}

impl StaleAudit {
    pub fn new(config: &Config, store: Box<dyn SnapshotStore>) -> Result<Self> {
        Ok(Self {
            stale_months: config.stale_months,
            plex: PlexClient::new(&config.plex.url, &config.plex.token)?,
            overseerr: OverseerrClient::new(&config.overseerr.url, &config.overseerr.api_key)?,
            radarr: RadarrClient::new(&config.radarr.url, &config.radarr.api_key)?,
            sonarr: SonarrClient::new(&config.sonarr.url, &config.sonarr.api_key)?,
            store,
        })
    }

    /// Serve the persisted snapshot unless the caller forces recomputation
    /// or nothing has been persisted yet.
    pub async fn snapshot(&self, force: bool) -> Result<Snapshot> {
        if !force {
            if let Some(snapshot) = self.store.load()? {
                info!("Serving cached snapshot from {}", snapshot.timestamp);
                return Ok(snapshot);
            }
        }
        self.run().await
    }

    /// One full audit run: pull every source, classify every qualifying
    /// library item, persist and return the result set.
    pub async fn run(&self) -> Result<Snapshot> {
        let now = Utc::now();

        let requests = self.overseerr.get_requests().await?;
        let requester_map = build_requester_map(&requests);
        info!("Resolved requesters for {} items", requester_map.len());

        let movie_catalog = self.radarr.get_movies().await?;
        let series_catalog = self.sonarr.get_series().await?;

        // A media-server failure on accounts or sections aborts the scan;
        // the run still completes, with an empty result set.
        let content = match self
            .scan_library(now, &requester_map, &movie_catalog, &series_catalog)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                error!("Error fetching library content: {}", e);
                Vec::new()
            }
        };

        let snapshot = Snapshot {
            timestamp: now,
            content,
        };
        self.store.save(&snapshot)?;
        info!("Audit finished: {} stale items", snapshot.content.len());
        Ok(snapshot)
    }

    async fn scan_library(
        &self,
        now: DateTime<Utc>,
        requester_map: &HashMap<String, String>,
        movie_catalog: &BTreeMap<String, ManagedMediaRecord>,
        series_catalog: &BTreeMap<String, ManagedMediaRecord>,
    ) -> Result<Vec<StaleCandidate>> {
        let users = self.plex.get_accounts().await?;
        let sections = self.plex.get_sections().await?;

        let mut content = Vec::new();
        for section in sections {
            info!(
                "Scanning library '{}' ({})",
                section.title,
                section.kind.as_str()
            );

            // One unreadable section does not end the run.
            let items = match self.plex.get_section_items(&section).await {
                Ok(items) => items,
                Err(e) => {
                    warn!("Skipping library '{}': {}", section.title, e);
                    continue;
                }
            };

            for item in items {
                let catalog = match item.kind {
                    MediaKind::Movie => movie_catalog,
                    MediaKind::Show => series_catalog,
                };
                if let Some(candidate) = self
                    .process_item(&item, now, &users, requester_map, catalog)
                    .await
                {
                    content.push(candidate);
                }
            }
        }
        Ok(content)
    }

    /// Aggregate one item's watch signals and classify it. Yields a
    /// candidate only when the item is stale; everything else is dropped
    /// on the spot.
    async fn process_item(
        &self,
        item: &LibraryItem,
        now: DateTime<Utc>,
        users: &[UserAccount],
        requester_map: &HashMap<String, String>,
        catalog: &BTreeMap<String, ManagedMediaRecord>,
    ) -> Option<StaleCandidate> {
        let watch_status = aggregate_watch_status(&self.plex, item, users).await;
        if !is_stale(&watch_status, item.kind, item.added_at, now, self.stale_months) {
            return None;
        }

        let requester = requester_map
            .get(&item.rating_key)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_REQUESTER.to_string());
        let requester_watched = watch_status.contains_key(&requester);

        let size = match find_best_match(&item.title, catalog) {
            Some(record) => SizeOnDisk::from_bytes(record.size_on_disk),
            None => SizeOnDisk::Unresolved,
        };

        let total_episodes = match item.kind {
            MediaKind::Show => item.leaf_count,
            MediaKind::Movie => None,
        };

        Some(StaleCandidate {
            title: item.title.clone(),
            original_title: item.original_title.clone(),
            kind: item.kind,
            added_at: item.added_at.date_naive(),
            plex_id: item.rating_key.clone(),
            requester,
            size,
            watch_status,
            total_episodes,
            requester_watched,
            poster_url: item
                .thumb
                .as_ref()
                .map(|thumb| format!("{}{}", self.plex.base_url(), thumb)),
        })
    }

    /// Classify a single item's signals in isolation, against this audit's
    /// configured window.
    pub fn classify_item(
        &self,
        watch_status: &WatchStatus,
        kind: MediaKind,
        added_at: DateTime<Utc>,
    ) -> bool {
        is_stale(watch_status, kind, added_at, Utc::now(), self.stale_months)
    }
}
