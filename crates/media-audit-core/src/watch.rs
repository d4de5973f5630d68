use media_audit_models::{LibraryItem, MediaKind, UserAccount, WatchStatus, WATCHED_LABEL};
use media_audit_sources::PlexClient;
use tracing::warn;

/// Reduce every known user's playback history for one item into the
/// per-user watch-status map. One history query per user, issued
/// sequentially. A user with nothing watched stays out of the map entirely;
/// a failed query is logged and that user is omitted, since partial results
/// are acceptable here.
pub async fn aggregate_watch_status(
    plex: &PlexClient,
    item: &LibraryItem,
    users: &[UserAccount],
) -> WatchStatus {
    let mut status = WatchStatus::new();
    for user in users {
        match plex.history_entry_count(&user.id, &item.rating_key).await {
            Ok(0) => {}
            Ok(watched) => {
                let value = match item.kind {
                    MediaKind::Show => {
                        progress_label(watched as u32, item.leaf_count.unwrap_or(0))
                    }
                    MediaKind::Movie => WATCHED_LABEL.to_string(),
                };
                status.insert(user.name.clone(), value);
            }
            Err(e) => {
                warn!(
                    "Error fetching watch history for user '{}' on '{}': {}",
                    user.name, item.title, e
                );
            }
        }
    }
    status
}

/// Watched-episode share formatted the way downstream consumers expect.
pub fn progress_label(watched_episodes: u32, total_episodes: u32) -> String {
    let percentage = if total_episodes > 0 {
        f64::from(watched_episodes) / f64::from(total_episodes) * 100.0
    } else {
        0.0
    };
    format!("{:.2}%", percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_label_formats_two_decimals() {
        assert_eq!(progress_label(3, 10), "30.00%");
        assert_eq!(progress_label(1, 3), "33.33%");
        assert_eq!(progress_label(10, 10), "100.00%");
    }

    #[test]
    fn test_progress_label_with_no_episodes() {
        assert_eq!(progress_label(5, 0), "0.00%");
    }
}
