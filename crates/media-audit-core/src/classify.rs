use chrono::{DateTime, Duration, Utc};
use media_audit_models::{MediaKind, WatchStatus, NO_PROGRESS_LABEL, WATCHED_LABEL};

const DAYS_PER_MONTH: i64 = 30;

/// The staleness decision. Two distinct tiers: an item nobody has any
/// recorded progress on is judged purely by age; an item with signals is
/// first given every chance to be disqualified by one of them, and only
/// then falls back to the age threshold.
pub fn is_stale(
    watch_status: &WatchStatus,
    kind: MediaKind,
    added_at: DateTime<Utc>,
    now: DateTime<Utc>,
    stale_months: u32,
) -> bool {
    let window = Duration::days(DAYS_PER_MONTH * i64::from(stale_months));

    if watch_status.is_empty() {
        return now - added_at > window;
    }

    for value in watch_status.values() {
        match kind {
            MediaKind::Show => {
                if value != NO_PROGRESS_LABEL {
                    return false;
                }
            }
            MediaKind::Movie => {
                if value == WATCHED_LABEL {
                    return false;
                }
            }
        }
    }

    added_at < now - window
}
