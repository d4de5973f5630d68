use std::collections::BTreeMap;

/// Per-user watch signals keyed by display name. Shows carry a percentage
/// string ("42.00%"), movies the literal watched label. A user with no
/// recorded progress is absent from the map, never present with "0.00%".
pub type WatchStatus = BTreeMap<String, String>;

pub const WATCHED_LABEL: &str = "Watched";
pub const NO_PROGRESS_LABEL: &str = "0.00%";
