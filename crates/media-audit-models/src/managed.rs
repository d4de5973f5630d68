use serde::{Deserialize, Serialize};

/// A title known to one of the library managers, with its on-disk footprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManagedMediaRecord {
    pub title: String,
    pub size_on_disk: u64,
}
