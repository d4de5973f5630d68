use serde::{Deserialize, Serialize};

/// One request-tracker record, reduced to the fields the engine needs.
/// `media_rating_key` is only present when the tracker linked the request to
/// a media-server item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaRequest {
    pub media_rating_key: Option<String>,
    pub requested_by: Option<String>,
}
