use media_audit_models::MediaRequest;
use std::collections::HashMap;

/// Project request-tracker records into an item-id → requester-name map.
/// Records without a linked media item contribute nothing; repeated
/// requests for the same item keep the record encountered last.
pub fn build_requester_map(requests: &[MediaRequest]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for request in requests {
        if let (Some(rating_key), Some(name)) = (&request.media_rating_key, &request.requested_by) {
            map.insert(rating_key.clone(), name.clone());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating_key: Option<&str>, requested_by: Option<&str>) -> MediaRequest {
        MediaRequest {
            media_rating_key: rating_key.map(str::to_string),
            requested_by: requested_by.map(str::to_string),
        }
    }

    #[test]
    fn test_requests_without_linked_media_are_skipped() {
        let requests = vec![
            request(Some("100"), Some("alice")),
            request(None, Some("bob")),
            request(Some("200"), None),
        ];

        let map = build_requester_map(&requests);
        assert_eq!(map.len(), 1);
        assert_eq!(map["100"], "alice");
    }

    #[test]
    fn test_repeated_requests_keep_the_last_requester() {
        let requests = vec![
            request(Some("100"), Some("alice")),
            request(Some("100"), Some("bob")),
        ];

        let map = build_requester_map(&requests);
        assert_eq!(map["100"], "bob");
    }
}
