use std::future::Future;

use media_audit_models::MediaRequest;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::SourceError;
use crate::http::{api_key_client, normalize_base_url};
use crate::json::id_string;

const SERVICE: &str = "overseerr";
const PAGE_SIZE: usize = 100;

/// Hard bound on request pagination. The tracker reports a total count up
/// front; a source that never satisfies its own total must fail the fetch
/// rather than keep the loop spinning.
pub const MAX_REQUEST_PAGES: u32 = 100;

#[derive(Debug, Deserialize)]
struct RequestPage {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    results: i64,
}

pub struct OverseerrClient {
    client: Client,
    base_url: String,
}

impl OverseerrClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, SourceError> {
        Ok(Self {
            client: api_key_client(SERVICE, api_key)?,
            base_url: normalize_base_url(base_url),
        })
    }

    /// Every request the tracker knows about, across all pages.
    pub async fn get_requests(&self) -> Result<Vec<MediaRequest>, SourceError> {
        let records = collect_pages(|skip| self.fetch_page(skip)).await?;
        Ok(records.iter().map(parse_request).collect())
    }

    async fn fetch_page(&self, skip: usize) -> Result<RequestPage, SourceError> {
        let url = format!("{}/request", self.base_url);
        let take = PAGE_SIZE.to_string();
        let skip = skip.to_string();

        self.client
            .get(&url)
            .query(&[("take", take.as_str()), ("skip", skip.as_str()), ("filter", "all")])
            .send()
            .await
            .map_err(|e| SourceError::http(SERVICE, e))?
            .error_for_status()
            .map_err(|e| SourceError::http(SERVICE, e))?
            .json()
            .await
            .map_err(|e| SourceError::http(SERVICE, e))
    }
}

/// Accumulate pages until the running total reaches the server-reported
/// total, with a hard page cap. A total of zero or less paired with actual
/// records, or a page that adds nothing while the total is unmet, means the
/// source is misreporting.
async fn collect_pages<F, Fut>(mut fetch: F) -> Result<Vec<Value>, SourceError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<RequestPage, SourceError>>,
{
    let mut records: Vec<Value> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let fetched = fetch(records.len()).await?;
        let reported = fetched.page_info.results;
        let page_len = fetched.results.len();

        if reported <= 0 && page_len > 0 {
            return Err(SourceError::PaginationRunaway {
                service: SERVICE,
                fetched: records.len() + page_len,
                reported,
                pages: page,
            });
        }

        records.extend(fetched.results);
        debug!(
            "Fetched request page {} ({} of {} reported records)",
            page,
            records.len(),
            reported
        );

        if records.len() as i64 >= reported {
            break;
        }
        if page_len == 0 || page >= MAX_REQUEST_PAGES {
            return Err(SourceError::PaginationRunaway {
                service: SERVICE,
                fetched: records.len(),
                reported,
                pages: page,
            });
        }
        page += 1;
    }

    Ok(records)
}

fn parse_request(entry: &Value) -> MediaRequest {
    MediaRequest {
        media_rating_key: entry
            .get("media")
            .and_then(|m| m.get("ratingKey"))
            .and_then(id_string),
        requested_by: entry
            .get("requestedBy")
            .and_then(|r| r.get("displayName"))
            .and_then(|n| n.as_str())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn full_page(skip: usize, count: usize) -> Vec<Value> {
        (0..count).map(|i| json!({ "id": skip + i })).collect()
    }

    #[tokio::test]
    async fn test_pagination_stops_at_reported_total() {
        let calls = AtomicU32::new(0);

        let records = collect_pages(|skip| {
            calls.fetch_add(1, Ordering::SeqCst);
            let count = 250usize.saturating_sub(skip).min(PAGE_SIZE);
            let results = full_page(skip, count);
            async move {
                Ok(RequestPage {
                    page_info: PageInfo { results: 250 },
                    results,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(records.len(), 250);
        // The total is satisfied on page 3; no fourth call happens.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_pagination_empty_tracker() {
        let records = collect_pages(|_skip| async {
            Ok(RequestPage {
                page_info: PageInfo { results: 0 },
                results: Vec::new(),
            })
        })
        .await
        .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_rejects_nonpositive_total_with_records() {
        let err = collect_pages(|skip| {
            let results = full_page(skip, 3);
            async move {
                Ok(RequestPage {
                    page_info: PageInfo { results: -1 },
                    results,
                })
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SourceError::PaginationRunaway { .. }));
    }

    #[tokio::test]
    async fn test_pagination_rejects_stalled_source() {
        let err = collect_pages(|_skip| async {
            Ok(RequestPage {
                page_info: PageInfo { results: 500 },
                results: Vec::new(),
            })
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            SourceError::PaginationRunaway { fetched: 0, reported: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_pagination_caps_runaway_totals() {
        let err = collect_pages(|skip| {
            let results = full_page(skip, PAGE_SIZE);
            async move {
                Ok(RequestPage {
                    page_info: PageInfo { results: i64::MAX },
                    results,
                })
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            SourceError::PaginationRunaway { pages: MAX_REQUEST_PAGES, .. }
        ));
    }

    #[test]
    fn test_parse_request_with_numeric_rating_key() {
        let request = parse_request(&json!({
            "media": { "ratingKey": 123 },
            "requestedBy": { "displayName": "alice" }
        }));
        assert_eq!(request.media_rating_key.as_deref(), Some("123"));
        assert_eq!(request.requested_by.as_deref(), Some("alice"));
    }

    #[test]
    fn test_parse_request_without_linked_media() {
        let request = parse_request(&json!({
            "requestedBy": { "displayName": "bob" }
        }));
        assert_eq!(request.media_rating_key, None);
    }
}
