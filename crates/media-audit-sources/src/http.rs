use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;

use crate::error::SourceError;

/// Build a client with the `X-Api-Key` auth header the *arr-style services
/// and the request tracker all share.
pub(crate) fn api_key_client(service: &'static str, api_key: &str) -> Result<Client, SourceError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        HeaderName::from_static("x-api-key"),
        HeaderValue::from_str(api_key).map_err(|_| SourceError::Config {
            service,
            detail: "API key is not a valid header value".to_string(),
        })?,
    );

    Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|e| SourceError::http(service, e))
}

pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
