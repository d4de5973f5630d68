use thiserror::Error;

/// Failures surfaced by the service adapters. The orchestrator decides
/// whether a given failure is fatal to the run or merely narrows the
/// available facts.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{service}: request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service}: invalid configuration: {detail}")]
    Config {
        service: &'static str,
        detail: String,
    },

    #[error("{service}: unexpected payload: {detail}")]
    Payload {
        service: &'static str,
        detail: String,
    },

    /// The source reported a total record count its pages never satisfy.
    #[error("{service}: pagination did not converge: fetched {fetched} of {reported} reported records over {pages} pages")]
    PaginationRunaway {
        service: &'static str,
        fetched: usize,
        reported: i64,
        pages: u32,
    },
}

impl SourceError {
    pub(crate) fn http(service: &'static str, source: reqwest::Error) -> Self {
        SourceError::Http { service, source }
    }
}
