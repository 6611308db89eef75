//! Error types for the design-search crate.
//!
//! Provider errors are transport-level only. An empty gallery page is
//! never an error; it is an empty result list.

/// Errors that can occur while querying design galleries.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to a gallery site failed or returned a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A gallery request exceeded the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A selector or response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Map a [`reqwest::Error`] into the matching variant, keeping the
    /// request context in the message.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for design-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let err = SearchError::Http("HTTP 503 fetching https://godly.website".into());
        assert_eq!(
            err.to_string(),
            "HTTP error: HTTP 503 fetching https://godly.website"
        );
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("land-book.com after 8s".into());
        assert_eq!(err.to_string(), "request timed out: land-book.com after 8s");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("invalid selector".into());
        assert_eq!(err.to_string(), "parse error: invalid selector");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("sources must not be empty".into());
        assert_eq!(err.to_string(), "config error: sources must not be empty");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
