use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the SGS client. Nothing is retried; every failure
/// propagates straight to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad series code, code list, name mapping, or malformed input date.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// The API answered with a non-success status.
    #[error("request failed with HTTP {status} (GET {url})")]
    UpstreamHttp {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    UpstreamFormat(String),

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no series found with code {0}")]
    NotFound(u32),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::UpstreamFormat(msg.into())
    }
}
