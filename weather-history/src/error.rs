use thiserror::Error;

pub type Result<T> = std::result::Result<T, HistoryError>;

/// Everything that can go wrong between requesting a date range and getting
/// back a finished [`HourlyTable`](crate::HourlyTable).
///
/// None of these are retried or recovered from internally: a failing row
/// aborts the whole call.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Transport-level failure (DNS, connect, TLS, body read).
    #[error("Network request failed for {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-2xx status.
    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed weather response: {reason}")]
    MalformedResponse {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Expected exactly one daily record for date '{date}', found {matches}")]
    Join { date: String, matches: usize },

    #[error("Invalid time code '{code}' for date '{date}': {reason}")]
    InvalidTimeCode {
        date: String,
        code: String,
        reason: String,
    },
}

impl HistoryError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// True for both transport failures and non-2xx responses.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }
}
