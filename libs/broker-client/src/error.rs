#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("broker HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Broker answered 404, i.e. the topic has never been produced to.
    pub fn is_unknown_topic(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }

    /// Broker rejected the requested offsets.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == reqwest::StatusCode::BAD_REQUEST)
    }
}
