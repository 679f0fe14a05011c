use reqwest::StatusCode;

/// Errors surfaced by the client library. The failure policy is: log and
/// abandon. Local state is never corrupted by a failed call; it either still
/// reflects the last successful remote state or gets corrected by the next
/// push event or reload. There is no retry and no offline queue.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server rejected the request: {0}")]
    Status(StatusCode),

    #[error("gateway connection failed: {0}")]
    Gateway(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;
