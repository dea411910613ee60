// Errors raised while talking to the probe status endpoints
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode status samples")]
    Decode(#[from] serde_json::Error),

    #[error("status feed websocket error")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}
