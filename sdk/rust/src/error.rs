//! Error types for the Pushbullet client.

use thiserror::Error;

/// Result type alias using PushbulletError.
pub type Result<T> = std::result::Result<T, PushbulletError>;

/// Errors that can occur when talking to Pushbullet.
#[derive(Error, Debug)]
pub enum PushbulletError {
    /// Missing or empty API key.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Non-2xx response from the API or from an upload target.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The HTTP transport could not be set up.
    #[error("connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Realtime stream error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A file push was given a MIME type that does not parse.
    #[error("invalid file type: {0:?}")]
    InvalidFileType(String),

    /// Reading or rewinding file content failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PushbulletError {
    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create an API error with status code and response body.
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a WebSocket error.
    pub fn websocket(msg: impl Into<String>) -> Self {
        Self::WebSocket(msg.into())
    }

    /// Create an invalid file type error.
    pub fn invalid_file_type(file_type: impl Into<String>) -> Self {
        Self::InvalidFileType(file_type.into())
    }

    /// HTTP status carried by an [`PushbulletError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
