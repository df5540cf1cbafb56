use std::error::Error;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VkdlError {
    #[error("Not a recognizable VK audio link: {input:?}")]
    InvalidResourceUrl { input: String },
    #[error("Connection closed")]
    ConnectionClosed,
    #[error("Connection timeout")]
    ConnectionTimeout,
    #[error("Network error: {message}")]
    NetworkError { message: String },
    #[error("Empty response from API")]
    EmptyResponse,
    #[error("{message}")]
    RemoteApiError { message: String },
    #[error("API response did not contain a playable URL")]
    MissingPlaylistUrl,
    #[error("Failed to fetch decryption key from {url}: {message}")]
    KeyFetchError { url: String, message: String },
    #[error("Segment request failed with HTTP status {status}")]
    SegmentFetchError { status: u16 },
    #[error("Failed to decrypt segment: {message}")]
    DecryptionError { message: String },
    #[error("Transcoder exited with status {status}: {message}")]
    TranscodeError { status: i32, message: String },
    #[error("Playlist contains no segments")]
    EmptyPlaylist,
    #[error("Standard I/O error: {e}")]
    StdIoError { e: std::io::Error },
    #[error("CLI argument error: {message:?}")]
    CliArgumentError { message: String },
    #[error("Other error: {message:?}")]
    Other {
        message: String,
        origin: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<reqwest::Error> for VkdlError {
    fn from(e: reqwest::Error) -> Self {
        match e.source().and_then(|s| s.downcast_ref::<std::io::Error>()) {
            Some(io_err) if io_err.kind() == std::io::ErrorKind::TimedOut => {
                return Self::ConnectionTimeout;
            }
            _ => {}
        }

        match e.is_timeout() {
            true => Self::ConnectionTimeout,
            false if e.is_connect() => Self::ConnectionClosed,
            _ => Self::NetworkError {
                message: e.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for VkdlError {
    fn from(e: std::io::Error) -> Self {
        Self::StdIoError { e }
    }
}

impl From<keyring::Error> for VkdlError {
    fn from(e: keyring::Error) -> Self {
        Self::Other {
            message: e.to_string(),
            origin: Box::new(e),
        }
    }
}

impl From<crate::downloader::AudioDownloaderBuilderError> for VkdlError {
    fn from(e: crate::downloader::AudioDownloaderBuilderError) -> Self {
        Self::Other {
            message: e.to_string(),
            origin: Box::new(e),
        }
    }
}
