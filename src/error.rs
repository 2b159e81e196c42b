// THEORY:
// Classifying a frame cannot fail: bad input degrades to `Stable`. Errors only
// exist at the edges, where the engine touches files, JSON from a detector, or
// a stream task that may already be gone. `ActivityError` covers exactly those.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ActivityError>;

/// Failures at the edges of the engine. Classification itself never fails;
/// these cover config files, frame decoding and the stream plumbing.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to decode frame: {0}")]
    FrameDecode(#[from] serde_json::Error),

    #[error("activity stream has stopped")]
    StreamClosed,

    #[error("no activity stream registered as {0}")]
    UnknownStream(String),
}
