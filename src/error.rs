/// Error types shared by the attribute server and the capture merger
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Failure reported by BlueZ through bluer.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] bluer::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A capture file that is not valid JSON for the expected shape.
    #[error("Malformed capture document {path}: {source}")]
    MalformedCapture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Capture document {path} has no scanData array")]
    MissingScanData { path: PathBuf },

    #[error("Temperature sensor error: {0}")]
    Sensor(String),

    /// Write to a characteristic that only supports read/notify.
    #[error("Write not permitted on {0}")]
    WriteNotPermitted(String),

    /// The subscribed client stopped listening for notifications.
    #[error("Notification session closed")]
    NotificationClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
