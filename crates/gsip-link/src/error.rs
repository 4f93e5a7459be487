use std::path::PathBuf;

/// Errors that can occur on a byte link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Failed to open or configure the device at the given path.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The requested baud rate has no termios constant.
    #[error("unsupported baud rate {0}")]
    UnsupportedBaudRate(u32),

    /// An I/O error occurred on the link.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The other end of the link has gone away.
    #[error("link closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, LinkError>;
