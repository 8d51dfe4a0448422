use std::path::PathBuf;

/// Errors that can occur on a physical bus link.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// Failed to open the bus device node.
    #[error("failed to open bus device {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the link.
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed by the other side.
    #[error("bus link closed")]
    LinkClosed,

    /// The operation is not supported by this bus binding.
    #[error("unsupported on this bus binding: {0}")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, BusError>;
