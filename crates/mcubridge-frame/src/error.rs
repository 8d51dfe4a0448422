/// Errors that can occur while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred on the underlying link.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link closed before a complete frame crossed it.
    #[error("link closed (incomplete frame)")]
    LinkClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
