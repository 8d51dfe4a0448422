use std::path::PathBuf;

/// Errors that can occur while configuring or running the dispatcher.
///
/// Everything here is a configuration-time or link-level failure; a
/// frame itself can never fail to dispatch (unknown addresses and
/// commands are no-ops by contract).
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A handler was registered on an address that already has one.
    #[error("dispatch address {0:#04x} already has a handler")]
    AddressInUse(u8),

    /// A handler was registered on a reserved address.
    #[error("dispatch address {0:#04x} is reserved")]
    ReservedAddress(u8),

    /// Frame-level error on the link.
    #[error("frame error: {0}")]
    Frame(#[from] mcubridge_frame::FrameError),

    /// Bus-level error on the link.
    #[error("bus error: {0}")]
    Bus(#[from] mcubridge_bus::BusError),

    /// Port configuration was rejected.
    #[error("port error: {0}")]
    Port(#[from] mcubridge_port::PortError),

    /// Board configuration file could not be read.
    #[error("failed to read board config {path}: {source}")]
    BoardRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Board configuration is structurally invalid.
    #[error("invalid board config: {0}")]
    Board(String),

    /// Board configuration failed to parse.
    #[error("board config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
