use std::fmt;
use std::io;

use mcubridge_bus::BusError;
use mcubridge_dispatch::DispatchError;
use mcubridge_frame::FrameError;

// Exit code constants aligned with sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const BUS_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn bus_error(context: &str, err: BusError) -> CliError {
    match err {
        BusError::Open { source, .. } | BusError::Io(source) => io_error(context, source),
        BusError::LinkClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(BUS_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::LinkClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn dispatch_error(context: &str, err: DispatchError) -> CliError {
    match err {
        DispatchError::Bus(err) => bus_error(context, err),
        DispatchError::Frame(err) => frame_error(context, err),
        DispatchError::BoardRead { source, .. } => {
            io_error(&format!("{context}: board config"), source)
        }
        DispatchError::Board(_) | DispatchError::Json(_) | DispatchError::Port(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        DispatchError::AddressInUse(_) | DispatchError::ReservedAddress(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}
