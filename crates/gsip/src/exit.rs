use std::fmt;
use std::io;

use gsip_link::LinkError;
use gsip_session::SessionError;
use gsip_wire::WireError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const LINK_ERROR: i32 = 3;
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
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Open { source, .. } => io_error(context, source),
        LinkError::Io(source) => io_error(context, source),
        LinkError::UnsupportedBaudRate(_) => CliError::new(USAGE, format!("{context}: {err}")),
        LinkError::Closed => CliError::new(LINK_ERROR, format!("{context}: {err}")),
    }
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    match err {
        WireError::Io(source) => io_error(context, source),
        WireError::InvalidOperation { .. }
        | WireError::PayloadShapeMismatch { .. }
        | WireError::DelimiterInPayload { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        WireError::LinkClosed => CliError::new(LINK_ERROR, format!("{context}: {err}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Link(err) => link_error(context, err),
        SessionError::Wire(err) => wire_error(context, err),
    }
}
