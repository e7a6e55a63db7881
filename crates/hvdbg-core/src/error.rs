//! # Error Types
//!
//! Everything a command can fail with.
//!
//! We use `thiserror` to generate the `Error` implementations. The
//! interpreter never stops on one of these: it prints the message (and, for
//! syntax and validation errors, the command's usage text) and goes back to
//! the prompt. The only way out is `exit`.

use hvdbg_protocol::TransportError;
use thiserror::Error;

use crate::backend::DriverError;

/// Error raised while running a single command
///
/// ## Error Categories
///
/// 1. **Input errors**: `Syntax`, `Validation` (usage text is printed after them)
/// 2. **State errors**: `NotConnected`, `NotLoaded`
/// 3. **Backend errors**: `Transport`, `Driver`
/// 4. **Output errors**: `Io`
#[derive(Error, Debug)]
pub enum CommandError
{
    /// Wrong token count, dangling keyword, or a role given twice
    #[error("{0}")]
    Syntax(String),

    /// A token had the right position but the wrong shape
    ///
    /// Examples:
    /// - `12g` where a hex number is expected
    /// - `256.1.1.1` as a remote address
    /// - a zero or missing address
    #[error("{0}")]
    Validation(String),

    /// The command needs a `.connect` first
    #[error("You're not connected to any instance of hvdbg, did you use '.connect'?")]
    NotConnected,

    /// The command needs the driver loaded (`load`) first
    #[error("Handle not found, probably the driver is not loaded.")]
    NotLoaded,

    /// The driver rejected or failed a request
    #[error("{}", describe_transport(.0))]
    Transport(#[from] TransportError),

    /// Installing, loading, unloading or uninstalling the driver failed
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Writing command output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError
{
    /// Whether the command's usage text should follow this error
    pub fn shows_usage(&self) -> bool
    {
        matches!(self, Self::Syntax(_) | Self::Validation(_))
    }
}

fn describe_transport(error: &TransportError) -> String
{
    match error.os_code() {
        Some(code) => format!("Ioctl failed with code 0x{code:x}"),
        None => format!("Ioctl failed: {error}"),
    }
}

/// Convenience type alias for `Result<T, CommandError>`
pub type HvdbgResult<T> = std::result::Result<T, CommandError>;
