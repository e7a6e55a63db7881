//! # Error Types
//!
//! Errors raised while talking to the backend driver or decoding its
//! requests.

use thiserror::Error;

/// Failure of a single transport exchange
///
/// Every variant aborts only the command that issued the request. Nothing in
/// the protocol layer retries.
#[derive(Error, Debug)]
pub enum TransportError
{
    /// The driver rejected or failed the request
    ///
    /// `code` carries the OS-reported error code when the underlying channel
    /// exposes one (the `GetLastError` value of a failed `DeviceIoControl`,
    /// or an errno for a device node).
    #[error("{reason}")]
    Failed
    {
        /// OS error code, if the channel reported one
        code: Option<u32>,
        /// Human readable cause
        reason: String,
    },

    /// The driver claims to have written more bytes than the buffer holds
    #[error("driver returned {returned} bytes into a {capacity} byte buffer")]
    Overrun
    {
        /// Length reported by the driver
        returned: usize,
        /// Size of the buffer the interpreter allocated
        capacity: usize,
    },

    /// I/O error on the underlying channel
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError
{
    /// OS error code attached to this failure, if any
    pub fn os_code(&self) -> Option<u32>
    {
        match self {
            Self::Failed { code, .. } => *code,
            Self::Io(e) => e.raw_os_error().and_then(|c| u32::try_from(c).ok()),
            Self::Overrun { .. } => None,
        }
    }
}

/// Error decoding a request on the backend side
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError
{
    /// The buffer is shorter than the fixed layout
    #[error("request truncated: expected {expected} bytes, got {actual}")]
    Truncated
    {
        /// Required length
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// An enum field carries a value with no meaning
    #[error("invalid value {value:#x} for field '{field}'")]
    InvalidField
    {
        /// Field name
        field: &'static str,
        /// Raw value found in the buffer
        value: u32,
    },
}
