//! # Transport
//!
//! The opaque synchronous channel to the backend driver.
//!
//! The interpreter owns the response buffer: it allocates it to the size it
//! is willing to accept, zeroes it, and lets the transport fill a prefix.
//! The transport reports how many bytes it wrote. Because the buffer starts
//! zeroed, an unfilled tail is only distinguishable from real zero bytes
//! through that length, which [`ResponseBuffer`] keeps alongside the data.

use tracing::{trace, warn};

use crate::error::TransportError;

/// Operation selector passed alongside the request bytes
///
/// Mirrors the IOCTL code of a device control call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCode
{
    /// Payload is a [`crate::ReadMemoryRequest`]
    ReadMemory,
    /// Payload is a [`crate::MsrRequest`]
    ReadOrWriteMsr,
}

/// Synchronous request/response channel to the backend
///
/// Implementations block until the driver answers. There is no timeout: a
/// hung driver hangs the caller.
pub trait Transport
{
    /// Send `request` and let the driver fill `response`
    ///
    /// Returns the number of bytes written into `response`.
    ///
    /// ## Errors
    ///
    /// Returns `TransportError::Failed` when the driver rejects the request.
    fn exchange(&mut self, code: ControlCode, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T>
{
    fn exchange(&mut self, code: ControlCode, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError>
    {
        (**self).exchange(code, request, response)
    }
}

/// Response bytes together with the length the driver reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuffer
{
    bytes: Vec<u8>,
    returned: usize,
}

impl ResponseBuffer
{
    /// Allocate a zero-filled buffer with nothing returned yet
    pub fn zeroed(capacity: usize) -> Self
    {
        Self {
            bytes: vec![0; capacity],
            returned: 0,
        }
    }

    /// Wrap bytes that were already filled, `returned` of them by the driver
    ///
    /// `returned` is clamped to the buffer length.
    pub fn from_returned(bytes: Vec<u8>, returned: usize) -> Self
    {
        let returned = returned.min(bytes.len());
        Self { bytes, returned }
    }

    /// Size the buffer was allocated with
    pub fn capacity(&self) -> usize
    {
        self.bytes.len()
    }

    /// Number of bytes the driver actually wrote
    pub fn returned_len(&self) -> usize
    {
        self.returned
    }

    /// Whether the driver filled less than the whole buffer
    pub fn is_partial(&self) -> bool
    {
        self.returned < self.bytes.len()
    }

    /// Bytes the driver wrote
    pub fn filled(&self) -> &[u8]
    {
        &self.bytes[..self.returned]
    }

    /// Byte at `offset`, or `None` if the driver did not return it
    pub fn get(&self, offset: usize) -> Option<u8>
    {
        if offset < self.returned {
            self.bytes.get(offset).copied()
        } else {
            None
        }
    }

    /// Read the little-endian `u32` at `offset` if all four bytes were returned
    pub fn u32_at(&self, offset: usize) -> Option<u32>
    {
        let end = offset.checked_add(4)?;
        let chunk = self.filled().get(offset..end)?;
        Some(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    /// Read the little-endian `u64` at `offset` if all eight bytes were returned
    pub fn u64_at(&self, offset: usize) -> Option<u64>
    {
        let low = self.u32_at(offset)?;
        let high = self.u32_at(offset.checked_add(4)?)?;
        Some((u64::from(high) << 32) | u64::from(low))
    }
}

/// Perform one exchange with a freshly zeroed response buffer
///
/// ## Errors
///
/// Propagates the transport failure, or `Overrun` if the driver reports more
/// bytes than `max_response`.
pub fn send<T: Transport + ?Sized>(
    transport: &mut T,
    code: ControlCode,
    request: &[u8],
    max_response: usize,
) -> Result<ResponseBuffer, TransportError>
{
    let mut buffer = ResponseBuffer::zeroed(max_response);
    trace!(?code, request_len = request.len(), max_response, "transport exchange");

    let returned = transport.exchange(code, request, &mut buffer.bytes).map_err(|e| {
        warn!(?code, error = %e, "transport exchange failed");
        e
    })?;

    if returned > max_response {
        return Err(TransportError::Overrun {
            returned,
            capacity: max_response,
        });
    }

    buffer.returned = returned;
    trace!(?code, returned, partial = buffer.is_partial(), "transport exchange complete");
    Ok(buffer)
}
