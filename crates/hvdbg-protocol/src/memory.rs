//! Memory read request.

use crate::error::DecodeError;

/// Which address space a read targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MemoryType
{
    /// Physical address (`!db`, `!u`, ...)
    Physical = 0,
    /// Virtual address in the context of a process
    Virtual = 1,
}

impl TryFrom<u32> for MemoryType
{
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error>
    {
        match value {
            0 => Ok(Self::Physical),
            1 => Ok(Self::Virtual),
            _ => Err(DecodeError::InvalidField {
                field: "memory_type",
                value,
            }),
        }
    }
}

/// Execution context the driver reads from
///
/// The interpreter only ever issues [`ReadingType::FromKernel`]; the VMX root
/// variant exists so the backend can decode everything it may receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ReadingType
{
    /// Read from regular kernel mode
    FromKernel = 0,
    /// Read while in VMX root operation
    FromVmxRoot = 1,
}

impl TryFrom<u32> for ReadingType
{
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error>
    {
        match value {
            0 => Ok(Self::FromKernel),
            1 => Ok(Self::FromVmxRoot),
            _ => Err(DecodeError::InvalidField {
                field: "reading_type",
                value,
            }),
        }
    }
}

/// Request to read `size` bytes at `address`
///
/// Layout (little-endian, 24 bytes):
///
/// ```text
/// 0x00  address       u64
/// 0x08  pid           u32
/// 0x0c  size          u32
/// 0x10  memory_type   u32
/// 0x14  reading_type  u32
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadMemoryRequest
{
    /// Start address
    pub address: u64,
    /// Process whose address space is read (ignored for physical reads)
    pub pid: u32,
    /// Number of bytes requested
    pub size: u32,
    /// Physical or virtual address space
    pub memory_type: MemoryType,
    /// Context the driver performs the read in
    pub reading_type: ReadingType,
}

impl ReadMemoryRequest
{
    /// Encoded size in bytes
    pub const SIZE: usize = 24;

    /// Encode into the fixed wire layout
    pub fn encode(&self) -> [u8; Self::SIZE]
    {
        let mut out = [0u8; Self::SIZE];
        out[0..8].copy_from_slice(&self.address.to_le_bytes());
        out[8..12].copy_from_slice(&self.pid.to_le_bytes());
        out[12..16].copy_from_slice(&self.size.to_le_bytes());
        out[16..20].copy_from_slice(&(self.memory_type as u32).to_le_bytes());
        out[20..24].copy_from_slice(&(self.reading_type as u32).to_le_bytes());
        out
    }

    /// Decode a request received by the backend
    ///
    /// ## Errors
    ///
    /// `Truncated` if `bytes` is shorter than [`Self::SIZE`], `InvalidField`
    /// for unknown enum values.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError>
    {
        let bytes: &[u8; Self::SIZE] = bytes
            .get(..Self::SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(DecodeError::Truncated {
                expected: Self::SIZE,
                actual: bytes.len(),
            })?;

        Ok(Self {
            address: u64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
            pid: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            size: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            memory_type: MemoryType::try_from(u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]))?,
            reading_type: ReadingType::try_from(u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]))?,
        })
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_encode_layout()
    {
        let request = ReadMemoryRequest {
            address: 0xfffff801_deadbeef,
            pid: 0x1234,
            size: 0x80,
            memory_type: MemoryType::Virtual,
            reading_type: ReadingType::FromKernel,
        };
        let bytes = request.encode();

        assert_eq!(&bytes[0..8], &[0xef, 0xbe, 0xad, 0xde, 0x01, 0xf8, 0xff, 0xff]);
        assert_eq!(&bytes[8..12], &[0x34, 0x12, 0, 0]);
        assert_eq!(&bytes[12..16], &[0x80, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[1, 0, 0, 0]);
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_rejects_short_buffer()
    {
        let err = ReadMemoryRequest::decode(&[0u8; 10]).unwrap_err();
        assert_eq!(err, DecodeError::Truncated { expected: 24, actual: 10 });
    }

    #[test]
    fn test_decode_rejects_unknown_memory_type()
    {
        let mut bytes = [0u8; ReadMemoryRequest::SIZE];
        bytes[16] = 7;
        let err = ReadMemoryRequest::decode(&bytes).unwrap_err();
        assert_eq!(err, DecodeError::InvalidField { field: "memory_type", value: 7 });
    }
}
