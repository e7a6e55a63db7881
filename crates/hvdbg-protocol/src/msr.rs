//! Model-specific register read/write request.

use std::fmt;

use crate::error::DecodeError;

/// Raw core number meaning "every logical processor"
pub const APPLY_ALL_CORES: u32 = 0xffff_ffff;

/// Which logical processors an MSR request applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoreSelector
{
    /// Every logical processor; the response holds one `u64` per core
    #[default]
    All,
    /// A single logical processor by index
    Core(u32),
}

impl CoreSelector
{
    /// Value written into the `core` field of the request
    pub const fn raw(self) -> u32
    {
        match self {
            Self::All => APPLY_ALL_CORES,
            Self::Core(index) => index,
        }
    }
}

impl From<u32> for CoreSelector
{
    fn from(raw: u32) -> Self
    {
        if raw == APPLY_ALL_CORES {
            Self::All
        } else {
            Self::Core(raw)
        }
    }
}

impl fmt::Display for CoreSelector
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::All => write!(f, "all cores"),
            Self::Core(index) => write!(f, "core 0x{index:x}"),
        }
    }
}

/// Direction of an MSR request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MsrAction
{
    /// `rdmsr`
    Read = 0,
    /// `wrmsr`
    Write = 1,
}

impl TryFrom<u32> for MsrAction
{
    type Error = DecodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error>
    {
        match value {
            0 => Ok(Self::Read),
            1 => Ok(Self::Write),
            _ => Err(DecodeError::InvalidField { field: "action", value }),
        }
    }
}

/// Request to read or write an MSR on one or all cores
///
/// Layout (little-endian, 24 bytes):
///
/// ```text
/// 0x00  msr     u64
/// 0x08  core    u32   (0xffffffff = all cores)
/// 0x0c  action  u32
/// 0x10  value   u64   (ignored for reads)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MsrRequest
{
    /// Read or write
    pub action: MsrAction,
    /// Register index (the `ecx` operand of `rdmsr`/`wrmsr`)
    pub msr: u32,
    /// Target processors
    pub core: CoreSelector,
    /// Value to write (`edx:eax`), zero for reads
    pub value: u64,
}

impl MsrRequest
{
    /// Encoded size in bytes
    pub const SIZE: usize = 24;

    /// Build a read request
    pub const fn read(msr: u32, core: CoreSelector) -> Self
    {
        Self {
            action: MsrAction::Read,
            msr,
            core,
            value: 0,
        }
    }

    /// Build a write request
    pub const fn write(msr: u32, value: u64, core: CoreSelector) -> Self
    {
        Self {
            action: MsrAction::Write,
            msr,
            core,
            value,
        }
    }

    /// Encode into the fixed wire layout
    pub fn encode(&self) -> [u8; Self::SIZE]
    {
        let mut out = [0u8; Self::SIZE];
        out[0..8].copy_from_slice(&u64::from(self.msr).to_le_bytes());
        out[8..12].copy_from_slice(&self.core.raw().to_le_bytes());
        out[12..16].copy_from_slice(&(self.action as u32).to_le_bytes());
        out[16..24].copy_from_slice(&self.value.to_le_bytes());
        out
    }

    /// Decode a request received by the backend
    ///
    /// ## Errors
    ///
    /// `Truncated` for short buffers, `InvalidField` for an unknown action or
    /// an MSR index wider than 32 bits.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError>
    {
        if bytes.len() < Self::SIZE {
            return Err(DecodeError::Truncated {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }

        let msr = u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]);
        let msr = u32::try_from(msr).map_err(|_| DecodeError::InvalidField {
            field: "msr",
            value: (msr >> 32) as u32,
        })?;

        Ok(Self {
            msr,
            core: CoreSelector::from(u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]])),
            action: MsrAction::try_from(u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]))?,
            value: u64::from_le_bytes([
                bytes[16], bytes[17], bytes[18], bytes[19], bytes[20], bytes[21], bytes[22], bytes[23],
            ]),
        })
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_core_selector_sentinel()
    {
        assert_eq!(CoreSelector::All.raw(), 0xffff_ffff);
        assert_eq!(CoreSelector::from(0xffff_ffff), CoreSelector::All);
        assert_eq!(CoreSelector::from(2), CoreSelector::Core(2));
        assert_eq!(CoreSelector::default(), CoreSelector::All);
    }

    #[test]
    fn test_read_request_encodes_all_cores()
    {
        let bytes = MsrRequest::read(0xc000_0082, CoreSelector::All).encode();

        assert_eq!(&bytes[0..8], &[0x82, 0, 0, 0xc0, 0, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[0xff; 4]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 0]);
        assert_eq!(&bytes[16..24], &[0; 8]);
    }

    #[test]
    fn test_write_request_carries_value()
    {
        let bytes = MsrRequest::write(0x1b, 0xfee0_0900, CoreSelector::Core(3)).encode();

        assert_eq!(&bytes[8..12], &[3, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[1, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[0x00, 0x09, 0xe0, 0xfe]);
    }

    #[test]
    fn test_decode_rejects_wide_msr()
    {
        let mut bytes = [0u8; MsrRequest::SIZE];
        bytes[4] = 1;
        assert!(matches!(
            MsrRequest::decode(&bytes),
            Err(DecodeError::InvalidField { field: "msr", .. })
        ));
    }
}
