//! In-process stand-in for the kernel driver.
//!
//! The loopback driver decodes real wire requests and answers them from a
//! seeded memory image and a per-core MSR table, so the whole interpreter
//! pipeline runs without kernel code.

use std::collections::HashMap;

use hvdbg_protocol::{
    ControlCode, CoreSelector, DecodeError, MemoryType, MsrAction, MsrRequest, ReadMemoryRequest, Transport,
    TransportError,
};
use tracing::{debug, info};

use super::{Driver, DriverError};

/// `ERROR_INVALID_PARAMETER`
const INVALID_PARAMETER: u32 = 0x57;
/// `ERROR_INSUFFICIENT_BUFFER`
const INSUFFICIENT_BUFFER: u32 = 0x7a;

/// Base of the seeded virtual image
pub const VIRTUAL_IMAGE_BASE: u64 = 0xfffff801_3a2b1000;
/// Base of the seeded physical image
pub const PHYSICAL_IMAGE_BASE: u64 = 0x1000;

/// A contiguous mapped range
#[derive(Debug, Clone)]
struct Region
{
    memory_type: MemoryType,
    base: u64,
    bytes: Vec<u8>,
}

impl Region
{
    /// Bytes available from `address` to the end of the region
    fn tail(&self, memory_type: MemoryType, address: u64) -> Option<&[u8]>
    {
        if memory_type != self.memory_type {
            return None;
        }
        let offset = usize::try_from(address.checked_sub(self.base)?).ok()?;
        self.bytes.get(offset..)
    }
}

/// Driver whose "kernel" lives in this process
#[derive(Debug, Clone)]
pub struct LoopbackDriver
{
    logical_cores: u32,
    installed: bool,
    loaded: bool,
    regions: Vec<Region>,
    msrs: HashMap<u32, u64>,
}

impl LoopbackDriver
{
    /// Create a driver simulating `logical_cores` processors
    ///
    /// The image holds a short code sequence at [`VIRTUAL_IMAGE_BASE`], a
    /// banner at [`PHYSICAL_IMAGE_BASE`], and a few architectural MSRs.
    pub fn new(logical_cores: u32) -> Self
    {
        let mut code = Vec::with_capacity(0x200);
        while code.len() < 0x200 {
            // push rbp; mov rbp, rsp; sub rsp, 0x20; xor eax, eax; add rsp, 0x20; pop rbp; ret; int3 x2
            code.extend_from_slice(&[
                0x55, 0x48, 0x89, 0xe5, 0x48, 0x83, 0xec, 0x20, 0x31, 0xc0, 0x48, 0x83, 0xc4, 0x20, 0x5d, 0xc3, 0xcc,
                0xcc,
            ]);
        }
        code.truncate(0x200);

        let mut banner = b"hvdbg loopback physical page\0".to_vec();
        banner.resize(0x100, 0);

        let driver = Self {
            logical_cores: logical_cores.max(1),
            installed: false,
            loaded: false,
            regions: Vec::new(),
            msrs: HashMap::new(),
        };
        driver
            .with_region(MemoryType::Virtual, VIRTUAL_IMAGE_BASE, code)
            .with_region(MemoryType::Physical, PHYSICAL_IMAGE_BASE, banner)
            .with_msr(0x10, 0x0000_0a3c_5f21_9e40)
            .with_msr(0x1b, 0xfee0_0900)
            .with_msr(0xc000_0080, 0xd01)
            .with_msr(0xc000_0082, 0xfffff801_3a2b1040)
    }

    /// Map `bytes` at `base` in the given address space
    #[must_use]
    pub fn with_region(mut self, memory_type: MemoryType, base: u64, bytes: Vec<u8>) -> Self
    {
        self.regions.push(Region {
            memory_type,
            base,
            bytes,
        });
        self
    }

    /// Seed `msr` with `value` on every core
    #[must_use]
    pub fn with_msr(mut self, msr: u32, value: u64) -> Self
    {
        self.msrs.insert(msr, value);
        self
    }

    /// Whether `install` has run without a matching `uninstall`
    pub fn is_installed(&self) -> bool
    {
        self.installed
    }
}

impl Driver for LoopbackDriver
{
    fn install(&mut self) -> Result<(), DriverError>
    {
        self.installed = true;
        info!("loopback driver installed");
        Ok(())
    }

    fn load(&mut self) -> Result<Box<dyn Transport>, DriverError>
    {
        if !self.installed {
            return Err(DriverError::LoadFailed("driver is not installed".to_string()));
        }
        self.loaded = true;
        info!(cores = self.logical_cores, "loopback driver loaded");

        Ok(Box::new(LoopbackTransport {
            regions: self.regions.clone(),
            cores: (0..self.logical_cores).map(|_| self.msrs.clone()).collect(),
        }))
    }

    fn unload(&mut self, transport: Box<dyn Transport>) -> Result<(), DriverError>
    {
        if !self.loaded {
            return Err(DriverError::UnloadFailed("driver is not loaded".to_string()));
        }
        drop(transport);
        self.loaded = false;
        info!("loopback driver unloaded");
        Ok(())
    }

    fn uninstall(&mut self) -> Result<(), DriverError>
    {
        if self.loaded {
            return Err(DriverError::UninstallFailed("driver is still loaded".to_string()));
        }
        self.installed = false;
        info!("loopback driver uninstalled");
        Ok(())
    }
}

/// Channel returned by [`LoopbackDriver::load`]
#[derive(Debug)]
pub struct LoopbackTransport
{
    regions: Vec<Region>,
    cores: Vec<HashMap<u32, u64>>,
}

impl LoopbackTransport
{
    fn read_memory(&self, request: &ReadMemoryRequest, response: &mut [u8]) -> usize
    {
        let wanted = usize::try_from(request.size).unwrap_or(usize::MAX).min(response.len());
        let Some(tail) = self
            .regions
            .iter()
            .find_map(|region| region.tail(request.memory_type, request.address))
        else {
            debug!(address = request.address, "loopback read from unmapped address");
            return 0;
        };

        let count = wanted.min(tail.len());
        response[..count].copy_from_slice(&tail[..count]);
        count
    }

    fn msr(&mut self, request: &MsrRequest, response: &mut [u8]) -> Result<usize, TransportError>
    {
        let targets: Vec<usize> = match request.core {
            CoreSelector::All => (0..self.cores.len()).collect(),
            CoreSelector::Core(index) => {
                let index = usize::try_from(index).unwrap_or(usize::MAX);
                if index >= self.cores.len() {
                    return Err(failed(INVALID_PARAMETER, format!("core {index} does not exist")));
                }
                vec![index]
            }
        };

        match request.action {
            MsrAction::Write => {
                for &core in &targets {
                    self.cores[core].insert(request.msr, request.value);
                }
                Ok(0)
            }
            MsrAction::Read => {
                if response.len() < targets.len() * 8 {
                    return Err(failed(INSUFFICIENT_BUFFER, "response buffer too small".to_string()));
                }
                for (slot, &core) in targets.iter().enumerate() {
                    let value = self.cores[core].get(&request.msr).copied().ok_or_else(|| {
                        failed(INVALID_PARAMETER, format!("msr {:#x} is not implemented", request.msr))
                    })?;
                    response[slot * 8..slot * 8 + 8].copy_from_slice(&value.to_le_bytes());
                }
                Ok(targets.len() * 8)
            }
        }
    }
}

impl Transport for LoopbackTransport
{
    fn exchange(&mut self, code: ControlCode, request: &[u8], response: &mut [u8]) -> Result<usize, TransportError>
    {
        match code {
            ControlCode::ReadMemory => {
                let request = ReadMemoryRequest::decode(request).map_err(malformed)?;
                Ok(self.read_memory(&request, response))
            }
            ControlCode::ReadOrWriteMsr => {
                let request = MsrRequest::decode(request).map_err(malformed)?;
                self.msr(&request, response)
            }
        }
    }
}

fn failed(code: u32, reason: String) -> TransportError
{
    TransportError::Failed {
        code: Some(code),
        reason,
    }
}

fn malformed(error: DecodeError) -> TransportError
{
    failed(INVALID_PARAMETER, error.to_string())
}
