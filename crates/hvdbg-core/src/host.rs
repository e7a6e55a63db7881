//! Facts about the machine the interpreter runs on.

use std::thread;

/// Process id and processor count used for command defaults
///
/// Memory reads default to the interpreter's own process, and an all-cores
/// MSR read expects one value per logical processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostInfo
{
    /// Id of the interpreter process
    pub pid: u32,
    /// Number of logical processors
    pub logical_cores: u32,
}

impl HostInfo
{
    /// Query the running system
    pub fn detect() -> Self
    {
        let logical_cores = thread::available_parallelism()
            .map(|n| u32::try_from(n.get()).unwrap_or(u32::MAX))
            .unwrap_or(1);

        Self {
            pid: std::process::id(),
            logical_cores,
        }
    }
}
