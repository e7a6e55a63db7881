//! Commands that run against the loaded driver.

use std::io::Write;

use hvdbg_protocol::{send, ControlCode, CoreSelector, MsrRequest, Transport};
use tracing::debug;

use crate::command::Command;
use crate::disasm::Disassembler;
use crate::error::HvdbgResult;
use crate::host::HostInfo;
use crate::parse::{parse_memory, parse_rdmsr, parse_wrmsr, DisplayStyle, MemoryCommand};
use crate::render::hexdump::{render_dump, DumpLayout, Grouping};
use crate::render::msr::render_msr_table;

/// A parsed backend command, ready to send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOp
{
    /// One of the `d*` / `u` reads
    ReadMemory(MemoryCommand),
    /// `rdmsr`
    ReadMsr(MsrRequest),
    /// `wrmsr`
    WriteMsr(MsrRequest),
}

impl BackendOp
{
    /// Send the request and print the response
    ///
    /// ## Errors
    ///
    /// `Transport` if the driver fails the request, `Io` if printing fails.
    pub fn execute(
        &self,
        transport: &mut dyn Transport,
        out: &mut dyn Write,
        disassembler: &dyn Disassembler,
        host: &HostInfo,
    ) -> HvdbgResult<()>
    {
        match self {
            Self::ReadMemory(read) => read_and_show(read, transport, out, disassembler),
            Self::ReadMsr(request) => {
                let slots = match request.core {
                    CoreSelector::All => host.logical_cores as usize,
                    CoreSelector::Core(_) => 1,
                };
                let buffer = send(transport, ControlCode::ReadOrWriteMsr, &request.encode(), slots * 8)?;
                render_msr_table(out, request.msr, request.core, host.logical_cores, &buffer)?;
                Ok(())
            }
            Self::WriteMsr(request) => {
                send(transport, ControlCode::ReadOrWriteMsr, &request.encode(), 0)?;
                writeln!(out)?;
                Ok(())
            }
        }
    }
}

fn read_and_show(
    read: &MemoryCommand,
    transport: &mut dyn Transport,
    out: &mut dyn Write,
    disassembler: &dyn Disassembler,
) -> HvdbgResult<()>
{
    let length = read.length as usize;
    let buffer = send(transport, ControlCode::ReadMemory, &read.request().encode(), length)?;
    if buffer.is_partial() {
        debug!(
            address = read.address,
            requested = length,
            returned = buffer.returned_len(),
            "partial memory read"
        );
    }

    let layout = match read.style {
        DisplayStyle::Disassemble => {
            disassembler.disassemble(buffer.filled(), read.address, out)?;
            writeln!(out)?;
            return Ok(());
        }
        DisplayStyle::Bytes => DumpLayout {
            grouping: Grouping::Byte,
            ascii: true,
        },
        DisplayStyle::DwordsWithAscii => DumpLayout {
            grouping: Grouping::Dword,
            ascii: true,
        },
        DisplayStyle::Dwords => DumpLayout {
            grouping: Grouping::Dword,
            ascii: false,
        },
        DisplayStyle::Qwords => DumpLayout {
            grouping: Grouping::Qword,
            ascii: false,
        },
    };
    render_dump(out, layout, read.address, read.memory_type, &buffer, length)?;
    Ok(())
}

pub(super) fn read_memory(command: &Command, host: &HostInfo) -> HvdbgResult<BackendOp>
{
    parse_memory(command, host.pid).map(BackendOp::ReadMemory)
}

pub(super) fn rdmsr(command: &Command, _host: &HostInfo) -> HvdbgResult<BackendOp>
{
    parse_rdmsr(command).map(BackendOp::ReadMsr)
}

pub(super) fn wrmsr(command: &Command, _host: &HostInfo) -> HvdbgResult<BackendOp>
{
    parse_wrmsr(command).map(BackendOp::WriteMsr)
}
