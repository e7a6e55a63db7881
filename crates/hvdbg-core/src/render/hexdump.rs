//! Hex dump views for memory reads.
//!
//! Every view prints 16 bytes per line:
//!
//! ```text
//! fffff801`3a2b1000  55 48 89 E5 48 83 EC 20 31 C0 48 83 C4 20 5D C3  UH..H.. 1.H.. ].
//! ```
//!
//! Bytes the driver did not return print as `??` (or a run of `?` for wider
//! units) and leave a blank in the ASCII column; they are never decoded.
//! Physical reads prefix each line with `#` and a tab.

use std::io::{self, Write};

use hvdbg_protocol::{MemoryType, ResponseBuffer};

use super::{ascii_char, separate_64bit};

/// Bytes shown on one line
pub const BYTES_PER_LINE: usize = 16;

/// Unit the hex column is grouped in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping
{
    /// `db`
    Byte,
    /// `dc` / `dd`
    Dword,
    /// `dq`
    Qword,
}

/// Layout of one hex dump view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpLayout
{
    /// Hex column grouping
    pub grouping: Grouping,
    /// Whether the ASCII column follows the hex column
    pub ascii: bool,
}

/// Render `length` bytes read from `address`
///
/// `length` is the size that was requested; lines cover it in full even
/// when the driver returned fewer bytes.
///
/// ## Errors
///
/// Propagates write failures.
pub fn render_dump(
    out: &mut dyn Write,
    layout: DumpLayout,
    address: u64,
    memory_type: MemoryType,
    buffer: &ResponseBuffer,
    length: usize,
) -> io::Result<()>
{
    for line_offset in (0..length).step_by(BYTES_PER_LINE) {
        if memory_type == MemoryType::Physical {
            write!(out, "#\t")?;
        }
        write!(out, "{}  ", separate_64bit(address.wrapping_add(line_offset as u64)))?;

        match layout.grouping {
            Grouping::Byte => write_bytes(out, buffer, line_offset)?,
            Grouping::Dword => write_dwords(out, buffer, line_offset)?,
            Grouping::Qword => write_qwords(out, buffer, line_offset)?,
        }

        if layout.ascii {
            write!(out, " ")?;
            write_ascii(out, buffer, line_offset)?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

fn write_bytes(out: &mut dyn Write, buffer: &ResponseBuffer, line_offset: usize) -> io::Result<()>
{
    for offset in line_offset..line_offset + BYTES_PER_LINE {
        match buffer.get(offset) {
            Some(byte) => write!(out, "{byte:02X} ")?,
            None => write!(out, "?? ")?,
        }
    }
    Ok(())
}

fn write_dwords(out: &mut dyn Write, buffer: &ResponseBuffer, line_offset: usize) -> io::Result<()>
{
    for offset in (line_offset..line_offset + BYTES_PER_LINE).step_by(4) {
        match buffer.u32_at(offset) {
            Some(dword) => write!(out, "{dword:08X} ")?,
            None => write!(out, "???????? ")?,
        }
    }
    Ok(())
}

fn write_qwords(out: &mut dyn Write, buffer: &ResponseBuffer, line_offset: usize) -> io::Result<()>
{
    for offset in (line_offset..line_offset + BYTES_PER_LINE).step_by(8) {
        match buffer.u64_at(offset) {
            Some(qword) => write!(out, "{:08X}`{:08X} ", qword >> 32, qword & 0xffff_ffff)?,
            None => write!(out, "????????`???????? ")?,
        }
    }
    Ok(())
}

fn write_ascii(out: &mut dyn Write, buffer: &ResponseBuffer, line_offset: usize) -> io::Result<()>
{
    let column: String = (line_offset..line_offset + BYTES_PER_LINE)
        .map(|offset| buffer.get(offset).map_or(' ', ascii_char))
        .collect();
    write!(out, "{column}")
}
