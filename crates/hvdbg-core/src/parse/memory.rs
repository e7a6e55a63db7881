//! Parser for the memory read family (`db dc dd dq u` and their `!` forms).

use hvdbg_protocol::{MemoryType, ReadMemoryRequest, ReadingType};

use super::{dangling, repeated};
use crate::command::Command;
use crate::error::{CommandError, HvdbgResult};
use crate::numeric::{parse_address, parse_hex_u32};

/// Default read length for the hex dump views
pub const DEFAULT_DUMP_LENGTH: u32 = 0x80;
/// Default read length for disassembly
pub const DEFAULT_DISASSEMBLY_LENGTH: u32 = 0x40;
/// Largest length a single read may request
pub const MAX_READ_LENGTH: u32 = 0x10_0000;

/// How the bytes of a memory read are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStyle
{
    /// `db`: bytes and ASCII
    Bytes,
    /// `dc`: dwords and ASCII
    DwordsWithAscii,
    /// `dd`: dwords only
    Dwords,
    /// `dq`: qwords
    Qwords,
    /// `u`: disassembly
    Disassemble,
}

impl DisplayStyle
{
    /// Length used when the command gives no `l` argument
    pub const fn default_length(self) -> u32
    {
        match self {
            Self::Disassemble => DEFAULT_DISASSEMBLY_LENGTH,
            _ => DEFAULT_DUMP_LENGTH,
        }
    }
}

/// Resolve a memory command name into its view and address space
pub fn style_for(name: &str) -> Option<(DisplayStyle, MemoryType)>
{
    let (memory_type, bare) = match name.strip_prefix('!') {
        Some(bare) => (MemoryType::Physical, bare),
        None => (MemoryType::Virtual, name),
    };

    let style = match bare {
        "db" => DisplayStyle::Bytes,
        "dc" => DisplayStyle::DwordsWithAscii,
        "dd" => DisplayStyle::Dwords,
        "dq" => DisplayStyle::Qwords,
        "u" => DisplayStyle::Disassemble,
        _ => return None,
    };
    Some((style, memory_type))
}

/// A validated memory read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCommand
{
    /// How the response is rendered
    pub style: DisplayStyle,
    /// Start address
    pub address: u64,
    /// Physical or virtual
    pub memory_type: MemoryType,
    /// Process whose address space is read
    pub pid: u32,
    /// Number of bytes to read
    pub length: u32,
}

impl MemoryCommand
{
    /// Wire request for this read
    pub const fn request(&self) -> ReadMemoryRequest
    {
        ReadMemoryRequest {
            address: self.address,
            pid: self.pid,
            size: self.length,
            memory_type: self.memory_type,
            reading_type: ReadingType::FromKernel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expecting
{
    Value,
    Length,
    ProcessId,
}

#[derive(Debug, Default)]
struct Fields
{
    address: Option<u64>,
    length: Option<u32>,
    pid: Option<u32>,
}

/// Parse `[!]d{b,c,d,q} | [!]u <address> [l <length>] [pid <pid>]`
///
/// `own_pid` fills in the process id when none (or zero) is given. A zero
/// length also falls back to the default for the view.
///
/// ## Errors
///
/// - `Syntax`: no arguments, two addresses, a repeated keyword, or a
///   keyword at the end of the line
/// - `Validation`: a token that is not hex, an oversized length, or a zero
///   or missing address
pub fn parse_memory(command: &Command, own_pid: u32) -> HvdbgResult<MemoryCommand>
{
    let name = command.name();
    let (style, memory_type) = style_for(name).ok_or_else(|| dangling(name))?;

    if command.args().is_empty() {
        return Err(dangling(name));
    }

    let (state, fields) = command.args().iter().try_fold(
        (Expecting::Value, Fields::default()),
        |(state, mut fields), token| -> HvdbgResult<(Expecting, Fields)> {
            match state {
                Expecting::Length => {
                    let length = parse_hex_u32(token)
                        .ok_or_else(|| CommandError::Validation("Err, you should enter a valid length".to_string()))?;
                    fields.length = Some(length);
                    Ok((Expecting::Value, fields))
                }
                Expecting::ProcessId => {
                    let pid = parse_hex_u32(token)
                        .ok_or_else(|| CommandError::Validation("Err, you should enter a valid proc id".to_string()))?;
                    fields.pid = Some(pid);
                    Ok((Expecting::Value, fields))
                }
                Expecting::Value => match token.as_str() {
                    "l" if fields.length.is_some() => Err(repeated("length", name)),
                    "l" => Ok((Expecting::Length, fields)),
                    "pid" if fields.pid.is_some() => Err(repeated("process id", name)),
                    "pid" => Ok((Expecting::ProcessId, fields)),
                    _ if fields.address.is_some() => {
                        Err(CommandError::Syntax(format!("Err, incorrect use of '{name}' command")))
                    }
                    _ => {
                        let address = parse_address(token).ok_or_else(|| {
                            CommandError::Validation("Err, you should enter a valid address".to_string())
                        })?;
                        fields.address = Some(address);
                        Ok((Expecting::Value, fields))
                    }
                },
            }
        },
    )?;

    if state != Expecting::Value {
        return Err(dangling(name));
    }

    let address = match fields.address {
        Some(address) if address != 0 => address,
        _ => return Err(CommandError::Validation("Err, Please enter a valid address.".to_string())),
    };

    let length = match fields.length {
        Some(length) if length > MAX_READ_LENGTH => {
            return Err(CommandError::Validation(format!(
                "Err, length {length:x} exceeds the maximum of {MAX_READ_LENGTH:x}"
            )));
        }
        Some(length) if length != 0 => length,
        _ => style.default_length(),
    };

    let pid = match fields.pid {
        Some(pid) if pid != 0 => pid,
        _ => own_pid,
    };

    Ok(MemoryCommand {
        style,
        address,
        memory_type,
        pid,
        length,
    })
}
