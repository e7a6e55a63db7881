//! # Response Formatting
//!
//! Turns raw response bytes into the text the operator sees.
//!
//! All renderers write into a `std::io::Write` so the interpreter can send
//! output to a terminal and tests can capture it in a `Vec<u8>`.

pub mod formats;
pub mod hexdump;
pub mod msr;

/// Format a 64-bit value as 16 hex digits with a backtick between the halves
///
/// ```rust
/// use hvdbg_core::render::separate_64bit;
///
/// assert_eq!(separate_64bit(0xfffff801_deadbeef), "fffff801`deadbeef");
/// assert_eq!(separate_64bit(0x10), "00000000`00000010");
/// ```
pub fn separate_64bit(value: u64) -> String
{
    format!("{:08x}`{:08x}", value >> 32, value & 0xffff_ffff)
}

/// Whether `byte` renders as itself in an ASCII column
pub const fn is_printable(byte: u8) -> bool
{
    matches!(byte, 0x20..=0x7e)
}

/// Character shown for `byte` in an ASCII column
pub fn ascii_char(byte: u8) -> char
{
    if is_printable(byte) {
        char::from(byte)
    } else {
        '.'
    }
}
