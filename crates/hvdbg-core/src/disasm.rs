//! # Disassembler
//!
//! The interpreter does not decode instructions itself. `u` and `!u` hand
//! the bytes the driver returned to a [`Disassembler`] and print whatever it
//! writes, unchanged.

use std::io::{self, Write};

/// Instruction decoder for the `u` family
pub trait Disassembler
{
    /// Decode `code`, which was read from `base`, and print the listing
    ///
    /// `code` holds only the bytes the driver returned, so its length is the
    /// actual length of the read.
    ///
    /// ## Errors
    ///
    /// Propagates write failures.
    fn disassemble(&self, code: &[u8], base: u64, out: &mut dyn Write) -> io::Result<()>;
}
