//! MSR value table.

use std::io::{self, Write};

use hvdbg_protocol::{CoreSelector, ResponseBuffer};

use super::separate_64bit;

/// Print one line per core for an `rdmsr` response
///
/// For [`CoreSelector::All`] the buffer holds one little-endian `u64` per
/// logical core, in core order. A core whose value was not returned shows
/// as question marks.
///
/// ## Errors
///
/// Propagates write failures.
pub fn render_msr_table(
    out: &mut dyn Write,
    msr: u32,
    core: CoreSelector,
    logical_cores: u32,
    buffer: &ResponseBuffer,
) -> io::Result<()>
{
    let rows: Vec<(u32, usize)> = match core {
        CoreSelector::All => (0..logical_cores).zip(0usize..).collect(),
        CoreSelector::Core(index) => vec![(index, 0)],
    };

    for (core_index, slot) in rows {
        let value = buffer
            .u64_at(slot * 8)
            .map_or_else(|| "????????`????????".to_string(), separate_64bit);
        writeln!(out, "core : 0x{core_index:x} - msr[{msr:x}] = {value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_all_cores_prints_one_line_each()
    {
        let mut bytes = Vec::new();
        for core in 0u64..3 {
            bytes.extend_from_slice(&(0xfffff801_00000000 | core).to_le_bytes());
        }
        let buffer = ResponseBuffer::from_returned(bytes, 24);

        let mut out = Vec::new();
        render_msr_table(&mut out, 0xc000_0082, CoreSelector::All, 3, &buffer).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().nth(2).unwrap(), "core : 0x2 - msr[c0000082] = fffff801`00000002");
    }

    #[test]
    fn test_single_core_uses_first_slot()
    {
        let buffer = ResponseBuffer::from_returned(0x0d01u64.to_le_bytes().to_vec(), 8);
        let mut out = Vec::new();
        render_msr_table(&mut out, 0xc000_0080, CoreSelector::Core(0xa), 4, &buffer).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "core : 0xa - msr[c0000080] = 00000000`00000d01\n");
    }

    #[test]
    fn test_missing_core_value_is_unknown()
    {
        let buffer = ResponseBuffer::from_returned(vec![0; 16], 8);
        let mut out = Vec::new();
        render_msr_table(&mut out, 0x10, CoreSelector::All, 2, &buffer).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("core : 0x1 - msr[10] = ????????`????????\n"));
    }
}
