//! Tests for the hex dump views

use hvdbg_core::render::hexdump::{render_dump, DumpLayout, Grouping};
use hvdbg_protocol::{MemoryType, ResponseBuffer};

const BYTES: DumpLayout = DumpLayout {
    grouping: Grouping::Byte,
    ascii: true,
};
const DWORDS_WITH_ASCII: DumpLayout = DumpLayout {
    grouping: Grouping::Dword,
    ascii: true,
};
const DWORDS: DumpLayout = DumpLayout {
    grouping: Grouping::Dword,
    ascii: false,
};
const QWORDS: DumpLayout = DumpLayout {
    grouping: Grouping::Qword,
    ascii: false,
};

/// `A`..`P`, of which the driver returned `returned`
fn letters(returned: usize) -> ResponseBuffer
{
    ResponseBuffer::from_returned((b'A'..=b'P').collect(), returned)
}

fn dump(layout: DumpLayout, memory_type: MemoryType, buffer: &ResponseBuffer, length: usize) -> String
{
    let mut out = Vec::new();
    render_dump(&mut out, layout, 0x1000, memory_type, buffer, length).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_bytes_full_line()
{
    let text = dump(BYTES, MemoryType::Virtual, &letters(16), 16);
    assert_eq!(
        text,
        "00000000`00001000  41 42 43 44 45 46 47 48 49 4A 4B 4C 4D 4E 4F 50  ABCDEFGHIJKLMNOP\n\n"
    );
}

#[test]
fn test_bytes_partial_read_shows_unknowns()
{
    let text = dump(BYTES, MemoryType::Virtual, &letters(10), 16);
    assert_eq!(
        text,
        "00000000`00001000  41 42 43 44 45 46 47 48 49 4A ?? ?? ?? ?? ?? ??  ABCDEFGHIJ      \n\n"
    );
}

#[test]
fn test_dwords_need_every_byte()
{
    let text = dump(DWORDS_WITH_ASCII, MemoryType::Virtual, &letters(10), 16);
    assert_eq!(
        text,
        "00000000`00001000  44434241 48474645 ???????? ????????  ABCDEFGHIJ      \n\n"
    );

    let text = dump(DWORDS, MemoryType::Virtual, &letters(16), 16);
    assert_eq!(text, "00000000`00001000  44434241 48474645 4C4B4A49 504F4E4D \n\n");
}

#[test]
fn test_qwords_split_halves()
{
    let buffer = ResponseBuffer::from_returned((0u8..16).collect(), 16);
    let text = dump(QWORDS, MemoryType::Virtual, &buffer, 16);
    assert_eq!(text, "00000000`00001000  07060504`03020100 0F0E0D0C`0B0A0908 \n\n");

    let buffer = ResponseBuffer::from_returned((0u8..16).collect(), 12);
    let text = dump(QWORDS, MemoryType::Virtual, &buffer, 16);
    assert_eq!(text, "00000000`00001000  07060504`03020100 ????????`???????? \n\n");
}

#[test]
fn test_physical_lines_are_marked()
{
    let text = dump(BYTES, MemoryType::Physical, &letters(16), 16);
    assert!(text.starts_with("#\t00000000`00001000  41 "));
}

#[test]
fn test_lines_cover_requested_length()
{
    let mut bytes: Vec<u8> = (b'A'..=b'P').collect();
    bytes.resize(32, 0);
    let buffer = ResponseBuffer::from_returned(bytes, 16);
    let text = dump(BYTES, MemoryType::Virtual, &buffer, 32);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], format!("00000000`00001010  {} {}", "?? ".repeat(16), " ".repeat(16)));
    assert_eq!(lines[2], "");
}

#[test]
fn test_nonprintable_bytes_render_as_dots()
{
    let mut bytes = vec![0x00, 0x7f, 0x20, 0x7e, 0x41, 0xff, 0x0a, 0x61];
    bytes.resize(16, 0);
    let buffer = ResponseBuffer::from_returned(bytes, 16);
    let text = dump(BYTES, MemoryType::Virtual, &buffer, 16);
    assert!(text.lines().next().unwrap().ends_with("00  .. ~A..a........"));
}
