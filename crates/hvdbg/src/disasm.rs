//! x86-64 listing for `u` and `!u`, decoded with iced-x86.

use std::io::{self, Write};

use hvdbg_core::render::separate_64bit;
use hvdbg_core::Disassembler;
use iced_x86::{Decoder, DecoderOptions, Formatter, Instruction, IntelFormatter};

/// Hex bytes column width, enough for a 10-byte instruction
const BYTES_COLUMN: usize = 20;

/// Intel-syntax disassembler for 64-bit code
#[derive(Debug, Clone, Copy, Default)]
pub struct IcedDisassembler;

impl Disassembler for IcedDisassembler
{
    fn disassemble(&self, code: &[u8], base: u64, out: &mut dyn Write) -> io::Result<()>
    {
        let mut decoder = Decoder::with_ip(64, code, base, DecoderOptions::NONE);
        let mut formatter = IntelFormatter::new();
        let mut instruction = Instruction::default();
        let mut text = String::new();

        while decoder.can_decode() {
            let offset = decoder.position();
            decoder.decode_out(&mut instruction);

            let raw = code.get(offset..offset + instruction.len()).unwrap_or_default();
            let hex: String = raw.iter().map(|byte| format!("{byte:02x}")).collect();

            text.clear();
            if instruction.is_invalid() {
                text.push_str("(bad)");
            } else {
                formatter.format(&instruction, &mut text);
            }
            writeln!(out, "{}  {hex:<BYTES_COLUMN$} {text}", separate_64bit(instruction.ip()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn listing(code: &[u8], base: u64) -> String
    {
        let mut out = Vec::new();
        IcedDisassembler.disassemble(code, base, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_prologue_listing()
    {
        let text = listing(&[0x55, 0x48, 0x89, 0xe5, 0xc3], 0xfffff801_00001000);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("fffff801`00001000  55 "));
        assert!(lines[0].ends_with("push rbp"));
        assert!(lines[1].starts_with("fffff801`00001001  4889e5"));
        assert!(lines[1].ends_with("mov rbp,rsp"));
        assert!(lines[2].ends_with("ret"));
    }

    #[test]
    fn test_truncated_instruction_is_bad()
    {
        // mov rax, imm64 cut short
        let text = listing(&[0x48, 0xb8, 0x01], 0x1000);
        assert!(text.contains("(bad)"));
    }

    #[test]
    fn test_empty_input_prints_nothing()
    {
        assert!(listing(&[], 0x1000).is_empty());
    }
}
