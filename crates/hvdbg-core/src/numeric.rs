//! # Numeric Validation
//!
//! Strict token validators shared by every argument parser.
//!
//! Numbers typed at the prompt are always hexadecimal with no prefix:
//! `fffff801deadbeef`, never `0x...` and never decimal. The only decimal
//! inputs are the octets and port of a remote `.connect` endpoint.

use std::net::Ipv4Addr;

/// Whether every character of `token` is a hex digit
///
/// The empty string is not hex.
pub fn is_hex_notation(token: &str) -> bool
{
    !token.is_empty() && token.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether `token` is a non-empty string of decimal digits
pub fn is_decimal(token: &str) -> bool
{
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

/// Parse a strict hex token into a `u64`
///
/// Returns `None` for anything that is not hex notation and for values that
/// do not fit in 64 bits. Leading zeros are fine.
pub fn parse_hex_u64(token: &str) -> Option<u64>
{
    if !is_hex_notation(token) {
        return None;
    }
    u64::from_str_radix(token, 16).ok()
}

/// Parse a strict hex token into a `u32`
///
/// Values wider than 32 bits are rejected.
pub fn parse_hex_u32(token: &str) -> Option<u32>
{
    if !is_hex_notation(token) {
        return None;
    }
    u32::from_str_radix(token, 16).ok()
}

/// Parse an address token, ignoring backtick separators
///
/// Addresses are displayed as `fffff801` + backtick + `deadbeef`; pasting one
/// back must work.
pub fn parse_address(token: &str) -> Option<u64>
{
    let digits: String = token.chars().filter(|&c| c != '`').collect();
    parse_hex_u64(&digits)
}

/// Parse a dotted-quad IPv4 address
///
/// Exactly four dot-separated decimal tokens, each in `0..=255`. Leading
/// zeros are accepted (`010.0.0.1`), empty octets are not.
pub fn parse_ip(text: &str) -> Option<Ipv4Addr>
{
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != 4 {
        return None;
    }

    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(&parts) {
        if !is_decimal(part) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

/// Whether `text` is a valid dotted-quad IPv4 address
pub fn validate_ip(text: &str) -> bool
{
    parse_ip(text).is_some()
}

/// Parse a decimal TCP port in `0..=65535`
pub fn parse_port(text: &str) -> Option<u16>
{
    if !is_decimal(text) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_hex_notation()
    {
        assert!(is_hex_notation("deadBEEF"));
        assert!(is_hex_notation("0"));
        assert!(!is_hex_notation("12g"));
        assert!(!is_hex_notation(""));
        assert!(!is_hex_notation("0x10"));
        assert!(!is_hex_notation("-1"));
    }

    #[test]
    fn test_parse_hex_u64_bounds()
    {
        assert_eq!(parse_hex_u64("ffffffffffffffff"), Some(u64::MAX));
        assert_eq!(parse_hex_u64("0000000000000000010"), Some(0x10));
        // 17 significant digits overflow
        assert_eq!(parse_hex_u64("10000000000000000"), None);
        assert_eq!(parse_hex_u64("+10"), None);
    }

    #[test]
    fn test_parse_hex_u32_rejects_wide_values()
    {
        assert_eq!(parse_hex_u32("c0000082"), Some(0xc000_0082));
        assert_eq!(parse_hex_u32("100000000"), None);
    }

    #[test]
    fn test_parse_address_strips_backticks()
    {
        assert_eq!(parse_address("fffff801`deadbeef"), Some(0xfffff801_deadbeef));
        assert_eq!(parse_address("`"), None);
    }

    #[test]
    fn test_validate_ip()
    {
        assert!(validate_ip("192.168.1.5"));
        assert!(validate_ip("0.0.0.0"));
        assert!(!validate_ip("256.1.1.1"));
        assert!(!validate_ip("1.2.3"));
        assert!(!validate_ip("1.2.3.4.5"));
        assert!(!validate_ip("1..3.4"));
        assert!(!validate_ip("1.2.3.-4"));
    }

    #[test]
    fn test_parse_port()
    {
        assert_eq!(parse_port("50000"), Some(50000));
        assert_eq!(parse_port("65535"), Some(65535));
        assert_eq!(parse_port("65536"), None);
        assert_eq!(parse_port("99999999999999999999"), None);
        assert_eq!(parse_port("80a"), None);
    }
}
