//! `.formats`: one value, every representation.

use std::io::{self, Write};

use chrono::NaiveDateTime;

use super::{ascii_char, separate_64bit};

/// `strftime` pattern for the time line
pub const TIME_FORMAT: &str = "%x - %I:%M%p";

/// Binary digits, most significant byte first, bytes separated by a space
pub fn binary_groups(value: u64) -> String
{
    value
        .to_be_bytes()
        .iter()
        .map(|byte| format!("{byte:08b}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The eight bytes in memory order (least significant first) as ASCII
pub fn char_view(value: u64) -> String
{
    value.to_le_bytes().into_iter().map(ascii_char).collect()
}

/// Scientific notation the way C's `%e` / `%E` prints it
///
/// The exponent always carries a sign and at least two digits
/// (`1.000000e+00`); `plus` forces a sign on non-negative values.
pub fn c_exp(value: f64, precision: usize, upper: bool, plus: bool) -> String
{
    let sign = if value.is_sign_negative() {
        "-"
    } else if plus {
        "+"
    } else {
        ""
    };

    if !value.is_finite() {
        let word = if value.is_nan() { "nan" } else { "inf" };
        let word = if upper { word.to_uppercase() } else { word.to_string() };
        return format!("{sign}{word}");
    }

    let text = format!("{:.*e}", precision, value.abs());
    let (mantissa, exponent) = text.split_once('e').unwrap_or((text.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let marker = if upper { 'E' } else { 'e' };
    let exponent_sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{mantissa}{marker}{exponent_sign}{:02}", exponent.unsigned_abs())
}

/// Print the `.formats` report for `value`
///
/// `now` is the local time shown on the `Time` line. The float line
/// reinterprets the low 32 bits; the double line reinterprets all 64.
///
/// ## Errors
///
/// Propagates write failures.
pub fn render_formats(out: &mut dyn Write, value: u64, now: &NaiveDateTime) -> io::Result<()>
{
    // low half only, widened the way printf widens a float
    let single = f64::from(f32::from_bits(value as u32));
    let double = f64::from_bits(value);

    writeln!(out, "Evaluate expression:")?;
    writeln!(out, "Hex :        {}", separate_64bit(value))?;
    writeln!(out, "Decimal :    {value}")?;
    writeln!(out, "Octal :      {value:o}")?;
    writeln!(out, "Binary :     {}", binary_groups(value))?;
    writeln!(out, "Char :       {}", char_view(value))?;
    writeln!(out, "Time :       {}", now.format(TIME_FORMAT))?;
    writeln!(
        out,
        "Float :      {single:4.2} {} {}",
        c_exp(single, 0, false, true),
        c_exp(single, 6, true, false)
    )?;
    writeln!(out, "Double :     {}", c_exp(double, 17, false, false))
}
