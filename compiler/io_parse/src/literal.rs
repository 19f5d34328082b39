//! Literal decoding.
//!
//! The parser decodes every literal token once, so the message carries the
//! value and evaluation never looks at the source text again.
//!
//! - Decimal numbers follow `f64` parsing; out-of-range magnitudes become
//!   signed infinity instead of failing.
//! - Hex literals are signed 64-bit integers; anything past `i64::MAX`
//!   saturates to infinity.
//! - Quoted strings resolve `\a \b \f \n \r \t \v \\ \"`, `\xHH`, `\ooo`,
//!   `\uHHHH` and `\UHHHHHHHH`; `\x` and octal escapes name a code point
//!   below U+0100.
//! - Triple-quoted strings are taken verbatim.

use std::num::IntErrorKind;

use crate::ParseErrorKind;

/// Decode a decimal number token.
pub(crate) fn decode_number(text: &str) -> Result<f64, ParseErrorKind> {
    // `f64::from_str` already rounds out-of-range values to infinity.
    text.parse::<f64>()
        .map_err(|_| ParseErrorKind::InvalidNumber {
            text: text.to_string(),
        })
}

/// Decode a `0x`-prefixed hexadecimal token.
pub(crate) fn decode_hex(text: &str) -> Result<f64, ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidNumber {
        text: text.to_string(),
    };
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(invalid)?;
    match i64::from_str_radix(digits, 16) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "numbers are f64 at runtime; large hex literals round"
        )]
        Ok(n) => Ok(n as f64),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(f64::INFINITY),
        Err(_) => Err(invalid()),
    }
}

/// Decode a `"..."` token, quotes included.
pub(crate) fn decode_string(text: &str) -> Result<String, ParseErrorKind> {
    let content = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| ParseErrorKind::InvalidString {
            text: text.to_string(),
        })?;
    if !content.contains('\\') {
        return Ok(content.to_string());
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(esc) = chars.next() else {
            return Err(invalid_escape("\\"));
        };
        let decoded = match esc {
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0c',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\x0b',
            '\\' => '\\',
            '"' => '"',
            'x' => code_point(&mut chars, esc, 2, 16)?,
            'u' => code_point(&mut chars, esc, 4, 16)?,
            'U' => code_point(&mut chars, esc, 8, 16)?,
            '0'..='7' => octal(&mut chars, esc)?,
            other => return Err(invalid_escape(&format!("\\{other}"))),
        };
        out.push(decoded);
    }
    Ok(out)
}

/// Decode a `"""..."""` token, delimiters included.
pub(crate) fn decode_triquote(text: &str) -> Result<String, ParseErrorKind> {
    text.strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
        .map(str::to_string)
        .ok_or_else(|| ParseErrorKind::InvalidString {
            text: text.to_string(),
        })
}

fn invalid_escape(sequence: &str) -> ParseErrorKind {
    ParseErrorKind::InvalidEscape {
        sequence: sequence.to_string(),
    }
}

/// Read exactly `width` digits in `radix` after `\{marker}`.
fn code_point(
    chars: &mut std::str::Chars<'_>,
    marker: char,
    width: usize,
    radix: u32,
) -> Result<char, ParseErrorKind> {
    let digits: String = chars.by_ref().take(width).collect();
    let sequence = || format!("\\{marker}{digits}");
    if digits.chars().count() != width {
        return Err(invalid_escape(&sequence()));
    }
    u32::from_str_radix(&digits, radix)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| invalid_escape(&sequence()))
}

/// `\ooo`: exactly three octal digits, at most `\377`.
fn octal(chars: &mut std::str::Chars<'_>, first: char) -> Result<char, ParseErrorKind> {
    let mut digits = String::from(first);
    digits.extend(chars.by_ref().take(2));
    let sequence = || format!("\\{digits}");
    if digits.len() != 3 || !digits.chars().all(|c| ('0'..='7').contains(&c)) {
        return Err(invalid_escape(&sequence()));
    }
    u32::from_str_radix(&digits, 8)
        .ok()
        .filter(|&n| n <= 0xFF)
        .and_then(char::from_u32)
        .ok_or_else(|| invalid_escape(&sequence()))
}
