//! Text and number conversion helpers shared by value coercion and output
//!
//! The `parse_leading_*` functions are lenient: they read the longest numeric
//! prefix (after leading whitespace) and return 0 when there is none.

use std::fmt::Write;

/// Split off the optional sign and the run of decimal digits at the start of `text`
fn leading_integer(text: &str) -> (bool, &str) {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    (negative, &rest[..digits])
}

/// Lenient signed parse, saturating at the i64 range
pub fn parse_leading_i64(text: &str) -> i64 {
    let (negative, digits) = leading_integer(text);
    let mut value: i64 = 0;
    for digit in digits.bytes() {
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Lenient unsigned parse; a leading minus sign wraps like a C cast
pub fn parse_leading_u64(text: &str) -> u64 {
    let (negative, digits) = leading_integer(text);
    if negative {
        return parse_leading_i64(text) as u64;
    }
    digits.bytes().fold(0u64, |value, digit| {
        value.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
    })
}

/// Lenient floating parse of `[sign] digits [. digits] [e [sign] digits]`
pub fn parse_leading_f64(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-') | Some(b'+')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Uppercase hex, most significant nibble first, no delimiters
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Decode pairs of hex digits, either case; `None` on odd length or a
/// non-hex character
pub fn from_hex(text: &str) -> Option<Vec<u8>> {
    if text.len() % 2 != 0 || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    text.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).ok()?;
            u8::from_str_radix(pair, 16).ok()
        })
        .collect()
}

/// Whether `text` is made only of digits, signs, a decimal point and
/// exponent markers, with at least one digit
pub fn looks_numeric(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

/// Native-endian UTF-16 code units stored in `bytes`
pub fn wide_units(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
}

/// Transcode native-endian UTF-16 bytes, replacing unpaired surrogates
pub fn decode_wide_lossy(bytes: &[u8]) -> String {
    char::decode_utf16(wide_units(bytes))
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Transcode native-endian UTF-16 bytes, failing on unpaired surrogates
pub fn decode_wide(bytes: &[u8]) -> Option<String> {
    char::decode_utf16(wide_units(bytes))
        .collect::<Result<String, _>>()
        .ok()
}

/// Encode text as native-endian UTF-16 bytes
pub fn encode_wide(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_ne_bytes).collect()
}
