//! Character classes of the PDF object syntax.
//!
//! The scanner works on runes decoded from the raw bytes. Invalid UTF-8
//! decodes to U+FFFD with a width of one byte, so every byte of the input
//! is consumed exactly once whatever its encoding.

/// The ten reserved delimiter characters (PDF 32000-1:2008, 7.2.2).
pub const DELIMITERS: &[u8; 10] = b"[]{}()<>/%";

pub const DIGITS: &str = "0123456789";

/// Decode the rune at the start of `bytes`, returning it and its width.
///
/// Returns `None` only for empty input.
pub fn decode_rune(bytes: &[u8]) -> Option<(char, usize)> {
    let &first = bytes.first()?;
    if first.is_ascii() {
        return Some((first as char, 1));
    }
    let width = match first {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Some((char::REPLACEMENT_CHARACTER, 1)),
    };
    match bytes
        .get(..width)
        .and_then(|b| std::str::from_utf8(b).ok())
        .and_then(|s| s.chars().next())
    {
        Some(c) => Some((c, width)),
        None => Some((char::REPLACEMENT_CHARACTER, 1)),
    }
}

/// Unicode `White_Space`, which includes NEL and NBSP.
///
/// NUL is not whitespace here even though the PDF grammar lists it; it is
/// reported as an illegal character instead.
#[inline]
pub fn is_space(c: char) -> bool {
    c.is_whitespace()
}

#[inline]
pub fn is_delimiter(c: char) -> bool {
    c.is_ascii() && DELIMITERS.contains(&(c as u8))
}

/// Letters, decimal digits and underscore.
///
/// Numeric letters (`Ⅻ`) and other numerals (`²`) are neither.
#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    c == '_' || c.is_ascii_digit() || (c.is_alphabetic() && !c.is_numeric())
}

/// Whether a number or name may end right before `c` (`None` is end of input).
#[inline]
pub fn is_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => is_delimiter(c) || is_space(c),
    }
}

/// Regular characters allowed inside a name, before delimiter checks.
#[inline]
pub fn is_name_char(c: char) -> bool {
    ('\u{21}'..'\u{7f}').contains(&c)
}
