use std::borrow::Cow;

use percent_encoding::percent_decode_str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodeError;

/// Percent-decodes one path segment.
///
/// Unlike [`percent_decode_str`] alone, a `%` that is not followed by two hex
/// digits is rejected instead of passed through.
pub(crate) fn unescape(s: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while let Some(off) = bytes[i..].iter().position(|&b| b == b'%') {
        let at = i + off;
        match bytes.get(at + 1..at + 3) {
            Some(&[h, l]) if h.is_ascii_hexdigit() && l.is_ascii_hexdigit() => i = at + 3,
            _ => return Err(DecodeError),
        }
    }
    percent_decode_str(s).decode_utf8().map_err(|_| DecodeError)
}
