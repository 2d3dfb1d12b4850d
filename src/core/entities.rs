//! XML Entity Decoding
//!
//! Handles the predefined entities (&lt; &gt; &amp; &quot; &apos;) and
//! numeric character references (&#123; &#x7B;). References to anything
//! else are left in the text untouched; DTD-declared entities are not
//! expanded.
//!
//! Uses Cow for zero-copy when no references are present.

use memchr::{memchr, memchr2};
use std::borrow::Cow;

/// Decode text content, leaving malformed references as literal text.
///
/// Returns Borrowed if no '&' is present.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    match decode_references(input, false) {
        Ok(decoded) => Cow::Owned(decoded),
        // Lenient decoding never fails
        Err(_) => Cow::Borrowed(input),
    }
}

/// Decode text content, rejecting character references that do not name
/// a legal XML character and '&' that does not start a reference.
pub fn decode_text_strict(input: &[u8]) -> Result<Cow<'_, [u8]>, &'static str> {
    if memchr(b'&', input).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    decode_references(input, true).map(Cow::Owned)
}

fn decode_references(input: &[u8], strict: bool) -> Result<Vec<u8>, &'static str> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while let Some(amp) = memchr(b'&', &input[pos..]) {
        result.extend_from_slice(&input[pos..pos + amp]);
        pos += amp;

        // A reference ends at the first ';' before any other '&'
        let reference = match memchr2(b';', b'&', &input[pos + 1..]) {
            Some(at) if input[pos + 1 + at] == b';' => Some((&input[pos + 1..pos + 1 + at], at + 1)),
            _ => None,
        };
        match reference {
            Some((entity, semi)) => match decode_entity(entity, strict)? {
                Some(decoded) => {
                    let mut buf = [0u8; 4];
                    result.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                    pos += semi + 1;
                }
                None => {
                    result.push(b'&');
                    pos += 1;
                }
            },
            None if strict => return Err("Bare '&' must start an entity or character reference"),
            None => {
                result.push(b'&');
                pos += 1;
            }
        }
    }
    result.extend_from_slice(&input[pos..]);

    Ok(result)
}

/// Decode a single reference body (between '&' and ';').
///
/// `Ok(None)` means "leave as-is".
fn decode_entity(entity: &[u8], strict: bool) -> Result<Option<char>, &'static str> {
    match entity {
        b"lt" => Ok(Some('<')),
        b"gt" => Ok(Some('>')),
        b"amp" => Ok(Some('&')),
        b"quot" => Ok(Some('"')),
        b"apos" => Ok(Some('\'')),
        [b'#', digits @ ..] => match decode_char_ref(digits) {
            Some(c) => Ok(Some(c)),
            None if strict => Err("Invalid character reference"),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Decode the digits of `&#...;` into a legal XML character
fn decode_char_ref(digits: &[u8]) -> Option<char> {
    let codepoint = match digits {
        [b'x', hex @ ..] | [b'X', hex @ ..] => {
            u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16).ok()?
        }
        dec => std::str::from_utf8(dec).ok()?.parse::<u32>().ok()?,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(
        codepoint,
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}
