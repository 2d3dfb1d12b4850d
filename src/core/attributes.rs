//! XML Attribute Parsing
//!
//! Parses the attribute list of a start tag (the bytes between the element
//! name and the closing '>' or '/>').

use super::entities::{decode_text, decode_text_strict};
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Qualified attribute name
    pub name: &'a [u8],
    /// Attribute value with references decoded
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a [u8], value: Cow<'a, [u8]>) -> Self {
        Attribute { name, value }
    }

    /// Namespace prefix (before the colon), if any
    pub fn prefix(&self) -> Option<&'a [u8]> {
        memchr(b':', self.name).map(|colon| &self.name[..colon])
    }

    /// Local part of the name (after the colon)
    pub fn local_name(&self) -> &'a [u8] {
        match memchr(b':', self.name) {
            Some(colon) => &self.name[colon + 1..],
            None => self.name,
        }
    }

    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }

    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes, skipping over anything malformed
pub fn parse_attributes(input: &[u8]) -> Vec<Attribute<'_>> {
    AttributeParser::new(input, false).collect_all().unwrap_or_default()
}

/// Parse attributes, failing on the first malformed one
pub fn parse_attributes_strict(input: &[u8]) -> Result<Vec<Attribute<'_>>, &'static str> {
    AttributeParser::new(input, true).collect_all()
}

struct AttributeParser<'a> {
    input: &'a [u8],
    pos: usize,
    strict: bool,
}

impl<'a> AttributeParser<'a> {
    fn new(input: &'a [u8], strict: bool) -> Self {
        AttributeParser { input, pos: 0, strict }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if is_whitespace(b)) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn collect_all(mut self) -> Result<Vec<Attribute<'a>>, &'static str> {
        let mut attrs = Vec::new();

        loop {
            let separated = self.skip_whitespace();
            match self.peek() {
                None | Some(b'/') | Some(b'>') => break,
                Some(_) if self.strict && !separated && !attrs.is_empty() => {
                    return Err("Attributes must be separated by whitespace");
                }
                Some(first) if !is_name_start_char(first) => {
                    if self.strict {
                        return Err("Attribute name must start with letter, underscore, or colon");
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    if let Some(attr) = self.parse_one()? {
                        attrs.push(attr);
                    }
                }
            }
        }

        Ok(attrs)
    }

    fn parse_one(&mut self) -> Result<Option<Attribute<'a>>, &'static str> {
        let name_start = self.pos;
        while matches!(self.peek(), Some(b) if is_name_char(b)) {
            self.pos += 1;
        }
        let name = &self.input[name_start..self.pos];

        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            if self.strict {
                return Err("Attribute value required");
            }
            // HTML-style boolean attribute
            return Ok(Some(Attribute::new(name, Cow::Borrowed(b""))));
        }
        self.pos += 1;
        self.skip_whitespace();

        let quote = match self.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            Some(_) if self.strict => return Err("Attribute value must be quoted"),
            Some(_) => {
                let value_start = self.pos;
                while matches!(self.peek(), Some(b) if !is_whitespace(b) && b != b'/' && b != b'>') {
                    self.pos += 1;
                }
                let value = decode_text(&self.input[value_start..self.pos]);
                return Ok(Some(Attribute::new(name, value)));
            }
            None if self.strict => return Err("Attribute value required"),
            None => return Ok(None),
        };

        self.pos += 1;
        let value_start = self.pos;
        let value_end = match memchr(quote, &self.input[value_start..]) {
            Some(len) => value_start + len,
            None if self.strict => return Err("Attribute value has mismatched quotes"),
            None => self.input.len(),
        };
        self.pos = (value_end + 1).min(self.input.len());

        let raw = &self.input[value_start..value_end];
        let value = if self.strict {
            if memchr(b'<', raw).is_some() {
                return Err("Attribute value cannot contain '<'");
            }
            decode_text_strict(raw)?
        } else {
            decode_text(raw)
        };

        Ok(Some(Attribute::new(name, value)))
    }
}
