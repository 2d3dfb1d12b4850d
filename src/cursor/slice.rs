//! Cursor over an in-memory document
//!
//! [`SliceCursor`] owns its input and remembers only a byte offset into
//! it. Each advance resumes the tokenizer at that offset, copies what the
//! token reports, and updates the open-element stack, namespace scopes
//! and `xml:lang` inheritance.

use super::namespace::NamespaceScopes;
use super::{Cursor, CursorKind};
use crate::core::attributes::{parse_attributes, parse_attributes_strict, Attribute};
use crate::core::scanner::is_whitespace;
use crate::core::tokenizer::{ParseError, Token, TokenKind, Tokenizer};
use crate::reader::ReaderOptions;
use log::{debug, trace};
use memchr::memchr;
use std::sync::Arc;

/// Element whose end tag has not been seen yet. End elements replay it.
#[derive(Debug, Clone)]
struct OpenElement {
    name: String,
    local_name: String,
    prefix: String,
    uri: String,
    language: String,
    attributes: Vec<(String, String)>,
}

/// What the cursor currently reports
#[derive(Debug, Clone)]
struct Current {
    kind: CursorKind,
    self_closing: bool,
    name: String,
    local_name: String,
    prefix: String,
    uri: String,
    language: String,
    depth: usize,
    value: String,
    attributes: Vec<(String, String)>,
}

impl Current {
    fn none() -> Self {
        Current {
            kind: CursorKind::None,
            self_closing: false,
            name: String::new(),
            local_name: String::new(),
            prefix: String::new(),
            uri: String::new(),
            language: String::new(),
            depth: 0,
            value: String::new(),
            attributes: Vec::new(),
        }
    }

    /// A childless node named `name` carrying `value`
    fn leaf(kind: CursorKind, name: &str, value: String, depth: usize, language: String) -> Self {
        Current {
            kind,
            name: name.to_string(),
            local_name: name.to_string(),
            depth,
            value,
            language,
            ..Current::none()
        }
    }
}

/// Outcome of projecting one token
enum Step {
    Emit,
    Skip,
    Stop,
}

/// Forward-only cursor over an owned byte buffer
pub struct SliceCursor {
    input: Arc<[u8]>,
    offset: usize,
    options: ReaderOptions,
    stack: Vec<OpenElement>,
    scopes: NamespaceScopes,
    current: Current,
    error: Option<ParseError>,
    seen_root: bool,
    done: bool,
}

impl SliceCursor {
    /// Create a lenient cursor
    pub fn new(input: impl Into<Arc<[u8]>>) -> Self {
        Self::with_options(input, ReaderOptions::default())
    }

    /// Create a cursor that stops on the first well-formedness error
    pub fn new_strict(input: impl Into<Arc<[u8]>>) -> Self {
        Self::with_options(input, ReaderOptions::strict_defaults())
    }

    pub fn with_options(input: impl Into<Arc<[u8]>>, options: ReaderOptions) -> Self {
        SliceCursor {
            input: input.into(),
            offset: 0,
            options,
            stack: Vec::new(),
            scopes: NamespaceScopes::new(),
            current: Current::none(),
            error: None,
            seen_root: false,
            done: false,
        }
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Byte offset the next token will be read from
    pub fn position(&self) -> usize {
        self.offset
    }

    fn finish(&mut self) -> Step {
        self.done = true;
        self.current = Current::none();
        Step::Stop
    }

    fn fail(&mut self, message: impl Into<String>, position: usize) -> Step {
        self.error = Some(ParseError::new(message, position));
        self.finish()
    }

    /// Step past markup the tokenizer gave up on, resuming after the
    /// next `>` or at the end of input when there is none
    fn skip_markup(&mut self, input: &[u8]) {
        let from = self.offset;
        self.offset = memchr(b'>', input.get(from + 1..).unwrap_or_default())
            .map_or(input.len(), |at| from + 1 + at + 1);
        debug!("skipped malformed markup at byte {from}, resuming at {}", self.offset);
    }

    fn parent_language(&self) -> String {
        self.stack
            .last()
            .map(|open| open.language.clone())
            .unwrap_or_default()
    }

    fn project(&mut self, input: &[u8], token: Token<'_>, resume: usize) -> Step {
        let start = token.span.0;

        if token.kind != TokenKind::Eof {
            self.offset = resume;
        }

        match token.kind {
            TokenKind::Eof => self.end_of_input(start),
            TokenKind::StartTag | TokenKind::EmptyTag => self.open_element(input, &token),
            TokenKind::EndTag => {
                let name = lossy(token.name.unwrap_or_default());
                self.end_tag(&name, start)
            }
            TokenKind::Text => {
                let text = lossy(token.content.as_deref().unwrap_or_default());
                self.text(text, start)
            }
            TokenKind::CData => {
                if self.stack.is_empty() {
                    if self.options.strict {
                        return self.fail("CDATA section outside of the root element", start);
                    }
                    return Step::Skip;
                }
                let value = lossy(token.content.as_deref().unwrap_or_default());
                self.current = Current::leaf(
                    CursorKind::CData,
                    "#cdata-section",
                    value,
                    self.stack.len(),
                    self.parent_language(),
                );
                Step::Emit
            }
            TokenKind::Comment => {
                let value = lossy(token.content.as_deref().unwrap_or_default());
                self.current = Current::leaf(
                    CursorKind::Comment,
                    "#comment",
                    value,
                    self.stack.len(),
                    self.parent_language(),
                );
                Step::Emit
            }
            TokenKind::ProcessingInstruction => {
                let target = lossy(token.name.unwrap_or_default());
                let value = lossy(token.content.as_deref().unwrap_or_default());
                self.current = Current::leaf(
                    CursorKind::ProcessingInstruction,
                    &target,
                    value,
                    self.stack.len(),
                    self.parent_language(),
                );
                Step::Emit
            }
            TokenKind::XmlDeclaration => {
                if !self.options.xml_declaration {
                    return Step::Skip;
                }
                let value = lossy(token.content.as_deref().unwrap_or_default());
                let value = value.trim_end().to_string();
                self.current = Current::leaf(CursorKind::XmlDeclaration, "xml", value, 0, String::new());
                Step::Emit
            }
            TokenKind::DocType => {
                if self.options.strict && self.seen_root {
                    return self.fail("DOCTYPE declaration after the root element", start);
                }
                let name = lossy(token.name.unwrap_or_default());
                self.current = Current::leaf(CursorKind::DocumentType, &name, String::new(), 0, String::new());
                Step::Emit
            }
        }
    }

    fn end_of_input(&mut self, at: usize) -> Step {
        if let Some(open) = self.stack.last() {
            if self.options.strict {
                let message = format!("Unclosed element <{}>", open.name);
                return self.fail(message, at);
            }
            // Offset stays put so the next advance sees the end again.
            return self.close_element();
        }
        if self.options.strict && !self.seen_root {
            return self.fail("Document has no root element", at);
        }
        self.finish()
    }

    fn open_element(&mut self, input: &[u8], token: &Token<'_>) -> Step {
        let start = token.span.0;
        let strict = self.options.strict;

        if strict && self.seen_root && self.stack.is_empty() {
            return self.fail("Extra content after the root element", start);
        }
        if self.stack.len() >= self.options.max_depth {
            let message = format!("Maximum nesting depth of {} exceeded", self.options.max_depth);
            return self.fail(message, start);
        }

        let attributes = match tag_attributes(input, token, strict) {
            Ok(attributes) => attributes,
            Err(err) => {
                self.error = Some(err);
                return self.finish();
            }
        };
        if strict {
            if let Some(duplicate) = find_duplicate(&attributes) {
                let message = format!("Duplicate attribute '{duplicate}'");
                return self.fail(message, start);
            }
        }

        let name = lossy(token.name.unwrap_or_default());
        let (prefix, local_name) = match name.split_once(':') {
            Some((prefix, local)) => (prefix.to_string(), local.to_string()),
            None => (String::new(), name.clone()),
        };

        self.scopes.push_scope();
        self.scopes.declare_all(&attributes);

        let uri = if prefix.is_empty() {
            String::new()
        } else {
            let resolved = self.scopes.resolve(&prefix).map(str::to_string);
            match resolved {
                Some(uri) => uri,
                None if strict => {
                    let message = format!("Namespace prefix '{prefix}' on <{name}> is not defined");
                    return self.fail(message, start);
                }
                None => String::new(),
            }
        };
        if strict {
            for (attr, _) in &attributes {
                if let Some((attr_prefix, _)) = attr.split_once(':') {
                    if attr_prefix != "xmlns" && self.scopes.resolve(attr_prefix).is_none() {
                        let message =
                            format!("Namespace prefix '{attr_prefix}' on attribute '{attr}' is not defined");
                        return self.fail(message, start);
                    }
                }
            }
        }

        let language = attributes
            .iter()
            .find(|(attr, _)| attr == "xml:lang")
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| self.parent_language());

        let self_closing = token.kind == TokenKind::EmptyTag;
        let depth = self.stack.len();
        self.seen_root = true;

        if self_closing {
            self.scopes.pop_scope();
        } else {
            self.stack.push(OpenElement {
                name: name.clone(),
                local_name: local_name.clone(),
                prefix: prefix.clone(),
                uri: uri.clone(),
                language: language.clone(),
                attributes: attributes.clone(),
            });
        }

        self.current = Current {
            kind: CursorKind::Element,
            self_closing,
            name,
            local_name,
            prefix,
            uri,
            language,
            depth,
            value: String::new(),
            attributes,
        };
        Step::Emit
    }

    fn end_tag(&mut self, name: &str, start: usize) -> Step {
        let Some(open) = self.stack.last() else {
            if self.options.strict {
                return self.fail(format!("Unexpected end tag </{name}>"), start);
            }
            return Step::Skip;
        };
        if open.name != name && self.options.strict {
            let message = format!("Mismatched end tag: expected </{}>, found </{name}>", open.name);
            return self.fail(message, start);
        }
        self.close_element()
    }

    /// Report the end of the innermost open element
    fn close_element(&mut self) -> Step {
        let Some(open) = self.stack.pop() else {
            return Step::Skip;
        };
        self.scopes.pop_scope();
        self.current = Current {
            kind: CursorKind::EndElement,
            self_closing: false,
            name: open.name,
            local_name: open.local_name,
            prefix: open.prefix,
            uri: open.uri,
            language: open.language,
            depth: self.stack.len(),
            value: String::new(),
            attributes: open.attributes,
        };
        Step::Emit
    }

    fn text(&mut self, text: String, start: usize) -> Step {
        let blank = text.bytes().all(is_whitespace);
        if self.stack.is_empty() {
            if self.options.strict && !blank {
                return self.fail("Text outside of the root element", start);
            }
            return Step::Skip;
        }
        if text.is_empty() || (blank && self.options.no_blanks) {
            return Step::Skip;
        }

        let kind = if blank { CursorKind::SignificantWhitespace } else { CursorKind::Text };
        self.current = Current::leaf(kind, "#text", text, self.stack.len(), self.parent_language());
        Step::Emit
    }
}

impl Cursor for SliceCursor {
    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        let input = Arc::clone(&self.input);

        loop {
            let mut tokenizer = Tokenizer::at(&input, self.offset, self.options.strict);
            let Some(token) = tokenizer.next_token() else {
                if self.options.strict {
                    self.error = tokenizer.take_error();
                    self.finish();
                    return false;
                }
                self.skip_markup(&input);
                continue;
            };
            let resume = tokenizer.position();

            match self.project(&input, token, resume) {
                Step::Emit => {
                    trace!(
                        "cursor at {:?} '{}' depth {}",
                        self.current.kind,
                        self.current.name,
                        self.current.depth
                    );
                    return true;
                }
                Step::Skip => continue,
                Step::Stop => return false,
            }
        }
    }

    fn kind(&self) -> CursorKind {
        self.current.kind
    }

    fn is_self_closing(&self) -> bool {
        self.current.self_closing
    }

    fn name(&self) -> &str {
        &self.current.name
    }

    fn local_name(&self) -> &str {
        &self.current.local_name
    }

    fn prefix(&self) -> &str {
        &self.current.prefix
    }

    fn namespace_uri(&self) -> &str {
        &self.current.uri
    }

    fn language(&self) -> &str {
        &self.current.language
    }

    fn depth(&self) -> usize {
        self.current.depth
    }

    fn value(&self) -> &str {
        &self.current.value
    }

    fn attributes(&self) -> &[(String, String)] {
        &self.current.attributes
    }

    fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse the attributes of a start or empty tag token
fn tag_attributes(
    input: &[u8],
    token: &Token<'_>,
    strict: bool,
) -> Result<Vec<(String, String)>, ParseError> {
    let (start, end) = token.span;
    let tag = &input[start..end];

    // Skip '<' and the element name
    let mut pos = 1;
    while pos < tag.len() {
        let b = tag[pos];
        if is_whitespace(b) || b == b'>' || b == b'/' {
            break;
        }
        pos += 1;
    }

    let mut attr_end = tag.len();
    if tag.ends_with(b"/>") {
        attr_end -= 2;
    } else if tag.ends_with(b">") {
        attr_end -= 1;
    }
    if pos >= attr_end {
        return Ok(Vec::new());
    }

    let content = &tag[pos..attr_end];
    let parsed: Vec<Attribute<'_>> = if strict {
        parse_attributes_strict(content).map_err(|msg| ParseError::new(msg, start))?
    } else {
        parse_attributes(content)
    };

    Ok(parsed
        .iter()
        .map(|attr| (lossy(attr.name), lossy(&attr.value)))
        .collect())
}

fn find_duplicate(attributes: &[(String, String)]) -> Option<&str> {
    attributes.iter().enumerate().find_map(|(i, (name, _))| {
        attributes[..i]
            .iter()
            .any(|(earlier, _)| earlier == name)
            .then_some(name.as_str())
    })
}
