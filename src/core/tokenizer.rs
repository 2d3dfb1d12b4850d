//! XML Tokenizer - State machine for XML token extraction
//!
//! Implements a pull-parser style tokenizer that extracts XML tokens:
//! - Element start/end/empty tags
//! - Text content
//! - CDATA sections
//! - Comments
//! - Processing instructions and the XML declaration
//! - DOCTYPE declarations (internal subset skipped, not interpreted)
//!
//! The tokenizer borrows its input. Callers that own the input keep the
//! offset returned by [`Tokenizer::position`] and resume with
//! [`Tokenizer::at`].

use super::entities::{decode_text, decode_text_strict};
use super::scanner::{is_whitespace, Scanner};
use std::borrow::Cow;
use std::fmt;

/// Current parsing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Before the first token
    Init,
    /// Between markup constructs
    InsideText,
    /// Inside a markup construct (<...>)
    InsideMarkup,
    /// End of input reached
    Done,
}

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// XML declaration: <?xml ...?>
    XmlDeclaration,
    /// DOCTYPE declaration
    DocType,
    /// End of file
    Eof,
}

/// A parsed XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// Tag name, PI target, or DOCTYPE root name
    pub name: Option<&'a [u8]>,
    /// Text/CDATA/comment content, or PI data (entities decoded in text)
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// A well-formedness failure and the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.position)
    }
}

impl std::error::Error for ParseError {}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    state: ParseState,
    strict: bool,
    error: Option<ParseError>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input (lenient mode)
    pub fn new(input: &'a [u8]) -> Self {
        Self::at(input, 0, false)
    }

    /// Create a new tokenizer in strict mode
    pub fn new_strict(input: &'a [u8]) -> Self {
        Self::at(input, 0, true)
    }

    /// Resume tokenizing at a byte offset previously reported by
    /// [`position`](Self::position)
    pub fn at(input: &'a [u8], pos: usize, strict: bool) -> Self {
        Tokenizer {
            scanner: Scanner::at(input, pos),
            state: if pos == 0 { ParseState::Init } else { ParseState::InsideText },
            strict,
            error: None,
        }
    }

    /// Get any parse error (strict mode only)
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Take the parse error, leaving none behind
    pub fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }

    fn set_error(&mut self, message: impl Into<String>) {
        if self.strict && self.error.is_none() {
            self.error = Some(ParseError::new(message, self.scanner.position()));
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Get the next token.
    ///
    /// Returns `None` when the input is malformed beyond recovery; in
    /// strict mode [`error`](Self::error) then says why. A clean end of
    /// input yields one `Eof` token.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.state == ParseState::Done {
            return None;
        }

        if self.state == ParseState::Init {
            if self.strict {
                let mut probe = Scanner::at(self.scanner.remaining(), 0);
                probe.skip_whitespace();
                if probe.position() > 0 && probe.starts_with(b"<?xml") {
                    self.set_error("XML declaration must be at the very start of the document");
                    self.state = ParseState::Done;
                    return None;
                }
            }
            self.state = ParseState::InsideText;
        }

        let token = match self.scanner.peek() {
            None => {
                let at = self.scanner.position();
                Some(Token::new(TokenKind::Eof, (at, at)))
            }
            Some(b'<') => self.parse_markup(),
            Some(_) => self.parse_text(),
        };

        if matches!(&token, None | Some(Token { kind: TokenKind::Eof, .. })) {
            self.state = ParseState::Done;
        }
        token
    }

    fn parse_markup(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        self.scanner.advance(1);
        self.state = ParseState::InsideMarkup;

        let token = match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => {
                self.set_error("Unexpected end of input after '<'");
                None
            }
        };

        if token.is_some() {
            self.state = ParseState::InsideText;
        }
        token
    }

    fn parse_start_tag(&mut self, start: usize) -> Option<Token<'a>> {
        let name = match self.scanner.read_name() {
            Some(name) => name,
            None => {
                self.set_error("Invalid element name: must start with letter, underscore, or colon");
                return None;
            }
        };

        let end = match self.scanner.find_tag_end_quoted() {
            Some(end) => end,
            None => {
                self.set_error("Unterminated start tag");
                return None;
            }
        };

        let is_empty = end > start && self.scanner.slice(end - 1, end) == b"/";
        self.scanner.set_position(end + 1);

        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        Some(Token::new(kind, (start, end + 1)).with_name(name))
    }

    fn parse_end_tag(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1);

        let name = match self.scanner.read_name() {
            Some(name) => name,
            None => {
                self.set_error("Invalid element name in end tag");
                return None;
            }
        };

        self.scanner.skip_whitespace();
        if self.strict && self.scanner.peek() != Some(b'>') {
            self.set_error("End tag cannot have attributes or other content");
            return None;
        }

        let end = match self.scanner.find_tag_end() {
            Some(end) => end,
            None => {
                self.set_error("Unterminated end tag");
                return None;
            }
        };
        self.scanner.set_position(end + 1);

        Some(Token::new(TokenKind::EndTag, (start, end + 1)).with_name(name))
    }

    /// Comment, CDATA or DOCTYPE
    fn parse_bang_markup(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1);

        if self.scanner.starts_with(b"--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.parse_doctype(start)
        } else {
            self.set_error("Invalid declaration - expected comment, CDATA, or DOCTYPE");
            None
        }
    }

    fn parse_comment(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(2);
        let content_start = self.scanner.position();

        let Some(end) = self.scanner.find_sequence(b"-->") else {
            self.set_error("Unterminated comment");
            return None;
        };
        let content = self.scanner.slice(content_start, end);

        if self.strict {
            if let Err(msg) = validate_comment(content) {
                self.set_error(msg);
                return None;
            }
        }

        self.scanner.set_position(end + 3);
        Some(Token::new(TokenKind::Comment, (start, end + 3)).with_content(Cow::Borrowed(content)))
    }

    fn parse_cdata(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(7);
        let content_start = self.scanner.position();

        let Some(end) = self.scanner.find_sequence(b"]]>") else {
            self.set_error("Unterminated CDATA section");
            return None;
        };
        let content = self.scanner.slice(content_start, end);

        self.scanner.set_position(end + 3);
        Some(Token::new(TokenKind::CData, (start, end + 3)).with_content(Cow::Borrowed(content)))
    }

    /// `<!DOCTYPE name ...>`; the internal subset is skipped, honoring
    /// quoted literals and nested brackets
    fn parse_doctype(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(7);

        if self.strict && !matches!(self.scanner.peek(), Some(b) if is_whitespace(b)) {
            self.set_error("Whitespace required after DOCTYPE");
            return None;
        }
        self.scanner.skip_whitespace();

        let Some(name) = self.scanner.read_name() else {
            self.set_error("DOCTYPE declaration requires a name");
            return None;
        };

        let mut quote: Option<u8> = None;
        let mut brackets = 0usize;
        while let Some(b) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, b) {
                (Some(q), _) if q == b => quote = None,
                (Some(_), _) => {}
                (None, b'"') | (None, b'\'') => quote = Some(b),
                (None, b'[') => brackets += 1,
                (None, b']') => brackets = brackets.saturating_sub(1),
                (None, b'>') if brackets == 0 => {
                    let end = self.scanner.position();
                    return Some(Token::new(TokenKind::DocType, (start, end)).with_name(name));
                }
                _ => {}
            }
        }

        self.set_error("Unterminated DOCTYPE declaration");
        None
    }

    /// Processing instruction or XML declaration
    fn parse_pi(&mut self, start: usize) -> Option<Token<'a>> {
        self.scanner.advance(1);

        let Some(target) = self.scanner.read_name() else {
            self.set_error("Invalid processing instruction target");
            return None;
        };

        let is_xml_decl = target == b"xml";
        if self.strict {
            if !is_xml_decl && target.eq_ignore_ascii_case(b"xml") {
                self.set_error("Processing instruction target cannot be 'xml' (case-insensitive reserved name)");
                return None;
            }
            if is_xml_decl && start != 0 {
                self.set_error("XML declaration is only allowed at the start of the document");
                return None;
            }
            match self.scanner.peek() {
                Some(b) if is_whitespace(b) => {}
                Some(b'?') if self.scanner.peek_at(1) == Some(b'>') => {}
                _ => {
                    self.set_error("Invalid character after PI target name");
                    return None;
                }
            }
        }

        self.scanner.skip_whitespace();
        let content_start = self.scanner.position();

        let Some(end) = self.scanner.find_sequence(b"?>") else {
            self.set_error("Unterminated processing instruction");
            return None;
        };
        let content = self.scanner.slice(content_start, end);
        self.scanner.set_position(end + 2);

        let kind = if is_xml_decl { TokenKind::XmlDeclaration } else { TokenKind::ProcessingInstruction };
        Some(
            Token::new(kind, (start, end + 2))
                .with_name(target)
                .with_content(Cow::Borrowed(content)),
        )
    }

    fn parse_text(&mut self) -> Option<Token<'a>> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(start + self.scanner.remaining().len());
        let content = self.scanner.slice(start, end);

        if self.strict && memchr::memmem::find(content, b"]]>").is_some() {
            self.set_error("Text content cannot contain ']]>'");
            return None;
        }

        let decoded = if self.strict {
            match decode_text_strict(content) {
                Ok(decoded) => decoded,
                Err(msg) => {
                    self.set_error(msg);
                    return None;
                }
            }
        } else {
            decode_text(content)
        };

        self.scanner.set_position(end);
        Some(Token::new(TokenKind::Text, (start, end)).with_content(decoded))
    }
}

/// Iterator adapter for tokenizer
impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token()?;
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Validate comment content (no '--' allowed, no trailing '-')
pub fn validate_comment(content: &[u8]) -> Result<(), &'static str> {
    if content.windows(2).any(|w| w == b"--") {
        return Err("Comment cannot contain '--'");
    }
    if content.last() == Some(&b'-') {
        return Err("Comment cannot end with '-'");
    }
    Ok(())
}
