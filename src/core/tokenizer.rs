//! HTML Tokenizer - lenient pull tokenizer for possibly malformed markup
//!
//! Extracts a flat token stream:
//! - Element start/end tags (start tags carry their attribute list)
//! - Text runs
//! - Comments
//! - DOCTYPE declarations
//!
//! There is no error path: every byte sequence produces a token stream that
//! terminates with `Eof`. Malformed constructs degrade to text tokens
//! (unterminated comments, tags with empty names) or end silently at end of
//! input (missing `>`, unterminated quotes).

use super::attributes::{scan_attributes, Attribute};
use super::scanner::Scanner;
use super::tags::is_ascii_whitespace;

/// Type of HTML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element ...>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Text run between tags
    Text,
    /// Comment: <!--...-->
    Comment,
    /// DOCTYPE declaration
    Doctype,
    /// End of input
    Eof,
}

/// A parsed HTML token, borrowing from the input buffer
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in the input (start, end)
    pub span: (usize, usize),
    /// For tags: the element name as written
    pub name: Option<&'a [u8]>,
    /// For text/comment/doctype: the payload
    pub content: Option<&'a [u8]>,
    /// For start tags: the attribute list in insertion order, last-wins
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
            attributes: Vec::new(),
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: &'a [u8]) -> Self {
        self.content = Some(content);
        self
    }

    fn with_attributes(mut self, attributes: Vec<Attribute<'a>>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Whether the token's terminating delimiter was observed in the input.
    ///
    /// A token that stopped strictly before the end of the buffer is always
    /// terminated. A token that ran into the end is terminated only when it
    /// still carries its closing delimiter: `>` for tags and doctypes,
    /// `-->` for comments. Text is open-ended (more of the run may follow
    /// in a later chunk). The streaming extractor uses this to decide
    /// whether a token may be committed or must wait for more input.
    pub fn is_terminated(&self, input: &[u8]) -> bool {
        if self.span.1 < input.len() {
            return true;
        }
        match self.kind {
            TokenKind::StartTag | TokenKind::EndTag | TokenKind::Doctype => {
                input[..self.span.1].ends_with(b">")
            }
            TokenKind::Comment => input[..self.span.1].ends_with(b"-->"),
            TokenKind::Text => false,
            TokenKind::Eof => true,
        }
    }
}

/// Pull tokenizer over an HTML byte buffer
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
            done: false,
        }
    }

    /// Get the current cursor position
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    /// Rewind the cursor (checkpoint/rollback for the streaming driver)
    pub fn set_position(&mut self, pos: usize) {
        self.scanner.set_position(pos);
        self.done = false;
    }

    /// Get the next token, or None after `Eof` has been emitted
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }

        if self.scanner.is_eof() {
            self.done = true;
            let pos = self.scanner.position();
            return Some(Token::new(TokenKind::Eof, (pos, pos)));
        }

        if self.scanner.peek() == Some(b'<') {
            Some(self.scan_markup())
        } else {
            Some(self.scan_text())
        }
    }

    /// Scan a text run up to the next '<' or end of input
    fn scan_text(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_open().unwrap_or(self.scanner.len());
        self.scanner.set_position(end);
        Token::new(TokenKind::Text, (start, end)).with_content(self.scanner.slice(start, end))
    }

    /// Scan markup starting with '<'
    fn scan_markup(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        self.scanner.advance(1); // skip '<'

        if self.scanner.starts_with(b"!--") {
            return self.scan_comment(start);
        }
        if self.scanner.starts_with_ignore_case(b"!doctype") {
            return self.scan_doctype(start);
        }
        if self.scanner.peek() == Some(b'/') {
            self.scanner.advance(1);
            return self.scan_end_tag(start);
        }
        self.scan_start_tag(start)
    }

    /// Scan a comment, closed by the first '-->'
    fn scan_comment(&mut self, start: usize) -> Token<'a> {
        self.scanner.advance(3); // skip '!--'
        let content_start = self.scanner.position();

        loop {
            match self.scanner.find_byte(b'-') {
                Some(dash) => {
                    self.scanner.set_position(dash);
                    if self.scanner.starts_with(b"-->") {
                        let content = self.scanner.slice(content_start, dash);
                        self.scanner.advance(3);
                        return Token::new(TokenKind::Comment, (start, self.scanner.position()))
                            .with_content(content);
                    }
                    self.scanner.advance(1);
                }
                // Unterminated comment: the whole remainder becomes text
                None => return self.remainder_as_text(start),
            }
        }
    }

    /// Scan a DOCTYPE declaration spanning to the next '>'
    fn scan_doctype(&mut self, start: usize) -> Token<'a> {
        self.scanner.advance(8); // skip '!doctype'
        let content_start = self.scanner.position();

        let end = match self.scanner.find_tag_close() {
            Some(gt) => {
                self.scanner.set_position(gt + 1);
                gt
            }
            None => {
                let len = self.scanner.len();
                self.scanner.set_position(len);
                len
            }
        };
        Token::new(TokenKind::Doctype, (start, self.scanner.position()))
            .with_content(self.scanner.slice(content_start, end))
    }

    /// Scan an end tag; the cursor sits just past '</'
    fn scan_end_tag(&mut self, start: usize) -> Token<'a> {
        self.scanner.skip_whitespace();
        let name = self.read_tag_name();
        if name.is_empty() {
            return self.span_as_text(start);
        }

        // Anything between the name and '>' is ignored
        match self.scanner.find_tag_close() {
            Some(gt) => self.scanner.set_position(gt + 1),
            None => self.scanner.set_position(self.scanner.len()),
        }
        Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name)
    }

    /// Scan a start tag; the cursor sits just past '<'
    fn scan_start_tag(&mut self, start: usize) -> Token<'a> {
        self.scanner.skip_whitespace();
        let name = self.read_tag_name();
        if name.is_empty() {
            return self.span_as_text(start);
        }

        let input = self.scanner.slice(0, self.scanner.len());
        let (attributes, end) = scan_attributes(input, self.scanner.position());
        self.scanner.set_position(end);
        Token::new(TokenKind::StartTag, (start, end))
            .with_name(name)
            .with_attributes(attributes)
    }

    /// Read a tag name: bytes up to whitespace, '>' or '/'
    fn read_tag_name(&mut self) -> &'a [u8] {
        let start = self.scanner.position();
        while let Some(b) = self.scanner.peek() {
            if is_ascii_whitespace(b) || b == b'>' || b == b'/' {
                break;
            }
            self.scanner.advance(1);
        }
        self.scanner.slice(start, self.scanner.position())
    }

    /// Tolerance: a tag scan with an empty name emits its whole span,
    /// through the closing '>' when present, as a text token
    fn span_as_text(&mut self, start: usize) -> Token<'a> {
        let end = match self.scanner.find_tag_close() {
            Some(gt) => gt + 1,
            None => self.scanner.len(),
        };
        self.scanner.set_position(end);
        Token::new(TokenKind::Text, (start, end)).with_content(self.scanner.slice(start, end))
    }

    /// Tolerance: emit everything from `start` to end of input as text
    fn remainder_as_text(&mut self, start: usize) -> Token<'a> {
        let len = self.scanner.len();
        self.scanner.set_position(len);
        Token::new(TokenKind::Text, (start, len)).with_content(self.scanner.slice(start, len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Vec<Token<'_>> {
        let mut tokenizer = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token() {
            let at_eof = token.kind == TokenKind::Eof;
            out.push(token);
            if at_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn test_simple_element() {
        let toks = tokens(b"<div>Hello</div>");
        assert_eq!(toks.len(), 4);
        assert_eq!(toks[0].kind, TokenKind::StartTag);
        assert_eq!(toks[0].name, Some(b"div" as &[u8]));
        assert_eq!(toks[1].kind, TokenKind::Text);
        assert_eq!(toks[1].content, Some(b"Hello" as &[u8]));
        assert_eq!(toks[2].kind, TokenKind::EndTag);
        assert_eq!(toks[2].name, Some(b"div" as &[u8]));
        assert_eq!(toks[3].kind, TokenKind::Eof);
    }

    #[test]
    fn test_start_tag_attributes() {
        let toks = tokens(b"<a href=\"test.html\" class='link'>Link</a>");
        assert_eq!(toks[0].kind, TokenKind::StartTag);
        assert_eq!(toks[0].name, Some(b"a" as &[u8]));
        assert_eq!(toks[0].attributes.len(), 2);
        assert_eq!(toks[0].attributes[0].name_str(), Some("href"));
        assert_eq!(toks[0].attributes[0].value_str(), Some("test.html"));
        assert_eq!(toks[0].attributes[1].name_str(), Some("class"));
        assert_eq!(toks[0].attributes[1].value_str(), Some("link"));
    }

    #[test]
    fn test_comment() {
        let toks = tokens(b"a<!-- note -->b");
        assert_eq!(toks[1].kind, TokenKind::Comment);
        assert_eq!(toks[1].content, Some(b" note " as &[u8]));
        assert_eq!(toks[2].content, Some(b"b" as &[u8]));
    }

    #[test]
    fn test_unterminated_comment_becomes_text() {
        let toks = tokens(b"x<!-- never closed");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[1].kind, TokenKind::Text);
        assert_eq!(toks[1].content, Some(b"<!-- never closed" as &[u8]));
    }

    #[test]
    fn test_doctype_case_insensitive() {
        let toks = tokens(b"<!DOCTYPE html><html></html>");
        assert_eq!(toks[0].kind, TokenKind::Doctype);
        assert_eq!(toks[0].content, Some(b" html" as &[u8]));
        assert_eq!(toks[1].name, Some(b"html" as &[u8]));

        let toks = tokens(b"<!doctype html>");
        assert_eq!(toks[0].kind, TokenKind::Doctype);
    }

    #[test]
    fn test_empty_name_becomes_text() {
        let toks = tokens(b"<>after");
        assert_eq!(toks[0].kind, TokenKind::Text);
        assert_eq!(toks[0].content, Some(b"<>" as &[u8]));
        assert_eq!(toks[1].content, Some(b"after" as &[u8]));

        let toks = tokens(b"</>x");
        assert_eq!(toks[0].kind, TokenKind::Text);
        assert_eq!(toks[0].content, Some(b"</>" as &[u8]));
    }

    #[test]
    fn test_end_tag_whitespace_name() {
        let toks = tokens(b"</ div >");
        assert_eq!(toks[0].kind, TokenKind::EndTag);
        assert_eq!(toks[0].name, Some(b"div" as &[u8]));
    }

    #[test]
    fn test_stray_lt_at_end() {
        let toks = tokens(b"text<");
        assert_eq!(toks[0].content, Some(b"text" as &[u8]));
        assert_eq!(toks[1].kind, TokenKind::Text);
        assert_eq!(toks[1].content, Some(b"<" as &[u8]));
        assert_eq!(toks[2].kind, TokenKind::Eof);
    }

    #[test]
    fn test_missing_gt_ends_at_input_end() {
        let toks = tokens(b"<div class=\"open");
        assert_eq!(toks[0].kind, TokenKind::StartTag);
        assert_eq!(toks[0].name, Some(b"div" as &[u8]));
        assert_eq!(toks[0].attributes[0].value_str(), Some("open"));
        assert_eq!(toks[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_self_closing() {
        let toks = tokens(b"<br/><img src=\"x.png\"/>");
        assert_eq!(toks[0].kind, TokenKind::StartTag);
        assert_eq!(toks[0].name, Some(b"br" as &[u8]));
        assert!(toks[0].attributes.is_empty());
        assert_eq!(toks[1].name, Some(b"img" as &[u8]));
        assert_eq!(toks[1].attributes[0].value_str(), Some("x.png"));
    }

    #[test]
    fn test_name_case_preserved() {
        let toks = tokens(b"<DIV></div>");
        assert_eq!(toks[0].name, Some(b"DIV" as &[u8]));
        assert_eq!(toks[1].name, Some(b"div" as &[u8]));
    }

    #[test]
    fn test_terminates_on_arbitrary_bytes() {
        let junk: &[u8] = b"<<<>>'\"<a b=c<!--<x</ </<!doctype";
        let mut tokenizer = Tokenizer::new(junk);
        let mut count = 0;
        loop {
            let token = tokenizer.next_token();
            count += 1;
            assert!(count <= junk.len() + 1, "tokenizer failed to make progress");
            match token {
                Some(t) if t.kind == TokenKind::Eof => break,
                Some(_) => {}
                None => break,
            }
        }
    }

    #[test]
    fn test_spans_tile_input() {
        // Every byte is consumed exactly once, in order
        for input in [
            b"<div><p>Hello</p></div>" as &[u8],
            b"plain text only",
            b"<a href='x'>y</a><!-- c --><!DOCTYPE html><",
            b"<<<>>'\"</ <b junk",
        ] {
            let mut tokenizer = Tokenizer::new(input);
            let mut cursor = 0;
            while let Some(token) = tokenizer.next_token() {
                if token.kind == TokenKind::Eof {
                    break;
                }
                assert_eq!(token.span.0, cursor, "gap or overlap in {:?}", input);
                assert!(token.span.1 > token.span.0, "empty token in {:?}", input);
                cursor = token.span.1;
            }
            assert_eq!(cursor, input.len());
        }
    }

    #[test]
    fn test_is_terminated() {
        let input: &[u8] = b"<div class=\"a";
        let mut tokenizer = Tokenizer::new(input);
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::StartTag);
        assert!(!token.is_terminated(input));

        let input: &[u8] = b"<div>";
        let mut tokenizer = Tokenizer::new(input);
        let token = tokenizer.next_token().unwrap();
        assert!(token.is_terminated(input));

        let input: &[u8] = b"partial text";
        let mut tokenizer = Tokenizer::new(input);
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Text);
        assert!(!token.is_terminated(input));

        let input: &[u8] = b"done<p>";
        let mut tokenizer = Tokenizer::new(input);
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::Text);
        assert!(token.is_terminated(input));
    }

    #[test]
    fn test_rollback() {
        let input: &[u8] = b"<p>hi</p><sp";
        let mut tokenizer = Tokenizer::new(input);
        tokenizer.next_token();
        tokenizer.next_token();
        tokenizer.next_token();
        let checkpoint = tokenizer.position();
        let token = tokenizer.next_token().unwrap();
        assert!(!token.is_terminated(input));
        tokenizer.set_position(checkpoint);
        assert_eq!(tokenizer.position(), checkpoint);
        let again = tokenizer.next_token().unwrap();
        assert_eq!(again.kind, TokenKind::StartTag);
        assert_eq!(again.name, Some(b"sp" as &[u8]));
    }
}
