//! Streaming HTML extractor
//!
//! Stateful extractor that consumes HTML in arbitrary chunks, matches
//! registered selectors against start tags as they appear, and keeps only
//! matched elements in memory: their attributes and their accumulated,
//! whitespace-normalized text. No DOM is ever built.
//!
//! The chunk-boundary invariant: a token is committed only once its
//! terminating delimiter has been observed, so a tag (or text run, or
//! comment) split across feeds is never misparsed and the result lists are
//! identical for every way of partitioning the same input into chunks.

use crate::core::tags::{is_void_tag, trim_ascii};
use crate::core::tokenizer::{TokenKind, Tokenizer};
use crate::select::{compile, matches_start_tag, Selector, SelectorError};
use thiserror::Error;

/// A finalized match: accumulated text plus a copy of the start tag's
/// attributes, both owned
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub text: Vec<u8>,
    pub attributes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MatchRecord {
    /// Look up an attribute value (names compare ASCII case-insensitively)
    pub fn attribute(&self, name: &[u8]) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }
}

/// Streaming extractor misuse / selector failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("selectors must be registered before the first feed")]
    AlreadyStarted,
    #[error("no selectors registered")]
    NoSelectors,
    #[error("input already finished")]
    Finished,
}

/// An open element the extractor still cares about
struct OpenElement {
    /// Tag name as written (end-tag matching is byte-exact)
    name: Vec<u8>,
    /// Attribute pairs copied from the start tag, insertion order
    attributes: Vec<(Vec<u8>, Vec<u8>)>,
    /// Accumulated trimmed text, single-space separated
    text: Vec<u8>,
    /// Nesting depth when opened
    depth: usize,
    /// Index of the first registered selector that matched the start tag
    selector: Option<usize>,
}

/// Stateful streaming extractor
pub struct StreamingExtractor {
    /// Unconsumed input bytes
    buffer: Vec<u8>,
    /// Registered selectors: (canonical key, parsed form), in order
    selectors: Vec<(String, Selector)>,
    /// Per-selector result lists, parallel to `selectors`
    results: Vec<Vec<MatchRecord>>,
    /// Open ancestors below the current element
    stack: Vec<OpenElement>,
    /// Innermost open element, kept out of the stack for fast mutation
    current: Option<OpenElement>,
    /// Element nesting depth (void tags never contribute)
    depth: usize,
    /// Set by the first feed; registration is closed from then on
    started: bool,
    finished: bool,
}

impl StreamingExtractor {
    /// Create a new extractor with no registered selectors
    pub fn new() -> Self {
        StreamingExtractor {
            buffer: Vec::with_capacity(8192),
            selectors: Vec::new(),
            results: Vec::new(),
            stack: Vec::new(),
            current: None,
            depth: 0,
            started: false,
            finished: false,
        }
    }

    /// Register a selector. Must happen before the first `feed`.
    pub fn add_selector(&mut self, source: &str) -> Result<(), ExtractError> {
        if self.started {
            return Err(ExtractError::AlreadyStarted);
        }
        let selector = compile(source)?;
        self.selectors.push((selector.key(), selector));
        self.results.push(Vec::new());
        Ok(())
    }

    /// Feed a chunk of input and process every complete token in the buffer
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ExtractError> {
        if self.finished {
            return Err(ExtractError::Finished);
        }
        if self.selectors.is_empty() {
            return Err(ExtractError::NoSelectors);
        }
        self.started = true;
        self.buffer.extend_from_slice(chunk);
        self.drain_buffer(false);
        Ok(())
    }

    /// Drain remaining tokens and finalize every open element, treating the
    /// end of the document as implicit end tags. Idempotent.
    pub fn finish(&mut self) -> Result<(), ExtractError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.started = true;
        self.drain_buffer(true);

        if let Some(open) = self.current.take() {
            self.finalize(open);
        }
        while let Some(open) = self.stack.pop() {
            self.finalize(open);
        }
        self.depth = 0;
        log::debug!(
            "streaming finish: {} result lists, {} total matches",
            self.results.len(),
            self.results.iter().map(Vec::len).sum::<usize>()
        );
        Ok(())
    }

    /// Process tokens out of the buffer. With `at_end` false, a token whose
    /// terminator has not arrived yet is rolled back and left buffered.
    fn drain_buffer(&mut self, at_end: bool) {
        let mut buf = std::mem::take(&mut self.buffer);
        let mut tokenizer = Tokenizer::new(&buf);
        let mut consumed = 0;

        loop {
            let checkpoint = tokenizer.position();
            let Some(token) = tokenizer.next_token() else {
                break;
            };
            if token.kind == TokenKind::Eof {
                break;
            }
            if !at_end && !token.is_terminated(&buf) {
                tokenizer.set_position(checkpoint);
                break;
            }

            match token.kind {
                TokenKind::StartTag => {
                    let name = token.name.unwrap_or(b"");
                    let selector = self
                        .selectors
                        .iter()
                        .position(|(_, s)| matches_start_tag(name, &token.attributes, s));
                    let element = OpenElement {
                        name: name.to_vec(),
                        attributes: token
                            .attributes
                            .iter()
                            .map(|a| (a.name.to_vec(), a.value.to_vec()))
                            .collect(),
                        text: Vec::new(),
                        depth: self.depth,
                        selector,
                    };
                    if is_void_tag(name) {
                        // Void tags never open a scope or touch the depth
                        self.finalize(element);
                    } else {
                        if let Some(open) = self.current.take() {
                            self.stack.push(open);
                        }
                        self.current = Some(element);
                        self.depth += 1;
                    }
                }

                TokenKind::EndTag => {
                    let name = token.name.unwrap_or(b"");
                    if let Some(open) = self.current.take_if(|open| open.name == name) {
                        self.finalize(open);
                        self.current = self.stack.pop();
                        self.depth = self.depth.saturating_sub(1);
                    } else if let Some(idx) =
                        self.stack.iter().rposition(|open| open.name == name)
                    {
                        // Mis-nested close: finalize just that ancestor, the
                        // current element stays open
                        let open = self.stack.remove(idx);
                        self.finalize(open);
                        self.depth = self.depth.saturating_sub(1);
                    }
                    // Anything else (including end tags of void elements) is
                    // silently absorbed with no depth change
                }

                TokenKind::Text => {
                    if let Some(open) = self.current.as_mut() {
                        if open.selector.is_some() {
                            let trimmed = trim_ascii(token.content.unwrap_or(b""));
                            if !trimmed.is_empty() {
                                if !open.text.is_empty() {
                                    open.text.push(b' ');
                                }
                                open.text.extend_from_slice(trimmed);
                            }
                        }
                    }
                }

                TokenKind::Comment | TokenKind::Doctype | TokenKind::Eof => {}
            }

            consumed = tokenizer.position();
        }

        buf.drain(..consumed);
        self.buffer = buf;
        // Cap retained capacity so long-lived extractors do not hold on to
        // one oversized chunk forever
        self.buffer.shrink_to(8192);
    }

    /// Record a closed element if its start tag matched a selector
    fn finalize(&mut self, element: OpenElement) {
        if let Some(idx) = element.selector {
            log::trace!(
                "match for {:?} at depth {}",
                self.selectors[idx].0,
                element.depth
            );
            self.results[idx].push(MatchRecord {
                text: element.text,
                attributes: element.attributes,
            });
        }
    }

    /// Result list for a canonical selector key
    pub fn matches(&self, key: &str) -> Option<&[MatchRecord]> {
        self.selectors
            .iter()
            .position(|(k, _)| k == key)
            .map(|idx| self.results[idx].as_slice())
    }

    /// Number of matches under a key (0 for unknown keys)
    pub fn match_count(&self, key: &str) -> usize {
        self.matches(key).map_or(0, |m| m.len())
    }

    /// Just the text of every match under a key
    pub fn match_texts(&self, key: &str) -> Option<Vec<&[u8]>> {
        self.matches(key)
            .map(|records| records.iter().map(|r| r.text.as_slice()).collect())
    }

    /// The named attribute of the index-th match under a key
    pub fn match_attribute(&self, key: &str, index: usize, attr_name: &[u8]) -> Option<&[u8]> {
        self.matches(key)?.get(index)?.attribute(attr_name)
    }

    /// Bytes currently buffered awaiting a terminator
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Return to the post-construction state: selectors, results, buffers
    /// and open elements are all released
    pub fn reset(&mut self) {
        *self = StreamingExtractor::new();
    }
}

impl Default for StreamingExtractor {
    fn default() -> Self {
        Self::new()
    }
}
