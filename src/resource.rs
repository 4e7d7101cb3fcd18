//! ResourceArc Wrappers
//!
//! Persistent state handed to the BEAM as opaque handles: one for parsed
//! documents, one for streaming extractors. The handles replace the
//! process-wide singletons a flat C ABI would use, which also lifts the
//! one-live-instance-per-mode limitation.

use crate::dom::HtmlDocument;
use crate::strategy::StreamingExtractor;
use rustler::ResourceArc;
use std::sync::Mutex;

/// A parsed document. Parsing happens once at construction; queries only
/// read, so no lock is needed.
pub struct DocumentResource {
    pub doc: HtmlDocument,
}

impl DocumentResource {
    pub fn new(input: &[u8]) -> Self {
        DocumentResource {
            doc: HtmlDocument::parse(input),
        }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

/// Type alias for the document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;

/// A streaming extractor. Feeding mutates, so the state lives behind a
/// Mutex (BEAM schedulers may call from any thread).
pub struct ExtractorResource {
    pub inner: Mutex<StreamingExtractor>,
}

impl ExtractorResource {
    pub fn new() -> Self {
        ExtractorResource {
            inner: Mutex::new(StreamingExtractor::new()),
        }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for ExtractorResource {}

impl Default for ExtractorResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the extractor ResourceArc
pub type ExtractorRef = ResourceArc<ExtractorResource>;
