//! HtmlSift - lenient HTML extraction for scraping workloads
//!
//! Two extraction modes over a small CSS-selector subset:
//! - parse/1 + query_selector*/2,3: build a DOM-like tree, query it
//! - streaming_*: feed chunks, keep only matched elements in memory
//!
//! Malformed HTML is never an error; the tokenizer absorbs it.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

// ============================================================================
// Pre-defined Atoms (panic-safe)
// ============================================================================

mod atoms {
    rustler::atoms! {
        ok,
        error,
        nil,
        not_ready,
        mutex_poisoned,
    }
}

mod core;
mod dom;
mod resource;
mod select;
mod strategy;
mod term;

use dom::DOCUMENT_NODE;
use resource::{DocumentRef, DocumentResource, ExtractorRef, ExtractorResource};
use strategy::ExtractError;

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Tree Mode: parse + query
// ============================================================================

/// Parse HTML into a document tree (returns ResourceArc)
/// Lenient - accepts arbitrary, possibly malformed input
#[rustler::nif(schedule = "DirtyCpu")]
fn parse(input: Binary) -> DocumentRef {
    ResourceArc::new(DocumentResource::new(input.as_slice()))
}

/// Text content of the first element matching the selector
/// Returns {:ok, text} | nil | {:error, reason}
#[rustler::nif]
fn query_selector<'a>(env: Env<'a>, doc: DocumentRef, selector: &str) -> NifResult<Term<'a>> {
    let parsed = match select::compile(selector) {
        Ok(parsed) => parsed,
        Err(e) => return Ok((atoms::error(), e.to_string()).encode(env)),
    };
    match select::select_first(&doc.doc, DOCUMENT_NODE, &parsed) {
        Some(id) => {
            let text = doc.doc.collect_text(id);
            Ok((atoms::ok(), term::bytes_to_binary(env, &text)).encode(env))
        }
        None => Ok(atoms::nil().encode(env)),
    }
}

/// Number of elements matching the selector
#[rustler::nif]
fn query_selector_count<'a>(
    env: Env<'a>,
    doc: DocumentRef,
    selector: &str,
) -> NifResult<Term<'a>> {
    let parsed = match select::compile(selector) {
        Ok(parsed) => parsed,
        Err(e) => return Ok((atoms::error(), e.to_string()).encode(env)),
    };
    let count = select::select_all(&doc.doc, DOCUMENT_NODE, &parsed).len();
    Ok(count.encode(env))
}

/// Text content of every matching element, in document order
#[rustler::nif]
fn query_selector_all_text<'a>(
    env: Env<'a>,
    doc: DocumentRef,
    selector: &str,
) -> NifResult<Term<'a>> {
    let parsed = match select::compile(selector) {
        Ok(parsed) => parsed,
        Err(e) => return Ok((atoms::error(), e.to_string()).encode(env)),
    };
    let texts = select::select_all_text(&doc.doc, DOCUMENT_NODE, &parsed);
    Ok(term::byte_list(env, &texts))
}

/// The named attribute of every matching element that carries it
#[rustler::nif]
fn query_selector_attribute<'a>(
    env: Env<'a>,
    doc: DocumentRef,
    selector: &str,
    attribute: &str,
) -> NifResult<Term<'a>> {
    let parsed = match select::compile(selector) {
        Ok(parsed) => parsed,
        Err(e) => return Ok((atoms::error(), e.to_string()).encode(env)),
    };
    let values =
        select::select_attribute(&doc.doc, DOCUMENT_NODE, &parsed, attribute.as_bytes());
    Ok(term::byte_list(env, &values))
}

// ============================================================================
// Streaming Mode
// ============================================================================

/// Create a new streaming extractor
#[rustler::nif]
fn streaming_new() -> ExtractorRef {
    ResourceArc::new(ExtractorResource::new())
}

/// Register a selector; must precede the first feed
#[rustler::nif]
fn streaming_add_selector<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    selector: &str,
) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(mut inner) => match inner.add_selector(selector) {
            Ok(()) => Ok(atoms::ok().encode(env)),
            Err(e) => Ok((atoms::error(), e.to_string()).encode(env)),
        },
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Feed a chunk of data to the streaming extractor
/// Returns {:ok, buffered_bytes} on success
#[rustler::nif]
fn streaming_feed<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    chunk: Binary,
) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(mut inner) => match inner.feed(chunk.as_slice()) {
            Ok(()) => Ok((atoms::ok(), inner.buffered()).encode(env)),
            Err(ExtractError::NoSelectors) => {
                Ok((atoms::error(), atoms::not_ready()).encode(env))
            }
            Err(e) => Ok((atoms::error(), e.to_string()).encode(env)),
        },
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Finalize the stream: drain the buffer and close every open element
#[rustler::nif]
fn streaming_finish<'a>(env: Env<'a>, extractor: ExtractorRef) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(mut inner) => match inner.finish() {
            Ok(()) => Ok(atoms::ok().encode(env)),
            Err(e) => Ok((atoms::error(), e.to_string()).encode(env)),
        },
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Number of matches recorded under a selector key (0 for unknown keys)
#[rustler::nif]
fn streaming_match_count<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    key: &str,
) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(inner) => Ok(inner.match_count(key).encode(env)),
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Text of every match under a selector key
/// Returns nil when the key names no registered selector
#[rustler::nif]
fn streaming_match_texts<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    key: &str,
) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(inner) => match inner.match_texts(key) {
            Some(texts) => Ok(term::byte_list(env, texts)),
            None => Ok(atoms::nil().encode(env)),
        },
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Text of the index-th match under a selector key
#[rustler::nif]
fn streaming_match_text<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    key: &str,
    index: usize,
) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(inner) => match inner.matches(key).and_then(|records| records.get(index)) {
            Some(record) => Ok(term::bytes_to_binary(env, &record.text)),
            None => Ok(atoms::nil().encode(env)),
        },
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Attribute of the index-th match under a selector key
#[rustler::nif]
fn streaming_match_attribute<'a>(
    env: Env<'a>,
    extractor: ExtractorRef,
    key: &str,
    index: usize,
    attribute: &str,
) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(inner) => match inner.match_attribute(key, index, attribute.as_bytes()) {
            Some(value) => Ok(term::bytes_to_binary(env, value)),
            None => Ok(atoms::nil().encode(env)),
        },
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

/// Release buffers, selectors and results; the handle is reusable
#[rustler::nif]
fn streaming_reset<'a>(env: Env<'a>, extractor: ExtractorRef) -> NifResult<Term<'a>> {
    match extractor.inner.lock() {
        Ok(mut inner) => {
            inner.reset();
            Ok(atoms::ok().encode(env))
        }
        Err(_) => Ok((atoms::error(), atoms::mutex_poisoned()).encode(env)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.HtmlSift.Native");
