//! DOM Module - arena-based HTML document
//!
//! Implements the tree extraction mode:
//! - Arena allocation for nodes, NodeId (u32) indices
//! - String interning for names, attribute values and text payloads
//! - Tolerant tree construction (void elements, ancestor-walk end tags)
//! - Space-joined text content extraction

pub mod document;
pub mod node;
pub mod strings;

pub use document::{HtmlDocument, DOCUMENT_NODE};
pub use node::{HtmlAttribute, HtmlNode, NodeId, NodeKind};
pub use strings::StringPool;
