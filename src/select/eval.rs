//! Selector matching and the tree query engine
//!
//! The matching predicate is shared by both modes: the tree engine applies
//! it to arena nodes, the streaming extractor to start-tag tokens.

use super::parser::Selector;
use crate::core::attributes::Attribute;
use crate::core::tags::is_ascii_whitespace;
use crate::dom::{HtmlDocument, NodeId};

/// Check whether a tree node satisfies a selector.
/// Non-element nodes never match.
pub fn matches_node(doc: &HtmlDocument, id: NodeId, selector: &Selector) -> bool {
    match doc.get_node(id) {
        Some(node) if node.is_element() => {}
        _ => return false,
    }
    let name = doc.node_name(id).unwrap_or(b"");
    matches_parts(name, |attr| doc.get_attribute(id, attr), selector)
}

/// Check whether a start tag (as tokenized) satisfies a selector
pub fn matches_start_tag(name: &[u8], attrs: &[Attribute<'_>], selector: &Selector) -> bool {
    matches_parts(
        name,
        |attr| {
            attrs
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(attr))
                .map(|a| a.value)
        },
        selector,
    )
}

/// The predicate itself, over a tag name and an attribute accessor.
/// Tag names compare ASCII case-insensitively, attribute values byte-exact.
fn matches_parts<'v>(
    name: &[u8],
    get_attr: impl Fn(&[u8]) -> Option<&'v [u8]>,
    selector: &Selector,
) -> bool {
    match selector {
        Selector::Universal => true,
        Selector::Tag(tag) => name.eq_ignore_ascii_case(tag.as_bytes()),
        Selector::Class(class) => {
            get_attr(b"class").is_some_and(|v| has_class_token(v, class.as_bytes()))
        }
        Selector::Id(id) => get_attr(b"id") == Some(id.as_bytes()),
        Selector::Attribute { name: attr, value } => match get_attr(attr.as_bytes()) {
            Some(found) => value.is_empty() || found == value.as_bytes(),
            None => false,
        },
    }
}

/// Check a whitespace-separated class list for a byte-exact token
fn has_class_token(class_attr: &[u8], want: &[u8]) -> bool {
    class_attr
        .split(|&b| is_ascii_whitespace(b))
        .any(|token| !token.is_empty() && token == want)
}

/// Depth-first pre-order over a subtree, root included
fn preorder<'d>(doc: &'d HtmlDocument, root: NodeId) -> impl Iterator<Item = NodeId> + 'd {
    std::iter::once(root).chain(doc.descendants(root))
}

/// First matching node in pre-order, or None
pub fn select_first(doc: &HtmlDocument, root: NodeId, selector: &Selector) -> Option<NodeId> {
    preorder(doc, root).find(|&id| matches_node(doc, id, selector))
}

/// Every matching node in pre-order
pub fn select_all(doc: &HtmlDocument, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    preorder(doc, root)
        .filter(|&id| matches_node(doc, id, selector))
        .collect()
}

/// Extracted text content of every matching node, each independently owned
pub fn select_all_text(doc: &HtmlDocument, root: NodeId, selector: &Selector) -> Vec<Vec<u8>> {
    select_all(doc, root, selector)
        .into_iter()
        .map(|id| doc.collect_text(id))
        .collect()
}

/// The named attribute of every matching node that carries it
pub fn select_attribute(
    doc: &HtmlDocument,
    root: NodeId,
    selector: &Selector,
    attr_name: &[u8],
) -> Vec<Vec<u8>> {
    select_all(doc, root, selector)
        .into_iter()
        .filter_map(|id| doc.get_attribute(id, attr_name).map(|v| v.to_vec()))
        .collect()
}
