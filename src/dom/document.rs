//! HTML Document - arena-based DOM representation
//!
//! Arena storage with:
//! - NodeId indices for traversal
//! - String interning for names, attribute values and text payloads
//! - A tokenizer-driven builder that tolerates malformed markup
//!
//! The document owns every byte it keeps (via the string pool), so it has
//! no lifetime parameter and can sit directly inside a NIF resource.

use super::node::{HtmlAttribute, HtmlNode, NodeId, NodeKind};
use super::strings::StringPool;
use crate::core::tags::{is_void_tag, trim_ascii};
use crate::core::tokenizer::{TokenKind, Tokenizer};

/// NodeId of the document root
pub const DOCUMENT_NODE: NodeId = 0;

/// A parsed HTML document
pub struct HtmlDocument {
    /// Arena of nodes; index 0 is the document root
    nodes: Vec<HtmlNode>,
    /// Arena of attributes, ranges owned by element nodes
    attributes: Vec<HtmlAttribute>,
    /// Interned strings
    strings: StringPool,
}

impl HtmlDocument {
    /// Parse an HTML document. Lenient: never fails, whatever the input.
    pub fn parse(input: &[u8]) -> Self {
        let mut doc = HtmlDocument {
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
        };
        doc.nodes.push(HtmlNode::document());
        doc.build(input);
        log::debug!("parsed document: {} nodes", doc.nodes.len());
        doc
    }

    /// Build the tree by driving the tokenizer
    fn build(&mut self, input: &[u8]) {
        let mut tokenizer = Tokenizer::new(input);
        // Insertion point is the top of the open stack; entries carry the
        // interned name for end-tag matching. The document node stays at
        // the bottom and is never popped.
        let mut open: Vec<(NodeId, u32)> = vec![(DOCUMENT_NODE, 0)];

        while let Some(token) = tokenizer.next_token() {
            match token.kind {
                TokenKind::Eof => break,

                TokenKind::StartTag => {
                    let name = token.name.unwrap_or(b"");
                    let name_id = self.strings.intern(name);
                    let (parent_id, _) = *open.last().unwrap_or(&(DOCUMENT_NODE, 0));
                    let depth = open.len().min(u16::MAX as usize) as u16;

                    let mut node = HtmlNode::element(name_id, parent_id, depth);
                    node.attr_start = self.attributes.len() as u32;
                    node.attr_count = token.attributes.len().min(u16::MAX as usize) as u16;
                    for attr in &token.attributes {
                        let attr_name_id = self.strings.intern(attr.name);
                        let attr_value_id = self.strings.intern(attr.value);
                        self.attributes
                            .push(HtmlAttribute::new(attr_name_id, attr_value_id));
                    }

                    let node_id = self.nodes.len() as NodeId;
                    self.nodes.push(node);
                    self.link_child(parent_id, node_id);

                    // Void elements never open a scope
                    if !is_void_tag(name) {
                        open.push((node_id, name_id));
                    }
                }

                TokenKind::EndTag => {
                    let name = token.name.unwrap_or(b"");
                    // Byte-exact match against the insertion point, then
                    // walking up the ancestors; an end tag with no open
                    // counterpart is ignored.
                    let matched = open
                        .iter()
                        .rposition(|&(_, name_id)| self.strings.get(name_id) == Some(name));
                    if let Some(idx) = matched {
                        if idx > 0 {
                            open.truncate(idx);
                        }
                    }
                }

                TokenKind::Text => {
                    let content = token.content.unwrap_or(b"");
                    // Whitespace-only runs produce no node; kept text is
                    // stored un-trimmed.
                    if trim_ascii(content).is_empty() {
                        continue;
                    }
                    let payload_id = self.strings.intern(content);
                    let (parent_id, _) = *open.last().unwrap_or(&(DOCUMENT_NODE, 0));
                    let depth = open.len().min(u16::MAX as usize) as u16;

                    let node_id = self.nodes.len() as NodeId;
                    self.nodes.push(HtmlNode::text(payload_id, parent_id, depth));
                    self.link_child(parent_id, node_id);
                }

                TokenKind::Comment => {
                    let content = token.content.unwrap_or(b"");
                    let payload_id = self.strings.intern(content);
                    let (parent_id, _) = *open.last().unwrap_or(&(DOCUMENT_NODE, 0));
                    let depth = open.len().min(u16::MAX as usize) as u16;

                    let node_id = self.nodes.len() as NodeId;
                    self.nodes
                        .push(HtmlNode::comment(payload_id, parent_id, depth));
                    self.link_child(parent_id, node_id);
                }

                TokenKind::Doctype => {}
            }
        }
    }

    /// Link a child node as the last child of its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child = self.nodes[parent_id as usize].last_child;
        if let Some(last_id) = last_child {
            self.nodes[child_id as usize].prev_sibling = Some(last_id);
            self.nodes[last_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    /// Get a node by id
    pub fn get_node(&self, id: NodeId) -> Option<&HtmlNode> {
        self.nodes.get(id as usize)
    }

    /// Get an element's tag name
    pub fn node_name(&self, id: NodeId) -> Option<&[u8]> {
        let node = self.get_node(id)?;
        if node.is_element() {
            self.strings.get(node.data_id)
        } else {
            None
        }
    }

    /// Get the raw payload of a text or comment node
    pub fn node_payload(&self, id: NodeId) -> Option<&[u8]> {
        let node = self.get_node(id)?;
        match node.kind {
            NodeKind::Text | NodeKind::Comment => self.strings.get(node.data_id),
            _ => None,
        }
    }

    /// Get the stored attributes of an element
    pub fn attributes(&self, id: NodeId) -> &[HtmlAttribute] {
        match self.get_node(id) {
            Some(node) => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                self.attributes.get(start..end).unwrap_or(&[])
            }
            None => &[],
        }
    }

    /// Get an attribute value by name (names compare ASCII case-insensitively)
    pub fn get_attribute(&self, id: NodeId, name: &[u8]) -> Option<&[u8]> {
        for attr in self.attributes(id) {
            if let Some(stored) = self.strings.get(attr.name_id) {
                if stored.eq_ignore_ascii_case(name) {
                    return self.strings.get(attr.value_id);
                }
            }
        }
        None
    }

    /// Get all attribute (name, value) pairs of an element in insertion order
    pub fn attribute_pairs(&self, id: NodeId) -> Vec<(&[u8], &[u8])> {
        self.attributes(id)
            .iter()
            .filter_map(|attr| {
                let name = self.strings.get(attr.name_id)?;
                let value = self.strings.get(attr.value_id)?;
                Some((name, value))
            })
            .collect()
    }

    /// Iterate over the children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over all descendants of a node in depth-first pre-order
    /// (the node itself is not yielded)
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        self.push_children_reversed(id, &mut stack);
        DescendantIter { doc: self, stack }
    }

    fn push_children_reversed(&self, id: NodeId, stack: &mut Vec<NodeId>) {
        let mut child = self.get_node(id).and_then(|n| n.last_child);
        while let Some(cid) = child {
            stack.push(cid);
            child = self.get_node(cid).and_then(|n| n.prev_sibling);
        }
    }

    /// Total number of nodes including the document root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Extract the text content under a node.
    ///
    /// Depth-first over document/element children; each text node's payload
    /// is trimmed of ASCII whitespace and non-empty segments are joined by
    /// a single space. Comments are skipped. The result is freshly owned;
    /// it is not trimmed as a whole beyond the per-segment trimming.
    pub fn collect_text(&self, id: NodeId) -> Vec<u8> {
        let mut out = Vec::new();
        // Explicit stack so pathological nesting depth cannot overflow the
        // call stack.
        let mut stack = vec![id];
        while let Some(nid) = stack.pop() {
            let Some(node) = self.get_node(nid) else {
                continue;
            };
            match node.kind {
                NodeKind::Text => {
                    let payload = self.strings.get(node.data_id).unwrap_or(b"");
                    let trimmed = trim_ascii(payload);
                    if !trimmed.is_empty() {
                        if !out.is_empty() && out.last() != Some(&b' ') {
                            out.push(b' ');
                        }
                        out.extend_from_slice(trimmed);
                    }
                }
                NodeKind::Document | NodeKind::Element => {
                    self.push_children_reversed(nid, &mut stack);
                }
                NodeKind::Comment => {}
            }
        }
        out
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d HtmlDocument,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first pre-order)
pub struct DescendantIter<'d> {
    doc: &'d HtmlDocument,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.doc.push_children_reversed(current, &mut self.stack);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(doc: &'a HtmlDocument, ids: impl Iterator<Item = NodeId>) -> Vec<&'a [u8]> {
        ids.filter_map(|id| doc.node_name(id)).collect()
    }

    #[test]
    fn test_simple_tree() {
        let doc = HtmlDocument::parse(b"<div><p>Hello</p></div>");
        let roots: Vec<_> = doc.children(DOCUMENT_NODE).collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(doc.node_name(roots[0]), Some(b"div" as &[u8]));

        let div_children: Vec<_> = doc.children(roots[0]).collect();
        assert_eq!(div_children.len(), 1);
        assert_eq!(doc.node_name(div_children[0]), Some(b"p" as &[u8]));
        assert_eq!(doc.collect_text(div_children[0]), b"Hello");
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let doc = HtmlDocument::parse(b"<div><img src=\"x.png\"/><br/><input type=\"text\"/></div>");
        let div = doc.children(DOCUMENT_NODE).next().unwrap();
        let children = names(&doc, doc.children(div));
        assert_eq!(children, vec![b"img" as &[u8], b"br", b"input"]);
        // None of the void elements opened a scope
        for id in doc.children(div) {
            assert_eq!(doc.children(id).count(), 0);
        }
    }

    #[test]
    fn test_unclosed_tag_ancestor_walk() {
        // </div> closes the unclosed <p> by walking up to the div
        let doc = HtmlDocument::parse(b"<div><p>Hi</div><span>after</span>");
        let roots = names(&doc, doc.children(DOCUMENT_NODE));
        assert_eq!(roots, vec![b"div" as &[u8], b"span"]);

        let div = doc.children(DOCUMENT_NODE).next().unwrap();
        let p = doc.children(div).next().unwrap();
        assert_eq!(doc.node_name(p), Some(b"p" as &[u8]));
        assert_eq!(doc.collect_text(p), b"Hi");
    }

    #[test]
    fn test_unmatched_end_tag_ignored() {
        let doc = HtmlDocument::parse(b"<div></span><p>x</p></div>");
        let div = doc.children(DOCUMENT_NODE).next().unwrap();
        let children = names(&doc, doc.children(div));
        assert_eq!(children, vec![b"p" as &[u8]]);
    }

    #[test]
    fn test_end_tag_match_is_byte_exact() {
        // </DIV> does not close <div>; both stay open and the text lands
        // inside the inner scope
        let doc = HtmlDocument::parse(b"<div></DIV>deep");
        let div = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.collect_text(div), b"deep");
    }

    #[test]
    fn test_whitespace_only_text_dropped() {
        let doc = HtmlDocument::parse(b"<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>");
        let ul = doc.children(DOCUMENT_NODE).next().unwrap();
        // The indentation runs produce no text nodes at all
        assert_eq!(doc.children(ul).count(), 2);
        let children = names(&doc, doc.children(ul));
        assert_eq!(children, vec![b"li" as &[u8], b"li"]);
    }

    #[test]
    fn test_text_stored_untrimmed() {
        let doc = HtmlDocument::parse(b"<p>  padded  </p>");
        let p = doc.children(DOCUMENT_NODE).next().unwrap();
        let text = doc.children(p).next().unwrap();
        assert_eq!(doc.node_payload(text), Some(b"  padded  " as &[u8]));
        assert_eq!(doc.collect_text(p), b"padded");
    }

    #[test]
    fn test_collect_text_joins_with_single_space() {
        let doc = HtmlDocument::parse(b"<div><p> one </p><p>two</p>three</div>");
        let div = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.collect_text(div), b"one two three");
    }

    #[test]
    fn test_comments_skipped_in_text() {
        let doc = HtmlDocument::parse(b"<div>a<!-- hidden -->b</div>");
        let div = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.collect_text(div), b"a b");
        // The comment node itself is present in the tree
        let kinds: Vec<_> = doc
            .children(div)
            .map(|id| doc.get_node(id).unwrap().kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Comment, NodeKind::Text]);
    }

    #[test]
    fn test_attribute_lookup_case_insensitive() {
        let doc = HtmlDocument::parse(b"<a HREF=\"x\">y</a>");
        let a = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.get_attribute(a, b"href"), Some(b"x" as &[u8]));
        assert_eq!(doc.get_attribute(a, b"HREF"), Some(b"x" as &[u8]));
        assert_eq!(doc.get_attribute(a, b"src"), None);
    }

    #[test]
    fn test_attribute_order_preserved() {
        let doc = HtmlDocument::parse(b"<a b=\"1\" a=\"2\" c=\"3\">x</a>");
        let a = doc.children(DOCUMENT_NODE).next().unwrap();
        let pairs = doc.attribute_pairs(a);
        let keys: Vec<_> = pairs.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![b"b" as &[u8], b"a", b"c"]);
    }

    #[test]
    fn test_parent_links() {
        let doc = HtmlDocument::parse(b"<div><p><em>x</em></p></div>");
        // Every non-document node walks parents back to the document
        for id in 1..doc.node_count() as NodeId {
            let mut cursor = id;
            let mut hops = 0;
            while let Some(parent) = doc.get_node(cursor).and_then(|n| n.parent) {
                cursor = parent;
                hops += 1;
                assert!(hops <= doc.node_count());
            }
            assert_eq!(cursor, DOCUMENT_NODE);
        }
    }

    #[test]
    fn test_descendants_preorder() {
        let doc = HtmlDocument::parse(b"<div><p>a</p><span><em>b</em></span></div>");
        let order = names(&doc, doc.descendants(DOCUMENT_NODE));
        assert_eq!(order, vec![b"div" as &[u8], b"p", b"span", b"em"]);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        let doc = HtmlDocument::parse(b"");
        assert_eq!(doc.node_count(), 1);

        let doc = HtmlDocument::parse(b"<<<>>>");
        assert!(doc.node_count() >= 1);
    }
}
