//! HTML node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references into the
//! document arena. Parent links are plain ids, never owners: ownership runs
//! strictly root-to-leaf through the arena itself.

/// Compact node identifier (index into the document arena)
pub type NodeId = u32;

/// Type of HTML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text run
    Text,
    /// Comment
    Comment,
}

/// A node in the document arena
#[derive(Debug, Clone)]
pub struct HtmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// String pool id: tag name for elements, payload for text/comments
    pub data_id: u32,
    /// Start of this element's attributes in the attribute arena
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
    /// Depth in the tree (document = 0)
    pub depth: u16,
}

impl HtmlNode {
    fn blank(kind: NodeKind, parent: Option<NodeId>, depth: u16) -> Self {
        HtmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Create the document root node
    pub fn document() -> Self {
        Self::blank(NodeKind::Document, None, 0)
    }

    /// Create an element node
    pub fn element(name_id: u32, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Element, Some(parent), depth);
        node.data_id = name_id;
        node
    }

    /// Create a text node
    pub fn text(payload_id: u32, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Text, Some(parent), depth);
        node.data_id = payload_id;
        node
    }

    /// Create a comment node
    pub fn comment(payload_id: u32, parent: NodeId, depth: u16) -> Self {
        let mut node = Self::blank(NodeKind::Comment, Some(parent), depth);
        node.data_id = payload_id;
        node
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

/// Stored attribute: interned name and value
#[derive(Debug, Clone, Copy)]
pub struct HtmlAttribute {
    /// String pool id of the attribute name
    pub name_id: u32,
    /// String pool id of the attribute value
    pub value_id: u32,
}

impl HtmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        HtmlAttribute { name_id, value_id }
    }
}
