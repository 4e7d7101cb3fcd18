//! Selector Engine
//!
//! A deliberately small slice of CSS: universal, tag, class, id and
//! attribute selectors, with an LRU-cached parser and a depth-first query
//! engine over the document arena.

pub mod compiler;
pub mod eval;
pub mod parser;

pub use compiler::compile;
pub use eval::{
    matches_node, matches_start_tag, select_all, select_all_text, select_attribute, select_first,
};
pub use parser::{parse, Selector, SelectorError};
