//! Extraction strategies
//!
//! Two ways to get data out of a page:
//! - Tree mode (`dom` + `select`): parse everything, query repeatedly
//! - Streaming mode: feed chunks, keep only matched elements in memory

pub mod streaming;

pub use streaming::{ExtractError, MatchRecord, StreamingExtractor};
