//! String Interning Pool
//!
//! Backing storage for element names, attribute names/values and text
//! payloads. Interning everything the document keeps means the arena holds
//! plain ids and the document type carries no borrow of the input buffer.

use std::collections::HashMap;

/// String interning pool with deduplication
#[derive(Debug, Default)]
pub struct StringPool {
    /// All strings stored contiguously
    data: Vec<u8>,
    /// Map from string content to entry id
    index: HashMap<Vec<u8>, u32>,
    /// Entries: (offset, length) pairs into `data`
    entries: Vec<(u32, u32)>,
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            data: Vec::with_capacity(4096),
            index: HashMap::new(),
            entries: Vec::with_capacity(256),
        };
        // Entry 0 is reserved for the empty string
        pool.entries.push((0, 0));
        pool
    }

    /// Intern a string, returning its id
    ///
    /// Returns the existing id when the exact byte sequence is already
    /// stored; text payloads routinely repeat on real pages (menus, table
    /// cells), so deduplication pays for itself.
    pub fn intern(&mut self, s: &[u8]) -> u32 {
        if s.is_empty() {
            return 0;
        }
        if let Some(&id) = self.index.get(s) {
            return id;
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(s);

        let id = self.entries.len() as u32;
        self.entries.push((offset, s.len() as u32));
        self.index.insert(s.to_vec(), id);
        id
    }

    /// Get a string by id
    pub fn get(&self, id: u32) -> Option<&[u8]> {
        let (offset, len) = *self.entries.get(id as usize)?;
        let start = offset as usize;
        let end = start + len as usize;
        self.data.get(start..end)
    }

    /// Get a string by id as UTF-8, lossy fallback not attempted
    pub fn get_str(&self, id: u32) -> Option<&str> {
        self.get(id).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of unique strings stored (the reserved empty entry included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether anything beyond the reserved entry is stored
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}
