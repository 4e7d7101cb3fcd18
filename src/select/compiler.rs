//! Selector compilation cache
//!
//! Parsed selectors are tiny, but NIF callers tend to issue the same handful
//! of selectors for every page of a crawl. An LRU cache keyed by the source
//! string skips re-parsing on those repeated calls.

use super::parser::{parse, Selector, SelectorError};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Global LRU cache for parsed selectors.
/// A Mutex because BEAM schedulers call NIFs from many threads.
static SELECTOR_CACHE: Mutex<Option<LruCache<String, Selector>>> = Mutex::new(None);

/// Cache capacity - a crawl rarely uses more than a few dozen selectors
const CACHE_CAPACITY: usize = 256;

/// Parse a selector through the cache
pub fn compile(source: &str) -> Result<Selector, SelectorError> {
    {
        let mut guard = SELECTOR_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        let cache = guard
            .get_or_insert_with(|| LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).unwrap()));
        if let Some(selector) = cache.get(source) {
            return Ok(selector.clone());
        }
    }

    // Parse failures are not cached; they are cheap and callers do not
    // retry bad selectors in a loop.
    let selector = parse(source)?;

    {
        let mut guard = SELECTOR_CACHE.lock().unwrap_or_else(|e| e.into_inner());
        let cache = guard
            .get_or_insert_with(|| LruCache::new(NonZeroUsize::new(CACHE_CAPACITY).unwrap()));
        cache.put(source.to_string(), selector.clone());
    }

    Ok(selector)
}

/// Parse a selector without touching the cache (for tests)
#[allow(dead_code)]
pub fn compile_uncached(source: &str) -> Result<Selector, SelectorError> {
    parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_matches_direct_parse() {
        assert_eq!(compile(".item"), compile_uncached(".item"));
        assert_eq!(compile("#main"), compile_uncached("#main"));
    }

    #[test]
    fn test_repeated_compile_is_stable() {
        let first = compile("[data-id=7]").unwrap();
        let second = compile("[data-id=7]").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_errors_pass_through() {
        assert_eq!(compile(""), Err(SelectorError::Empty));
        assert!(matches!(compile("[x"), Err(SelectorError::Invalid(_))));
    }
}
