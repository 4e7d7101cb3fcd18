//! Fixed HTML facts shared by the tree parser and the streaming extractor.

/// Elements whose start tag never opens a scope.
const VOID_TAGS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

/// Check whether a tag name (ASCII case-insensitive) is a void element
pub fn is_void_tag(name: &[u8]) -> bool {
    VOID_TAGS.iter().any(|v| name.eq_ignore_ascii_case(v))
}

/// ASCII whitespace per the tokenizer contract: space, tab, LF, CR, FF
#[inline]
pub fn is_ascii_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// Trim ASCII whitespace from both ends of a byte slice
pub fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&b| !is_ascii_whitespace(b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|&b| !is_ascii_whitespace(b))
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_tags() {
        assert!(is_void_tag(b"br"));
        assert!(is_void_tag(b"IMG"));
        assert!(is_void_tag(b"Input"));
        assert!(!is_void_tag(b"div"));
        assert!(!is_void_tag(b"b"));
    }

    #[test]
    fn test_trim_ascii() {
        assert_eq!(trim_ascii(b"  hi\t\n"), b"hi");
        assert_eq!(trim_ascii(b"\x0c"), b"");
        assert_eq!(trim_ascii(b""), b"");
        assert_eq!(trim_ascii(b"x"), b"x");
    }
}
