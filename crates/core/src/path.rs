//! Key path normalization
//!
//! Callers name keys with dots (`service.web.port`), slashes
//! (`service/web/port`), or opaque identifiers (IPv4 addresses, URIs). The
//! store only understands flat slash-delimited paths, so every operation
//! canonicalizes its key first. Pure, no I/O.
//!
//! Rules, in order:
//! 1. A key containing an IPv4 literal or `://` is opaque: pass through
//!    unchanged.
//! 2. Strip one leading `/`.
//! 3. Replace each `..` with `.` (a single left-to-right pass; `...`
//!    becomes `..`, not `.` - this literal one-level collapse is the
//!    protocol's documented behavior, not general path normalization).
//! 4. Replace every `.` with `/`.

/// Canonicalize a logical key into the store path sent on the wire.
pub fn normalize(key: &str) -> String {
    if key.contains("://") || contains_ipv4_literal(key) {
        return key.to_string();
    }
    let key = key.strip_prefix('/').unwrap_or(key);
    let key = key.replace("..", ".");
    key.replace('.', "/")
}

fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Word-boundary scan for `\d{1,3}(\.\d{1,3}){3}` anywhere in the key.
fn contains_ipv4_literal(key: &str) -> bool {
    let bytes = key.as_bytes();
    for start in 0..bytes.len() {
        if !bytes[start].is_ascii_digit() {
            continue;
        }
        // Word boundary before the first digit
        if start > 0 && is_word(bytes[start - 1]) {
            continue;
        }
        if match_octets(bytes, start, 1) {
            return true;
        }
    }
    false
}

fn match_octets(bytes: &[u8], at: usize, group: u8) -> bool {
    let mut len = 0;
    while len < 3 && at + len < bytes.len() && bytes[at + len].is_ascii_digit() {
        len += 1;
    }
    if len == 0 {
        return false;
    }
    for take in (1..=len).rev() {
        let next = at + take;
        if group == 4 {
            // Word boundary after the last digit
            if next == bytes.len() || !is_word(bytes[next]) {
                return true;
            }
        } else if next < bytes.len() && bytes[next] == b'.' && match_octets(bytes, next + 1, group + 1)
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dotted_key_becomes_path() {
        assert_eq!(normalize("a.b.c"), "a/b/c");
    }

    #[test]
    fn test_leading_slash_stripped() {
        assert_eq!(normalize("/a.b"), "a/b");
        // Only one
        assert_eq!(normalize("//a"), "/a");
    }

    #[test]
    fn test_double_dot_collapses_one_level() {
        // ".." -> "." then "." -> "/"
        assert_eq!(normalize("a..b"), "a/b");
        // "..." collapses to ".." in one pass, then both dots become slashes
        assert_eq!(normalize("a...b"), "a//b");
        assert_eq!(normalize("a....b"), "a//b");
    }

    #[test]
    fn test_slashed_key_unchanged() {
        assert_eq!(normalize("a/b/c"), "a/b/c");
    }

    #[test]
    fn test_ipv4_passes_through() {
        assert_eq!(normalize("10.0.0.1"), "10.0.0.1");
        assert_eq!(normalize("192.168.1.254"), "192.168.1.254");
        // Anywhere in the key
        assert_eq!(normalize("node-10.0.0.1.status"), "node-10.0.0.1.status");
    }

    #[test]
    fn test_uri_passes_through() {
        assert_eq!(
            normalize("http://example.com/a.b"),
            "http://example.com/a.b"
        );
    }

    #[test]
    fn test_not_quite_ipv4_is_normalized() {
        // Four-digit run breaks the octet pattern
        assert_eq!(normalize("1234.1.1.1"), "1234/1/1/1");
        // Only three groups
        assert_eq!(normalize("1.2.3"), "1/2/3");
        // Digit run continues past the last octet
        assert_eq!(normalize("1.2.3.1234"), "1/2/3/1234");
    }

    #[test]
    fn test_ipv4_inside_word_is_not_a_literal() {
        // "x1.2.3.4" - no boundary before the first digit
        assert_eq!(normalize("x1.2.3.4"), "x1/2/3/4");
        // Boundary from a hyphen counts
        assert_eq!(normalize("x-1.2.3.4"), "x-1.2.3.4");
    }

    #[test]
    fn test_already_normalized_is_fixed_point() {
        for key in ["a/b/c", "service/web/port", "a", ""] {
            assert_eq!(normalize(&normalize(key)), normalize(key));
        }
    }

    #[test]
    fn test_collapse_then_normalize_chain() {
        // "a..b" -> "a.b" in one collapse, further normalized to "a/b"
        let once = normalize("a..b");
        assert_eq!(once, "a/b");
        assert_eq!(normalize(&once), once);
    }

    proptest! {
        // Idempotence for every key eligible for normalization. First char
        // constrained to a letter: a leading dot moves to a leading slash,
        // which the next pass strips (inherited protocol behavior).
        #[test]
        fn prop_normalize_idempotent(key in "[a-z]([a-z./_-]{0,30})") {
            prop_assume!(!key.contains("://"));
            let once = normalize(&key);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_normalized_dotted_keys_have_no_dots(key in "[a-z]([a-z.]{0,30}[a-z])?") {
            let once = normalize(&key);
            prop_assert!(!once.contains('.'));
        }
    }
}
