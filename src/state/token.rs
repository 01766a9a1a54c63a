//! Token normalization
//!
//! Tokens are dot separated paths such as `order pizza . size`. Every state
//! operation normalizes its token first: each segment is trimmed, upper-cased
//! and has internal whitespace runs collapsed into a single `_`, giving
//! `ORDER_PIZZA.SIZE`.

use std::sync::OnceLock;

use regex::Regex;

/// Segment separator inside a token
pub const SEPARATOR: char = '.';

/// Zero width no-break space; counted as whitespace when trimming tokens
const BYTE_ORDER_MARK: char = '\u{feff}';

fn whitespace_run() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"[\s\x{FEFF}]+").expect("static regex"))
}

fn is_token_whitespace(c: char) -> bool {
    c.is_whitespace() || c == BYTE_ORDER_MARK
}

fn normalize_segment(segment: &str) -> String {
    let upper = segment.trim_matches(is_token_whitespace).to_uppercase();
    whitespace_run().replace_all(&upper, "_").into_owned()
}

/// Normalize a raw token into its canonical form.
///
/// Empty input yields the single empty segment `""`. Empty segments in the
/// middle of a token are kept, so `"a..b"` becomes `"A..B"`.
pub fn normalize(token: &str) -> String {
    token
        .split(SEPARATOR)
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join(".")
}

/// Normalize an optional token; a missing token normalizes to `""`.
pub fn normalize_opt(token: Option<&str>) -> String {
    token.map(normalize).unwrap_or_default()
}

/// Canonical segments of a token, or `None` for a degenerate token.
pub fn segments(token: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = token.split(SEPARATOR).map(normalize_segment).collect();
    match parts.as_slice() {
        [only] if only.is_empty() => None,
        _ => Some(parts),
    }
}

/// True when the token normalizes to nothing (`""`, `"   "`).
pub fn is_degenerate(token: &str) -> bool {
    segments(token).is_none()
}

/// True when `child` equals `parent` or lies below it in the token hierarchy.
///
/// Both tokens are normalized first, so
/// `is_child_token("PARENT.OF.THIS", "parent . of . this . child")` holds.
pub fn is_child_token(parent: &str, child: &str) -> bool {
    is_child_token_with(parent, child, true, true)
}

/// Variant of [`is_child_token`] that can skip normalizing tokens the caller
/// already holds in canonical form.
pub fn is_child_token_with(
    parent: &str,
    child: &str,
    normalize_parent: bool,
    normalize_child: bool,
) -> bool {
    let parent = if normalize_parent { normalize(parent) } else { parent.to_string() };
    let child = if normalize_child { normalize(child) } else { child.to_string() };

    if parent == child {
        return true;
    }

    match child.strip_prefix(parent.as_str()) {
        Some(rest) => rest.starts_with(SEPARATOR),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_example() {
        assert_eq!(normalize(" asdf . adf f adfafa . asd"), "ASDF.ADF_F_ADFAFA.ASD");
    }

    #[test]
    fn test_normalize_collapses_whitespace_runs() {
        assert_eq!(normalize("buy \t  some\nfood"), "BUY_SOME_FOOD");
        assert_eq!(normalize("already_CANON"), "ALREADY_CANON");
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert_eq!(normalize("\u{feff}a"), "A");
        assert_eq!(normalize("buy\u{feff}food . \u{feff}"), "BUY_FOOD.");
        assert!(is_degenerate("\u{feff} "));
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some(" x ")), "X");
    }

    #[test]
    fn test_inner_empty_segments_are_kept() {
        assert_eq!(normalize("a..b"), "A..B");
        assert_eq!(segments("a. .b"), Some(vec!["A".to_string(), String::new(), "B".to_string()]));
        assert_eq!(normalize("."), ".");
    }

    #[test]
    fn test_degenerate() {
        assert!(is_degenerate(""));
        assert!(is_degenerate(" \t "));
        assert!(!is_degenerate("."));
        assert!(!is_degenerate("a"));
        assert_eq!(segments("  "), None);
    }

    #[test]
    fn test_is_child_token() {
        assert!(is_child_token("PARENT.OF.THIS", "parent . of . this . child"));
        assert!(is_child_token("parent", "PARENT"));
        assert!(!is_child_token("PARENT.OF", "PARENT.OFTEN"));
        assert!(!is_child_token("PARENT.OF.THIS", "PARENT.OF"));
    }

    #[test]
    fn test_is_child_token_without_normalization() {
        assert!(!is_child_token_with("parent", "PARENT.CHILD", false, true));
        assert!(is_child_token_with("PARENT", "parent.child", false, true));
        assert!(!is_child_token_with("PARENT", "parent.child", true, false));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "\\PC{0,40}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn prop_token_is_child_of_itself(raw in "[a-z .]{0,20}") {
            prop_assert!(is_child_token(&raw, &raw));
        }
    }
}
