//! Property-based tests for account path normalization and algebra.

use proptest::prelude::*;

use super::path::{AccountPath, DEFAULT_MAX_DEPTH};

/// Strategy for a single raw segment with stray whitespace.
fn raw_segment() -> impl Strategy<Value = String> {
    "[ ]{0,2}[A-Za-zÄÖÜäöüß]{1,8}( [A-Za-z]{1,5})?[ ]{0,2}"
}

/// Strategy for raw path input with sloppy separators.
fn raw_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(raw_segment(), 1..=DEFAULT_MAX_DEPTH),
        prop_oneof![Just(":"), Just(" : "), Just("::"), Just(" :: ")],
    )
        .prop_map(|(segments, sep)| segments.join(sep))
}

/// Strategy for arbitrary text, including empty segments and odd spacing.
fn any_text() -> impl Strategy<Value = String> {
    "[a-c :\t]{0,20}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// normalize(normalize(x)) == normalize(x)
    #[test]
    fn prop_normalize_idempotent(raw in any_text()) {
        let once = AccountPath::normalize(&raw);
        let twice = AccountPath::normalize(&once.to_string());
        prop_assert_eq!(once, twice);
    }

    /// Normalized paths never contain empty or padded segments.
    #[test]
    fn prop_segments_are_trimmed_and_non_empty(raw in any_text()) {
        let path = AccountPath::normalize(&raw);
        for segment in path.segments() {
            prop_assert!(!segment.is_empty());
            prop_assert_eq!(segment.trim(), segment.as_str());
        }
    }

    /// parent(join(parent(p), leaf(p))) == parent(p) for non-root paths.
    #[test]
    fn prop_parent_join_leaf_roundtrip(raw in raw_path()) {
        let path = AccountPath::normalize(&raw);
        prop_assume!(path.depth() >= 2);
        let parent = path.parent().unwrap();
        let leaf = AccountPath::normalize(path.leaf().unwrap());
        let rebuilt = AccountPath::join(&parent, &leaf);
        prop_assert_eq!(&rebuilt, &path);
        prop_assert_eq!(rebuilt.parent(), Some(parent));
    }

    /// ancestor?(a, b) == descendant?(b, a) for all a != b.
    #[test]
    fn prop_ancestor_descendant_inverse(a in raw_path(), b in raw_path()) {
        let a = AccountPath::normalize(&a);
        let b = AccountPath::normalize(&b);
        prop_assume!(a != b);
        prop_assert_eq!(a.is_ancestor_of(&b), b.is_descendant_of(&a));
    }

    /// Every proper ancestor of a path is recognised as its ancestor.
    #[test]
    fn prop_ancestors_are_ancestors(raw in raw_path()) {
        let path = AccountPath::normalize(&raw);
        let ancestors = path.ancestors();
        prop_assert_eq!(ancestors.len(), path.depth());
        prop_assert_eq!(ancestors.last(), Some(&path));
        for ancestor in path.ancestors_without_self() {
            prop_assert!(ancestor.is_ancestor_of(&path));
            prop_assert!(path.is_descendant_of(&ancestor));
        }
    }

    /// Sibling relation is symmetric and irreflexive.
    #[test]
    fn prop_sibling_symmetric(a in raw_path(), b in raw_path()) {
        let a = AccountPath::normalize(&a);
        let b = AccountPath::normalize(&b);
        prop_assert_eq!(a.is_sibling_of(&b), b.is_sibling_of(&a));
        prop_assert!(!a.is_sibling_of(&a));
    }
}
