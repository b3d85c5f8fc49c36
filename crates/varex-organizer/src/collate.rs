//! Locale-aware ordering for variable names.
//!
//! Names are compared with the Unicode Collation Algorithm using the CLDR
//! root tailoring, the host's default locale order. Punctuation and spaces
//! are non-ignorable: they sort before digits, digits before letters, and
//! `_` before `-`. Accents and case only break ties, lowercase first.

use std::cmp::Ordering;

use feruca::{Collator, Locale, Tailoring};

/// A reusable collator for sorting many names.
pub struct NameCollator {
    inner: Collator,
}

impl NameCollator {
    pub fn new() -> Self {
        Self {
            // Root tailoring, punctuation not shifted, byte order as last tiebreak.
            inner: Collator::new(Tailoring::Cldr(Locale::Root), false, true),
        }
    }

    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        self.inner.collate(&a, &b)
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two names for display ordering.
pub fn compare(a: &str, b: &str) -> Ordering {
    NameCollator::new().compare(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut collator = NameCollator::new();
        let mut names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        names.sort_by(|a, b| collator.compare(a, b));
        names
    }

    #[test]
    fn test_case_insensitive_primary() {
        assert_eq!(sorted(&["banana", "Apple", "cherry"]), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_lowercase_before_uppercase() {
        assert_eq!(compare("a", "A"), Ordering::Less);
        assert_eq!(sorted(&["Item", "item"]), vec!["item", "Item"]);
    }

    #[test]
    fn test_accents_secondary() {
        assert_eq!(sorted(&["f", "é", "e"]), vec!["e", "é", "f"]);
        assert_eq!(compare("résumé", "resume"), Ordering::Greater);
        assert_eq!(compare("résumé", "resumf"), Ordering::Less);
    }

    #[test]
    fn test_punctuation_before_digits_before_letters() {
        assert_eq!(sorted(&["a", "1", "-", "_"]), vec!["_", "-", "1", "a"]);
        assert_eq!(compare("color_b", "colorb"), Ordering::Less);
    }

    #[test]
    fn test_separator_order() {
        assert_eq!(
            sorted(&["color-b", "color_b", "color/b", "color.b", "color b"]),
            vec!["color b", "color_b", "color-b", "color.b", "color/b"]
        );
        assert_eq!(sorted(&["space-lg", "space_md"]), vec!["space_md", "space-lg"]);
    }

    #[test]
    fn test_accents_beyond_latin_1() {
        // Latin Extended-B and combining marks fold to their base letter.
        assert_eq!(sorted(&["b", "ǎ", "a"]), vec!["a", "ǎ", "b"]);
        assert_eq!(compare("e\u{301}", "f"), Ordering::Less);
    }

    #[test]
    fn test_digits_compare_by_character() {
        assert_eq!(sorted(&["item-2", "item-10"]), vec!["item-10", "item-2"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare("color", "color/primary"), Ordering::Less);
        assert_eq!(compare("same", "same"), Ordering::Equal);
    }
}
