// ABOUTME: Fuzzy item-name matching - case-insensitive substring containment either way
// ABOUTME: Deliberately loose; isolated here so its reach is visible and testable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! The one fuzzy name-matching rule used for ingredient/inventory
//! reconciliation.
//!
//! Two names are considered equivalent when either is a substring of the
//! other, ignoring case and surrounding whitespace. The looseness is
//! intentional ("2 cups rice" should reconcile with the "Rice" inventory
//! record) and it does produce false positives ("rice" matches
//! "wild rice mix"); keeping the rule in a single named function is what
//! makes that trade-off auditable.

/// True when `a` and `b` refer to the same item under the containment rule.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

/// True when any name in `known` matches `candidate`.
#[must_use]
pub fn matches_any<'a, I>(candidate: &str, known: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    known.into_iter().any(|name| names_match(candidate, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_case_insensitive() {
        assert!(names_match("Rice", "rice"));
        assert!(names_match("  Milk ", "milk"));
    }

    #[test]
    fn containment_works_both_ways() {
        assert!(names_match("cups rice", "Rice"));
        assert!(names_match("Rice", "wild rice mix"));
    }

    #[test]
    fn disjoint_names_do_not_match() {
        assert!(!names_match("saffron", "Rice"));
    }

    #[test]
    fn empty_names_never_match() {
        assert!(!names_match("", "rice"));
        assert!(!names_match("   ", "rice"));
        assert!(!names_match("", ""));
    }

    #[test]
    fn matches_any_scans_the_whole_set() {
        let known = ["milk", "eggs", "rice"];
        assert!(matches_any("2 cups rice", known));
        assert!(!matches_any("saffron", known));
    }
}
