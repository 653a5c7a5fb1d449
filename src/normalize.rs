//! Name normalization and short-form expansion.
//!
//! Every comparator works on normalized names: upper-case ASCII words
//! separated by single spaces, with hyphens and abbreviation dots turned into
//! word breaks. `"  j.-p. Éyz "` normalizes to `"J P EYZ"`.
//!
//! # Examples
//!
//! ```
//! use bibmerge::normalize::{expand, is_short_name, normalize_name};
//!
//! assert_eq!(normalize_name(Some(" a. éyZ ")), Some("A EYZ".to_string()));
//! assert!(is_short_name(Some("J.-P.")));
//!
//! let forms = expand(Some("First Second"), true);
//! assert!(forms.contains("F S"));
//! assert!(forms.contains("FIRST S"));
//! ```

use crate::regex::Regex;
use compact_str::{CompactString, ToCompactString};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").unwrap());

static ABBREVIATION_DOT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S)\.").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalizes a name for comparison.
///
/// Returns `None` for absent or blank input, and for input that has nothing
/// left once accents and non-ASCII characters are stripped.
pub fn normalize_name(name: Option<&str>) -> Option<String> {
    let trimmed = name?.trim();
    if trimmed.is_empty() {
        return None;
    }

    let spaced = HYPHEN_REGEX.replace_all(trimmed, " ");
    let spaced = ABBREVIATION_DOT_REGEX.replace_all(&spaced, "${1} ");
    let spaced = WHITESPACE_REGEX.replace_all(&spaced, " ");

    let ascii: String = spaced
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    // Stripping may leave doubled or dangling spaces behind.
    let normalized = ascii.split_whitespace().join(" ");
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Returns `true` if every word of the normalized name is at most one letter
/// long, e.g. `"J. P."` or `"S"`.
pub fn is_short_name(name: Option<&str>) -> bool {
    normalize_name(name).is_some_and(|normalized| normalized.split(' ').all(|word| word.len() <= 1))
}

/// Expands a name into the set of its normalized spellings.
///
/// Without short forms the set only holds the normalized name. With short
/// forms, each word (the first one included) may independently be replaced
/// by its initial: `"First Second"` expands to `FIRST SECOND`, `FIRST S`,
/// `F SECOND` and `F S`. Absent or blank names expand to the empty set.
pub fn expand(name: Option<&str>, enable_short_forms: bool) -> BTreeSet<String> {
    let Some(normalized) = normalize_name(name) else {
        return BTreeSet::new();
    };
    if !enable_short_forms {
        return BTreeSet::from([normalized]);
    }

    normalized
        .split(' ')
        .map(word_variants)
        .multi_cartesian_product()
        .map(|words| words.iter().join(" "))
        .collect()
}

/// Like [`expand`], but also yields every shortened name that keeps the
/// first word and drops any of the following ones.
///
/// `"First Second Third"` yields among others `FIRST`, `FIRST THIRD`,
/// `F SECOND` and `F S T`. Useful when a source abbreviates a person to their
/// first given name only.
pub fn expand_progressive(name: Option<&str>, enable_short_forms: bool) -> BTreeSet<String> {
    let Some(normalized) = normalize_name(name) else {
        return BTreeSet::new();
    };
    let words: Vec<&str> = normalized.split(' ').collect();
    let Some((head, tail)) = words.split_first() else {
        return BTreeSet::new();
    };

    let mut forms = BTreeSet::new();
    for kept in tail.iter().copied().powerset() {
        let mut sequence = std::iter::once(*head).chain(kept);
        if enable_short_forms {
            forms.extend(
                sequence
                    .map(word_variants)
                    .multi_cartesian_product()
                    .map(|words| words.iter().join(" ")),
            );
        } else {
            forms.insert(sequence.join(" "));
        }
    }
    forms
}

/// The word itself and, for words longer than one letter, its initial.
fn word_variants(word: &str) -> Vec<CompactString> {
    let mut variants = vec![word.to_compact_string()];
    let mut chars = word.chars();
    if let (Some(initial), Some(_)) = (chars.next(), chars.next()) {
        variants.push(initial.to_compact_string());
    }
    variants
}
