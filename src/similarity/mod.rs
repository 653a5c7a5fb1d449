//! Name similarity framework.
//!
//! A [`NameSimilarity`] wraps a raw string metric together with the
//! [`SimilarityLevel`] above which two names are considered the same. The
//! per-entity comparators build on it:
//!
//! - [`PersonNameComparator`] for persons (first and last names, initials, swapped fields)
//! - [`AcronymNameComparator`] for organizations and conferences
//! - [`JournalNameComparator`] for journals, gated by publisher similarity
//! - [`PublicationTitleComparator`] for publication titles
//!
//! Every comparator implements [`EntitySimilarity`] for the entities it
//! understands, which is what the duplicate search consumes.
//!
//! # Conventions
//!
//! - Scores are in `[0, 1]`, `1.0` meaning identical.
//! - Absent or empty data on either side yields `1.0`: missing information
//!   never separates two records.
//! - The threshold is inclusive.
//!
//! # Examples
//!
//! ```
//! use bibmerge::similarity::{Metric, NameSimilarity};
//!
//! let names = NameSimilarity::new(Metric::JaroWinkler).with_similarity_level(0.9);
//! assert_eq!(names.similarity(Some("Galland"), Some("Galland")), 1.0);
//! assert_eq!(names.similarity(None, Some("Galland")), 1.0);
//! assert!(names.is_similar(Some("Galland"), Some("Galand")));
//! ```

mod journal;
mod organization;
mod person;
mod publication;

pub use journal::{JournalNameComparator, PUBLISHER_SIMILARITY_THRESHOLD};
pub use organization::AcronymNameComparator;
pub use person::PersonNameComparator;
pub use publication::PublicationTitleComparator;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default similarity level used by comparators and the duplicate search.
pub const DEFAULT_SIMILARITY_LEVEL: f64 = 0.8;

/// A raw string similarity metric returning a score in `[0, 1]`.
///
/// Implemented by [`Metric`] and by any `Fn(&str, &str) -> f64` closure, so
/// callers may plug in their own algorithm.
pub trait StringSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

impl<F> StringSimilarity for F
where
    F: Fn(&str, &str) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> f64 {
        self(a, b)
    }
}

/// String metrics shipped with the crate, backed by `strsim`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    JaroWinkler,
    Jaro,
    NormalizedLevenshtein,
    SorensenDice,
}

impl Metric {
    /// Convert the metric to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::JaroWinkler => "Jaro-Winkler",
            Metric::Jaro => "Jaro",
            Metric::NormalizedLevenshtein => "Normalized Levenshtein",
            Metric::SorensenDice => "Sorensen-Dice",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StringSimilarity for Metric {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        match self {
            Metric::JaroWinkler => strsim::jaro_winkler(a, b),
            Metric::Jaro => strsim::jaro(a, b),
            Metric::NormalizedLevenshtein => strsim::normalized_levenshtein(a, b),
            Metric::SorensenDice => strsim::sorensen_dice(a, b),
        }
    }
}

/// A similarity threshold, always within `[0, 1]`.
///
/// Out-of-range values are clamped on construction; `NaN` becomes `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SimilarityLevel(f64);

impl SimilarityLevel {
    #[must_use]
    pub fn new(level: f64) -> Self {
        Self(clamp_unit(level))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` if `score` reaches this level (inclusive).
    pub fn accepts(self, score: f64) -> bool {
        score >= self.0
    }
}

impl Default for SimilarityLevel {
    fn default() -> Self {
        Self(DEFAULT_SIMILARITY_LEVEL)
    }
}

impl From<f64> for SimilarityLevel {
    fn from(level: f64) -> Self {
        Self::new(level)
    }
}

impl From<SimilarityLevel> for f64 {
    fn from(level: SimilarityLevel) -> Self {
        level.0
    }
}

impl fmt::Display for SimilarityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A raw string metric paired with a similarity level.
///
/// Cloning is cheap: the metric is shared.
#[derive(Clone)]
pub struct NameSimilarity {
    metric: Arc<dyn StringSimilarity>,
    level: SimilarityLevel,
}

impl NameSimilarity {
    /// Creates a wrapper around `metric` with the default similarity level.
    #[must_use]
    pub fn new(metric: impl StringSimilarity + 'static) -> Self {
        Self {
            metric: Arc::new(metric),
            level: SimilarityLevel::default(),
        }
    }

    /// Builder-style variant of [`set_similarity_level`](Self::set_similarity_level).
    #[must_use]
    pub fn with_similarity_level(mut self, level: f64) -> Self {
        self.level = SimilarityLevel::new(level);
        self
    }

    pub fn similarity_level(&self) -> f64 {
        self.level.value()
    }

    pub fn level(&self) -> SimilarityLevel {
        self.level
    }

    /// Sets the similarity level, clamped to `[0, 1]`, and returns the value
    /// actually stored.
    pub fn set_similarity_level(&mut self, level: f64) -> f64 {
        self.level = SimilarityLevel::new(level);
        self.level.value()
    }

    /// Similarity of two strings in `[0, 1]`.
    ///
    /// Absent or empty input on either side yields `1.0`, as do equal
    /// strings. Otherwise the metric result is clamped to `[0, 1]`.
    pub fn similarity(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        match (a, b) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
                if a == b {
                    1.0
                } else {
                    clamp_unit(self.metric.similarity(a, b))
                }
            }
            _ => 1.0,
        }
    }

    /// Returns `true` if the two strings reach the configured level.
    pub fn is_similar(&self, a: Option<&str>, b: Option<&str>) -> bool {
        self.level.accepts(self.similarity(a, b))
    }
}

impl Default for NameSimilarity {
    fn default() -> Self {
        Self::new(Metric::default())
    }
}

impl fmt::Debug for NameSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameSimilarity")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

/// Scores how likely two entities describe the same real-world thing.
///
/// Implemented by the per-entity comparators and by any
/// `Fn(&T, &T) -> f64` closure.
pub trait EntitySimilarity<T: ?Sized>: Send + Sync {
    /// Similarity score in `[0, 1]`.
    fn similarity(&self, a: &T, b: &T) -> f64;

    /// Returns `true` if the score reaches `level` (inclusive).
    fn is_similar(&self, a: &T, b: &T, level: SimilarityLevel) -> bool {
        level.accepts(self.similarity(a, b))
    }
}

impl<T, F> EntitySimilarity<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> f64 + Send + Sync,
{
    fn similarity(&self, a: &T, b: &T) -> f64 {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(-3.0, 0.0)]
    #[case(1.7, 1.0)]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 1.0)]
    fn test_set_similarity_level_clamps(#[case] input: f64, #[case] expected: f64) {
        let mut names = NameSimilarity::default();
        assert_eq!(names.set_similarity_level(input), expected);
        assert_eq!(names.similarity_level(), expected);
    }

    #[test]
    fn test_default_level() {
        assert_eq!(NameSimilarity::default().similarity_level(), DEFAULT_SIMILARITY_LEVEL);
    }

    #[rstest]
    #[case(None, None)]
    #[case(None, Some("Galland"))]
    #[case(Some(""), Some("Galland"))]
    #[case(Some("Galland"), Some(""))]
    #[case(Some("Galland"), Some("Galland"))]
    fn test_absent_or_equal_is_one(#[case] a: Option<&str>, #[case] b: Option<&str>) {
        let names = NameSimilarity::new(|_: &str, _: &str| 0.0);
        assert_eq!(names.similarity(a, b), 1.0);
    }

    #[test]
    fn test_metric_result_is_clamped() {
        let wild = NameSimilarity::new(|_: &str, _: &str| 4.2);
        assert_eq!(wild.similarity(Some("a"), Some("b")), 1.0);
        let negative = NameSimilarity::new(|_: &str, _: &str| -0.3);
        assert_eq!(negative.similarity(Some("a"), Some("b")), 0.0);
    }

    #[rstest]
    #[case(Metric::JaroWinkler)]
    #[case(Metric::Jaro)]
    #[case(Metric::NormalizedLevenshtein)]
    #[case(Metric::SorensenDice)]
    fn test_metrics_are_bounded(#[case] metric: Metric) {
        let names = NameSimilarity::new(metric);
        let pairs = [("GALLAND", "GALAND"), ("SPRINGER", "ELSEVIER"), ("ABC", "XYZ")];
        for (a, b) in pairs {
            let score = names.similarity(Some(a), Some(b));
            assert!((0.0..=1.0).contains(&score), "{metric} out of range on {a}/{b}");
        }
        assert_eq!(names.similarity(Some("ABC"), Some("XYZ")), 0.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let names = NameSimilarity::new(|_: &str, _: &str| 0.75).with_similarity_level(0.75);
        assert!(names.is_similar(Some("a"), Some("b")));
        let names = names.with_similarity_level(0.76);
        assert!(!names.is_similar(Some("a"), Some("b")));
    }

    #[test]
    fn test_similarity_level_from_f64_clamps() {
        let level = SimilarityLevel::from(2.0);
        assert_eq!(level.value(), 1.0);
        assert!(level.accepts(1.0));
    }

    #[test]
    fn test_closure_entity_similarity() {
        let by_length = |a: &String, b: &String| if a.len() == b.len() { 1.0 } else { 0.0 };
        let level = SimilarityLevel::new(0.5);
        assert!(by_length.is_similar(&"abc".to_string(), &"xyz".to_string(), level));
        assert!(!by_length.is_similar(&"abc".to_string(), &"xy".to_string(), level));
    }
}
