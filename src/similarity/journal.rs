use super::{EntitySimilarity, NameSimilarity};
use crate::Journal;
use crate::normalize::normalize_name;

/// Publisher similarity a journal pair must exceed before names are compared.
pub const PUBLISHER_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Compares journals by name, gated by publisher.
///
/// Many journals from different publishers share near-identical names
/// ("Journal of Systems and Software" against "Journal of Software and
/// Systems"), so names are only compared when the publishers match or one of
/// them is unknown. Otherwise the score is `0.0`.
///
/// # Examples
///
/// ```
/// use bibmerge::similarity::JournalNameComparator;
///
/// let comparator = JournalNameComparator::new();
/// let gated = comparator.journal_similarity(
///     Some("Pattern Recognition"),
///     Some("Springer"),
///     Some("Pattern Recognition"),
///     Some("Elsevier"),
/// );
/// assert_eq!(gated, 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JournalNameComparator {
    names: NameSimilarity,
}

impl JournalNameComparator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_names(mut self, names: NameSimilarity) -> Self {
        self.names = names;
        self
    }

    pub fn names(&self) -> &NameSimilarity {
        &self.names
    }

    pub fn similarity_level(&self) -> f64 {
        self.names.similarity_level()
    }

    pub fn set_similarity_level(&mut self, level: f64) -> f64 {
        self.names.set_similarity_level(level)
    }

    pub fn journal_similarity(
        &self,
        name1: Option<&str>,
        publisher1: Option<&str>,
        name2: Option<&str>,
        publisher2: Option<&str>,
    ) -> f64 {
        let publisher1 = normalize_name(publisher1);
        let publisher2 = normalize_name(publisher2);
        let publisher_unknown = publisher1.is_none() || publisher2.is_none();
        if !publisher_unknown {
            let publishers = self
                .names
                .similarity(publisher1.as_deref(), publisher2.as_deref());
            if publishers <= PUBLISHER_SIMILARITY_THRESHOLD {
                return 0.0;
            }
        }
        let name1 = normalize_name(name1);
        let name2 = normalize_name(name2);
        self.names.similarity(name1.as_deref(), name2.as_deref())
    }

    pub fn is_similar_journal(
        &self,
        name1: Option<&str>,
        publisher1: Option<&str>,
        name2: Option<&str>,
        publisher2: Option<&str>,
    ) -> bool {
        self.names
            .level()
            .accepts(self.journal_similarity(name1, publisher1, name2, publisher2))
    }
}

impl EntitySimilarity<Journal> for JournalNameComparator {
    fn similarity(&self, a: &Journal, b: &Journal) -> f64 {
        self.journal_similarity(
            a.name.as_deref(),
            a.publisher.as_deref(),
            b.name.as_deref(),
            b.publisher.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::Metric;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(Some("Springer"), Some("springer"))]
    #[case(Some("Springer"), None)]
    #[case(None, Some("Elsevier"))]
    #[case(Some(""), Some("Elsevier"))]
    #[case(Some("Springer Nature"), Some("Springer-Nature"))]
    fn test_publishers_open_the_gate(
        #[case] publisher1: Option<&str>,
        #[case] publisher2: Option<&str>,
    ) {
        let comparator = JournalNameComparator::new();
        assert_eq!(
            comparator.journal_similarity(
                Some("Autonomous Agents and Multi-Agent Systems"),
                publisher1,
                Some("Autonomous agents and multi agent systems"),
                publisher2,
            ),
            1.0
        );
    }

    #[test]
    fn test_different_publishers_close_the_gate() {
        let comparator = JournalNameComparator::new();
        assert_eq!(
            comparator.journal_similarity(
                Some("Journal X"),
                Some("SpringerX"),
                Some("Journal X"),
                Some("ElsevierY"),
            ),
            0.0
        );
    }

    #[test]
    fn test_names_still_compared_behind_open_gate() {
        let comparator = JournalNameComparator::new();
        let score = comparator.journal_similarity(
            Some("Pattern Recognition"),
            Some("Elsevier"),
            Some("Neurocomputing"),
            Some("Elsevier"),
        );
        assert!(score < 0.8, "score was {score}");
    }

    #[rstest]
    #[case(Journal::new(1, "Pattern Recognition", "Elsevier"))]
    #[case(Journal::new(1, "Autonomous Agents and Multi-Agent Systems", ""))]
    #[case(Journal::new(1, "", "Springer"))]
    #[case(Journal::new(1, "", ""))]
    fn test_reflexive(#[case] journal: Journal) {
        let comparator = JournalNameComparator::new();
        assert_eq!(EntitySimilarity::similarity(&comparator, &journal, &journal), 1.0);
    }

    #[rstest]
    #[case(("Pattern Recognition", "Elsevier"), ("Pattern Recognition Letters", "Elsevier"))]
    #[case(("Journal X", "Springer"), ("Journal of X", "Springer Nature"))]
    #[case(("Neurocomputing", "Elsevier"), ("Neural Computing", ""))]
    #[case(("Journal X", "SpringerX"), ("Journal X", "ElsevierY"))]
    fn test_symmetric(#[case] left: (&str, &str), #[case] right: (&str, &str)) {
        let comparator =
            JournalNameComparator::new().with_names(NameSimilarity::new(Metric::NormalizedLevenshtein));
        let forward =
            comparator.journal_similarity(Some(left.0), Some(left.1), Some(right.0), Some(right.1));
        let backward =
            comparator.journal_similarity(Some(right.0), Some(right.1), Some(left.0), Some(left.1));
        assert!((forward - backward).abs() < 1e-12, "{forward} != {backward}");
    }

    /// The gate needs a publisher score strictly above the threshold.
    #[rstest]
    #[case(PUBLISHER_SIMILARITY_THRESHOLD, 0.0)]
    #[case(0.81, 1.0)]
    fn test_publisher_score_at_the_threshold(#[case] publisher_score: f64, #[case] expected: f64) {
        // Distinct strings score `publisher_score`, equal ones 1.0.
        let comparator = JournalNameComparator::new()
            .with_names(NameSimilarity::new(move |_: &str, _: &str| publisher_score));
        let forward = comparator.journal_similarity(
            Some("Journal X"),
            Some("Springer"),
            Some("Journal X"),
            Some("Elsevier"),
        );
        let backward = comparator.journal_similarity(
            Some("Journal X"),
            Some("Elsevier"),
            Some("Journal X"),
            Some("Springer"),
        );
        assert_eq!(forward, expected);
        assert_eq!(backward, expected);
    }
}
