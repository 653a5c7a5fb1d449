use super::{EntitySimilarity, NameSimilarity};
use crate::Publication;
use crate::utils::normalize_text;

/// Compares publications by title.
///
/// Titles are lower-cased, stripped of accents and punctuation before the
/// metric runs, so `"Multi-Agent Systems: A Survey."` and
/// `"Multi agent systems - a survey"` are identical.
#[derive(Debug, Clone, Default)]
pub struct PublicationTitleComparator {
    names: NameSimilarity,
}

impl PublicationTitleComparator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_names(mut self, names: NameSimilarity) -> Self {
        self.names = names;
        self
    }

    pub fn similarity_level(&self) -> f64 {
        self.names.similarity_level()
    }

    pub fn set_similarity_level(&mut self, level: f64) -> f64 {
        self.names.set_similarity_level(level)
    }

    pub fn title_similarity(&self, title1: Option<&str>, title2: Option<&str>) -> f64 {
        let title1 = title1.and_then(normalize_text);
        let title2 = title2.and_then(normalize_text);
        self.names.similarity(title1.as_deref(), title2.as_deref())
    }
}

impl EntitySimilarity<Publication> for PublicationTitleComparator {
    fn similarity(&self, a: &Publication, b: &Publication) -> f64 {
        self.title_similarity(a.title.as_deref(), b.title.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_punctuation_and_case_are_ignored() {
        let comparator = PublicationTitleComparator::new();
        assert_eq!(
            comparator.title_similarity(
                Some("Multi-Agent Systems: A Survey."),
                Some("multi agent systems - a survey")
            ),
            1.0
        );
    }

    #[test]
    fn test_distinct_titles() {
        let comparator = PublicationTitleComparator::new();
        let score = comparator.title_similarity(
            Some("Traffic simulation with agents"),
            Some("Quantum error correction codes"),
        );
        assert!(score < 0.8, "score was {score}");
    }

    #[rstest]
    #[case(Publication::new(1, "Multi-Agent Systems: A Survey.", 2020))]
    #[case(Publication::new(1, "Holonic multiagent systems", 2021).with_doi("10.1/h"))]
    #[case(Publication::new(1, "Ça marche ? Évaluation", 2019))]
    #[case(Publication::new(1, "", 2019))]
    fn test_reflexive(#[case] publication: Publication) {
        let comparator = PublicationTitleComparator::new();
        assert_eq!(
            EntitySimilarity::similarity(&comparator, &publication, &publication),
            1.0
        );
    }
}
