use super::{EntitySimilarity, NameSimilarity};
use crate::normalize::normalize_name;
use crate::{Conference, Organization};

/// Compares entities known by an acronym and a full name.
///
/// The score is the best of the acronym similarity and the name similarity,
/// so `"CIAD"` alone is enough to match two records with differently
/// spelled full names. Used for research organizations and conferences.
#[derive(Debug, Clone, Default)]
pub struct AcronymNameComparator {
    names: NameSimilarity,
}

impl AcronymNameComparator {
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

    pub fn acronym_name_similarity(
        &self,
        acronym1: Option<&str>,
        name1: Option<&str>,
        acronym2: Option<&str>,
        name2: Option<&str>,
    ) -> f64 {
        let acronyms = self.normalized_similarity(acronym1, acronym2);
        if acronyms >= 1.0 {
            return 1.0;
        }
        acronyms.max(self.normalized_similarity(name1, name2))
    }

    pub fn is_similar_acronym_name(
        &self,
        acronym1: Option<&str>,
        name1: Option<&str>,
        acronym2: Option<&str>,
        name2: Option<&str>,
    ) -> bool {
        self.names
            .level()
            .accepts(self.acronym_name_similarity(acronym1, name1, acronym2, name2))
    }

    fn normalized_similarity(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        let a = normalize_name(a);
        let b = normalize_name(b);
        self.names.similarity(a.as_deref(), b.as_deref())
    }
}

impl EntitySimilarity<Organization> for AcronymNameComparator {
    fn similarity(&self, a: &Organization, b: &Organization) -> f64 {
        self.acronym_name_similarity(
            a.acronym.as_deref(),
            a.name.as_deref(),
            b.acronym.as_deref(),
            b.name.as_deref(),
        )
    }
}

impl EntitySimilarity<Conference> for AcronymNameComparator {
    fn similarity(&self, a: &Conference, b: &Conference) -> f64 {
        self.acronym_name_similarity(
            a.acronym.as_deref(),
            a.name.as_deref(),
            b.acronym.as_deref(),
            b.name.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{Metric, SimilarityLevel};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_acronym_match_wins() {
        let comparator = AcronymNameComparator::new();
        let score = comparator.acronym_name_similarity(
            Some("CIAD"),
            Some("Connaissance et Intelligence Artificielle Distribuées"),
            Some("ciad"),
            Some("Knowledge and Distributed AI"),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_name_match_without_acronym_match() {
        let comparator = AcronymNameComparator::new();
        let score = comparator.acronym_name_similarity(
            Some("UTBM"),
            Some("Université de Technologie de Belfort-Montbéliard"),
            Some("BMTU"),
            Some("Universite de technologie de Belfort Montbeliard"),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_unrelated_organizations() {
        let comparator = AcronymNameComparator::new();
        let a = Organization::new(1, "LIRIS", "Image Lab");
        let b = Organization::new(2, "FEMTO", "Physics Dept");
        assert!(!comparator.is_similar(&a, &b, SimilarityLevel::new(0.8)));
    }

    #[test]
    fn test_conferences_share_the_comparator() {
        let comparator = AcronymNameComparator::new();
        let a = Conference::new(1, "AAMAS", "Autonomous Agents and Multiagent Systems");
        let b = Conference::new(2, "AAMAS", "Intl. Conf. on Autonomous Agents");
        assert_eq!(EntitySimilarity::similarity(&comparator, &a, &b), 1.0);
    }

    #[test]
    fn test_missing_acronym_is_neutral() {
        let comparator = AcronymNameComparator::new();
        assert_eq!(
            comparator.acronym_name_similarity(None, Some("A"), Some("B"), Some("C")),
            1.0
        );
    }

    #[rstest]
    #[case(Organization::new(1, "CIAD", "Connaissance et Intelligence Artificielle"))]
    #[case(Organization::new(1, "", "Université de Technologie de Belfort-Montbéliard"))]
    #[case(Organization::new(1, "UTBM", ""))]
    #[case(Organization::new(1, "", ""))]
    fn test_organization_reflexive(#[case] organization: Organization) {
        let comparator = AcronymNameComparator::new();
        assert_eq!(
            EntitySimilarity::similarity(&comparator, &organization, &organization),
            1.0
        );
    }

    #[rstest]
    #[case(Conference::new(1, "AAMAS", "Autonomous Agents and Multiagent Systems"))]
    #[case(Conference::new(1, "", "Engineering Multi-Agent Systems"))]
    #[case(Conference::new(1, "EMAS", ""))]
    fn test_conference_reflexive(#[case] conference: Conference) {
        let comparator = AcronymNameComparator::new();
        assert_eq!(
            EntitySimilarity::similarity(&comparator, &conference, &conference),
            1.0
        );
    }

    #[rstest]
    #[case((Some("CIAD"), Some("Knowledge Lab")), (Some("CIAD-Lab"), Some("Knowledge Laboratory")))]
    #[case((Some("LIRIS"), Some("Image Lab")), (Some("FEMTO"), Some("Physics Dept")))]
    #[case((None, Some("Systems and Transport")), (Some("SeT"), Some("Systèmes et Transports")))]
    #[case((Some("UTBM"), None), (Some("UTMB"), Some("Belfort University")))]
    fn test_acronym_name_symmetric(
        #[case] left: (Option<&str>, Option<&str>),
        #[case] right: (Option<&str>, Option<&str>),
    ) {
        let comparator =
            AcronymNameComparator::new().with_names(NameSimilarity::new(Metric::NormalizedLevenshtein));
        let forward = comparator.acronym_name_similarity(left.0, left.1, right.0, right.1);
        let backward = comparator.acronym_name_similarity(right.0, right.1, left.0, left.1);
        assert!((forward - backward).abs() < 1e-12, "{forward} != {backward}");
    }
}
