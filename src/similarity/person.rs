use super::{EntitySimilarity, NameSimilarity};
use crate::Person;
use crate::normalize::{expand, is_short_name};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Compares persons by first and last name.
///
/// Both names are expanded into their normalized spellings, initials
/// included when any of the four inputs is itself only initials, so that
/// `"J.-P. Dupont"` matches `"Jean-Pierre Dupont"`. Two hypotheses are
/// scored and the best one wins:
///
/// 1. first names against first names, last names against last names;
/// 2. first names against last names (fields swapped at data entry).
///
/// The mirrored form of the second hypothesis gives the same score because
/// set matching is symmetric, so it is not computed separately.
///
/// # Examples
///
/// ```
/// use bibmerge::similarity::PersonNameComparator;
///
/// let comparator = PersonNameComparator::new();
/// let score = comparator.name_similarity(
///     Some("S."),
///     Some("Galland"),
///     Some("Stéphane"),
///     Some("Galland"),
/// );
/// assert_eq!(score, 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PersonNameComparator {
    names: NameSimilarity,
}

impl PersonNameComparator {
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

    /// Similarity of two persons given by their first and last names.
    pub fn name_similarity(
        &self,
        first_name1: Option<&str>,
        last_name1: Option<&str>,
        first_name2: Option<&str>,
        last_name2: Option<&str>,
    ) -> f64 {
        let enable_short_forms = [first_name1, last_name1, first_name2, last_name2]
            .into_iter()
            .any(is_short_name);

        let first1 = expand(first_name1, enable_short_forms);
        let last1 = expand(last_name1, enable_short_forms);
        let first2 = expand(first_name2, enable_short_forms);
        let last2 = expand(last_name2, enable_short_forms);

        let straight = self.hypothesis(&first1, &first2, &last1, &last2);
        if straight >= 1.0 {
            return 1.0;
        }
        let swapped = self.hypothesis(&first1, &last2, &last1, &first2);
        straight.max(swapped)
    }

    /// Returns `true` if the two persons reach the configured level.
    pub fn is_similar_name(
        &self,
        first_name1: Option<&str>,
        last_name1: Option<&str>,
        first_name2: Option<&str>,
        last_name2: Option<&str>,
    ) -> bool {
        self.names.level().accepts(self.name_similarity(
            first_name1,
            last_name1,
            first_name2,
            last_name2,
        ))
    }

    fn hypothesis(
        &self,
        first_role1: &BTreeSet<String>,
        first_role2: &BTreeSet<String>,
        last_role1: &BTreeSet<String>,
        last_role2: &BTreeSet<String>,
    ) -> f64 {
        let first = self.set_similarity(first_role1, first_role2);
        let last = self.set_similarity(last_role1, last_role2);
        (first + last) / 2.0
    }

    /// Greedy one-to-one matching between two spelling sets.
    ///
    /// The smaller set drives (the lexicographically smaller one on equal
    /// sizes), each of its spellings consuming the best unused spelling of
    /// the other set. The score is the mean of the matched pairs.
    fn set_similarity(&self, a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 1.0;
        }
        let (driver, other) = match a.len().cmp(&b.len()).then_with(|| a.cmp(b)) {
            Ordering::Greater => (b, a),
            _ => (a, b),
        };

        let mut unused: Vec<&str> = other.iter().map(String::as_str).collect();
        let mut total = 0.0;
        for name in driver {
            if let Some(position) = unused.iter().position(|candidate| *candidate == name.as_str()) {
                unused.remove(position);
                total += 1.0;
                continue;
            }
            let best = unused
                .iter()
                .enumerate()
                .map(|(position, candidate)| {
                    (position, self.names.similarity(Some(name), Some(candidate)))
                })
                .fold(None, |best: Option<(usize, f64)>, current| match best {
                    Some((_, score)) if score >= current.1 => best,
                    _ => Some(current),
                });
            if let Some((position, score)) = best {
                unused.remove(position);
                total += score;
            }
        }
        total / driver.len() as f64
    }
}

impl EntitySimilarity<Person> for PersonNameComparator {
    fn similarity(&self, a: &Person, b: &Person) -> f64 {
        self.name_similarity(
            a.first_name.as_deref(),
            a.last_name.as_deref(),
            b.first_name.as_deref(),
            b.last_name.as_deref(),
        )
    }
}
