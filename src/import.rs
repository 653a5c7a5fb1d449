//! Import-time duplicate flag.
//!
//! Unlike the fuzzy comparators, the import check compares normalized fields
//! for exact equality. A freshly parsed publication is a duplicate of a
//! stored one when they agree on every field both of them carry: year,
//! title, DOI, ISSN and publication target. A field missing on either side
//! is ignored. The first matching stored publication wins.
//!
//! # Examples
//!
//! ```
//! use bibmerge::import::{ImportFlagger, ImportStatus};
//! use bibmerge::Publication;
//!
//! let stored = vec![Publication::new(7, "X", 2020).with_doi("10.1/x")];
//! let flagger = ImportFlagger::new(&stored);
//!
//! let same = Publication::new(0, "X", 2020).with_doi("https://doi.org/10.1/X");
//! assert_eq!(flagger.flag(&same), ImportStatus::Duplicate { of: 7 });
//!
//! let other = Publication::new(0, "X", 2020).with_doi("10.1/y");
//! assert!(flagger.flag(&other).is_importable());
//! ```

use crate::utils::{format_doi, format_issn, normalize_text};
use crate::{EntityId, Publication};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of the import check for one parsed publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportStatus {
    Importable,
    /// Already stored under the given identity.
    Duplicate { of: EntityId },
}

impl ImportStatus {
    pub fn is_importable(&self) -> bool {
        matches!(self, ImportStatus::Importable)
    }

    pub fn duplicate_of(&self) -> Option<EntityId> {
        match self {
            ImportStatus::Importable => None,
            ImportStatus::Duplicate { of } => Some(*of),
        }
    }
}

/// Flags `candidate` against stored publications, usually the ones sharing
/// its title.
///
/// Returns [`ImportStatus::Duplicate`] with the identity of the first stored
/// publication agreeing on every field populated on both sides, or
/// [`ImportStatus::Importable`] if there is none.
pub fn flag_if_duplicate<'a>(
    candidate: &Publication,
    existing: impl IntoIterator<Item = &'a Publication>,
) -> ImportStatus {
    let key = ImportKey::from(candidate);
    existing
        .into_iter()
        .find(|stored| key.matches(&ImportKey::from(*stored)))
        .map_or(ImportStatus::Importable, |stored| ImportStatus::Duplicate {
            of: stored.id,
        })
}

/// Normalized fields compared by the import check.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImportKey {
    year: Option<i32>,
    title: Option<String>,
    doi: Option<String>,
    issn: Option<String>,
    target: Option<String>,
}

impl From<&Publication> for ImportKey {
    fn from(publication: &Publication) -> Self {
        Self {
            year: publication.year,
            title: publication.title.as_deref().and_then(normalize_text),
            doi: publication
                .doi
                .as_deref()
                .and_then(|doi| format_doi(doi).or_else(|| normalize_text(doi))),
            issn: publication
                .issn
                .as_deref()
                .and_then(|issn| format_issn(issn).or_else(|| normalize_text(issn))),
            target: publication.target.as_deref().and_then(normalize_text),
        }
    }
}

impl ImportKey {
    fn matches(&self, other: &ImportKey) -> bool {
        agree(&self.year, &other.year)
            && agree(&self.title, &other.title)
            && agree(&self.doi, &other.doi)
            && agree(&self.issn, &other.issn)
            && agree(&self.target, &other.target)
    }
}

fn agree<T: PartialEq>(a: &Option<T>, b: &Option<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Flags parsed publications against an indexed set of stored ones.
///
/// Stored publications are indexed by normalized title, so each candidate is
/// only compared with the publications sharing its title and with untitled
/// ones. An untitled candidate is compared with everything.
#[derive(Debug)]
pub struct ImportFlagger<'a> {
    stored: Vec<(&'a Publication, ImportKey)>,
    by_title: HashMap<String, Vec<usize>>,
    untitled: Vec<usize>,
    run_in_parallel: bool,
}

impl<'a> ImportFlagger<'a> {
    #[must_use]
    pub fn new(stored: &'a [Publication]) -> Self {
        let stored: Vec<_> = stored
            .iter()
            .map(|publication| (publication, ImportKey::from(publication)))
            .collect();

        let mut by_title: HashMap<String, Vec<usize>> = HashMap::new();
        let mut untitled = Vec::new();
        for (index, (_, key)) in stored.iter().enumerate() {
            match &key.title {
                Some(title) => by_title.entry(title.clone()).or_default().push(index),
                None => untitled.push(index),
            }
        }

        Self {
            stored,
            by_title,
            untitled,
            run_in_parallel: false,
        }
    }

    /// Flags batches with rayon. Requires the `parallel` feature, ignored
    /// otherwise.
    #[must_use]
    pub fn with_parallelism(mut self, run_in_parallel: bool) -> Self {
        self.run_in_parallel = run_in_parallel;
        self
    }

    pub fn flag(&self, candidate: &Publication) -> ImportStatus {
        let key = ImportKey::from(candidate);
        let found = match &key.title {
            Some(title) => {
                let same_title = self.by_title.get(title).map_or(&[][..], Vec::as_slice);
                // Both lists are in storage order, so the merge keeps
                // "first stored match wins".
                same_title
                    .iter()
                    .merge(self.untitled.iter())
                    .map(|index| &self.stored[*index])
                    .find(|(_, stored)| key.matches(stored))
            }
            None => self.stored.iter().find(|(_, stored)| key.matches(stored)),
        };

        match found {
            Some((publication, _)) => {
                debug!(duplicate_of = publication.id, "parsed publication already stored");
                ImportStatus::Duplicate { of: publication.id }
            }
            None => ImportStatus::Importable,
        }
    }

    /// Flags a whole parsed batch, in input order.
    pub fn flag_all(&self, candidates: &[Publication]) -> Vec<ImportStatus> {
        let statuses: Vec<ImportStatus> = self.flag_batch(candidates);
        info!(
            candidates = candidates.len(),
            duplicates = statuses.iter().filter(|s| !s.is_importable()).count(),
            "import batch checked"
        );
        statuses
    }

    fn flag_batch(&self, candidates: &[Publication]) -> Vec<ImportStatus> {
        #[cfg(feature = "parallel")]
        if self.run_in_parallel {
            use rayon::prelude::*;

            return candidates
                .par_iter()
                .map(|candidate| self.flag(candidate))
                .collect();
        }

        candidates
            .iter()
            .map(|candidate| self.flag(candidate))
            .collect()
    }
}
