//! Duplicate search over a list of entities.
//!
//! The search is a greedy single pass: the first remaining entity becomes a
//! reference, every later entity similar to it joins its group and leaves the
//! working list, and the next remaining entity becomes the next reference.
//! Groups are therefore not transitive closures and depend on input order,
//! which is intended: they are proposals for a human to review before merging.
//!
//! # Examples
//!
//! ```
//! use bibmerge::cluster::{ClusteringConfig, DuplicateFinder};
//! use bibmerge::similarity::JournalNameComparator;
//! use bibmerge::{Cancelled, Journal};
//!
//! let journals = vec![
//!     Journal::new(1, "Pattern Recognition", "Elsevier"),
//!     Journal::new(2, "Pattern Recognition", "Springer"),
//!     Journal::new(3, "Pattern recognition.", "Elsevier"),
//! ];
//!
//! let config = ClusteringConfig {
//!     similarity_level: 0.9.into(),
//!     run_in_parallel: true,
//! };
//! let finder = DuplicateFinder::new().with_config(config);
//!
//! let mut reports = 0;
//! let groups = finder
//!     .find_duplicates_with(
//!         &journals,
//!         &JournalNameComparator::new(),
//!         |a: &Journal, b: &Journal| a.id.cmp(&b.id),
//!         |_index: usize, _found: usize, _total: usize| -> Result<(), Cancelled> {
//!             reports += 1;
//!             Ok(())
//!         },
//!     )
//!     .unwrap();
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].ids(), vec![1, 3]);
//! assert_eq!(reports, 2);
//! ```

use crate::error::{Cancelled, DedupeError};
use crate::similarity::{EntitySimilarity, SimilarityLevel};
use crate::{DuplicateGroup, Entity};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Configuration of the duplicate search.
///
/// # Examples
///
/// ```
/// use bibmerge::cluster::ClusteringConfig;
///
/// let config = ClusteringConfig {
///     similarity_level: 0.85.into(),
///     ..Default::default()
/// };
/// assert!(!config.run_in_parallel);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Minimum score for two entities to be grouped (inclusive).
    pub similarity_level: SimilarityLevel,
    /// Score the candidates of each reference in parallel. Requires the
    /// `parallel` feature, ignored otherwise. Groups are identical to the
    /// sequential search.
    pub run_in_parallel: bool,
}

/// Receives the progress of a duplicate search.
///
/// Returning `Err(Cancelled)` stops the search, which then fails with
/// [`DedupeError::Cancelled`] and returns no group at all.
pub trait ProgressCallback {
    fn on_progress(&mut self, index: usize, duplicates: usize, total: usize)
    -> Result<(), Cancelled>;
}

impl<F> ProgressCallback for F
where
    F: FnMut(usize, usize, usize) -> Result<(), Cancelled>,
{
    fn on_progress(
        &mut self,
        index: usize,
        duplicates: usize,
        total: usize,
    ) -> Result<(), Cancelled> {
        self(index, duplicates, total)
    }
}

/// A progress callback that ignores every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&mut self, _: usize, _: usize, _: usize) -> Result<(), Cancelled> {
        Ok(())
    }
}

/// Greedy duplicate search engine.
#[derive(Debug, Default, Clone)]
pub struct DuplicateFinder {
    config: ClusteringConfig,
}

impl DuplicateFinder {
    /// Creates a finder with the default similarity level, running sequentially.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: ClusteringConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the similarity level, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_similarity_level(mut self, level: f64) -> Self {
        self.config.similarity_level = SimilarityLevel::new(level);
        self
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Groups similar entities, each group sorted by identity.
    ///
    /// # Errors
    ///
    /// None: without a progress callback the search cannot be cancelled.
    pub fn find_duplicates<T, C>(
        &self,
        entities: &[T],
        comparator: &C,
    ) -> Result<Vec<DuplicateGroup<T>>, DedupeError>
    where
        T: Entity + Clone + Sync,
        C: EntitySimilarity<T> + ?Sized,
    {
        self.find_duplicates_with(
            entities,
            comparator,
            |a: &T, b: &T| a.id().cmp(&b.id()),
            NoProgress,
        )
    }

    /// Groups similar entities, reporting progress and honoring cancellation.
    ///
    /// Progress is reported as `(index, duplicates found so far, total)`:
    /// once with `(0, 0, total)` before scanning, then after each reference
    /// entity. The last remaining entity is never a reference.
    /// Members of each group are sorted with `ordering`. Groups of one are
    /// never returned.
    ///
    /// # Errors
    ///
    /// Returns [`DedupeError::Cancelled`] if the callback cancels the search.
    pub fn find_duplicates_with<T, C, O, P>(
        &self,
        entities: &[T],
        comparator: &C,
        ordering: O,
        mut progress: P,
    ) -> Result<Vec<DuplicateGroup<T>>, DedupeError>
    where
        T: Clone + Sync,
        C: EntitySimilarity<T> + ?Sized,
        O: Fn(&T, &T) -> Ordering,
        P: ProgressCallback,
    {
        let total = entities.len();
        progress
            .on_progress(0, 0, total)
            .map_err(|_| DedupeError::Cancelled { index: 0, total })?;

        let mut remaining: Vec<&T> = entities.iter().collect();
        let mut groups = Vec::new();
        let mut duplicates = 0;
        let mut index = 0;

        while index + 1 < remaining.len() {
            let reference = remaining[index];
            let tail = remaining.split_off(index + 1);
            let matches = self.scan(reference, &tail, comparator);

            let mut members = vec![reference];
            for (candidate, matched) in tail.into_iter().zip(matches) {
                if matched {
                    members.push(candidate);
                } else {
                    remaining.push(candidate);
                }
            }

            if members.len() > 1 {
                duplicates += members.len() - 1;
                members.sort_by(|a, b| ordering(a, b));
                debug!(index, size = members.len(), "duplicate group found");
                groups.push(DuplicateGroup::new(members.into_iter().cloned().collect()));
            }

            progress
                .on_progress(index, duplicates, total)
                .map_err(|_| DedupeError::Cancelled { index, total })?;
            index += 1;
        }

        info!(
            total,
            groups = groups.len(),
            duplicates,
            "duplicate search finished"
        );
        Ok(groups)
    }

    /// Every candidate similar to `entity`, in input order.
    ///
    /// `entity` itself is skipped if it appears among the candidates. Useful
    /// to look up existing records before creating a new one.
    pub fn find_similar<'a, T, C>(&self, candidates: &'a [T], entity: &T, comparator: &C) -> Vec<&'a T>
    where
        T: Entity + Sync,
        C: EntitySimilarity<T> + ?Sized,
    {
        let candidates: Vec<&T> = candidates
            .iter()
            .filter(|candidate| candidate.id() != entity.id())
            .collect();
        let matches = self.scan(entity, &candidates, comparator);
        candidates
            .into_iter()
            .zip(matches)
            .filter_map(|(candidate, matched)| matched.then_some(candidate))
            .collect()
    }

    fn scan<T, C>(&self, reference: &T, candidates: &[&T], comparator: &C) -> Vec<bool>
    where
        T: Sync,
        C: EntitySimilarity<T> + ?Sized,
    {
        let level = self.config.similarity_level;

        #[cfg(feature = "parallel")]
        if self.config.run_in_parallel {
            use rayon::prelude::*;

            return candidates
                .par_iter()
                .map(|candidate| comparator.is_similar(reference, candidate, level))
                .collect();
        }

        candidates
            .iter()
            .map(|candidate| comparator.is_similar(reference, candidate, level))
            .collect()
    }
}
