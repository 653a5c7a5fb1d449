//! Non-destructive merging of duplicate entities.
//!
//! Merging a set of source entities into a target entity:
//!
//! 1. fills every empty field of the target from the sources, the first
//!    source providing a value winning;
//! 2. moves every relationship record of the sources onto the target. For
//!    unkeyed relationships a record the target already holds (same
//!    identity) is dropped. For year-keyed relationships the target's record
//!    for a year wins over the source's;
//! 3. deletes the source. The store refuses the deletion while anything
//!    still points at the source, which surfaces as
//!    [`MergeError::UnhandledRelationship`] instead of losing data;
//! 4. saves the target once at the end if anything changed.
//!
//! A source with the same identity as the target is skipped. The operation
//! is not atomic by itself: run it inside the caller's transaction.
//!
//! # Examples
//!
//! ```
//! use bibmerge::merge::merge;
//! use bibmerge::store::MemoryStore;
//! use bibmerge::{Journal, JournalPaper};
//!
//! let mut store = MemoryStore::new();
//! let mut target = Journal::new(1, "Journal X", "Springer");
//! let source = Journal::new(2, "Journal X", "Springer").with_issn("1234-5678");
//! store.insert(target.clone()).insert(source.clone());
//! store.add_journal_paper(JournalPaper::new(10, "A paper", 2));
//!
//! let outcome = merge(&mut store, &[source], &mut target).unwrap();
//! assert_eq!(outcome.reassigned_count("journal papers"), 1);
//! assert!(outcome.target_saved);
//! ```

mod conference;
mod journal;
mod organization;
mod person;

use crate::error::MergeError;
use crate::model::Mergeable;
use crate::store::{Relation, RelationStore, Repository, YearKeyed};
use crate::{Entity, EntityId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// An entity kind whose relationships can be moved from a duplicate onto the
/// kept entity in store `S`.
pub trait Merge<S: ?Sized>: Mergeable {
    /// Moves every relationship of `source` onto `target`.
    ///
    /// Implementations may adjust `target` (to break a link to the source,
    /// for instance) and return `true` when they did.
    fn reassign_relations(
        store: &mut S,
        source: &Self,
        target: &mut Self,
        outcome: &mut MergeOutcome,
    ) -> Result<bool, MergeError>;

    /// Clears links of `target` to any of the `merged` sources, which no
    /// longer exist. Returns `true` if `target` changed.
    ///
    /// Called once after every source is deleted: a source absorbed late may
    /// still link to a source deleted earlier.
    fn unlink_merged(_target: &mut Self, _merged: &[EntityId]) -> bool {
        false
    }
}

/// Summary of a completed merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergeOutcome {
    /// Identity of the kept entity.
    pub target: EntityId,
    /// Identities of the merged and deleted sources, in merge order.
    pub merged: Vec<EntityId>,
    /// Fields of the target filled from a source.
    pub filled_fields: Vec<&'static str>,
    /// Records moved onto the target, per relationship.
    pub reassigned: BTreeMap<&'static str, usize>,
    /// Records dropped because the target already held an equivalent, per
    /// relationship.
    pub dropped: BTreeMap<&'static str, usize>,
    /// Whether the target was saved.
    pub target_saved: bool,
}

impl MergeOutcome {
    fn new(target: EntityId) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn reassigned_count(&self, relation: &str) -> usize {
        self.reassigned.get(relation).copied().unwrap_or(0)
    }

    pub fn dropped_count(&self, relation: &str) -> usize {
        self.dropped.get(relation).copied().unwrap_or(0)
    }

    fn record_filled(&mut self, fields: Vec<&'static str>) {
        for field in fields {
            if !self.filled_fields.contains(&field) {
                self.filled_fields.push(field);
            }
        }
    }
}

/// Merges `sources` into `target`, then deletes the sources.
///
/// `target` is updated in place and saved once at the end if any field or
/// relationship changed.
///
/// # Errors
///
/// Returns [`MergeError::NotFound`] if a source no longer exists,
/// [`MergeError::UnhandledRelationship`] if a source is still referenced
/// after reassignment, and [`MergeError::Store`] for any other storage
/// failure.
pub fn merge<T, S>(store: &mut S, sources: &[T], target: &mut T) -> Result<MergeOutcome, MergeError>
where
    T: Merge<S>,
    S: Repository<T> + ?Sized,
{
    let mut outcome = MergeOutcome::new(target.id());
    let mut changed = false;

    for source in sources {
        if source.id() == target.id() {
            debug!(kind = %T::KIND, id = target.id(), "skipping self-merge");
            continue;
        }
        info!(
            kind = %T::KIND,
            source = source.id(),
            target = target.id(),
            "merging {:?} into {:?}",
            source.label(),
            target.label()
        );

        let filled = target.absorb(source);
        changed |= !filled.is_empty();
        outcome.record_filled(filled);

        let moved_before = total(&outcome.reassigned) + total(&outcome.dropped);
        changed |= T::reassign_relations(store, source, target, &mut outcome)?;
        changed |= total(&outcome.reassigned) + total(&outcome.dropped) > moved_before;

        store.delete(source.id())?;
        outcome.merged.push(source.id());
    }

    changed |= T::unlink_merged(target, &outcome.merged);

    if changed {
        store.save(target)?;
        outcome.target_saved = true;
    }
    Ok(outcome)
}

/// Loads the target and sources by identity and merges them.
///
/// Every identity is resolved before anything is modified. Returns the
/// updated target with the merge outcome.
///
/// # Errors
///
/// Returns [`MergeError::NotFound`] if the target or any source does not
/// exist, and the errors of [`merge`] otherwise.
pub fn merge_by_id<T, S>(
    store: &mut S,
    source_ids: &[EntityId],
    target_id: EntityId,
) -> Result<(T, MergeOutcome), MergeError>
where
    T: Merge<S>,
    S: Repository<T> + ?Sized,
{
    let mut target = store
        .find_by_id(target_id)?
        .ok_or(MergeError::NotFound {
            kind: T::KIND,
            id: target_id,
        })?;
    let sources = source_ids
        .iter()
        .map(|&id| {
            store
                .find_by_id(id)?
                .ok_or(MergeError::NotFound { kind: T::KIND, id })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = merge(store, &sources, &mut target)?;
    Ok((target, outcome))
}

fn total(counts: &BTreeMap<&'static str, usize>) -> usize {
    counts.values().sum()
}

/// Moves the records of an unkeyed relationship from `source` to `target`.
///
/// Records whose identity the target already holds, or that would make the
/// target point at itself, are dropped.
pub(crate) fn reassign_records<R, S>(
    store: &mut S,
    source: EntityId,
    target: EntityId,
    outcome: &mut MergeOutcome,
) -> Result<(), MergeError>
where
    R: Relation,
    S: RelationStore<R> + ?Sized,
{
    let mut present: BTreeSet<EntityId> = store
        .get_related(target)?
        .iter()
        .map(R::identity)
        .collect();

    for record in store.get_related(source)? {
        let identity = R::identity(&record);
        if present.contains(&identity) || R::is_self_link(&record, target) {
            warn!(
                relation = R::NAME,
                source,
                target,
                identity,
                "dropping record already held by the merge target"
            );
            store.drop_record(&record)?;
            *outcome.dropped.entry(R::NAME).or_default() += 1;
        } else {
            debug!(relation = R::NAME, source, target, identity, "reassigning record");
            store.set_owner(&record, target)?;
            present.insert(identity);
            *outcome.reassigned.entry(R::NAME).or_default() += 1;
        }
    }
    Ok(())
}

/// Moves the records of a year-keyed relationship from `source` to `target`.
///
/// The target's record wins for any year it already covers; the source's
/// record for that year is dropped.
pub(crate) fn reassign_yearly_records<R, S>(
    store: &mut S,
    source: EntityId,
    target: EntityId,
    outcome: &mut MergeOutcome,
) -> Result<(), MergeError>
where
    R: YearKeyed,
    S: RelationStore<R> + ?Sized,
{
    let mut years: BTreeSet<i32> = store.get_related(target)?.iter().map(R::year).collect();

    for record in store.get_related(source)? {
        let year = R::year(&record);
        if years.insert(year) {
            debug!(relation = R::NAME, source, target, year, "reassigning yearly record");
            store.set_owner(&record, target)?;
            *outcome.reassigned.entry(R::NAME).or_default() += 1;
        } else {
            warn!(
                relation = R::NAME,
                source,
                target,
                year,
                "dropping yearly record, the merge target already has one"
            );
            store.drop_record(&record)?;
            *outcome.dropped.entry(R::NAME).or_default() += 1;
        }
    }
    Ok(())
}
