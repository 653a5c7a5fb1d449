//! Fuzzy duplicate detection and safe merging of bibliographic master data.
//!
//! `bibmerge` is the algorithmic core used to keep the master data of a
//! research lab clean: journals, conferences, research organizations,
//! persons and publications. It finds records that probably describe the same
//! thing and merges them without losing any field value or relationship.
//!
//! # Features
//!
//! - `parallel` - Score candidates with rayon during duplicate searches and batch
//!   import checks (enabled by default)
//! - `regex` - Use the full `regex` crate (enabled by default)
//! - `lite` - Use `regex-lite` instead, for smaller binaries
//!
//! ```toml
//! [dependencies]
//! bibmerge = { version = "0.1.0", default-features = false, features = ["lite"] }
//! ```
//!
//! # Key Characteristics
//!
//! - **Name similarity**: a pluggable string metric wrapped with a clamped
//!   similarity level, plus comparators for persons (initials, swapped
//!   fields), organizations and conferences (acronym or name), journals
//!   (gated by publisher) and publication titles.
//! - **Duplicate search**: greedy single-pass clustering with progress
//!   reporting and cancellation.
//! - **Safe merge**: empty fields of the kept record are filled, every
//!   relationship of the merged records is moved over, and a record is only
//!   deleted once nothing points at it anymore.
//! - **Import check**: exact comparison of normalized fields to flag a
//!   parsed publication that already exists.
//!
//! # Finding Duplicates
//!
//! ```rust
//! use bibmerge::cluster::DuplicateFinder;
//! use bibmerge::similarity::PersonNameComparator;
//! use bibmerge::Person;
//!
//! let persons = vec![
//!     Person::new(1, "Stéphane", "Galland"),
//!     Person::new(2, "Nicolas", "Gaud"),
//!     Person::new(3, "S.", "GALLAND"),
//! ];
//!
//! let finder = DuplicateFinder::new().with_similarity_level(0.8);
//! let groups = finder
//!     .find_duplicates(&persons, &PersonNameComparator::new())
//!     .unwrap();
//!
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].ids(), vec![1, 3]);
//! ```
//!
//! # Merging
//!
//! ```rust
//! use bibmerge::merge::merge_by_id;
//! use bibmerge::store::{MemoryStore, Repository};
//! use bibmerge::{Journal, JournalPaper};
//!
//! let mut store = MemoryStore::new();
//! store.insert(Journal::new(1, "Journal X", "Springer"));
//! store.insert(Journal::new(2, "Journal X", "Springer").with_issn("1234-5678"));
//! store.add_journal_paper(JournalPaper::new(10, "A paper", 2));
//!
//! let (journal, outcome) = merge_by_id::<Journal, _>(&mut store, &[2], 1).unwrap();
//! assert_eq!(journal.issn.as_deref(), Some("1234-5678"));
//! assert_eq!(outcome.merged, vec![2]);
//! assert!(Repository::<Journal>::find_by_id(&store, 2).unwrap().is_none());
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns a dedicated error enum from [`error`];
//! they all convert into the crate-level [`Error`]. Out-of-range similarity
//! levels are clamped, never rejected.
//!
//! # Logging
//!
//! The crate emits `tracing` events (merges at `info`, dropped records at
//! `warn`, groups and reassignments at `debug`) and never installs a
//! subscriber itself.
//!
//! # Thread Safety
//!
//! Comparators are `Send + Sync` and can be shared between threads. Merges
//! take the store by `&mut` and must be serialized by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod cluster;
pub mod error;
pub mod import;
pub mod merge;
pub mod model;
pub mod names;
pub mod normalize;
pub mod similarity;
pub mod store;

// Reexports
pub use error::{Cancelled, DedupeError, Error, MergeError, NameParseError, StoreError};
pub use model::{
    Authorship, Conference, ConferencePaper, Gender, Invitation, Journal, JournalPaper,
    JuryMembership, JuryPromotion, Membership, Mergeable, Organization, Person, Publication,
    QualityIndicators, Supervisor,
};
pub use names::{PersonName, PersonNameParser};

mod regex;
mod utils;

pub use utils::{format_doi, format_issn, normalize_text};

/// Stable identity of a persisted entity or record.
pub type EntityId = u64;

/// Kinds of master data handled by the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Journal,
    Conference,
    Organization,
    Person,
    Publication,
}

impl EntityKind {
    /// Convert the kind to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Journal => "Journal",
            EntityKind::Conference => "Conference",
            EntityKind::Organization => "Organization",
            EntityKind::Person => "Person",
            EntityKind::Publication => "Publication",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted entity with a stable identity and a human readable label.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    /// Display name used in log events.
    fn label(&self) -> String;
}

/// A group of entities found to be duplicates of each other.
///
/// A group always holds at least two members, sorted by the ordering given
/// to the duplicate search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup<T> {
    members: Vec<T>,
}

impl<T> DuplicateGroup<T> {
    pub(crate) fn new(members: Vec<T>) -> Self {
        debug_assert!(members.len() > 1);
        Self { members }
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn into_members(self) -> Vec<T> {
        self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: empty or single-member groups are never produced.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.members.iter()
    }
}

impl<T: Entity> DuplicateGroup<T> {
    pub fn ids(&self) -> Vec<EntityId> {
        self.members.iter().map(Entity::id).collect()
    }
}

impl<'a, T> IntoIterator for &'a DuplicateGroup<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::Organization.to_string(), "Organization");
        assert_eq!(EntityKind::Journal.as_str(), "Journal");
    }

    #[test]
    fn test_duplicate_group_ids() {
        let group = DuplicateGroup::new(vec![
            Person::new(4, "Ana", "Lopez"),
            Person::new(9, "A.", "Lopez"),
        ]);
        assert_eq!(group.ids(), vec![4, 9]);
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
        assert_eq!(group.iter().count(), 2);
    }
}
