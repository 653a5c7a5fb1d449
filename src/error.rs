//! Error types for clustering, merging and name parsing.
//!
//! Configuration values are clamped rather than rejected, so the only
//! failures surfaced here come from the storage collaborator, from a
//! cancelled duplicate search, or from text that cannot be read as a list of
//! person names.

use crate::{EntityId, EntityKind};
use thiserror::Error;

/// Top-level error type of the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Dedupe(#[from] DedupeError),

    #[error(transparent)]
    NameParse(#[from] NameParseError),
}

/// Errors reported by a storage collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// The entity cannot be deleted because a record still points at it.
    #[error("{kind} {id} is still referenced by {relation}")]
    StillReferenced {
        kind: EntityKind,
        id: EntityId,
        relation: &'static str,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors raised while merging duplicate entities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MergeError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    /// The source kept a relationship the merge does not reassign, so its
    /// deletion was refused. Nothing was silently discarded.
    #[error("Cannot delete {kind} {id}: still referenced by {relation}")]
    UnhandledRelationship {
        kind: EntityKind,
        id: EntityId,
        relation: &'static str,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for MergeError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind, id } => MergeError::NotFound { kind, id },
            StoreError::StillReferenced { kind, id, relation } => {
                MergeError::UnhandledRelationship { kind, id, relation }
            }
            other => MergeError::Store(other),
        }
    }
}

/// Errors raised by the duplicate search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DedupeError {
    #[error("Duplicate search cancelled at entity {index} of {total}")]
    Cancelled { index: usize, total: usize },
}

/// Signal returned by a progress callback to stop a running duplicate search.
#[derive(Error, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[error("cancelled by caller")]
pub struct Cancelled;

/// Errors raised by the person name parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NameParseError {
    #[error("Unrecognized name format: {0}")]
    UnrecognizedName(String),

    #[error("Unrecognized format for a list of names: {0}")]
    InvalidList(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_still_referenced_becomes_unhandled_relationship() {
        let error: MergeError = StoreError::StillReferenced {
            kind: EntityKind::Journal,
            id: 7,
            relation: "journal papers",
        }
        .into();
        assert_eq!(
            error,
            MergeError::UnhandledRelationship {
                kind: EntityKind::Journal,
                id: 7,
                relation: "journal papers",
            }
        );
        assert_eq!(
            error.to_string(),
            "Cannot delete Journal 7: still referenced by journal papers"
        );
    }

    #[test]
    fn test_backend_error_is_wrapped() {
        let error: MergeError = StoreError::Backend("disk full".to_string()).into();
        assert!(matches!(error, MergeError::Store(StoreError::Backend(_))));
        assert_eq!(error.to_string(), "Storage backend error: disk full");
    }

    #[test]
    fn test_top_level_conversion() {
        let error: Error = DedupeError::Cancelled { index: 3, total: 10 }.into();
        assert_eq!(
            error.to_string(),
            "Duplicate search cancelled at entity 3 of 10"
        );
    }
}
