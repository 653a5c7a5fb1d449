use super::{Merge, MergeOutcome, reassign_records, reassign_yearly_records};
use crate::{Conference, EntityId};
use crate::error::MergeError;
use crate::store::{ConferenceIndicators, ConferencePapers, EnclosedConferences, RelationStore};

impl<S> Merge<S> for Conference
where
    S: RelationStore<ConferencePapers>
        + RelationStore<EnclosedConferences>
        + RelationStore<ConferenceIndicators>
        + ?Sized,
{
    fn reassign_relations(
        store: &mut S,
        source: &Self,
        target: &mut Self,
        outcome: &mut MergeOutcome,
    ) -> Result<bool, MergeError> {
        reassign_records::<ConferencePapers, S>(store, source.id, target.id, outcome)?;
        // Dropping the target's own link to the source happens in the store;
        // the in-memory target must follow or the final save restores it.
        reassign_records::<EnclosedConferences, S>(store, source.id, target.id, outcome)?;
        let unlinked = target.enclosing_conference == Some(source.id);
        if unlinked {
            target.enclosing_conference = None;
        }
        reassign_yearly_records::<ConferenceIndicators, S>(store, source.id, target.id, outcome)?;
        Ok(unlinked)
    }

    fn unlink_merged(target: &mut Self, merged: &[EntityId]) -> bool {
        match target.enclosing_conference {
            Some(enclosing) if merged.contains(&enclosing) => {
                target.enclosing_conference = None;
                true
            }
            _ => false,
        }
    }
}
