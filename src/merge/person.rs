use super::{Merge, MergeOutcome, reassign_records};
use crate::Person;
use crate::error::MergeError;
use crate::store::{
    Authorships, GuestInvitations, InviterInvitations, JuryCandidacies, JuryMemberships,
    JuryPromotions, PersonMemberships, RelationStore, Supervisions,
};

impl<S> Merge<S> for Person
where
    S: RelationStore<Authorships>
        + RelationStore<PersonMemberships>
        + RelationStore<JuryMemberships>
        + RelationStore<JuryCandidacies>
        + RelationStore<JuryPromotions>
        + RelationStore<Supervisions>
        + RelationStore<GuestInvitations>
        + RelationStore<InviterInvitations>
        + ?Sized,
{
    fn reassign_relations(
        store: &mut S,
        source: &Self,
        target: &mut Self,
        outcome: &mut MergeOutcome,
    ) -> Result<bool, MergeError> {
        // An authorship on a publication the target already co-authors is
        // dropped, never duplicated.
        reassign_records::<Authorships, S>(store, source.id, target.id, outcome)?;
        reassign_records::<PersonMemberships, S>(store, source.id, target.id, outcome)?;
        reassign_records::<JuryMemberships, S>(store, source.id, target.id, outcome)?;
        reassign_records::<JuryCandidacies, S>(store, source.id, target.id, outcome)?;
        // A promoter listed twice on the same jury keeps the target's rank.
        reassign_records::<JuryPromotions, S>(store, source.id, target.id, outcome)?;
        reassign_records::<Supervisions, S>(store, source.id, target.id, outcome)?;
        reassign_records::<GuestInvitations, S>(store, source.id, target.id, outcome)?;
        reassign_records::<InviterInvitations, S>(store, source.id, target.id, outcome)?;
        Ok(false)
    }
}
