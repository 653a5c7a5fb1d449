use super::{
    Authorships, ConferenceIndicators, ConferencePapers, EnclosedConferences, GuestInvitations,
    InviterInvitations, JournalIndicators, JournalPapers, JuryCandidacies, JuryMemberships,
    JuryPromotions, OrganizationMemberships, PersonMemberships, Relation, RelationStore,
    Repository, SuperOrganizationMemberships, Supervisions,
};
use crate::error::StoreError;
use crate::{
    Authorship, Conference, ConferencePaper, Entity, EntityId, EntityKind, Invitation, Journal,
    JournalPaper, JuryMembership, JuryPromotion, Membership, Organization, Person, Publication,
    QualityIndicators, Supervisor,
};
use std::collections::BTreeMap;

/// In-memory store of master data and relationship records.
///
/// Deletion is refused while any record still points at the entity,
/// including references registered with
/// [`add_foreign_reference`](Self::add_foreign_reference) for data this crate
/// does not model. The store is not transactional: a failed merge leaves the
/// changes made before the failure in place.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    journals: BTreeMap<EntityId, Journal>,
    conferences: BTreeMap<EntityId, Conference>,
    organizations: BTreeMap<EntityId, Organization>,
    persons: BTreeMap<EntityId, Person>,
    publications: BTreeMap<EntityId, Publication>,
    journal_papers: BTreeMap<EntityId, JournalPaper>,
    journal_indicators: BTreeMap<EntityId, QualityIndicators>,
    conference_papers: BTreeMap<EntityId, ConferencePaper>,
    conference_indicators: BTreeMap<EntityId, QualityIndicators>,
    memberships: BTreeMap<EntityId, Membership>,
    authorships: BTreeMap<EntityId, Authorship>,
    jury_memberships: BTreeMap<EntityId, JuryMembership>,
    supervisors: BTreeMap<EntityId, Supervisor>,
    invitations: BTreeMap<EntityId, Invitation>,
    foreign_references: Vec<(EntityKind, EntityId, &'static str)>,
}

/// The in-memory table holding the entities of one kind.
pub trait Table<T> {
    fn table(&self) -> &BTreeMap<EntityId, T>;

    fn table_mut(&mut self) -> &mut BTreeMap<EntityId, T>;
}

macro_rules! table {
    ($entity:ty, $field:ident) => {
        impl Table<$entity> for MemoryStore {
            fn table(&self) -> &BTreeMap<EntityId, $entity> {
                &self.$field
            }

            fn table_mut(&mut self) -> &mut BTreeMap<EntityId, $entity> {
                &mut self.$field
            }
        }
    };
}

table!(Journal, journals);
table!(Conference, conferences);
table!(Organization, organizations);
table!(Person, persons);
table!(Publication, publications);

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entity.
    pub fn insert<T>(&mut self, entity: T) -> &mut Self
    where
        T: Entity,
        Self: Table<T>,
    {
        Table::<T>::table_mut(self).insert(entity.id(), entity);
        self
    }

    pub fn add_journal_paper(&mut self, paper: JournalPaper) -> &mut Self {
        self.journal_papers.insert(paper.id, paper);
        self
    }

    pub fn add_journal_indicators(&mut self, indicators: QualityIndicators) -> &mut Self {
        self.journal_indicators.insert(indicators.id, indicators);
        self
    }

    pub fn add_conference_paper(&mut self, paper: ConferencePaper) -> &mut Self {
        self.conference_papers.insert(paper.id, paper);
        self
    }

    pub fn add_conference_indicators(&mut self, indicators: QualityIndicators) -> &mut Self {
        self.conference_indicators.insert(indicators.id, indicators);
        self
    }

    pub fn add_membership(&mut self, membership: Membership) -> &mut Self {
        self.memberships.insert(membership.id, membership);
        self
    }

    pub fn add_authorship(&mut self, authorship: Authorship) -> &mut Self {
        self.authorships.insert(authorship.id, authorship);
        self
    }

    pub fn add_jury_membership(&mut self, jury_membership: JuryMembership) -> &mut Self {
        self.jury_memberships.insert(jury_membership.id, jury_membership);
        self
    }

    pub fn add_supervisor(&mut self, supervisor: Supervisor) -> &mut Self {
        self.supervisors.insert(supervisor.id, supervisor);
        self
    }

    pub fn add_invitation(&mut self, invitation: Invitation) -> &mut Self {
        self.invitations.insert(invitation.id, invitation);
        self
    }

    /// Registers a reference held by data outside this store's model (a
    /// project, a report) that blocks the deletion of the entity.
    pub fn add_foreign_reference(
        &mut self,
        kind: EntityKind,
        id: EntityId,
        relation: &'static str,
    ) -> &mut Self {
        self.foreign_references.push((kind, id, relation));
        self
    }

    pub fn journal_papers(&self) -> impl Iterator<Item = &JournalPaper> {
        self.journal_papers.values()
    }

    pub fn journal_indicators(&self) -> impl Iterator<Item = &QualityIndicators> {
        self.journal_indicators.values()
    }

    pub fn conference_papers(&self) -> impl Iterator<Item = &ConferencePaper> {
        self.conference_papers.values()
    }

    pub fn conference_indicators(&self) -> impl Iterator<Item = &QualityIndicators> {
        self.conference_indicators.values()
    }

    pub fn memberships(&self) -> impl Iterator<Item = &Membership> {
        self.memberships.values()
    }

    pub fn authorships(&self) -> impl Iterator<Item = &Authorship> {
        self.authorships.values()
    }

    pub fn jury_memberships(&self) -> impl Iterator<Item = &JuryMembership> {
        self.jury_memberships.values()
    }

    pub fn supervisors(&self) -> impl Iterator<Item = &Supervisor> {
        self.supervisors.values()
    }

    pub fn invitations(&self) -> impl Iterator<Item = &Invitation> {
        self.invitations.values()
    }

    /// Name of the first relationship still pointing at the entity.
    fn referencing_relation(&self, kind: EntityKind, id: EntityId) -> Option<&'static str> {
        let modelled = match kind {
            EntityKind::Journal => {
                if self.journal_papers.values().any(|p| p.journal == id) {
                    Some(JournalPapers::NAME)
                } else if self.journal_indicators.values().any(|q| q.owner == id) {
                    Some(JournalIndicators::NAME)
                } else {
                    None
                }
            }
            EntityKind::Conference => {
                if self.conference_papers.values().any(|p| p.conference == id) {
                    Some(ConferencePapers::NAME)
                } else if self.conference_indicators.values().any(|q| q.owner == id) {
                    Some(ConferenceIndicators::NAME)
                } else if self
                    .conferences
                    .values()
                    .any(|c| c.enclosing_conference == Some(id))
                {
                    Some(EnclosedConferences::NAME)
                } else {
                    None
                }
            }
            EntityKind::Organization => {
                if self.memberships.values().any(|m| m.organization == id) {
                    Some(OrganizationMemberships::NAME)
                } else if self
                    .memberships
                    .values()
                    .any(|m| m.super_organization == Some(id))
                {
                    Some(SuperOrganizationMemberships::NAME)
                } else {
                    None
                }
            }
            EntityKind::Person => {
                if self.authorships.values().any(|a| a.person == id) {
                    Some(Authorships::NAME)
                } else if self.memberships.values().any(|m| m.person == id) {
                    Some(PersonMemberships::NAME)
                } else if self.jury_memberships.values().any(|j| j.person == id) {
                    Some(JuryMemberships::NAME)
                } else if self.jury_memberships.values().any(|j| j.candidate == id) {
                    Some(JuryCandidacies::NAME)
                } else if self
                    .jury_memberships
                    .values()
                    .any(|j| j.promoters.contains(&id))
                {
                    Some(JuryPromotions::NAME)
                } else if self.supervisors.values().any(|s| s.person == id) {
                    Some(Supervisions::NAME)
                } else if self.invitations.values().any(|i| i.guest == id) {
                    Some(GuestInvitations::NAME)
                } else if self.invitations.values().any(|i| i.inviter == id) {
                    Some(InviterInvitations::NAME)
                } else {
                    None
                }
            }
            EntityKind::Publication => self
                .authorships
                .values()
                .any(|a| a.publication == id)
                .then_some(Authorships::NAME),
        };
        modelled.or_else(|| {
            self.foreign_references
                .iter()
                .find(|(k, i, _)| *k == kind && *i == id)
                .map(|(_, _, relation)| *relation)
        })
    }
}

impl<T> Repository<T> for MemoryStore
where
    T: Entity + Clone,
    MemoryStore: Table<T>,
{
    fn list_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(Table::<T>::table(self).values().cloned().collect())
    }

    fn find_by_id(&self, id: EntityId) -> Result<Option<T>, StoreError> {
        Ok(Table::<T>::table(self).get(&id).cloned())
    }

    fn save(&mut self, entity: &T) -> Result<(), StoreError> {
        Table::<T>::table_mut(self).insert(entity.id(), entity.clone());
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<(), StoreError> {
        if !Table::<T>::table(self).contains_key(&id) {
            return Err(StoreError::NotFound { kind: T::KIND, id });
        }
        if let Some(relation) = self.referencing_relation(T::KIND, id) {
            return Err(StoreError::StillReferenced {
                kind: T::KIND,
                id,
                relation,
            });
        }
        Table::<T>::table_mut(self).remove(&id);
        Ok(())
    }
}

fn missing_record(relation: &'static str, id: EntityId) -> StoreError {
    StoreError::Backend(format!("no record {id} in {relation}"))
}

macro_rules! owned_relation {
    ($relation:ty, $table:ident, $owner:ident) => {
        impl RelationStore<$relation> for MemoryStore {
            fn get_related(
                &self,
                owner: EntityId,
            ) -> Result<Vec<<$relation as Relation>::Record>, StoreError> {
                Ok(self
                    .$table
                    .values()
                    .filter(|record| record.$owner == owner)
                    .cloned()
                    .collect())
            }

            fn set_owner(
                &mut self,
                record: &<$relation as Relation>::Record,
                owner: EntityId,
            ) -> Result<(), StoreError> {
                let stored = self
                    .$table
                    .get_mut(&record.id)
                    .ok_or_else(|| missing_record(<$relation>::NAME, record.id))?;
                stored.$owner = owner;
                Ok(())
            }

            fn drop_record(
                &mut self,
                record: &<$relation as Relation>::Record,
            ) -> Result<(), StoreError> {
                self.$table
                    .remove(&record.id)
                    .map(|_| ())
                    .ok_or_else(|| missing_record(<$relation>::NAME, record.id))
            }
        }
    };
}

macro_rules! linked_relation {
    ($relation:ty, $table:ident, $link:ident) => {
        impl RelationStore<$relation> for MemoryStore {
            fn get_related(
                &self,
                owner: EntityId,
            ) -> Result<Vec<<$relation as Relation>::Record>, StoreError> {
                Ok(self
                    .$table
                    .values()
                    .filter(|record| record.$link == Some(owner))
                    .cloned()
                    .collect())
            }

            fn set_owner(
                &mut self,
                record: &<$relation as Relation>::Record,
                owner: EntityId,
            ) -> Result<(), StoreError> {
                let stored = self
                    .$table
                    .get_mut(&record.id)
                    .ok_or_else(|| missing_record(<$relation>::NAME, record.id))?;
                stored.$link = Some(owner);
                Ok(())
            }

            fn drop_record(
                &mut self,
                record: &<$relation as Relation>::Record,
            ) -> Result<(), StoreError> {
                let stored = self
                    .$table
                    .get_mut(&record.id)
                    .ok_or_else(|| missing_record(<$relation>::NAME, record.id))?;
                stored.$link = None;
                Ok(())
            }
        }
    };
}

owned_relation!(JournalPapers, journal_papers, journal);
owned_relation!(JournalIndicators, journal_indicators, owner);
owned_relation!(ConferencePapers, conference_papers, conference);
owned_relation!(ConferenceIndicators, conference_indicators, owner);
owned_relation!(OrganizationMemberships, memberships, organization);
owned_relation!(PersonMemberships, memberships, person);
owned_relation!(Authorships, authorships, person);
owned_relation!(JuryMemberships, jury_memberships, person);
owned_relation!(JuryCandidacies, jury_memberships, candidate);
owned_relation!(Supervisions, supervisors, person);
owned_relation!(GuestInvitations, invitations, guest);
owned_relation!(InviterInvitations, invitations, inviter);
linked_relation!(EnclosedConferences, conferences, enclosing_conference);
linked_relation!(SuperOrganizationMemberships, memberships, super_organization);

impl RelationStore<JuryPromotions> for MemoryStore {
    fn get_related(&self, owner: EntityId) -> Result<Vec<JuryPromotion>, StoreError> {
        Ok(self
            .jury_memberships
            .values()
            .filter(|jury| jury.promoters.contains(&owner))
            .map(|jury| JuryPromotion {
                jury_membership: jury.id,
                promoter: owner,
            })
            .collect())
    }

    /// Replaces the promoter in place, keeping its rank in the list.
    fn set_owner(&mut self, record: &JuryPromotion, owner: EntityId) -> Result<(), StoreError> {
        let slot = self
            .jury_memberships
            .get_mut(&record.jury_membership)
            .and_then(|jury| jury.promoters.iter_mut().find(|p| **p == record.promoter))
            .ok_or_else(|| missing_record(JuryPromotions::NAME, record.jury_membership))?;
        *slot = owner;
        Ok(())
    }

    fn drop_record(&mut self, record: &JuryPromotion) -> Result<(), StoreError> {
        let jury = self
            .jury_memberships
            .get_mut(&record.jury_membership)
            .filter(|jury| jury.promoters.contains(&record.promoter))
            .ok_or_else(|| missing_record(JuryPromotions::NAME, record.jury_membership))?;
        jury.promoters.retain(|p| *p != record.promoter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delete_refuses_referenced_entity() {
        let mut store = MemoryStore::new();
        store
            .insert(Journal::new(1, "Journal X", "Springer"))
            .add_journal_paper(JournalPaper::new(10, "Paper", 1));

        let result = Repository::<Journal>::delete(&mut store, 1);
        assert_eq!(
            result,
            Err(StoreError::StillReferenced {
                kind: EntityKind::Journal,
                id: 1,
                relation: JournalPapers::NAME,
            })
        );
    }

    #[test]
    fn test_delete_refuses_foreign_reference() {
        let mut store = MemoryStore::new();
        store
            .insert(Person::new(1, "Ana", "Lopez"))
            .add_foreign_reference(EntityKind::Person, 1, "project participants");

        let result = Repository::<Person>::delete(&mut store, 1);
        assert!(matches!(
            result,
            Err(StoreError::StillReferenced { relation: "project participants", .. })
        ));
    }

    #[test]
    fn test_delete_missing_entity() {
        let mut store = MemoryStore::new();
        assert_eq!(
            Repository::<Organization>::delete(&mut store, 3),
            Err(StoreError::NotFound {
                kind: EntityKind::Organization,
                id: 3,
            })
        );
    }

    #[test]
    fn test_membership_is_reachable_from_three_owners() {
        let mut store = MemoryStore::new();
        store.add_membership(Membership::new(5, 1, 20).through(30));

        let by_person = RelationStore::<PersonMemberships>::get_related(&store, 1).unwrap();
        let by_organization =
            RelationStore::<OrganizationMemberships>::get_related(&store, 20).unwrap();
        let by_super =
            RelationStore::<SuperOrganizationMemberships>::get_related(&store, 30).unwrap();

        assert_eq!(by_person.len(), 1);
        assert_eq!(by_organization, by_person);
        assert_eq!(by_super, by_person);
    }

    #[test]
    fn test_delete_refuses_promoter() {
        let mut store = MemoryStore::new();
        store
            .insert(Person::new(1, "Ana", "Lopez"))
            .add_jury_membership(JuryMembership::new(70, 2, 3).promoted_by(1));

        assert_eq!(
            Repository::<Person>::delete(&mut store, 1),
            Err(StoreError::StillReferenced {
                kind: EntityKind::Person,
                id: 1,
                relation: JuryPromotions::NAME,
            })
        );
    }

    #[test]
    fn test_promoter_keeps_its_rank() {
        let mut store = MemoryStore::new();
        store.add_jury_membership(
            JuryMembership::new(70, 2, 3)
                .promoted_by(4)
                .promoted_by(5)
                .promoted_by(6),
        );

        let promotions = RelationStore::<JuryPromotions>::get_related(&store, 5).unwrap();
        assert_eq!(
            promotions,
            vec![JuryPromotion {
                jury_membership: 70,
                promoter: 5,
            }]
        );
        RelationStore::<JuryPromotions>::set_owner(&mut store, &promotions[0], 9).unwrap();
        let promoters = store.jury_memberships().next().unwrap().promoters.clone();
        assert_eq!(promoters, vec![4, 9, 6]);

        let stale = RelationStore::<JuryPromotions>::set_owner(&mut store, &promotions[0], 9);
        assert!(matches!(stale, Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_dropping_a_link_keeps_the_record() {
        let mut store = MemoryStore::new();
        store
            .insert(Conference::new(1, "AAMAS", ""))
            .insert(Conference::new(2, "EMAS", "").enclosed_in(1));

        let enclosed = RelationStore::<EnclosedConferences>::get_related(&store, 1).unwrap();
        RelationStore::<EnclosedConferences>::drop_record(&mut store, &enclosed[0]).unwrap();

        let emas = Repository::<Conference>::find_by_id(&store, 2).unwrap().unwrap();
        assert_eq!(emas.enclosing_conference, None);
        assert!(Repository::<Conference>::delete(&mut store, 1).is_ok());
    }
}
