//! Storage collaborator interfaces.
//!
//! The crate never owns persistence. Merging consumes a store implementing
//! [`Repository`] for the merged entity kind and [`RelationStore`] for each
//! relationship kind that points at it. [`MemoryStore`] implements all of
//! them and backs the tests and examples.
//!
//! Each relationship kind is a marker type implementing [`Relation`], so one
//! store can serve several relationships with the same record type (a
//! [`Membership`] is reachable from its person, its organization and its super
//! organization).

mod memory;

pub use memory::{MemoryStore, Table};

use crate::error::StoreError;
use crate::{
    Authorship, Conference, ConferencePaper, Entity, EntityId, Invitation, JournalPaper,
    JuryMembership, JuryPromotion, Membership, QualityIndicators, Supervisor,
};
use std::fmt;

/// Access to the persisted entities of one kind.
pub trait Repository<T: Entity> {
    fn list_all(&self) -> Result<Vec<T>, StoreError>;

    fn find_by_id(&self, id: EntityId) -> Result<Option<T>, StoreError>;

    fn save(&mut self, entity: &T) -> Result<(), StoreError>;

    /// Deletes an entity.
    ///
    /// Must fail with [`StoreError::StillReferenced`] while any record still
    /// points at the entity, rather than cascading or leaving it dangling.
    fn delete(&mut self, id: EntityId) -> Result<(), StoreError>;
}

/// A kind of relationship from records to an owning entity.
pub trait Relation {
    /// Name used in errors, logs and merge outcomes.
    const NAME: &'static str;

    type Record: Clone + fmt::Debug;

    /// Identity used to detect that the new owner already holds an
    /// equivalent record.
    fn identity(record: &Self::Record) -> EntityId;

    /// Returns `true` if attaching the record to `owner` would make the owner
    /// point at itself.
    fn is_self_link(_record: &Self::Record, _owner: EntityId) -> bool {
        false
    }
}

/// A relationship holding at most one record per owner and year.
pub trait YearKeyed: Relation {
    fn year(record: &Self::Record) -> i32;
}

/// Access to the records of one relationship kind.
pub trait RelationStore<R: Relation> {
    fn get_related(&self, owner: EntityId) -> Result<Vec<R::Record>, StoreError>;

    /// Re-points a record to a new owner.
    fn set_owner(&mut self, record: &R::Record, owner: EntityId) -> Result<(), StoreError>;

    /// Detaches a record that the new owner already holds an equivalent of.
    /// Owned records are deleted, link records lose their link.
    fn drop_record(&mut self, record: &R::Record) -> Result<(), StoreError>;
}

/// Papers and editions published in a journal.
#[derive(Debug, Clone, Copy)]
pub struct JournalPapers;

impl Relation for JournalPapers {
    const NAME: &'static str = "journal papers";
    type Record = JournalPaper;

    fn identity(record: &JournalPaper) -> EntityId {
        record.id
    }
}

/// Yearly quality indicators of a journal.
#[derive(Debug, Clone, Copy)]
pub struct JournalIndicators;

impl Relation for JournalIndicators {
    const NAME: &'static str = "journal quality indicators";
    type Record = QualityIndicators;

    fn identity(record: &QualityIndicators) -> EntityId {
        record.id
    }
}

impl YearKeyed for JournalIndicators {
    fn year(record: &QualityIndicators) -> i32 {
        record.reference_year
    }
}

/// Papers and keynotes of a conference.
#[derive(Debug, Clone, Copy)]
pub struct ConferencePapers;

impl Relation for ConferencePapers {
    const NAME: &'static str = "conference papers";
    type Record = ConferencePaper;

    fn identity(record: &ConferencePaper) -> EntityId {
        record.id
    }
}

/// Conferences enclosed in a larger conference.
#[derive(Debug, Clone, Copy)]
pub struct EnclosedConferences;

impl Relation for EnclosedConferences {
    const NAME: &'static str = "enclosed conferences";
    type Record = Conference;

    fn identity(record: &Conference) -> EntityId {
        record.id
    }

    fn is_self_link(record: &Conference, owner: EntityId) -> bool {
        record.id == owner
    }
}

/// Yearly quality indicators of a conference.
#[derive(Debug, Clone, Copy)]
pub struct ConferenceIndicators;

impl Relation for ConferenceIndicators {
    const NAME: &'static str = "conference quality indicators";
    type Record = QualityIndicators;

    fn identity(record: &QualityIndicators) -> EntityId {
        record.id
    }
}

impl YearKeyed for ConferenceIndicators {
    fn year(record: &QualityIndicators) -> i32 {
        record.reference_year
    }
}

/// Memberships whose direct organization is the owner.
#[derive(Debug, Clone, Copy)]
pub struct OrganizationMemberships;

impl Relation for OrganizationMemberships {
    const NAME: &'static str = "organization memberships";
    type Record = Membership;

    fn identity(record: &Membership) -> EntityId {
        record.id
    }
}

/// Memberships passing through the owner as super organization.
#[derive(Debug, Clone, Copy)]
pub struct SuperOrganizationMemberships;

impl Relation for SuperOrganizationMemberships {
    const NAME: &'static str = "super organization memberships";
    type Record = Membership;

    fn identity(record: &Membership) -> EntityId {
        record.id
    }
}

/// Memberships of the owning person.
#[derive(Debug, Clone, Copy)]
pub struct PersonMemberships;

impl Relation for PersonMemberships {
    const NAME: &'static str = "person memberships";
    type Record = Membership;

    fn identity(record: &Membership) -> EntityId {
        record.id
    }
}

/// Authorships of the owning person.
///
/// A person authors a publication at most once, so the identity is the
/// publication.
#[derive(Debug, Clone, Copy)]
pub struct Authorships;

impl Relation for Authorships {
    const NAME: &'static str = "authorships";
    type Record = Authorship;

    fn identity(record: &Authorship) -> EntityId {
        record.publication
    }
}

/// Jury memberships held by the owning person.
#[derive(Debug, Clone, Copy)]
pub struct JuryMemberships;

impl Relation for JuryMemberships {
    const NAME: &'static str = "jury memberships";
    type Record = JuryMembership;

    fn identity(record: &JuryMembership) -> EntityId {
        record.id
    }
}

/// Juries evaluating the owning person as candidate.
#[derive(Debug, Clone, Copy)]
pub struct JuryCandidacies;

impl Relation for JuryCandidacies {
    const NAME: &'static str = "jury candidacies";
    type Record = JuryMembership;

    fn identity(record: &JuryMembership) -> EntityId {
        record.id
    }
}

/// Places of the owning person in promoter lists.
///
/// A person promotes a candidate at most once per jury membership, so the
/// identity is the jury membership.
#[derive(Debug, Clone, Copy)]
pub struct JuryPromotions;

impl Relation for JuryPromotions {
    const NAME: &'static str = "jury promotions";
    type Record = JuryPromotion;

    fn identity(record: &JuryPromotion) -> EntityId {
        record.jury_membership
    }
}

/// Supervisions led by the owning person.
///
/// The identity is the supervision: a person supervises it at most once.
#[derive(Debug, Clone, Copy)]
pub struct Supervisions;

impl Relation for Supervisions {
    const NAME: &'static str = "supervisions";
    type Record = Supervisor;

    fn identity(record: &Supervisor) -> EntityId {
        record.supervision
    }
}

/// Invitations received by the owning person.
#[derive(Debug, Clone, Copy)]
pub struct GuestInvitations;

impl Relation for GuestInvitations {
    const NAME: &'static str = "invitations as guest";
    type Record = Invitation;

    fn identity(record: &Invitation) -> EntityId {
        record.id
    }
}

/// Invitations issued by the owning person.
#[derive(Debug, Clone, Copy)]
pub struct InviterInvitations;

impl Relation for InviterInvitations {
    const NAME: &'static str = "invitations as inviter";
    type Record = Invitation;

    fn identity(record: &Invitation) -> EntityId {
        record.id
    }
}
