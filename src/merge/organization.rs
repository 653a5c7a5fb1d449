use super::{Merge, MergeOutcome, reassign_records};
use crate::Organization;
use crate::error::MergeError;
use crate::store::{OrganizationMemberships, RelationStore, SuperOrganizationMemberships};

impl<S> Merge<S> for Organization
where
    S: RelationStore<OrganizationMemberships>
        + RelationStore<SuperOrganizationMemberships>
        + ?Sized,
{
    fn reassign_relations(
        store: &mut S,
        source: &Self,
        target: &mut Self,
        outcome: &mut MergeOutcome,
    ) -> Result<bool, MergeError> {
        reassign_records::<OrganizationMemberships, S>(store, source.id, target.id, outcome)?;
        reassign_records::<SuperOrganizationMemberships, S>(store, source.id, target.id, outcome)?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::merge::merge_by_id;
    use crate::store::{MemoryStore, OrganizationMemberships, Relation, Repository};
    use crate::{Membership, Organization, Person};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_organization_merge_moves_direct_and_super_memberships() {
        let mut store = MemoryStore::new();
        let mut source = Organization::new(2, "", "CIAD Laboratory");
        source.country = Some("FR".to_string());
        store
            .insert(Organization::new(1, "CIAD", ""))
            .insert(source)
            .insert(Organization::new(3, "MAS", "Multiagent Systems Team"))
            .insert(Person::new(7, "Ana", "Lopez"))
            .insert(Person::new(8, "Yang", "Li"))
            .add_membership(Membership::new(100, 7, 2))
            .add_membership(Membership::new(101, 8, 3).through(2));

        let (organization, outcome) =
            merge_by_id::<Organization, _>(&mut store, &[2], 1).unwrap();

        assert_eq!(organization.name.as_deref(), Some("CIAD Laboratory"));
        assert_eq!(organization.country.as_deref(), Some("FR"));
        let memberships: Vec<_> = store
            .memberships()
            .map(|m| (m.id, m.organization, m.super_organization))
            .collect();
        assert_eq!(memberships, vec![(100, 1, None), (101, 3, Some(1))]);
        assert_eq!(outcome.reassigned_count(OrganizationMemberships::NAME), 1);
        assert!(Repository::<Organization>::find_by_id(&store, 2).unwrap().is_none());
    }
}
