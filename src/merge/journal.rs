use super::{Merge, MergeOutcome, reassign_records, reassign_yearly_records};
use crate::Journal;
use crate::error::MergeError;
use crate::store::{JournalIndicators, JournalPapers, RelationStore};

impl<S> Merge<S> for Journal
where
    S: RelationStore<JournalPapers> + RelationStore<JournalIndicators> + ?Sized,
{
    fn reassign_relations(
        store: &mut S,
        source: &Self,
        target: &mut Self,
        outcome: &mut MergeOutcome,
    ) -> Result<bool, MergeError> {
        reassign_records::<JournalPapers, S>(store, source.id, target.id, outcome)?;
        reassign_yearly_records::<JournalIndicators, S>(store, source.id, target.id, outcome)?;
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use crate::cluster::DuplicateFinder;
    use crate::error::MergeError;
    use crate::merge::{merge, merge_by_id};
    use crate::store::{JournalIndicators, JournalPapers, MemoryStore, Relation, Repository};
    use crate::similarity::JournalNameComparator;
    use crate::{EntityKind, Journal, JournalPaper, QualityIndicators};
    use pretty_assertions::assert_eq;

    fn indicator_years(store: &MemoryStore, journal: u64) -> Vec<(i32, Option<f64>)> {
        store
            .journal_indicators()
            .filter(|q| q.owner == journal)
            .map(|q| (q.reference_year, q.impact_factor))
            .collect()
    }

    #[test]
    fn test_journal_merge_scenario() {
        let mut store = MemoryStore::new();
        store
            .insert(Journal::new(1, "Journal X", "Springer"))
            .insert(Journal::new(2, "Journal X", "Springer").with_issn("1234-5678"))
            .add_journal_paper(JournalPaper::new(10, "P", 2))
            .add_journal_indicators(QualityIndicators::new(20, 1, 2020).with_impact_factor(1.0))
            .add_journal_indicators(QualityIndicators::new(21, 2, 2020).with_impact_factor(2.0))
            .add_journal_indicators(QualityIndicators::new(22, 2, 2021).with_impact_factor(3.0));

        let (journal, outcome) = merge_by_id::<Journal, _>(&mut store, &[2], 1).unwrap();

        assert_eq!(journal.issn.as_deref(), Some("1234-5678"));
        let saved = Repository::<Journal>::find_by_id(&store, 1).unwrap().unwrap();
        assert_eq!(saved, journal);
        assert!(Repository::<Journal>::find_by_id(&store, 2).unwrap().is_none());

        let paper = store.journal_papers().next().unwrap();
        assert_eq!(paper.journal, 1);
        assert_eq!(
            indicator_years(&store, 1),
            vec![(2020, Some(1.0)), (2021, Some(3.0))]
        );
        assert_eq!(store.journal_indicators().count(), 2);

        assert_eq!(outcome.merged, vec![2]);
        assert_eq!(outcome.filled_fields, vec!["issn"]);
        assert_eq!(outcome.reassigned_count(JournalPapers::NAME), 1);
        assert_eq!(outcome.reassigned_count(JournalIndicators::NAME), 1);
        assert_eq!(outcome.dropped_count(JournalIndicators::NAME), 1);
        assert!(outcome.target_saved);
    }

    #[test]
    fn test_cluster_then_merge_keeps_target_issn() {
        let mut store = MemoryStore::new();
        store
            .insert(Journal::new(1, "Journal X", "Springer").with_issn("1111"))
            .insert(Journal::new(2, "Journal X", "Springer"))
            .add_journal_paper(JournalPaper::new(10, "P1", 1))
            .add_journal_paper(JournalPaper::new(11, "P2", 2));
        let journals = Repository::<Journal>::list_all(&store).unwrap();

        let groups = DuplicateFinder::new()
            .with_similarity_level(0.8)
            .find_duplicates(&journals, &JournalNameComparator::new())
            .unwrap();
        assert_eq!(groups.len(), 1);
        let (target, sources) = groups[0].members().split_first().unwrap();
        assert_eq!(target.id, 1);

        let mut target = target.clone();
        let outcome = merge(&mut store, sources, &mut target).unwrap();

        assert_eq!(target.issn.as_deref(), Some("1111"));
        let saved = Repository::<Journal>::find_by_id(&store, 1).unwrap().unwrap();
        assert_eq!(saved.issn.as_deref(), Some("1111"));
        assert!(Repository::<Journal>::find_by_id(&store, 2).unwrap().is_none());
        assert!(store.journal_papers().all(|p| p.journal == 1));
        assert_eq!(outcome.merged, vec![2]);
        assert!(outcome.filled_fields.is_empty());
    }

    #[test]
    fn test_first_source_wins_for_each_field() {
        let mut store = MemoryStore::new();
        let mut target = Journal::new(1, "Journal X", "");
        let first = Journal::new(2, "", "Springer");
        let second = Journal::new(3, "", "Elsevier").with_issn("1234-5678");
        store
            .insert(target.clone())
            .insert(first.clone())
            .insert(second.clone());

        let outcome = merge(&mut store, &[first, second], &mut target).unwrap();

        assert_eq!(target.publisher.as_deref(), Some("Springer"));
        assert_eq!(target.issn.as_deref(), Some("1234-5678"));
        assert_eq!(outcome.merged, vec![2, 3]);
        assert_eq!(outcome.filled_fields, vec!["publisher", "issn"]);
    }

    #[test]
    fn test_unknown_relationship_blocks_deletion() {
        let mut store = MemoryStore::new();
        let mut target = Journal::new(1, "Journal X", "Springer");
        let source = Journal::new(2, "Journal X", "Springer");
        store
            .insert(target.clone())
            .insert(source.clone())
            .add_journal_paper(JournalPaper::new(10, "P", 2))
            .add_foreign_reference(EntityKind::Journal, 2, "editorial boards");

        let result = merge(&mut store, &[source], &mut target);

        assert_eq!(
            result.unwrap_err(),
            MergeError::UnhandledRelationship {
                kind: EntityKind::Journal,
                id: 2,
                relation: "editorial boards",
            }
        );
        assert!(Repository::<Journal>::find_by_id(&store, 2).unwrap().is_some());
    }
}
