//! Master data entities and the records that point at them.
//!
//! All descriptive fields are optional. An empty string counts as absent, as
//! does a zero h-index: merging fills such fields from the merged record and
//! never overwrites a value that is already set.

use crate::{Entity, EntityId, EntityKind};
use serde::{Deserialize, Serialize};

/// Field name constants used in merge outcomes.
pub mod fields {
    pub const NAME: &str = "name";
    pub const ACRONYM: &str = "acronym";
    pub const PUBLISHER: &str = "publisher";
    pub const ADDRESS: &str = "address";
    pub const URL: &str = "url";
    pub const SCIMAGO_ID: &str = "scimago_id";
    pub const SCIMAGO_CATEGORY: &str = "scimago_category";
    pub const WOS_ID: &str = "wos_id";
    pub const WOS_CATEGORY: &str = "wos_category";
    pub const ISBN: &str = "isbn";
    pub const ISSN: &str = "issn";
    pub const CORE_ID: &str = "core_id";
    pub const ENCLOSING_CONFERENCE: &str = "enclosing_conference";
    pub const DESCRIPTION: &str = "description";
    pub const RNSR: &str = "rnsr";
    pub const COUNTRY: &str = "country";
    pub const KIND: &str = "kind";
    pub const LOGO: &str = "logo";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const GENDER: &str = "gender";
    pub const EMAIL: &str = "email";
    pub const ORCID: &str = "orcid";
    pub const RESEARCHER_ID: &str = "researcher_id";
    pub const SCOPUS_ID: &str = "scopus_id";
    pub const GOOGLE_SCHOLAR_ID: &str = "google_scholar_id";
    pub const DBLP_URL: &str = "dblp_url";
    pub const WEBPAGE_ID: &str = "webpage_id";
    pub const BIOGRAPHY: &str = "biography";
    pub const GOOGLE_SCHOLAR_HINDEX: &str = "google_scholar_hindex";
    pub const WOS_HINDEX: &str = "wos_hindex";
    pub const SCOPUS_HINDEX: &str = "scopus_hindex";
}

/// An entity whose empty fields can be filled from a duplicate.
pub trait Mergeable: Entity + Clone {
    /// Copies every value of `source` into the matching field of `self` when
    /// that field is empty. Returns the names of the filled fields.
    fn absorb(&mut self, source: &Self) -> Vec<&'static str>;
}

/// Collects the names of the fields filled during one absorb.
#[derive(Default)]
struct FieldFiller {
    filled: Vec<&'static str>,
}

impl FieldFiller {
    fn text(&mut self, name: &'static str, target: &mut Option<String>, source: &Option<String>) {
        if is_blank(target) && !is_blank(source) {
            target.clone_from(source);
            self.filled.push(name);
        }
    }

    fn value<T: Clone>(&mut self, name: &'static str, target: &mut Option<T>, source: &Option<T>) {
        if target.is_none() && source.is_some() {
            target.clone_from(source);
            self.filled.push(name);
        }
    }

    fn count(&mut self, name: &'static str, target: &mut u32, source: u32) {
        if *target == 0 && source > 0 {
            *target = source;
            self.filled.push(name);
        }
    }

    fn into_filled(self) -> Vec<&'static str> {
        self.filled
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// A scientific journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub id: EntityId,
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub address: Option<String>,
    pub url: Option<String>,
    pub scimago_id: Option<String>,
    pub scimago_category: Option<String>,
    pub wos_id: Option<String>,
    pub wos_category: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
}

impl Journal {
    pub fn new(id: EntityId, name: &str, publisher: &str) -> Self {
        Self {
            id,
            name: non_empty(name),
            publisher: non_empty(publisher),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_issn(mut self, issn: &str) -> Self {
        self.issn = non_empty(issn);
        self
    }
}

impl Entity for Journal {
    const KIND: EntityKind = EntityKind::Journal;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_default()
    }
}

impl Mergeable for Journal {
    fn absorb(&mut self, source: &Self) -> Vec<&'static str> {
        let mut filler = FieldFiller::default();
        filler.text(fields::NAME, &mut self.name, &source.name);
        filler.text(fields::PUBLISHER, &mut self.publisher, &source.publisher);
        filler.text(fields::ADDRESS, &mut self.address, &source.address);
        filler.text(fields::URL, &mut self.url, &source.url);
        filler.text(fields::SCIMAGO_ID, &mut self.scimago_id, &source.scimago_id);
        filler.text(
            fields::SCIMAGO_CATEGORY,
            &mut self.scimago_category,
            &source.scimago_category,
        );
        filler.text(fields::WOS_ID, &mut self.wos_id, &source.wos_id);
        filler.text(fields::WOS_CATEGORY, &mut self.wos_category, &source.wos_category);
        filler.text(fields::ISBN, &mut self.isbn, &source.isbn);
        filler.text(fields::ISSN, &mut self.issn, &source.issn);
        filler.into_filled()
    }
}

/// A conference, possibly enclosed in a larger event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    pub id: EntityId,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub url: Option<String>,
    pub core_id: Option<String>,
    pub isbn: Option<String>,
    pub enclosing_conference: Option<EntityId>,
}

impl Conference {
    pub fn new(id: EntityId, acronym: &str, name: &str) -> Self {
        Self {
            id,
            acronym: non_empty(acronym),
            name: non_empty(name),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn enclosed_in(mut self, conference: EntityId) -> Self {
        self.enclosing_conference = Some(conference);
        self
    }
}

impl Entity for Conference {
    const KIND: EntityKind = EntityKind::Conference;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.acronym
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }
}

impl Mergeable for Conference {
    fn absorb(&mut self, source: &Self) -> Vec<&'static str> {
        let mut filler = FieldFiller::default();
        filler.text(fields::ACRONYM, &mut self.acronym, &source.acronym);
        filler.text(fields::NAME, &mut self.name, &source.name);
        filler.text(fields::PUBLISHER, &mut self.publisher, &source.publisher);
        filler.text(fields::URL, &mut self.url, &source.url);
        filler.text(fields::CORE_ID, &mut self.core_id, &source.core_id);
        filler.text(fields::ISBN, &mut self.isbn, &source.isbn);
        // A conference cannot enclose itself.
        if source.enclosing_conference != Some(self.id) {
            filler.value(
                fields::ENCLOSING_CONFERENCE,
                &mut self.enclosing_conference,
                &source.enclosing_conference,
            );
        }
        filler.into_filled()
    }
}

/// A research organization: university, laboratory, team, company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: EntityId,
    pub acronym: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub rnsr: Option<String>,
    /// ISO 3166 country code.
    pub country: Option<String>,
    pub kind: Option<String>,
    pub url: Option<String>,
    pub logo: Option<String>,
}

impl Organization {
    pub fn new(id: EntityId, acronym: &str, name: &str) -> Self {
        Self {
            id,
            acronym: non_empty(acronym),
            name: non_empty(name),
            ..Default::default()
        }
    }
}

impl Entity for Organization {
    const KIND: EntityKind = EntityKind::Organization;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.acronym
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }
}

impl Mergeable for Organization {
    fn absorb(&mut self, source: &Self) -> Vec<&'static str> {
        let mut filler = FieldFiller::default();
        filler.text(fields::ACRONYM, &mut self.acronym, &source.acronym);
        filler.text(fields::NAME, &mut self.name, &source.name);
        filler.text(fields::DESCRIPTION, &mut self.description, &source.description);
        filler.text(fields::RNSR, &mut self.rnsr, &source.rnsr);
        filler.text(fields::COUNTRY, &mut self.country, &source.country);
        filler.text(fields::KIND, &mut self.kind, &source.kind);
        filler.text(fields::URL, &mut self.url, &source.url);
        filler.text(fields::LOGO, &mut self.logo, &source.logo);
        filler.into_filled()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Other,
}

/// A person: researcher, engineer, student, external collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: EntityId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub orcid: Option<String>,
    pub researcher_id: Option<String>,
    pub scopus_id: Option<String>,
    pub google_scholar_id: Option<String>,
    pub dblp_url: Option<String>,
    pub webpage_id: Option<String>,
    pub biography: Option<String>,
    /// Zero means unknown.
    pub google_scholar_hindex: u32,
    pub wos_hindex: u32,
    pub scopus_hindex: u32,
}

impl Person {
    pub fn new(id: EntityId, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: non_empty(first_name),
            last_name: non_empty(last_name),
            ..Default::default()
        }
    }
}

impl Entity for Person {
    const KIND: EntityKind = EntityKind::Person;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        }
    }
}

impl Mergeable for Person {
    fn absorb(&mut self, source: &Self) -> Vec<&'static str> {
        let mut filler = FieldFiller::default();
        filler.text(fields::FIRST_NAME, &mut self.first_name, &source.first_name);
        filler.text(fields::LAST_NAME, &mut self.last_name, &source.last_name);
        filler.value(fields::GENDER, &mut self.gender, &source.gender);
        filler.text(fields::EMAIL, &mut self.email, &source.email);
        filler.text(fields::ORCID, &mut self.orcid, &source.orcid);
        filler.text(fields::RESEARCHER_ID, &mut self.researcher_id, &source.researcher_id);
        filler.text(fields::SCOPUS_ID, &mut self.scopus_id, &source.scopus_id);
        filler.text(
            fields::GOOGLE_SCHOLAR_ID,
            &mut self.google_scholar_id,
            &source.google_scholar_id,
        );
        filler.text(fields::DBLP_URL, &mut self.dblp_url, &source.dblp_url);
        filler.text(fields::WEBPAGE_ID, &mut self.webpage_id, &source.webpage_id);
        filler.text(fields::BIOGRAPHY, &mut self.biography, &source.biography);
        filler.count(
            fields::GOOGLE_SCHOLAR_HINDEX,
            &mut self.google_scholar_hindex,
            source.google_scholar_hindex,
        );
        filler.count(fields::WOS_HINDEX, &mut self.wos_hindex, source.wos_hindex);
        filler.count(fields::SCOPUS_HINDEX, &mut self.scopus_hindex, source.scopus_hindex);
        filler.into_filled()
    }
}

/// A publication as stored, or as parsed from an import file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub id: EntityId,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
    pub issn: Option<String>,
    /// Name of the journal, conference or publisher the publication appeared in.
    pub target: Option<String>,
}

impl Publication {
    pub fn new(id: EntityId, title: &str, year: i32) -> Self {
        Self {
            id,
            title: non_empty(title),
            year: Some(year),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_doi(mut self, doi: &str) -> Self {
        self.doi = non_empty(doi);
        self
    }

    #[must_use]
    pub fn with_issn(mut self, issn: &str) -> Self {
        self.issn = non_empty(issn);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: &str) -> Self {
        self.target = non_empty(target);
        self
    }
}

impl Entity for Publication {
    const KIND: EntityKind = EntityKind::Publication;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> String {
        self.title.clone().unwrap_or_default()
    }
}

/// A paper or edition published in a journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPaper {
    pub id: EntityId,
    pub title: Option<String>,
    pub journal: EntityId,
}

impl JournalPaper {
    pub fn new(id: EntityId, title: &str, journal: EntityId) -> Self {
        Self {
            id,
            title: non_empty(title),
            journal,
        }
    }
}

/// A paper or keynote presented at a conference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferencePaper {
    pub id: EntityId,
    pub title: Option<String>,
    pub conference: EntityId,
    pub keynote: bool,
}

impl ConferencePaper {
    pub fn new(id: EntityId, title: &str, conference: EntityId) -> Self {
        Self {
            id,
            title: non_empty(title),
            conference,
            keynote: false,
        }
    }

    #[must_use]
    pub fn keynote(mut self) -> Self {
        self.keynote = true;
        self
    }
}

/// Rankings of a journal or conference for one reference year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityIndicators {
    pub id: EntityId,
    pub owner: EntityId,
    pub reference_year: i32,
    pub impact_factor: Option<f64>,
    pub scimago_quartile: Option<String>,
    pub wos_quartile: Option<String>,
    pub core_ranking: Option<String>,
}

impl QualityIndicators {
    pub fn new(id: EntityId, owner: EntityId, reference_year: i32) -> Self {
        Self {
            id,
            owner,
            reference_year,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_impact_factor(mut self, impact_factor: f64) -> Self {
        self.impact_factor = Some(impact_factor);
        self
    }
}

/// Membership of a person in an organization, optionally through a super
/// organization (a team inside a laboratory, for instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: EntityId,
    pub person: EntityId,
    pub organization: EntityId,
    pub super_organization: Option<EntityId>,
}

impl Membership {
    pub fn new(id: EntityId, person: EntityId, organization: EntityId) -> Self {
        Self {
            id,
            person,
            organization,
            super_organization: None,
        }
    }

    #[must_use]
    pub fn through(mut self, super_organization: EntityId) -> Self {
        self.super_organization = Some(super_organization);
        self
    }
}

/// A person's position in the author list of a publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorship {
    pub id: EntityId,
    pub person: EntityId,
    pub publication: EntityId,
    pub rank: u32,
}

impl Authorship {
    pub fn new(id: EntityId, person: EntityId, publication: EntityId, rank: u32) -> Self {
        Self {
            id,
            person,
            publication,
            rank,
        }
    }
}

/// Participation of a person in the jury of a candidate's defense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryMembership {
    pub id: EntityId,
    /// The jury member.
    pub person: EntityId,
    pub candidate: EntityId,
    /// Supervisors of the candidate, in display order.
    pub promoters: Vec<EntityId>,
}

impl JuryMembership {
    pub fn new(id: EntityId, person: EntityId, candidate: EntityId) -> Self {
        Self {
            id,
            person,
            candidate,
            promoters: Vec::new(),
        }
    }

    #[must_use]
    pub fn promoted_by(mut self, promoter: EntityId) -> Self {
        self.promoters.push(promoter);
        self
    }
}

/// The position of one promoter in the promoter list of a jury membership.
///
/// A view over [`JuryMembership::promoters`], not a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuryPromotion {
    pub jury_membership: EntityId,
    pub promoter: EntityId,
}

/// A person supervising a thesis or an internship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supervisor {
    pub id: EntityId,
    pub person: EntityId,
    pub supervision: EntityId,
    /// Share of the supervision, in percent.
    pub percentage: u8,
}

impl Supervisor {
    pub fn new(id: EntityId, person: EntityId, supervision: EntityId, percentage: u8) -> Self {
        Self {
            id,
            person,
            supervision,
            percentage,
        }
    }
}

/// A visit of a guest researcher invited by a member of the laboratory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: EntityId,
    pub guest: EntityId,
    pub inviter: EntityId,
}

impl Invitation {
    pub fn new(id: EntityId, guest: EntityId, inviter: EntityId) -> Self {
        Self { id, guest, inviter }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_journal_absorb_fills_only_empty_fields() {
        let mut target = Journal::new(1, "Journal X", "Springer");
        target.url = Some(String::new());
        let mut source = Journal::new(2, "Journal of X", "Elsevier").with_issn("1234-5678");
        source.url = Some("https://x.example".to_string());

        let filled = target.absorb(&source);

        assert_eq!(filled, vec![fields::URL, fields::ISSN]);
        assert_eq!(target.name.as_deref(), Some("Journal X"));
        assert_eq!(target.publisher.as_deref(), Some("Springer"));
        assert_eq!(target.url.as_deref(), Some("https://x.example"));
        assert_eq!(target.issn.as_deref(), Some("1234-5678"));
    }

    #[test]
    fn test_person_absorb_treats_zero_hindex_as_empty() {
        let mut target = Person::new(1, "Stéphane", "Galland");
        target.wos_hindex = 12;
        let mut source = Person::new(2, "S.", "Galland");
        source.wos_hindex = 3;
        source.scopus_hindex = 20;
        source.orcid = Some("0000-0001-9115-6245".to_string());
        source.gender = Some(Gender::Male);

        let filled = target.absorb(&source);

        assert_eq!(
            filled,
            vec![fields::GENDER, fields::ORCID, fields::SCOPUS_HINDEX]
        );
        assert_eq!(target.first_name.as_deref(), Some("Stéphane"));
        assert_eq!(target.wos_hindex, 12);
        assert_eq!(target.scopus_hindex, 20);
    }

    #[test]
    fn test_conference_absorb_never_encloses_itself() {
        let mut target = Conference::new(1, "EMAS", "");
        let source = Conference::new(2, "", "Engineering Multi-Agent Systems").enclosed_in(1);

        let filled = target.absorb(&source);

        assert_eq!(filled, vec![fields::NAME]);
        assert_eq!(target.enclosing_conference, None);
    }

    #[test]
    fn test_absorb_is_idempotent() {
        let mut target = Organization::new(1, "CIAD", "");
        let mut source = Organization::new(2, "", "Connaissance et Intelligence Artificielle");
        source.country = Some("FR".to_string());
        assert_eq!(target.absorb(&source).len(), 2);
        assert!(target.absorb(&source).is_empty());
    }

    #[test]
    fn test_person_label() {
        assert_eq!(Person::new(1, "Ana", "Lopez").label(), "Ana Lopez");
        assert_eq!(Person::new(1, "", "Lopez").label(), "Lopez");
    }
}
