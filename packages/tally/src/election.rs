//! The election aggregate and the builder that populates it.
//!
//! An [`ElectionBuilder`] is the only writable form of an election. Handlers
//! receive it mutably during one ingestion pass; [`ElectionBuilder::build`]
//! consumes it and returns an [`Election`] that only offers read access.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::types::{
    Candidate, ConstituencyTotal, CountMetadata, ElectedCandidate, Party, Region, RegionCategory,
    SeatResult, VoteRecord,
};

/// All ingested facts of one election.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Election {
    id: String,
    regions: Vec<Region>,
    parties: Vec<Party>,
    national_results: Vec<Party>,
    candidates: Vec<Candidate>,
    vote_records: Vec<VoteRecord>,
    seat_results: Vec<SeatResult>,
    constituency_totals: Vec<ConstituencyTotal>,
    count_metadata: Vec<CountMetadata>,
}

impl Election {
    /// Create an election without any data.
    ///
    /// Returned for identifiers that were never ingested.
    #[must_use]
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Parties registered in the election definition.
    #[must_use]
    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    /// National totals per party, in document order.
    #[must_use]
    pub fn national_results(&self) -> &[Party] {
        &self.national_results
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// De-duplicated municipality-level vote records.
    #[must_use]
    pub fn vote_records(&self) -> &[VoteRecord] {
        &self.vote_records
    }

    #[must_use]
    pub fn seat_results(&self) -> &[SeatResult] {
        &self.seat_results
    }

    #[must_use]
    pub fn constituency_totals(&self) -> &[ConstituencyTotal] {
        &self.constituency_totals
    }

    #[must_use]
    pub fn count_metadata(&self) -> &[CountMetadata] {
        &self.count_metadata
    }

    /// Check whether nothing was ingested for this election.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.parties.is_empty()
            && self.national_results.is_empty()
            && self.candidates.is_empty()
            && self.vote_records.is_empty()
            && self.seat_results.is_empty()
    }

    /// Regions of the constituency (kieskring) category.
    pub fn constituencies(&self) -> impl Iterator<Item = &Region> {
        self.regions_of(RegionCategory::Constituency)
    }

    /// Regions of the municipality (gemeente) category.
    pub fn municipalities(&self) -> impl Iterator<Item = &Region> {
        self.regions_of(RegionCategory::Municipality)
    }

    fn regions_of(&self, category: RegionCategory) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.category == category)
    }

    /// Distinct municipality names that have vote records, sorted.
    #[must_use]
    pub fn municipality_names(&self) -> Vec<&str> {
        self.vote_records
            .iter()
            .map(|r| r.municipality_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Names of the registered parties, in registration order.
    #[must_use]
    pub fn party_names(&self) -> Vec<&str> {
        self.parties.iter().map(|p| p.name.as_str()).collect()
    }

    #[must_use]
    pub fn party_count(&self) -> usize {
        self.parties.len()
    }

    /// Find the first registered party whose name contains `query`,
    /// ignoring case.
    #[must_use]
    pub fn find_party(&self, query: &str) -> Option<&Party> {
        let needle = query.to_lowercase();
        self.parties
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }
}

/// Writable election used during ingestion.
#[derive(Debug)]
pub struct ElectionBuilder {
    election: Election,
    seen_votes: HashSet<VoteRecord>,
}

impl ElectionBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            election: Election::empty(id),
            seen_votes: HashSet::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.election.id
    }

    pub fn add_region(&mut self, region: Region) {
        self.election.regions.push(region);
    }

    pub fn add_party(&mut self, party: Party) {
        self.election.parties.push(party);
    }

    pub fn add_national_result(&mut self, party: Party) {
        self.election.national_results.push(party);
    }

    pub fn add_candidate(&mut self, candidate: Candidate) {
        self.election.candidates.push(candidate);
    }

    /// Add a leaf vote record unless an identical one was already added.
    ///
    /// Returns `true` if the record was stored.
    pub fn add_vote_record(&mut self, record: VoteRecord) -> bool {
        if !self.seen_votes.insert(record.clone()) {
            return false;
        }
        self.election.vote_records.push(record);
        true
    }

    /// Make sure a seat entry for `party_name` exists.
    pub fn register_seat_party(&mut self, party_name: &str) {
        self.seat_entry(party_name);
    }

    /// Award one seat to `party_name` for an elected candidate.
    pub fn add_elected_candidate(&mut self, party_name: &str, candidate: ElectedCandidate) {
        let entry = self.seat_entry(party_name);
        entry.seats += 1;
        entry.elected.push(candidate);
    }

    fn seat_entry(&mut self, party_name: &str) -> &mut SeatResult {
        let results = &mut self.election.seat_results;
        let index = match results.iter().position(|s| s.party_name == party_name) {
            Some(index) => index,
            None => {
                results.push(SeatResult {
                    party_name: party_name.to_string(),
                    seats: 0,
                    elected: Vec::new(),
                });
                results.len() - 1
            }
        };
        &mut results[index]
    }

    pub fn add_constituency_total(&mut self, total: ConstituencyTotal) {
        self.election.constituency_totals.push(total);
    }

    pub fn add_count_metadata(&mut self, metadata: CountMetadata) {
        self.election.count_metadata.push(metadata);
    }

    /// Finish ingestion and return the read-only election.
    #[must_use]
    pub fn build(self) -> Election {
        self.election
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str, name: &str, category: &str) -> Region {
        Region {
            id: id.to_string(),
            name: name.to_string(),
            category: RegionCategory::parse(category),
            superior_category: None,
            superior_region_id: None,
        }
    }

    #[test]
    fn test_vote_record_deduplication() {
        let mut builder = ElectionBuilder::new("TK2023");

        assert!(builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 100)));
        assert!(!builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 100)));
        assert!(builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 50)));

        let election = builder.build();
        assert_eq!(election.vote_records().len(), 2);
    }

    #[test]
    fn test_seat_entries() {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.register_seat_party("VVD");
        builder.add_elected_candidate(
            "VVD",
            ElectedCandidate {
                candidate_id: Some("1".to_string()),
                ranking: Some(1),
            },
        );
        builder.add_elected_candidate(
            "D66",
            ElectedCandidate {
                candidate_id: Some("1".to_string()),
                ranking: None,
            },
        );

        let election = builder.build();
        let seats: Vec<_> = election
            .seat_results()
            .iter()
            .map(|s| (s.party_name.as_str(), s.seats))
            .collect();
        assert_eq!(seats, vec![("VVD", 1), ("D66", 1)]);
    }

    #[test]
    fn test_region_filters() {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.add_region(region("1", "Groningen", "KIESKRING"));
        builder.add_region(region("0014", "Groningen", "GEMEENTE"));
        builder.add_region(region("0003", "Appingedam", "GEMEENTE"));
        let election = builder.build();

        assert_eq!(election.constituencies().count(), 1);
        assert_eq!(election.municipalities().count(), 2);
    }

    #[test]
    fn test_find_party_case_insensitive() {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.add_party(Party::registered("TK2023", "Partij voor de Vrijheid (PVV)"));
        builder.add_party(Party::registered("TK2023", "VVD"));
        let election = builder.build();

        assert_eq!(
            election.find_party("pvv").map(|p| p.name.as_str()),
            Some("Partij voor de Vrijheid (PVV)")
        );
        assert!(election.find_party("CDA").is_none());
        assert_eq!(election.party_count(), 2);
        assert_eq!(election.party_names(), vec!["Partij voor de Vrijheid (PVV)", "VVD"]);
    }

    #[test]
    fn test_municipality_names_distinct_sorted() {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.add_vote_record(VoteRecord::new("Utrecht", "VVD", 1));
        builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 1));
        builder.add_vote_record(VoteRecord::new("Utrecht", "D66", 1));
        let election = builder.build();

        assert_eq!(election.municipality_names(), vec!["Amsterdam", "Utrecht"]);
    }

    #[test]
    fn test_empty_election() {
        let election = Election::empty("TK2099");
        assert_eq!(election.id(), "TK2099");
        assert!(election.is_empty());
        assert!(election.regions().is_empty());
    }
}
