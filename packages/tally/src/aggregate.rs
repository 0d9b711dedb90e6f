//! Vote aggregation over the leaf vote records of an election.
//!
//! Both entry points are pure: they read the election and return fresh,
//! deterministically ordered results.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::election::Election;
use crate::types::{Region, RegionCategory, VoteRecord};

/// Summed votes of one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyTotal {
    pub party: String,
    pub votes: u64,
}

/// Party totals of one constituency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituencyResult {
    pub name: String,
    pub parties: Vec<PartyTotal>,
}

impl ConstituencyResult {
    /// Total votes over all parties.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.parties.iter().map(|p| p.votes).sum()
    }
}

/// Party totals for one municipality.
///
/// The municipality name is matched case-insensitively. Parties are sorted by
/// votes descending, ties by party name. Unknown municipalities give an
/// empty list.
///
/// # Example
/// ```
/// use kiesuitslag_tally::aggregate::aggregate_by_municipality;
/// use kiesuitslag_tally::election::ElectionBuilder;
/// use kiesuitslag_tally::types::VoteRecord;
///
/// let mut builder = ElectionBuilder::new("TK2023");
/// builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 100));
/// builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 50));
/// builder.add_vote_record(VoteRecord::new("Amsterdam", "D66", 200));
/// let election = builder.build();
///
/// let totals = aggregate_by_municipality(&election, "amsterdam");
/// assert_eq!(totals[0].party, "D66");
/// assert_eq!(totals[1].votes, 150);
/// ```
#[must_use]
pub fn aggregate_by_municipality(election: &Election, municipality: &str) -> Vec<PartyTotal> {
    let needle = municipality.to_lowercase();
    sum_by_party(
        election
            .vote_records()
            .iter()
            .filter(|r| r.municipality_name.to_lowercase() == needle),
    )
}

/// Party totals per constituency, sorted by constituency name.
///
/// Municipalities are mapped to their constituency through the region tree.
/// A municipality whose parent region is missing or is not a constituency
/// is left out here; it still shows up in [`aggregate_by_municipality`].
#[must_use]
pub fn aggregate_by_constituency(election: &Election) -> Vec<ConstituencyResult> {
    let constituency_of = municipality_constituencies(election);

    let mut grouped: BTreeMap<&str, Vec<&VoteRecord>> = BTreeMap::new();
    for record in election.vote_records() {
        if let Some(&constituency) = constituency_of.get(record.municipality_name.as_str()) {
            grouped.entry(constituency).or_default().push(record);
        }
    }

    grouped
        .into_iter()
        .map(|(name, records)| ConstituencyResult {
            name: name.to_string(),
            parties: sum_by_party(records),
        })
        .collect()
}

/// Map municipality names to the name of their constituency.
fn municipality_constituencies(election: &Election) -> HashMap<&str, &str> {
    let mut constituencies: HashMap<&str, &Region> = HashMap::new();
    for region in election.constituencies() {
        constituencies.entry(region.id.as_str()).or_insert(region);
    }

    let mut mapping = HashMap::new();
    for municipality in election.municipalities() {
        let parent = municipality
            .superior_region_id
            .as_deref()
            .and_then(|id| constituencies.get(id).copied());

        // A declared parent category other than KIESKRING cannot resolve
        let declared_ok = municipality
            .superior_category
            .as_ref()
            .is_none_or(|c| *c == RegionCategory::Constituency);

        match parent {
            Some(parent) if declared_ok => {
                mapping
                    .entry(municipality.name.as_str())
                    .or_insert(parent.name.as_str());
            }
            _ => {
                tracing::debug!(
                    municipality = %municipality.name,
                    parent = ?municipality.superior_region_id,
                    "Municipality without constituency parent, excluded"
                );
            }
        }
    }
    mapping
}

fn sum_by_party<'a>(records: impl IntoIterator<Item = &'a VoteRecord>) -> Vec<PartyTotal> {
    let mut sums: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *sums.entry(record.party_name.as_str()).or_default() += record.valid_votes;
    }

    let mut totals: Vec<PartyTotal> = sums
        .into_iter()
        .map(|(party, votes)| PartyTotal {
            party: party.to_string(),
            votes,
        })
        .collect();
    totals.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.party.cmp(&b.party)));
    totals
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::election::ElectionBuilder;

    fn region(id: &str, name: &str, category: &str, parent: Option<&str>) -> Region {
        Region {
            id: id.to_string(),
            name: name.to_string(),
            category: RegionCategory::parse(category),
            superior_category: parent.map(|_| RegionCategory::Constituency),
            superior_region_id: parent.map(str::to_string),
        }
    }

    fn total(party: &str, votes: u64) -> PartyTotal {
        PartyTotal {
            party: party.to_string(),
            votes,
        }
    }

    fn sample() -> Election {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.add_region(region("1", "Groningen", "KIESKRING", None));
        builder.add_region(region("9", "Amsterdam", "KIESKRING", None));
        builder.add_region(region("0003", "Appingedam", "GEMEENTE", Some("1")));
        builder.add_region(region("0014", "Groningen", "GEMEENTE", Some("1")));
        builder.add_region(region("0363", "Amsterdam", "GEMEENTE", Some("9")));
        builder.add_region(region("9999", "Nergenshuizen", "GEMEENTE", Some("42")));

        for (municipality, party, votes) in [
            ("Appingedam", "VVD", 1000),
            ("Appingedam", "D66", 500),
            ("Groningen", "D66", 9000),
            ("Groningen", "VVD", 4000),
            ("Amsterdam", "VVD", 100),
            ("Amsterdam", "VVD", 50),
            ("Amsterdam", "D66", 200),
            ("Nergenshuizen", "VVD", 7),
        ] {
            builder.add_vote_record(VoteRecord::new(municipality, party, votes));
        }
        builder.build()
    }

    #[test]
    fn test_aggregate_by_municipality() {
        let election = sample();
        assert_eq!(
            aggregate_by_municipality(&election, "Amsterdam"),
            vec![total("D66", 200), total("VVD", 150)]
        );
        assert_eq!(
            aggregate_by_municipality(&election, "AMSTERDAM"),
            aggregate_by_municipality(&election, "amsterdam")
        );
    }

    #[test]
    fn test_aggregate_by_municipality_unknown() {
        let election = sample();
        assert!(aggregate_by_municipality(&election, "Atlantis").is_empty());
        assert!(aggregate_by_municipality(&Election::empty("TK2099"), "Amsterdam").is_empty());
    }

    #[test]
    fn test_aggregate_ties_by_name() {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.add_vote_record(VoteRecord::new("Urk", "SGP", 10));
        builder.add_vote_record(VoteRecord::new("Urk", "CU", 10));
        builder.add_vote_record(VoteRecord::new("Urk", "BBB", 11));
        let election = builder.build();

        assert_eq!(
            aggregate_by_municipality(&election, "Urk"),
            vec![total("BBB", 11), total("CU", 10), total("SGP", 10)]
        );
    }

    #[test]
    fn test_aggregate_by_constituency() {
        let election = sample();
        let results = aggregate_by_constituency(&election);

        assert_eq!(
            results,
            vec![
                ConstituencyResult {
                    name: "Amsterdam".to_string(),
                    parties: vec![total("D66", 200), total("VVD", 150)],
                },
                ConstituencyResult {
                    name: "Groningen".to_string(),
                    parties: vec![total("D66", 9500), total("VVD", 5000)],
                },
            ]
        );
    }

    #[test]
    fn test_unresolvable_parent_excluded_from_constituencies_only() {
        let election = sample();

        let in_constituencies: u64 = aggregate_by_constituency(&election)
            .iter()
            .map(ConstituencyResult::total_votes)
            .sum();
        let all: u64 = election.vote_records().iter().map(|r| r.valid_votes).sum();
        assert_eq!(in_constituencies, all - 7);

        assert_eq!(
            aggregate_by_municipality(&election, "Nergenshuizen"),
            vec![total("VVD", 7)]
        );
    }

    #[test]
    fn test_parent_of_wrong_category_is_unresolvable() {
        let mut builder = ElectionBuilder::new("TK2023");
        builder.add_region(region("20", "Noord-Holland", "PROVINCIE", None));
        builder.add_region(region("0363", "Amsterdam", "GEMEENTE", Some("20")));
        builder.add_vote_record(VoteRecord::new("Amsterdam", "VVD", 1));
        let election = builder.build();

        assert!(aggregate_by_constituency(&election).is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let election = sample();
        assert_eq!(
            aggregate_by_constituency(&election),
            aggregate_by_constituency(&election)
        );
        assert_eq!(
            aggregate_by_municipality(&election, "Groningen"),
            aggregate_by_municipality(&election, "Groningen")
        );
    }
}
