//! Core data types for an ingested election.
//!
//! These mirror the facts published in the Kiesraad EML files: the region
//! tree from the election definition, registered parties, candidates and the
//! vote counts per reporting unit.

use serde::{Deserialize, Serialize};

/// Level of a region in the election tree.
///
/// The EML files use Dutch category names (`KIESKRING`, `GEMEENTE`, ...);
/// the English names are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionCategory {
    /// The whole country.
    Nation,
    /// Province (provincie).
    Province,
    /// Electoral district (kieskring).
    Constituency,
    /// Municipality (gemeente).
    Municipality,
    /// Any category this crate has no special handling for.
    Other(String),
}

impl RegionCategory {
    /// Parse a category as it appears in `RegionCategory` attributes.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        match text.trim().to_uppercase().as_str() {
            "LAND" | "NATIONAAL" | "NATION" => Self::Nation,
            "PROVINCIE" | "PROVINCE" => Self::Province,
            "KIESKRING" | "CONSTITUENCY" => Self::Constituency,
            "GEMEENTE" | "MUNICIPALITY" => Self::Municipality,
            other => Self::Other(other.to_string()),
        }
    }

    /// Get the canonical EML name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nation => "LAND",
            Self::Province => "PROVINCIE",
            Self::Constituency => "KIESKRING",
            Self::Municipality => "GEMEENTE",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for RegionCategory {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<RegionCategory> for String {
    fn from(value: RegionCategory) -> Self {
        value.as_str().to_string()
    }
}

/// A node of the election tree (country, constituency, municipality, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region number, unique within its category.
    pub id: String,

    pub name: String,

    pub category: RegionCategory,

    /// Category of the parent region (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superior_category: Option<RegionCategory>,

    /// Region number of the parent region (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superior_region_id: Option<String>,
}

/// A party, either as registered in the definition or with national results.
///
/// Registered parties only carry a name; national results also carry votes,
/// and seats and percentage once a distribution has been computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub election_id: String,
    pub name: String,
    pub votes: u64,
    pub seats: u32,
    pub percentage: f64,
}

impl Party {
    /// Create a party stub with only a name.
    #[must_use]
    pub fn registered(election_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_votes(election_id, name, 0)
    }

    /// Create a party result with a vote count.
    #[must_use]
    pub fn with_votes(election_id: impl Into<String>, name: impl Into<String>, votes: u64) -> Self {
        Self {
            election_id: election_id.into(),
            name: name.into(),
            votes,
            seats: 0,
            percentage: 0.0,
        }
    }
}

/// A candidate on a party list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    /// Contest (kieskring or `alle`) the list was submitted in.
    pub contest_id: Option<String>,

    /// Position identifier of the candidate on the list.
    pub candidate_id: Option<String>,

    pub initials: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub locality: Option<String>,
    pub party_name: Option<String>,
}

impl Candidate {
    /// Full display name: first name (or initials) and last name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let given = self.first_name.as_deref().or(self.initials.as_deref());
        [given, self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Valid votes for one party in one municipality (a leaf fact).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteRecord {
    pub municipality_name: String,
    pub party_name: String,
    pub valid_votes: u64,
}

impl VoteRecord {
    #[must_use]
    pub fn new(
        municipality_name: impl Into<String>,
        party_name: impl Into<String>,
        valid_votes: u64,
    ) -> Self {
        Self {
            municipality_name: municipality_name.into(),
            party_name: party_name.into(),
            valid_votes,
        }
    }
}

/// A candidate declared elected in the seat results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectedCandidate {
    pub candidate_id: Option<String>,
    pub ranking: Option<u32>,
}

/// Official seat outcome for one party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatResult {
    pub party_name: String,
    pub seats: u32,
    pub elected: Vec<ElectedCandidate>,
}

/// Official aggregated count of one party in one constituency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituencyTotal {
    pub contest_id: Option<String>,
    pub contest_name: Option<String>,
    pub party_name: String,
    pub votes: u64,
}

/// Turnout counters of a reporting unit or roll-up.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountMetadata {
    pub aggregated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<String>,
    pub cast: u64,
    pub total_counted: u64,
    /// Rejected votes keyed by reason code (`ongeldig`, `blanco`).
    pub rejected: std::collections::BTreeMap<String, u64>,
    /// Uncounted votes keyed by reason code.
    pub uncounted: std::collections::BTreeMap<String, u64>,
}
