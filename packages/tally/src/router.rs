//! File-role routing by filename prefix.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{
    CANDIDATE_LISTS_PREFIX, CONSTITUENCY_TOTALS_PREFIX, DEFINITIONS_PREFIX,
    NATIONAL_TOTALS_PREFIX, SEAT_RESULTS_PREFIX,
};
use crate::registry::{
    candidate_lists_registry, constituency_totals_registry, definitions_registry,
    national_totals_registry, seat_results_registry, HandlerRegistry,
};
use crate::resource::Resource;

/// Logical role of a source file within one election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    /// Regions and registered parties.
    Definitions,
    CandidateLists,
    /// Official seat distribution and elected candidates.
    SeatResults,
    /// National totals, plus leaf municipality data.
    NationalTotals,
    /// Per-constituency counts, plus leaf municipality data.
    ConstituencyTotals,
}

impl FileRole {
    /// All roles in ingestion order.
    pub const ALL: [FileRole; 5] = [
        Self::Definitions,
        Self::CandidateLists,
        Self::SeatResults,
        Self::NationalTotals,
        Self::ConstituencyTotals,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Definitions => "definitions",
            Self::CandidateLists => "candidate_lists",
            Self::SeatResults => "seat_results",
            Self::NationalTotals => "national_totals",
            Self::ConstituencyTotals => "constituency_totals",
        }
    }

    /// Filename prefix of this role for an election.
    ///
    /// # Examples
    /// ```
    /// use kiesuitslag_tally::router::FileRole;
    ///
    /// assert_eq!(FileRole::SeatResults.prefix("TK2023"), "Resultaat_TK2023");
    /// assert_eq!(
    ///     FileRole::ConstituencyTotals.prefix("TK2023"),
    ///     "Telling_TK2023_kieskring"
    /// );
    /// ```
    #[must_use]
    pub fn prefix(&self, election_id: &str) -> String {
        match self {
            Self::Definitions => format!("{DEFINITIONS_PREFIX}{election_id}"),
            Self::CandidateLists => format!("{CANDIDATE_LISTS_PREFIX}{election_id}"),
            Self::SeatResults => format!("{SEAT_RESULTS_PREFIX}{election_id}"),
            Self::NationalTotals => format!("{NATIONAL_TOTALS_PREFIX}{election_id}"),
            Self::ConstituencyTotals => {
                format!("{CONSTITUENCY_TOTALS_PREFIX}{election_id}_kieskring")
            }
        }
    }

    /// Check whether a filename belongs to this role.
    #[must_use]
    pub fn matches(&self, filename: &str, election_id: &str) -> bool {
        filename.starts_with(&self.prefix(election_id))
    }

    /// Handler registry used for files of this role.
    #[must_use]
    pub fn registry(&self) -> HandlerRegistry {
        match self {
            Self::Definitions => definitions_registry(),
            Self::CandidateLists => candidate_lists_registry(),
            Self::SeatResults => seat_results_registry(),
            Self::NationalTotals => national_totals_registry(),
            Self::ConstituencyTotals => constituency_totals_registry(),
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the resources of one role, keeping their order.
pub fn select<'a>(
    resources: &'a [Box<dyn Resource>],
    role: FileRole,
    election_id: &str,
) -> Vec<&'a dyn Resource> {
    let prefix = role.prefix(election_id);
    resources
        .iter()
        .filter(|r| r.filename().starts_with(&prefix))
        .map(|r| r.as_ref())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::MemoryResource;

    fn resources(names: &[&str]) -> Vec<Box<dyn Resource>> {
        names
            .iter()
            .map(|name| Box::new(MemoryResource::new(*name, "<x/>")) as Box<dyn Resource>)
            .collect()
    }

    #[test]
    fn test_select_by_prefix() {
        let resources = resources(&[
            "Verkiezingsdefinitie_TK2023.eml.xml",
            "Telling_TK2023_kieskring_Groningen.eml.xml",
            "Telling_TK2023_gemeente_Appingedam.eml.xml",
            "Totaaltelling_TK2023.eml.xml",
            "Totaaltelling_TK2021.eml.xml",
        ]);

        let names = |role| {
            select(&resources, role, "TK2023")
                .iter()
                .map(|r| r.filename().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(FileRole::Definitions), vec!["Verkiezingsdefinitie_TK2023.eml.xml"]);
        assert_eq!(
            names(FileRole::ConstituencyTotals),
            vec!["Telling_TK2023_kieskring_Groningen.eml.xml"]
        );
        assert_eq!(names(FileRole::NationalTotals), vec!["Totaaltelling_TK2023.eml.xml"]);
        assert!(names(FileRole::SeatResults).is_empty());
    }

    #[test]
    fn test_role_matches() {
        assert!(FileRole::CandidateLists.matches("Kandidatenlijsten_TK2023_Groningen.eml.xml", "TK2023"));
        assert!(!FileRole::CandidateLists.matches("Kandidatenlijsten_TK2021.eml.xml", "TK2023"));
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&FileRole::NationalTotals).unwrap();
        assert_eq!(json, "\"national_totals\"");
    }
}
