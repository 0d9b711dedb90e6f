//! Configuration constants, validation and environment configuration.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, TallyError};

/// Number of seats in the Tweede Kamer.
pub const DEFAULT_TOTAL_SEATS: u32 = 150;

/// Buffer size used when streaming a source file from disk.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Elections loaded by `load` when nothing else is configured.
pub const DEFAULT_ELECTION_IDS: &[&str] = &["TK2025", "TK2023", "TK2021"];

/// Election used when a command does not name one.
pub const DEFAULT_ELECTION_ID: &str = "TK2025";

/// Default root directory holding one sub-directory per election.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Filename prefix of the election definition (regions and parties).
pub const DEFINITIONS_PREFIX: &str = "Verkiezingsdefinitie_";

/// Filename prefix of the candidate lists.
pub const CANDIDATE_LISTS_PREFIX: &str = "Kandidatenlijsten_";

/// Filename prefix of the seat results.
pub const SEAT_RESULTS_PREFIX: &str = "Resultaat_";

/// Filename prefix of the national totals.
pub const NATIONAL_TOTALS_PREFIX: &str = "Totaaltelling_";

/// Filename prefix of the constituency counts. Followed by `{id}_kieskring`.
pub const CONSTITUENCY_TOTALS_PREFIX: &str = "Telling_";

/// Election id pattern: two to four capitals followed by a year.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ELECTION_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,4}\d{4}$").expect("valid regex"));

/// Validate an election identifier.
///
/// The identifier is interpolated into filename prefixes, so anything other
/// than a plain code such as `TK2023` is rejected.
///
/// # Examples
/// ```
/// use kiesuitslag_tally::config::validate_election_id;
///
/// assert!(validate_election_id("TK2023").is_ok());
/// assert!(validate_election_id("../TK2023").is_err());
/// ```
pub fn validate_election_id(election_id: &str) -> Result<()> {
    if ELECTION_ID_PATTERN.is_match(election_id) {
        Ok(())
    } else {
        Err(TallyError::InvalidElectionId(election_id.to_string()))
    }
}

/// Runtime configuration for loading elections.
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub data_dir: PathBuf,
    pub election_ids: Vec<String>,
    pub total_seats: u32,
}

impl TallyConfig {
    /// Read configuration from `KIESUITSLAG_*` environment variables.
    ///
    /// Every variable is optional; an unparsable seat count falls back to the
    /// default, an invalid election id is an error.
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var("KIESUITSLAG_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.into())
            .into();

        let election_ids = match std::env::var("KIESUITSLAG_ELECTIONS") {
            Ok(raw) => parse_election_list(&raw)?,
            Err(_) => DEFAULT_ELECTION_IDS.iter().map(|s| s.to_string()).collect(),
        };

        let total_seats = std::env::var("KIESUITSLAG_TOTAL_SEATS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOTAL_SEATS);

        Ok(Self {
            data_dir,
            election_ids,
            total_seats,
        })
    }

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            election_ids: DEFAULT_ELECTION_IDS.iter().map(|s| s.to_string()).collect(),
            total_seats: DEFAULT_TOTAL_SEATS,
        }
    }

    pub fn with_election_ids(mut self, election_ids: Vec<String>) -> Self {
        self.election_ids = election_ids;
        self
    }

    pub fn with_total_seats(mut self, total_seats: u32) -> Self {
        self.total_seats = total_seats;
        self
    }
}

/// Parse a comma separated list of election ids, skipping empty entries.
pub fn parse_election_list(raw: &str) -> Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| validate_election_id(id).map(|()| id.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_election_id_valid() {
        assert!(validate_election_id("TK2023").is_ok());
        assert!(validate_election_id("EP2024").is_ok());
        assert!(validate_election_id("GR2022").is_ok());
    }

    #[test]
    fn test_validate_election_id_invalid() {
        assert!(validate_election_id("").is_err());
        assert!(validate_election_id("tk2023").is_err()); // Lowercase
        assert!(validate_election_id("TK23").is_err()); // Short year
        assert!(validate_election_id("TK2023/..").is_err());
        assert!(validate_election_id("T2023").is_err());
    }

    #[test]
    fn test_parse_election_list() {
        let ids = parse_election_list(" TK2023, TK2021 ,,").unwrap();
        assert_eq!(ids, vec!["TK2023".to_string(), "TK2021".to_string()]);

        assert!(parse_election_list("TK2023,bogus").is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = TallyConfig::new("/tmp/data")
            .with_election_ids(vec!["TK2023".to_string()])
            .with_total_seats(75);

        assert_eq!(config.data_dir, PathBuf::from("/tmp/data"));
        assert_eq!(config.election_ids, vec!["TK2023".to_string()]);
        assert_eq!(config.total_seats, 75);
    }
}
