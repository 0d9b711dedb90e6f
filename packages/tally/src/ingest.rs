//! Ingestion of one election from its source files.
//!
//! Roles are processed in a fixed order, each file independently. A file
//! that fails to parse is recorded in the [`IngestReport`] and contributes
//! nothing; its siblings are processed as usual.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::election::{Election, ElectionBuilder};
use crate::error::Result;
use crate::registry::DispatchEngine;
use crate::resource::{Resource, ResourceResolver};
use crate::router::{select, FileRole};

/// Result of processing one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Parsed { events: usize, handled: usize },
    Failed { reason: String },
}

/// Outcome of one source file within an ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file: String,
    pub role: FileRole,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// The ingested election together with per-file outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub election: Election,
    pub files: Vec<FileOutcome>,
    pub ingested_at: DateTime<Utc>,
}

impl IngestReport {
    /// Files that could not be parsed.
    pub fn failed_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|f| f.is_failed())
    }

    /// Check whether every matched file was parsed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_files().next().is_none()
    }

    /// Files matched for a role.
    pub fn files_for(&self, role: FileRole) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(move |f| f.role == role)
    }

    #[must_use]
    pub fn into_election(self) -> Election {
        self.election
    }
}

/// Ingest an election from a set of candidate source files.
///
/// Files are routed to roles by filename prefix; files matching no role are
/// ignored.
///
/// # Errors
/// The signature leaves room for failures that prevent building the
/// election at all; per-file failures are reported in
/// [`IngestReport::files`] instead. The identifier is only used to match
/// filename prefixes here. Resolvers that turn it into a path validate it.
///
/// # Example
/// ```
/// use kiesuitslag_tally::ingest::ingest;
/// use kiesuitslag_tally::resource::{MemoryResource, Resource};
///
/// let resources: Vec<Box<dyn Resource>> = vec![Box::new(MemoryResource::new(
///     "Verkiezingsdefinitie_TK2023.eml.xml",
///     r#"<EML><RegisteredParties><RegisteredParty>
///          <RegisteredAppellation>VVD</RegisteredAppellation>
///        </RegisteredParty></RegisteredParties></EML>"#,
/// ))];
///
/// let report = ingest("TK2023", &resources).unwrap();
/// assert_eq!(report.election.party_names(), vec!["VVD"]);
/// assert!(report.is_complete());
/// ```
pub fn ingest(election_id: &str, resources: &[Box<dyn Resource>]) -> Result<IngestReport> {
    let mut builder = ElectionBuilder::new(election_id);
    let mut files = Vec::new();

    for role in FileRole::ALL {
        let matched = select(resources, role, election_id);
        if matched.is_empty() {
            tracing::info!(
                election_id,
                %role,
                prefix = %role.prefix(election_id),
                "No files for role"
            );
            continue;
        }

        let engine = DispatchEngine::new(role.registry());
        for resource in matched {
            files.push(ingest_file(&engine, resource, role, &mut builder));
        }
    }

    let election = builder.build();
    let failed = files.iter().filter(|f| f.is_failed()).count();
    tracing::info!(
        election_id,
        files = files.len(),
        failed,
        regions = election.regions().len(),
        vote_records = election.vote_records().len(),
        "Ingested election"
    );

    Ok(IngestReport {
        election,
        files,
        ingested_at: Utc::now(),
    })
}

/// Resolve the resources of an election and ingest them.
///
/// # Errors
/// Returns an error when the resolver cannot produce a resource list, for
/// example because the identifier is not a valid directory name.
pub fn ingest_from(resolver: &dyn ResourceResolver, election_id: &str) -> Result<IngestReport> {
    let resources = resolver.resolve(election_id)?;
    ingest(election_id, &resources)
}

fn ingest_file(
    engine: &DispatchEngine,
    resource: &dyn Resource,
    role: FileRole,
    builder: &mut ElectionBuilder,
) -> FileOutcome {
    let file = resource.filename().to_string();

    let status = match engine.run(resource, builder) {
        Ok(stats) => {
            tracing::debug!(file = %file, %role, events = stats.events, handled = stats.handled, "Parsed file");
            FileStatus::Parsed {
                events: stats.events,
                handled: stats.handled,
            }
        }
        Err(err) => {
            tracing::warn!(file = %file, %role, error = %err, "Failed to parse file, skipping");
            FileStatus::Failed {
                reason: err.to_string(),
            }
        }
    };

    FileOutcome { file, role, status }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::resource::MemoryResource;

    fn resource(name: &str, xml: &str) -> Box<dyn Resource> {
        Box::new(MemoryResource::new(name, xml))
    }

    const TELLING: &str = r#"<Count><Election><Contests><Contest>
        <ContestIdentifier Id="1"><ContestName>Groningen</ContestName></ContestIdentifier>
        <TotalVotes>
          <Selection><AffiliationIdentifier Id="1"><RegisteredName>VVD</RegisteredName></AffiliationIdentifier><ValidVotes>30</ValidVotes></Selection>
        </TotalVotes>
        <ReportingUnitVotes>
          <ReportingUnitIdentifier Id="0003">Appingedam</ReportingUnitIdentifier>
          <Selection><AffiliationIdentifier Id="1"><RegisteredName>VVD</RegisteredName></AffiliationIdentifier><ValidVotes>30</ValidVotes></Selection>
        </ReportingUnitVotes>
    </Contest></Contests></Election></Count>"#;

    #[test]
    fn test_ingest_accepts_any_id_for_supplied_resources() {
        let resources = vec![resource("Telling_gr2022-utrecht_kieskring_1.eml.xml", TELLING)];

        let report = ingest("gr2022-utrecht", &resources).unwrap();
        assert_eq!(report.election.id(), "gr2022-utrecht");
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.election.vote_records().len(), 1);
    }

    #[test]
    fn test_ingest_from_directory_rejects_invalid_id() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = crate::resource::DirectoryResolver::new(dir.path());

        let result = ingest_from(&resolver, "../TK2023");
        assert!(matches!(result, Err(TallyError::InvalidElectionId(_))));
    }

    #[test]
    fn test_ingest_without_files() {
        let report = ingest("TK2099", &[]).unwrap();
        assert!(report.election.is_empty());
        assert!(report.files.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn test_ingest_records_failures() {
        let resources = vec![
            resource("Telling_TK2023_kieskring_1.eml.xml", "<Count><TotalVotes>"),
            resource("Telling_TK2023_kieskring_2.eml.xml", TELLING),
        ];

        let report = ingest("TK2023", &resources).unwrap();

        assert_eq!(report.files.len(), 2);
        assert!(report.files[0].is_failed());
        assert_eq!(
            report.files[1].status,
            FileStatus::Parsed {
                events: 2,
                handled: 2
            }
        );
        assert_eq!(report.failed_files().count(), 1);
        assert_eq!(report.election.vote_records().len(), 1);
        assert_eq!(report.election.constituency_totals().len(), 1);
    }

    #[test]
    fn test_file_outcome_serialization() {
        let outcome = FileOutcome {
            file: "Resultaat_TK2023.eml.xml".to_string(),
            role: FileRole::SeatResults,
            status: FileStatus::Failed {
                reason: "Malformed document: no root".to_string(),
            },
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["role"], "seat_results");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "Malformed document: no root");
    }
}
