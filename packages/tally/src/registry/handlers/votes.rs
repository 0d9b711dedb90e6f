//! Handlers for count files (national totals and constituency counts).

use super::{counter, valid_votes};
use crate::election::ElectionBuilder;
use crate::registry::handler::EventHandler;
use crate::registry::types::EmlEvent;
use crate::types::{ConstituencyTotal, CountMetadata, Party, VoteRecord};

/// Handler for leaf party votes (`aggregated = false`).
///
/// Each record becomes a [`VoteRecord`] for the reporting unit. The builder
/// drops exact duplicates, which arrive when two file roles carry the same
/// municipality data.
pub struct MunicipalityVotesHandler;

impl EventHandler for MunicipalityVotesHandler {
    fn name(&self) -> &'static str {
        "municipality-votes"
    }

    fn can_handle(&self, event: &EmlEvent) -> bool {
        event.aggregated() == Some(false)
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();

        let (Some(municipality), Some(party)) = (
            record.get_owned("ReportingUnitIdentifier"),
            record.get_owned("RegisteredName"),
        ) else {
            tracing::debug!("Leaf selection without reporting unit or party, skipping");
            return;
        };

        let votes = valid_votes(record);
        if !election.add_vote_record(VoteRecord::new(municipality, party, votes)) {
            tracing::trace!("Duplicate vote record dropped");
        }
    }
}

/// Handler for national party totals (`aggregated = true`).
///
/// Appends to the national result list directly; these totals never go
/// through region aggregation.
pub struct NationalVotesHandler;

impl EventHandler for NationalVotesHandler {
    fn name(&self) -> &'static str {
        "national-votes"
    }

    fn can_handle(&self, event: &EmlEvent) -> bool {
        event.aggregated() == Some(true)
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();

        let Some(party) = record.get_owned("RegisteredName") else {
            tracing::debug!("National selection without party name, skipping");
            return;
        };

        let result = Party::with_votes(election.id(), party, valid_votes(record));
        election.add_national_result(result);
    }
}

/// Handler for the official party totals of one constituency count.
pub struct ConstituencyVotesHandler;

impl EventHandler for ConstituencyVotesHandler {
    fn name(&self) -> &'static str {
        "constituency-votes"
    }

    fn can_handle(&self, event: &EmlEvent) -> bool {
        event.aggregated() == Some(true)
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();

        let Some(party_name) = record.get_owned("RegisteredName") else {
            tracing::debug!("Constituency selection without party name, skipping");
            return;
        };

        election.add_constituency_total(ConstituencyTotal {
            contest_id: record.get_owned("ContestIdentifier"),
            contest_name: record.get_owned("ContestName"),
            party_name,
            votes: valid_votes(record),
        });
    }
}

/// Handler for turnout counters (`MetadataRecorded`).
pub struct MetadataHandler;

impl EventHandler for MetadataHandler {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();
        let aggregated = event.aggregated().unwrap_or(true);

        let mut metadata = CountMetadata {
            aggregated,
            reporting_unit: if aggregated {
                None
            } else {
                record.get_owned("ReportingUnitIdentifier")
            },
            contest_id: record.get_owned("ContestIdentifier"),
            cast: counter(record, "Cast"),
            total_counted: counter(record, "TotalCounted"),
            ..CountMetadata::default()
        };

        for (key, value) in record.iter() {
            let target = if let Some(code) = key.strip_prefix("RejectedVotes-") {
                (code, &mut metadata.rejected)
            } else if let Some(code) = key.strip_prefix("UncountedVotes-") {
                (code, &mut metadata.uncounted)
            } else {
                continue;
            };
            let (code, counts) = target;
            // The attribute itself shares the prefix
            if code == "ReasonCode" {
                continue;
            }
            if let Ok(count) = value.trim().parse::<u64>() {
                counts.insert(code.to_string(), count);
            }
        }

        election.add_count_metadata(metadata);
    }
}
