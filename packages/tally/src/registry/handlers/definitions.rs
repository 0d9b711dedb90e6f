//! Handlers for the election definition and the candidate lists.
//!
//! These files describe the election rather than count it: the region
//! tree, the registered parties and the candidates on each list.

use super::party_name;
use crate::election::ElectionBuilder;
use crate::registry::handler::EventHandler;
use crate::registry::types::EmlEvent;
use crate::types::{Candidate, Party, Region, RegionCategory};

/// Handler for `RegionDefined` events.
///
/// Appends a [`Region`] built from the region number, name and category,
/// plus the parent region when the definition names one.
pub struct RegionHandler;

impl EventHandler for RegionHandler {
    fn name(&self) -> &'static str {
        "region"
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();

        let region = Region {
            id: record.get_owned("Region-RegionNumber").unwrap_or_default(),
            name: record.get_owned("RegionName").unwrap_or_default(),
            category: RegionCategory::parse(record.get("Region-RegionCategory").unwrap_or_default()),
            superior_category: record
                .get_non_blank("Region-SuperiorRegionCategory")
                .map(RegionCategory::parse),
            superior_region_id: record.get_owned("Region-SuperiorRegionNumber"),
        };

        election.add_region(region);
    }
}

/// Handler for `PartyDefined` events.
///
/// Registers a party stub. Blank appellations are skipped silently.
pub struct PartyDefinitionHandler;

impl EventHandler for PartyDefinitionHandler {
    fn name(&self) -> &'static str {
        "party-definition"
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        if let Some(name) = event.record().get_owned("RegisteredAppellation") {
            let party = Party::registered(election.id(), name);
            election.add_party(party);
        }
    }
}

/// Handler for `CandidateRegistered` events.
pub struct CandidateHandler;

impl EventHandler for CandidateHandler {
    fn name(&self) -> &'static str {
        "candidate"
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();

        election.add_candidate(Candidate {
            contest_id: record.get_owned("ContestIdentifier"),
            candidate_id: record.get_owned("CandidateIdentifier"),
            initials: record.get_owned("NameLine"),
            first_name: record.get_owned("FirstName"),
            last_name: record.get_owned("LastName"),
            gender: record.get_owned("Gender"),
            locality: record.get_owned("LocalityName"),
            party_name: party_name(record),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Record;

    fn record(fields: &[(&str, &str)]) -> Record {
        fields.iter().copied().collect()
    }

    #[test]
    fn test_region_handler() {
        let mut builder = ElectionBuilder::new("TK2023");
        let event = EmlEvent::RegionDefined(record(&[
            ("Region-RegionNumber", "0363"),
            ("RegionName", "Amsterdam"),
            ("Region-RegionCategory", "GEMEENTE"),
            ("Region-SuperiorRegionNumber", "9"),
            ("Region-SuperiorRegionCategory", "KIESKRING"),
        ]));

        RegionHandler.handle(&event, &mut builder);

        let election = builder.build();
        let region = &election.regions()[0];
        assert_eq!(region.id, "0363");
        assert_eq!(region.name, "Amsterdam");
        assert_eq!(region.category, RegionCategory::Municipality);
        assert_eq!(region.superior_category, Some(RegionCategory::Constituency));
        assert_eq!(region.superior_region_id.as_deref(), Some("9"));
    }

    #[test]
    fn test_region_handler_without_parent() {
        let mut builder = ElectionBuilder::new("TK2023");
        let event = EmlEvent::RegionDefined(record(&[
            ("Region-RegionNumber", "9"),
            ("RegionName", "Amsterdam"),
            ("Region-RegionCategory", "KIESKRING"),
        ]));

        RegionHandler.handle(&event, &mut builder);

        let election = builder.build();
        assert_eq!(election.regions()[0].superior_region_id, None);
        assert_eq!(election.regions()[0].superior_category, None);
    }

    #[test]
    fn test_party_definition_skips_blank() {
        let mut builder = ElectionBuilder::new("TK2023");
        PartyDefinitionHandler.handle(
            &EmlEvent::PartyDefined(record(&[("RegisteredAppellation", "VVD")])),
            &mut builder,
        );
        PartyDefinitionHandler.handle(
            &EmlEvent::PartyDefined(record(&[("RegisteredAppellation", "  ")])),
            &mut builder,
        );
        PartyDefinitionHandler.handle(&EmlEvent::PartyDefined(Record::new()), &mut builder);

        let election = builder.build();
        assert_eq!(election.party_names(), vec!["VVD"]);
        assert_eq!(election.parties()[0].election_id, "TK2023");
    }

    #[test]
    fn test_candidate_handler() {
        let mut builder = ElectionBuilder::new("TK2023");
        let event = EmlEvent::CandidateRegistered(record(&[
            ("ContestIdentifier", "1"),
            ("CandidateIdentifier", "3"),
            ("FirstName", "Sophie"),
            ("LastName", "Hermans"),
            ("Gender", "female"),
            ("LocalityName", "Amsterdam"),
            ("RegisteredName", "VVD"),
        ]));

        CandidateHandler.handle(&event, &mut builder);

        let election = builder.build();
        let candidate = &election.candidates()[0];
        assert_eq!(candidate.full_name(), "Sophie Hermans");
        assert_eq!(candidate.contest_id.as_deref(), Some("1"));
        assert_eq!(candidate.candidate_id.as_deref(), Some("3"));
        assert_eq!(candidate.party_name.as_deref(), Some("VVD"));
        assert_eq!(candidate.initials, None);
    }
}
