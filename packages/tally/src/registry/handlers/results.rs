//! Handler for the official seat results.

use super::party_name;
use crate::election::ElectionBuilder;
use crate::registry::handler::EventHandler;
use crate::registry::types::EmlEvent;
use crate::types::ElectedCandidate;

/// Handler for `Resultaat_*` selections.
///
/// A party selection opens a seat entry for the party. A candidate
/// selection marked `Elected` adds one seat to the party it follows.
pub struct SeatResultHandler;

impl EventHandler for SeatResultHandler {
    fn name(&self) -> &'static str {
        "seat-result"
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        let record = event.record();

        let Some(party) = party_name(record) else {
            tracing::debug!(kind = %event.kind(), "Seat result without party, skipping");
            return;
        };

        match event {
            EmlEvent::PartyVotesRecorded { .. } => election.register_seat_party(&party),
            EmlEvent::CandidateVotesRecorded { .. } => {
                let elected = record
                    .get_non_blank("Elected")
                    .is_some_and(|v| v.eq_ignore_ascii_case("yes") || v.eq_ignore_ascii_case("true"));
                if elected {
                    let candidate = ElectedCandidate {
                        candidate_id: record.get_owned("CandidateIdentifier"),
                        ranking: record.get_non_blank("Ranking").and_then(|r| r.parse().ok()),
                    };
                    election.add_elected_candidate(&party, candidate);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Record;

    fn candidate(id: &str, elected: &str) -> EmlEvent {
        EmlEvent::CandidateVotesRecorded {
            aggregated: true,
            record: [
                ("RegisteredName", "NSC"),
                ("CandidateIdentifier", id),
                ("Ranking", id),
                ("Elected", elected),
            ]
            .into_iter()
            .collect::<Record>(),
        }
    }

    #[test]
    fn test_seat_result_counts_elected() {
        let mut builder = ElectionBuilder::new("TK2023");
        let party = EmlEvent::PartyVotesRecorded {
            aggregated: true,
            record: [("RegisteredName", "NSC")].into_iter().collect::<Record>(),
        };

        SeatResultHandler.handle(&party, &mut builder);
        SeatResultHandler.handle(&candidate("1", "yes"), &mut builder);
        SeatResultHandler.handle(&candidate("2", "true"), &mut builder);
        SeatResultHandler.handle(&candidate("3", "no"), &mut builder);

        let election = builder.build();
        let result = &election.seat_results()[0];
        assert_eq!(result.party_name, "NSC");
        assert_eq!(result.seats, 2);
        assert_eq!(result.elected[1].ranking, Some(2));
        assert_eq!(result.elected[1].candidate_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_seat_result_party_without_seats() {
        let mut builder = ElectionBuilder::new("TK2023");
        let party = EmlEvent::PartyVotesRecorded {
            aggregated: true,
            record: [("RegisteredName", "Splinter")].into_iter().collect::<Record>(),
        };

        SeatResultHandler.handle(&party, &mut builder);

        let election = builder.build();
        assert_eq!(election.seat_results()[0].seats, 0);
        assert!(election.seat_results()[0].elected.is_empty());
    }
}
