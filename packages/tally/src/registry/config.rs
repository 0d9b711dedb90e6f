//! Registry configuration per file role.
//!
//! Each function lists every event kind: either a handler is registered or
//! the kind is ignored for that role.

use super::core::HandlerRegistry;
use super::handlers::{
    CandidateHandler, CompositeHandler, ConstituencyVotesHandler, MetadataHandler,
    MunicipalityVotesHandler, NationalVotesHandler, PartyDefinitionHandler, RegionHandler,
    SeatResultHandler,
};
use super::types::EventKind;

/// Registry for the election definition (regions and parties).
#[must_use]
pub fn definitions_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(EventKind::RegionDefined, RegionHandler);
    registry.register(EventKind::PartyDefined, PartyDefinitionHandler);
    registry.register(EventKind::CandidateRegistered, CandidateHandler);

    registry.ignore([
        EventKind::PartyVotesRecorded,
        EventKind::CandidateVotesRecorded,
        EventKind::MetadataRecorded,
    ]);

    registry
}

/// Registry for the candidate lists.
#[must_use]
pub fn candidate_lists_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(EventKind::CandidateRegistered, CandidateHandler);

    // Lists repeat the region and party definitions
    registry.ignore([
        EventKind::RegionDefined,
        EventKind::PartyDefined,
        EventKind::PartyVotesRecorded,
        EventKind::CandidateVotesRecorded,
        EventKind::MetadataRecorded,
    ]);

    registry
}

/// Registry for the seat results.
#[must_use]
pub fn seat_results_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(EventKind::PartyVotesRecorded, SeatResultHandler);
    registry.register(EventKind::CandidateVotesRecorded, SeatResultHandler);

    registry.ignore([
        EventKind::RegionDefined,
        EventKind::PartyDefined,
        EventKind::CandidateRegistered,
        EventKind::MetadataRecorded,
    ]);

    registry
}

/// Registry for the national totals: national results plus municipality
/// leaf data.
#[must_use]
pub fn national_totals_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(
        EventKind::PartyVotesRecorded,
        CompositeHandler::new(NationalVotesHandler, MunicipalityVotesHandler),
    );
    registry.register(EventKind::MetadataRecorded, MetadataHandler);

    registry.ignore([
        EventKind::RegionDefined,
        EventKind::PartyDefined,
        EventKind::CandidateRegistered,
        EventKind::CandidateVotesRecorded,
    ]);

    registry
}

/// Registry for the constituency counts: constituency totals plus
/// municipality leaf data.
#[must_use]
pub fn constituency_totals_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    registry.register(
        EventKind::PartyVotesRecorded,
        CompositeHandler::new(ConstituencyVotesHandler, MunicipalityVotesHandler),
    );
    registry.register(EventKind::MetadataRecorded, MetadataHandler);

    registry.ignore([
        EventKind::RegionDefined,
        EventKind::PartyDefined,
        EventKind::CandidateRegistered,
        EventKind::CandidateVotesRecorded,
    ]);

    registry
}
