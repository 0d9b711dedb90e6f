//! Dispatch engine that feeds reader events to the registry.

use serde::{Deserialize, Serialize};

use super::core::HandlerRegistry;
use super::types::EmlEvent;
use crate::election::ElectionBuilder;
use crate::error::{Result, TallyError};
use crate::resource::Resource;
use crate::xml::EmlReader;

/// Event counts of one dispatched resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Events emitted by the reader.
    pub events: usize,
    /// Events that reached a handler.
    pub handled: usize,
}

/// Engine that dispatches EML events using the registry.
///
/// The engine reads a whole resource before applying anything, so a
/// document that turns out to be malformed contributes nothing. Events of a
/// kind that is neither registered nor ignored produce an `UnhandledEvent`
/// error, which [`run`](Self::run) logs and skips.
pub struct DispatchEngine {
    registry: HandlerRegistry,
}

impl DispatchEngine {
    /// Create a new engine with the given registry.
    #[must_use]
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Dispatch a single event.
    ///
    /// Returns `true` if a handler processed the event, `false` if the kind
    /// is ignored or the registered handler declined it.
    ///
    /// # Errors
    /// Returns `UnhandledEvent` if no handler is registered for the kind and
    /// the kind is not ignored.
    pub fn dispatch(&self, event: &EmlEvent, election: &mut ElectionBuilder) -> Result<bool> {
        let kind = event.kind();

        if self.registry.should_ignore(kind) {
            return Ok(false);
        }

        if let Some(handler) = self.registry.get_handler(event) {
            handler.handle(event, election);
            return Ok(true);
        }

        if self.registry.has_handler(kind) {
            return Ok(false);
        }

        Err(TallyError::UnhandledEvent { kind, file: None })
    }

    /// Read a resource completely and dispatch its events.
    ///
    /// # Errors
    /// Returns an error if the resource cannot be opened or read, or if the
    /// document is malformed. In that case the election is left untouched.
    pub fn run(
        &self,
        resource: &dyn Resource,
        election: &mut ElectionBuilder,
    ) -> Result<DispatchStats> {
        let source = resource.open()?;
        let events = EmlReader::new(source).collect::<Result<Vec<_>>>()?;

        let mut stats = DispatchStats {
            events: events.len(),
            handled: 0,
        };

        for event in &events {
            match self.dispatch(event, election) {
                Ok(true) => stats.handled += 1,
                Ok(false) => {}
                Err(TallyError::UnhandledEvent { kind, .. }) => {
                    let err = TallyError::UnhandledEvent {
                        kind,
                        file: Some(resource.filename().to_string()),
                    };
                    tracing::debug!(error = %err, "Skipping event");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::handler::EventHandler;
    use crate::registry::{EventKind, Record};
    use crate::resource::MemoryResource;
    use crate::types::Party;

    struct PartyNameHandler;

    impl EventHandler for PartyNameHandler {
        fn name(&self) -> &'static str {
            "party-name"
        }

        fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
            if let Some(name) = event.record().get_non_blank("RegisteredName") {
                election.add_party(Party::registered("TK2023", name));
            }
        }
    }

    fn engine() -> DispatchEngine {
        let mut registry = HandlerRegistry::new();
        registry.register(EventKind::PartyVotesRecorded, PartyNameHandler);
        registry.ignore([EventKind::MetadataRecorded]);
        DispatchEngine::new(registry)
    }

    const COUNT: &str = r#"<Count><TotalVotes>
        <Selection><AffiliationIdentifier Id="1"><RegisteredName>VVD</RegisteredName></AffiliationIdentifier><ValidVotes>10</ValidVotes></Selection>
        <Selection><Candidate><CandidateIdentifier Id="1"/></Candidate><ValidVotes>8</ValidVotes></Selection>
        <Cast>12</Cast>
    </TotalVotes></Count>"#;

    #[test]
    fn test_engine_dispatch_with_handler() {
        let engine = engine();
        let mut builder = ElectionBuilder::new("TK2023");
        let event = EmlEvent::PartyVotesRecorded {
            aggregated: true,
            record: [("RegisteredName", "D66")].into_iter().collect::<Record>(),
        };

        assert!(engine.dispatch(&event, &mut builder).unwrap());
        assert_eq!(builder.build().party_names(), vec!["D66"]);
    }

    #[test]
    fn test_engine_dispatch_ignored() {
        let engine = engine();
        let mut builder = ElectionBuilder::new("TK2023");
        let event = EmlEvent::MetadataRecorded {
            aggregated: true,
            record: Record::new(),
        };

        assert!(!engine.dispatch(&event, &mut builder).unwrap());
    }

    #[test]
    fn test_engine_dispatch_unhandled() {
        let engine = engine();
        let mut builder = ElectionBuilder::new("TK2023");
        let event = EmlEvent::RegionDefined(Record::new());

        let result = engine.dispatch(&event, &mut builder);
        assert!(matches!(
            result,
            Err(TallyError::UnhandledEvent {
                kind: EventKind::RegionDefined,
                ..
            })
        ));
    }

    #[test]
    fn test_engine_run_counts_events() {
        let engine = engine();
        let mut builder = ElectionBuilder::new("TK2023");
        let resource = MemoryResource::new("Totaaltelling_TK2023.eml.xml", COUNT);

        let stats = engine.run(&resource, &mut builder).unwrap();

        // Party votes, candidate votes (unhandled), metadata (ignored)
        assert_eq!(stats, DispatchStats { events: 3, handled: 1 });
        assert_eq!(builder.build().party_names(), vec!["VVD"]);
    }

    #[test]
    fn test_engine_run_malformed_leaves_election_untouched() {
        let engine = engine();
        let mut builder = ElectionBuilder::new("TK2023");
        let truncated = &COUNT[..COUNT.len() - "</TotalVotes></Count>".len()];
        let resource = MemoryResource::new("Totaaltelling_TK2023.eml.xml", truncated);

        assert!(engine.run(&resource, &mut builder).is_err());
        assert!(builder.build().parties().is_empty());
    }
}
