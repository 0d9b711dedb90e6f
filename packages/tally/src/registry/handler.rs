//! Event handler trait definition.

use super::types::EmlEvent;
use crate::election::ElectionBuilder;

/// Trait for event handlers.
///
/// Handlers turn the flat record of one event into model data. Mutating the
/// election under construction is their only side effect.
pub trait EventHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Check if this handler wants the given event.
    ///
    /// Default implementation always returns true.
    fn can_handle(&self, _event: &EmlEvent) -> bool {
        true
    }

    /// Apply the event to the election under construction.
    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Record;
    use crate::types::Party;

    struct TestHandler;

    impl EventHandler for TestHandler {
        fn name(&self) -> &'static str {
            "test"
        }

        fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
            if let Some(name) = event.record().get("RegisteredAppellation") {
                election.add_party(Party::registered("TK2023", name));
            }
        }
    }

    #[test]
    fn test_handler_trait() {
        let handler = TestHandler;
        let event = EmlEvent::PartyDefined(
            [("RegisteredAppellation", "VVD")].into_iter().collect::<Record>(),
        );
        assert!(handler.can_handle(&event));

        let mut builder = ElectionBuilder::new("TK2023");
        handler.handle(&event, &mut builder);

        assert_eq!(builder.build().party_names(), vec!["VVD"]);
    }
}
