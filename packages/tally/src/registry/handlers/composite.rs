//! Fan-out handler for files that feed two views.

use crate::election::ElectionBuilder;
use crate::registry::handler::EventHandler;
use crate::registry::types::EmlEvent;

/// Handler that passes every event unmodified to two handlers.
///
/// Used where one physical file feeds two logical views, e.g. a
/// constituency count that also carries municipality leaf data. Each inner
/// handler still decides for itself through `can_handle`.
pub struct CompositeHandler {
    first: Box<dyn EventHandler>,
    second: Box<dyn EventHandler>,
}

impl CompositeHandler {
    #[must_use]
    pub fn new(first: impl EventHandler + 'static, second: impl EventHandler + 'static) -> Self {
        Self {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl EventHandler for CompositeHandler {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn can_handle(&self, event: &EmlEvent) -> bool {
        self.first.can_handle(event) || self.second.can_handle(event)
    }

    fn handle(&self, event: &EmlEvent, election: &mut ElectionBuilder) {
        for handler in [&self.first, &self.second] {
            if handler.can_handle(event) {
                handler.handle(event, election);
            }
        }
    }
}
