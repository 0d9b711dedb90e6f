//! Handler registry for mapping event kinds to handlers.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::handler::EventHandler;
use super::types::{EmlEvent, EventKind};

/// Registry mapping event kinds to handlers.
///
/// The registry allows registering one handler per event kind, as well as
/// marking kinds that a file role deliberately ignores.
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Box<dyn EventHandler>>,
    ignored: HashSet<EventKind>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            ignored: HashSet::new(),
        }
    }

    /// Register a handler for an event kind, replacing any previous one.
    pub fn register(&mut self, kind: EventKind, handler: impl EventHandler + 'static) {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Mark kinds as ignored (consumed without effect).
    pub fn ignore(&mut self, kinds: impl IntoIterator<Item = EventKind>) {
        self.ignored.extend(kinds);
    }

    /// Get the handler for an event.
    ///
    /// Returns `None` if the kind is ignored, has no handler, or the handler
    /// declines the event.
    pub fn get_handler(&self, event: &EmlEvent) -> Option<&dyn EventHandler> {
        let kind = event.kind();

        if self.ignored.contains(&kind) {
            return None;
        }

        self.handlers
            .get(&kind)
            .filter(|h| h.can_handle(event))
            .map(|h| h.as_ref())
    }

    /// Check if an event kind is ignored.
    #[must_use]
    pub fn should_ignore(&self, kind: EventKind) -> bool {
        self.ignored.contains(&kind)
    }

    /// Check if a handler is registered for an event kind.
    #[must_use]
    pub fn has_handler(&self, kind: EventKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Return all registered kinds, sorted.
    #[must_use]
    pub fn registered_kinds(&self) -> BTreeSet<EventKind> {
        self.handlers.keys().copied().collect()
    }

    /// Return all ignored kinds, sorted.
    #[must_use]
    pub fn ignored_kinds(&self) -> BTreeSet<EventKind> {
        self.ignored.iter().copied().collect()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("registered", &self.registered_kinds())
            .field("ignored", &self.ignored_kinds())
            .finish()
    }
}
