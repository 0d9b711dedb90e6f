//! Event registry system for role-specific EML ingestion.
//!
//! Every logical file role gets its own registry that maps event kinds to
//! handlers. The [`DispatchEngine`] streams a resource through the reader and
//! hands every event to the handler registered for its kind.

mod config;
mod core;
mod engine;
mod handler;
pub mod handlers;
mod types;

pub use config::{
    candidate_lists_registry, constituency_totals_registry, definitions_registry,
    national_totals_registry, seat_results_registry,
};
pub use core::HandlerRegistry;
pub use engine::{DispatchEngine, DispatchStats};
pub use handler::EventHandler;
pub use types::{EmlEvent, EventKind, Record};
