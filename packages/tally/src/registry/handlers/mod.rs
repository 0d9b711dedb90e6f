//! Event handlers for EML records.

mod composite;
mod definitions;
mod results;
mod votes;

pub use composite::*;
pub use definitions::*;
pub use results::*;
pub use votes::*;

use super::types::Record;

/// Read the `ValidVotes` count of a selection.
///
/// Missing or unparsable counts become zero and are logged.
pub(crate) fn valid_votes(record: &Record) -> u64 {
    let party = record.get("RegisteredName").unwrap_or_default();
    match record.get_non_blank("ValidVotes") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(party, value = raw, "Unparsable ValidVotes, counting as 0");
            0
        }),
        None => {
            tracing::warn!(party, "Missing ValidVotes, counting as 0");
            0
        }
    }
}

/// Read an optional counter, treating absent or non-numeric values as zero.
pub(crate) fn counter(record: &Record, key: &str) -> u64 {
    record
        .get_non_blank(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}

/// Name of the party a record belongs to.
///
/// Definitions use `RegisteredAppellation`, count files `RegisteredName`.
pub(crate) fn party_name(record: &Record) -> Option<String> {
    record
        .get_owned("RegisteredAppellation")
        .or_else(|| record.get_owned("RegisteredName"))
}
