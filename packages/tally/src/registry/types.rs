//! Types for the event registry system.

use std::collections::BTreeMap;
use std::fmt;

/// Kind of record recognised in an EML document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// A region of the election tree.
    RegionDefined,
    /// A party registered in the election definition.
    PartyDefined,
    /// A candidate on a candidate list.
    CandidateRegistered,
    /// Votes (or a seat result entry) for a party.
    PartyVotesRecorded,
    /// Votes (or an election outcome) for a single candidate.
    CandidateVotesRecorded,
    /// Turnout counters of a vote block.
    MetadataRecorded,
}

impl EventKind {
    /// All kinds, in declaration order.
    pub const ALL: [EventKind; 6] = [
        Self::RegionDefined,
        Self::PartyDefined,
        Self::CandidateRegistered,
        Self::PartyVotesRecorded,
        Self::CandidateVotesRecorded,
        Self::MetadataRecorded,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegionDefined => "RegionDefined",
            Self::PartyDefined => "PartyDefined",
            Self::CandidateRegistered => "CandidateRegistered",
            Self::PartyVotesRecorded => "PartyVotesRecorded",
            Self::CandidateVotesRecorded => "CandidateVotesRecorded",
            Self::MetadataRecorded => "MetadataRecorded",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat, string-keyed fields of one record.
///
/// Attributes are keyed `Element-attribute`, element text by the element's
/// local name. Typed extraction is left to the handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Get a field value, treating blank values as absent.
    #[must_use]
    pub fn get_non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Get a field value as an owned, non-blank string.
    #[must_use]
    pub fn get_owned(&self, key: &str) -> Option<String> {
        self.get_non_blank(key).map(str::to_string)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Copy all fields of `other` into this record, overwriting duplicates.
    pub fn extend_from(&mut self, other: &Record) {
        for (key, value) in &other.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate over all fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

/// A typed event emitted by the EML reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmlEvent {
    RegionDefined(Record),
    PartyDefined(Record),
    CandidateRegistered(Record),
    PartyVotesRecorded { aggregated: bool, record: Record },
    CandidateVotesRecorded { aggregated: bool, record: Record },
    MetadataRecorded { aggregated: bool, record: Record },
}

impl EmlEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RegionDefined(_) => EventKind::RegionDefined,
            Self::PartyDefined(_) => EventKind::PartyDefined,
            Self::CandidateRegistered(_) => EventKind::CandidateRegistered,
            Self::PartyVotesRecorded { .. } => EventKind::PartyVotesRecorded,
            Self::CandidateVotesRecorded { .. } => EventKind::CandidateVotesRecorded,
            Self::MetadataRecorded { .. } => EventKind::MetadataRecorded,
        }
    }

    #[must_use]
    pub fn record(&self) -> &Record {
        match self {
            Self::RegionDefined(record)
            | Self::PartyDefined(record)
            | Self::CandidateRegistered(record)
            | Self::PartyVotesRecorded { record, .. }
            | Self::CandidateVotesRecorded { record, .. }
            | Self::MetadataRecorded { record, .. } => record,
        }
    }

    /// Whether the record is a roll-up total. `None` for definition records.
    #[must_use]
    pub fn aggregated(&self) -> Option<bool> {
        match self {
            Self::PartyVotesRecorded { aggregated, .. }
            | Self::CandidateVotesRecorded { aggregated, .. }
            | Self::MetadataRecorded { aggregated, .. } => Some(*aggregated),
            _ => None,
        }
    }
}
