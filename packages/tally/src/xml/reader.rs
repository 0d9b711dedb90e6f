//! Streaming EML reader that turns record boundaries into [`EmlEvent`]s.
//!
//! The reader keeps a stack of open elements. Every frame collects the
//! fields of its own attributes and of its completed children; those fields
//! are inherited as context by records that close later inside it. This is
//! how a `Selection` learns its contest and reporting unit, and how a
//! `Candidate` learns the affiliation of the list it is on.
//!
//! Elections, contests and candidate-list affiliations are scopes: their
//! fields are visible only to records inside them and are dropped when they
//! close, so a sibling that omits a field sees it as absent.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::utils::{attribute_key, element_attributes, local_name};
use crate::error::{Result, TallyError};
use crate::registry::{EmlEvent, Record};

/// Fields that identify the party of a selection.
const AFFILIATION_KEYS: [&str; 3] = [
    "AffiliationIdentifier",
    "AffiliationIdentifier-Id",
    "RegisteredName",
];

/// Turnout counters reported next to the selections of a vote block.
const COUNTER_PREFIXES: [&str; 4] = ["Cast", "TotalCounted", "RejectedVotes", "UncountedVotes"];

/// What closing an element means for the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// Plain element: its fields flow into the parent.
    None,
    /// Context for the records inside it, discarded on close.
    Scope,
    Region,
    Party,
    Candidate,
    Selection { aggregated: bool },
    VoteBlock { aggregated: bool },
}

#[derive(Debug)]
struct Frame {
    name: String,
    boundary: Boundary,
    fields: Record,
    /// Affiliation of the last party selection, for the candidate
    /// selections that follow it in the same vote block.
    carried: Record,
    text: String,
    id: Option<String>,
    reason_code: Option<String>,
}

enum Step {
    Open(Frame),
    OpenClose(Frame),
    Close,
    Text(String),
    Eof,
}

/// Pull reader over one EML document.
///
/// Iterating yields events in document order. The first error ends the
/// iteration.
pub struct EmlReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    frames: Vec<Frame>,
    seen_root: bool,
    finished: bool,
}

impl<R: BufRead> EmlReader<R> {
    /// Create a reader over a buffered byte stream.
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            frames: Vec::new(),
            seen_root: false,
            finished: false,
        }
    }

    /// Read until the next record boundary.
    ///
    /// Returns `Ok(None)` at the end of a complete document.
    ///
    /// # Errors
    /// Returns an error for tokenizer failures and for documents that end
    /// with unclosed elements or contain no root element.
    pub fn next_event(&mut self) -> Result<Option<EmlEvent>> {
        loop {
            self.buf.clear();
            // Everything borrowed from the read buffer is made owned here
            let step = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => Step::Open(open_frame(&start, &self.frames, self.seen_root)?),
                Event::Empty(start) => {
                    Step::OpenClose(open_frame(&start, &self.frames, self.seen_root)?)
                }
                Event::End(_) => Step::Close,
                Event::Text(text) => Step::Text(text.unescape()?.into_owned()),
                Event::CData(data) => Step::Text(String::from_utf8_lossy(&data).trim().to_string()),
                Event::Eof => Step::Eof,
                // Declarations, comments, processing instructions, doctype
                _ => continue,
            };

            match step {
                Step::Open(frame) => {
                    self.seen_root = true;
                    self.frames.push(frame);
                }
                Step::OpenClose(frame) => {
                    self.seen_root = true;
                    if let Some(event) = self.close_frame(frame) {
                        return Ok(Some(event));
                    }
                }
                Step::Close => {
                    let frame = self.frames.pop().ok_or_else(|| {
                        TallyError::MalformedDocument("closing tag without open element".into())
                    })?;
                    if let Some(event) = self.close_frame(frame) {
                        return Ok(Some(event));
                    }
                }
                Step::Text(text) => self.push_text(&text)?,
                Step::Eof => return self.finish(),
            }
        }
    }

    fn push_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        match self.frames.last_mut() {
            Some(frame) => {
                frame.text.push_str(text);
                Ok(())
            }
            None => Err(TallyError::MalformedDocument(
                "text outside the root element".into(),
            )),
        }
    }

    fn finish(&mut self) -> Result<Option<EmlEvent>> {
        if let Some(open) = self.frames.last() {
            return Err(TallyError::MalformedDocument(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        if !self.seen_root {
            return Err(TallyError::MalformedDocument(
                "document has no root element".into(),
            ));
        }
        Ok(None)
    }

    /// Fields visible to a record closing at the current depth.
    fn context(&self) -> Record {
        let mut context = Record::new();
        for frame in &self.frames {
            context.extend_from(&frame.fields);
            context.extend_from(&frame.carried);
        }
        context
    }

    fn close_frame(&mut self, mut frame: Frame) -> Option<EmlEvent> {
        if !frame.text.is_empty() {
            let key = match &frame.reason_code {
                Some(code) => attribute_key(&frame.name, code),
                None => frame.name.clone(),
            };
            frame.fields.insert(key, frame.text.clone());
        } else if let Some(id) = &frame.id {
            frame.fields.insert(frame.name.clone(), id.clone());
        }

        match frame.boundary {
            Boundary::None => {
                if let Some(parent) = self.frames.last_mut() {
                    parent.fields.extend_from(&frame.fields);
                }
                None
            }
            Boundary::Scope => None,
            Boundary::Region => Some(EmlEvent::RegionDefined(self.record_for(&frame))),
            Boundary::Party => Some(EmlEvent::PartyDefined(self.record_for(&frame))),
            Boundary::Candidate => Some(EmlEvent::CandidateRegistered(self.record_for(&frame))),
            Boundary::Selection { aggregated } => self.close_selection(&frame, aggregated),
            Boundary::VoteBlock { aggregated } => {
                let has_counters = frame.fields.iter().any(|(key, _)| {
                    COUNTER_PREFIXES
                        .iter()
                        .any(|prefix| key.starts_with(prefix))
                });
                has_counters.then(|| EmlEvent::MetadataRecorded {
                    aggregated,
                    record: self.record_for(&frame),
                })
            }
        }
    }

    fn close_selection(&mut self, frame: &Frame, aggregated: bool) -> Option<EmlEvent> {
        let is_party = AFFILIATION_KEYS
            .iter()
            .any(|key| frame.fields.contains_key(key));

        if is_party {
            let record = self.record_for(frame);
            if let Some(parent) = self.frames.last_mut() {
                parent.carried = AFFILIATION_KEYS
                    .iter()
                    .filter_map(|key| frame.fields.get(key).map(|value| (*key, value)))
                    .collect();
            }
            return Some(EmlEvent::PartyVotesRecorded { aggregated, record });
        }

        if frame.fields.contains_key("CandidateIdentifier")
            || frame.fields.contains_key("CandidateIdentifier-Id")
        {
            return Some(EmlEvent::CandidateVotesRecorded {
                aggregated,
                record: self.record_for(frame),
            });
        }

        tracing::debug!(fields = frame.fields.len(), "Selection without party or candidate, skipping");
        None
    }

    fn record_for(&self, frame: &Frame) -> Record {
        let mut record = self.context();
        record.extend_from(&frame.fields);
        record
    }
}

impl<R: BufRead> Iterator for EmlReader<R> {
    type Item = Result<EmlEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Decide what closing an element named `name` will produce, given its
/// ancestors.
fn classify(name: &str, ancestors: &[Frame]) -> Boundary {
    let inside = |tag: &str| ancestors.iter().any(|f| f.name == tag);
    let parent = ancestors.last().map(|f| f.name.as_str());

    match name {
        "Region" if inside("ElectionTree") => Boundary::Region,
        "RegisteredParty" => Boundary::Party,
        "Candidate" if parent == Some("Affiliation") => Boundary::Candidate,
        "Election" | "Contest" | "Affiliation" => Boundary::Scope,
        "Selection" => Boundary::Selection {
            aggregated: !inside("ReportingUnitVotes"),
        },
        "TotalVotes" => Boundary::VoteBlock { aggregated: true },
        "ReportingUnitVotes" => Boundary::VoteBlock { aggregated: false },
        _ => Boundary::None,
    }
}

fn open_frame(start: &BytesStart<'_>, ancestors: &[Frame], seen_root: bool) -> Result<Frame> {
    if ancestors.is_empty() && seen_root {
        return Err(TallyError::MalformedDocument(
            "more than one root element".into(),
        ));
    }

    let name = local_name(start);
    let mut frame = Frame {
        boundary: classify(&name, ancestors),
        fields: Record::new(),
        carried: Record::new(),
        text: String::new(),
        id: None,
        reason_code: None,
        name,
    };

    for attribute in element_attributes(start)? {
        match attribute.name.as_str() {
            "Id" => frame.id = Some(attribute.value.clone()),
            "ReasonCode" => frame.reason_code = Some(attribute.value.clone()),
            _ => {}
        }
        frame
            .fields
            .insert(attribute_key(&frame.name, &attribute.name), attribute.value);
    }

    Ok(frame)
}
