//! Kiesuitslag Tally - Ingest and aggregate Dutch election results.
//!
//! This crate reads the EML files published by the Kiesraad, builds an
//! in-memory [`Election`] per election identifier and answers the questions
//! asked of it: party totals per municipality or constituency, and a
//! D'Hondt seat distribution.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use kiesuitslag_tally::{allocate_seats, config};
//!
//! assert!(config::validate_election_id("TK2023").is_ok());
//!
//! let votes = BTreeMap::from([("OnlyOne".to_string(), 10_000), ("Zero".to_string(), 0)]);
//! let seats = allocate_seats(&votes, 10);
//! assert_eq!(seats["OnlyOne"], 10);
//! assert_eq!(seats["Zero"], 0);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Configuration constants and validation
//! - [`types`]: Model types (Region, Party, Candidate, VoteRecord, ...)
//! - [`election`]: The election aggregate and its builder
//! - [`error`]: Error types and Result alias
//! - [`xml`]: Streaming EML reader
//! - [`registry`]: Event handlers and per-role handler registries
//! - [`router`]: File roles and filename prefix routing
//! - [`resource`]: Source files and their discovery
//! - [`ingest`]: One ingestion pass with per-file outcomes
//! - [`aggregate`]: Municipality and constituency aggregation
//! - [`seats`]: D'Hondt seat allocation
//! - [`cache`]: Shared cache of ingested elections
//! - [`cli`]: Command-line interface

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod election;
pub mod error;
pub mod ingest;
pub mod registry;
pub mod resource;
pub mod router;
pub mod seats;
pub mod types;
pub mod xml;

// Re-export main functions
pub use aggregate::{aggregate_by_constituency, aggregate_by_municipality};
pub use cache::{load_elections, ElectionCache};
pub use ingest::{ingest, ingest_from};
pub use seats::{allocate_seats, national_seat_distribution, national_vote_totals};

// Re-export commonly used items
pub use config::{validate_election_id, TallyConfig};
pub use election::{Election, ElectionBuilder};
pub use error::{Result, TallyError};
pub use ingest::{FileOutcome, FileStatus, IngestReport};
pub use types::{Candidate, Party, Region, RegionCategory, VoteRecord};
