//! Command-line interface for the tally library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::aggregate::{aggregate_by_constituency, aggregate_by_municipality};
use crate::cache::{load_elections, ElectionCache};
use crate::config::{parse_election_list, validate_election_id, TallyConfig, DEFAULT_ELECTION_ID};
use crate::error::Result;
use crate::ingest::{ingest_from, FileStatus, IngestReport};
use crate::resource::DirectoryResolver;
use crate::seats::national_seat_distribution;

/// Kiesuitslag Tally - Aggregate Dutch election results from EML files.
#[derive(Parser)]
#[command(name = "kiesuitslag-tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Data directory with one sub-directory per election (default: $KIESUITSLAG_DATA_DIR or ./data)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show what was ingested for an election.
    Summary {
        /// Election identifier (e.g., TK2023)
        #[arg(default_value = DEFAULT_ELECTION_ID)]
        election: String,
    },

    /// Show party totals for one municipality.
    Municipality {
        /// Municipality name (case-insensitive)
        name: String,

        #[arg(short, long, default_value = DEFAULT_ELECTION_ID)]
        election: String,
    },

    /// Show party totals per constituency.
    Constituencies {
        #[arg(short, long, default_value = DEFAULT_ELECTION_ID)]
        election: String,

        /// Number of parties to show per constituency (0 shows all)
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },

    /// Compute the national seat distribution.
    Seats {
        #[arg(short, long, default_value = DEFAULT_ELECTION_ID)]
        election: String,

        /// Number of seats to distribute (default: $KIESUITSLAG_TOTAL_SEATS or 150)
        #[arg(short, long)]
        seats: Option<u32>,
    },

    /// Load several elections concurrently.
    Load {
        /// Comma separated election ids (default: $KIESUITSLAG_ELECTIONS)
        elections: Option<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = TallyConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Summary { election } => summary_command(&config, &election, cli.json),
        Commands::Municipality { name, election } => {
            municipality_command(&config, &election, &name, cli.json)
        }
        Commands::Constituencies { election, top } => {
            constituencies_command(&config, &election, top, cli.json)
        }
        Commands::Seats { election, seats } => {
            let config = match seats {
                Some(seats) => config.with_total_seats(seats),
                None => config,
            };
            seats_command(&config, &election, cli.json)
        }
        Commands::Load { elections } => {
            let config = match elections {
                Some(raw) => {
                    let ids = parse_election_list(&raw)?;
                    config.with_election_ids(ids)
                }
                None => config,
            };
            load_command(&config, cli.json)
        }
    }
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Ingest one election from the data directory behind a spinner.
fn load(config: &TallyConfig, election_id: &str, json: bool) -> Result<IngestReport> {
    validate_election_id(election_id)?;
    let resolver = DirectoryResolver::new(&config.data_dir);

    let pb = if json {
        ProgressBar::hidden()
    } else {
        spinner(format!("Ingesting {election_id}..."))
    };

    let result = ingest_from(&resolver, election_id);
    pb.finish_and_clear();
    let report = result?;

    if !json {
        for outcome in report.failed_files() {
            if let FileStatus::Failed { reason } = &outcome.status {
                eprintln!(
                    "{} {} ({})",
                    style("Skipped").yellow().bold(),
                    outcome.file,
                    reason
                );
            }
        }
    }

    Ok(report)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn summary_command(config: &TallyConfig, election_id: &str, json: bool) -> Result<()> {
    let report = load(config, election_id, json)?;
    if json {
        return print_json(&report.files);
    }

    let election = &report.election;
    println!(
        "{} {}",
        style("Election").bold(),
        style(election.id()).cyan()
    );
    println!("  Constituencies: {}", election.constituencies().count());
    println!("  Municipalities: {}", election.municipalities().count());
    println!("  Parties: {}", election.party_count());
    println!("  Candidates: {}", election.candidates().len());
    println!("  Vote records: {}", election.vote_records().len());
    println!("  Seat results: {}", election.seat_results().len());
    println!(
        "  Files: {} parsed, {} failed",
        report.files.len() - report.failed_files().count(),
        report.failed_files().count()
    );
    if election.is_empty() {
        println!("  {}", style("No data ingested").yellow().bold());
    }

    Ok(())
}

fn municipality_command(
    config: &TallyConfig,
    election_id: &str,
    name: &str,
    json: bool,
) -> Result<()> {
    let report = load(config, election_id, json)?;
    let totals = aggregate_by_municipality(&report.election, name);
    if json {
        return print_json(&totals);
    }

    if totals.is_empty() {
        println!("{} {}", style("No votes for").yellow(), name);
        return Ok(());
    }

    println!("{} {}", style("Municipality").bold(), style(name).cyan());
    for total in &totals {
        println!("  {:>10}  {}", total.votes, total.party);
    }

    Ok(())
}

fn constituencies_command(
    config: &TallyConfig,
    election_id: &str,
    top: usize,
    json: bool,
) -> Result<()> {
    let report = load(config, election_id, json)?;
    let results = aggregate_by_constituency(&report.election);
    if json {
        return print_json(&results);
    }

    let limit = if top == 0 { usize::MAX } else { top };
    for result in &results {
        println!(
            "{} ({} votes)",
            style(&result.name).cyan().bold(),
            result.total_votes()
        );
        for total in result.parties.iter().take(limit) {
            println!("  {:>10}  {}", total.votes, total.party);
        }
    }

    Ok(())
}

fn seats_command(config: &TallyConfig, election_id: &str, json: bool) -> Result<()> {
    let report = load(config, election_id, json)?;
    let parties = national_seat_distribution(&report.election, config.total_seats);
    if json {
        return print_json(&parties);
    }

    println!(
        "{} {} ({} seats)",
        style("Seat distribution").bold(),
        style(election_id).cyan(),
        config.total_seats
    );
    for party in parties.iter().filter(|p| p.seats > 0) {
        let official = report
            .election
            .seat_results()
            .iter()
            .find(|s| s.party_name == party.name)
            .map(|s| format!(" (official: {})", s.seats))
            .unwrap_or_default();
        println!(
            "  {:>3}  {:>6.2}%  {}{}",
            party.seats,
            party.percentage,
            party.name,
            style(official).dim()
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct LoadSummary {
    election_id: String,
    loaded: bool,
    files: usize,
    failed_files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn load_command(config: &TallyConfig, json: bool) -> Result<()> {
    let cache = ElectionCache::new();
    let resolver = DirectoryResolver::new(&config.data_dir);

    let pb = if json {
        ProgressBar::hidden()
    } else {
        spinner(format!("Loading {}...", config.election_ids.join(", ")))
    };
    let results = load_elections(&cache, &resolver, &config.election_ids);
    pb.finish_and_clear();

    let summaries: Vec<LoadSummary> = results
        .into_iter()
        .map(|(election_id, result)| match result {
            Ok(report) => LoadSummary {
                election_id,
                loaded: true,
                files: report.files.len(),
                failed_files: report.failed_files().count(),
                error: None,
            },
            Err(err) => LoadSummary {
                election_id,
                loaded: false,
                files: 0,
                failed_files: 0,
                error: Some(err.to_string()),
            },
        })
        .collect();

    if json {
        return print_json(&summaries);
    }

    for summary in &summaries {
        match &summary.error {
            None => println!(
                "{} {} ({} files, {} failed)",
                style("Loaded").green().bold(),
                summary.election_id,
                summary.files,
                summary.failed_files
            ),
            Some(error) => println!(
                "{} {}: {}",
                style("Failed").red().bold(),
                summary.election_id,
                error
            ),
        }
    }
    println!("Cached: {}", cache.election_ids().join(", "));

    Ok(())
}
