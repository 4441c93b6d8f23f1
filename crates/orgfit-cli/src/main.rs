use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use orgfit_common::{
    compatibility::LetterOverlapCompatibility,
    logging,
    matching::{CandidateRankingEngine, FitScoringEngine, ScoringConfig},
    run_id,
};
use serde::Serialize;
use tracing::info;

mod commands;
mod snapshot;

use commands::{RankOutput, RankRequest};
use snapshot::{OrgSnapshot, SnapshotError};

const APP_NAME: &str = "orgfit";

#[derive(Debug, Parser)]
#[command(name = "orgfit", about = "Org chart positions, fit scores and candidate ranking")]
struct Cli {
    /// Org snapshot JSON (nodes, roles, people, companyValues)
    #[arg(long, env = "ORGFIT_SNAPSHOT")]
    snapshot: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// ULID of an externally owned run; a fresh one is minted when omitted
    #[arg(long, env = "ORGFIT_RUN_ID")]
    run_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Unified positions of one org node with their fit metrics
    Positions {
        #[arg(long)]
        node: String,

        /// Include skill, manager and culture breakdowns
        #[arg(long, default_value_t = false)]
        detailed: bool,
    },
    /// Rank candidates from the whole snapshot for one role
    Rank {
        /// Role id, or `implicit:<personId>` for a legacy position
        #[arg(long)]
        role: String,

        /// Defaults to ORGFIT_RANKING_TOP_N
        #[arg(long)]
        top_n: Option<usize>,

        /// Person ids to leave out (repeatable or comma separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Emit shortlist records stamped with the run id
        #[arg(long, default_value_t = false)]
        shortlist: bool,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("run id is not a ULID: {0}")]
    InvalidRunId(String),
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn run() -> Result<(), CliError> {
    dotenv().ok();
    let log_config = logging::LoggingConfig::from_env();
    logging::install_tracing_panic_hook(APP_NAME, &log_config);
    logging::init_tracing_subscriber(APP_NAME, &log_config);

    let cli = Cli::parse();
    let run_id = run_id::resolve(cli.run_id.as_deref()).map_err(CliError::InvalidRunId)?;
    let _run = logging::run_span(APP_NAME, &run_id).entered();

    let snapshot = OrgSnapshot::load(&cli.snapshot)?;
    let scoring = FitScoringEngine::new(
        ScoringConfig::from_env(),
        Arc::new(LetterOverlapCompatibility),
    );

    info!(
        snapshot = %cli.snapshot.display(),
        nodes = snapshot.nodes.len(),
        roles = snapshot.roles.len(),
        people = snapshot.people.len(),
        "snapshot loaded"
    );

    match cli.command {
        Command::Positions { node, detailed } => {
            let views = commands::positions(&snapshot, &scoring, &node, detailed)?;
            print_json(&views, cli.pretty)
        }
        Command::Rank {
            role,
            top_n,
            exclude,
            shortlist,
        } => {
            let engine = CandidateRankingEngine::new(scoring);
            let request = RankRequest {
                role_id: &role,
                top_n,
                exclude: &exclude,
            };
            let output = if shortlist {
                RankOutput::Shortlist(commands::shortlist(
                    &snapshot,
                    &engine,
                    &request,
                    &run_id,
                    Utc::now(),
                )?)
            } else {
                RankOutput::Candidates(commands::rank(&snapshot, &engine, &request)?)
            };
            print_json(&output, cli.pretty)
        }
    }
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "orgfit failed");
        eprintln!("orgfit failed: {err}");
        std::process::exit(1);
    }
}
