//! # Main — CLI Entry Point
//!
//! Parses flags, initialises logging, and hands the chosen subcommand to
//! `cli`. The `run` subcommand performs the full list → update → create →
//! delete exercise; the other subcommands perform one step each.
//!
//! ## Global Options
//!
//! - `--project-id` / `PINPOINT_PROJECT_ID`: Pinpoint project (application) id.
//! - `--access-key` / `AWS_ACCESS_KEY_ID`, `--secret-key` / `AWS_SECRET_ACCESS_KEY`,
//!   `--session-token` / `AWS_SESSION_TOKEN`: request signing credentials.
//! - `--region` / `AWS_REGION`: defaults to `us-east-1`.
//! - `--endpoint` / `PINPOINT_ENDPOINT`: override the regional endpoint.
//! - `--config`: TOML file consulted for anything not given above
//!   (default `~/.pinpoint-runner/config.toml`).
//!
//! `configure` saves only values typed on the command line; values that
//! reached a flag through its environment variable are used for the current
//! run and never written to disk.
//!
//! The field dump goes to stdout; logs go to stderr (`LOG_FORMAT=json` for
//! JSON lines, `RUST_LOG` for filtering).

mod cli;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pinpoint-runner",
    about = "List, update, create, and delete Pinpoint segments and campaigns"
)]
struct Cli {
    /// Pinpoint project (application) id
    #[arg(long, env = "PINPOINT_PROJECT_ID", global = true)]
    project_id: Option<String>,

    /// AWS access key id used to sign requests
    #[arg(long, env = "AWS_ACCESS_KEY_ID", global = true, hide_env_values = true)]
    access_key: Option<String>,

    /// AWS secret access key used to sign requests
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", global = true, hide_env_values = true)]
    secret_key: Option<String>,

    /// Session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", global = true, hide_env_values = true)]
    session_token: Option<String>,

    /// AWS region of the project (default: us-east-1)
    #[arg(long, env = "AWS_REGION", global = true)]
    region: Option<String>,

    /// Service endpoint URL (default: https://pinpoint.<region>.amazonaws.com)
    #[arg(long, env = "PINPOINT_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Path to the TOML config file (default: ~/.pinpoint-runner/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List segments and campaigns, rename unfinished campaigns, create a segment
    /// and a campaign, then delete everything that was listed
    Run,
    /// List and print the project's segments
    ListSegments,
    /// List and print the project's campaigns
    ListCampaigns,
    /// Create a segment targeting app version 0.0.0
    CreateSegment,
    /// Create a one-time silent-push campaign on a segment
    CreateCampaign {
        /// Segment the campaign targets
        #[arg(long)]
        segment_id: String,
    },
    /// Rename a campaign
    UpdateCampaign {
        /// Campaign to update
        #[arg(long)]
        id: String,
        /// New name (random 5 characters if omitted)
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a segment
    DeleteSegment {
        /// Segment to delete
        #[arg(long)]
        id: String,
    },
    /// Delete a campaign
    DeleteCampaign {
        /// Campaign to delete
        #[arg(long)]
        id: String,
    },
    /// Save project id, credentials, and region to the config file
    Configure,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Structured logging on stderr: LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    // Keep the matches: credential handling needs to know where each value came from.
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let invocation = cli::Invocation::new(&cli, &matches);

    match &cli.command {
        Commands::Run => cli::run_orchestration(&invocation),
        Commands::ListSegments => cli::run_list_segments(&invocation),
        Commands::ListCampaigns => cli::run_list_campaigns(&invocation),
        Commands::CreateSegment => cli::run_create_segment(&invocation),
        Commands::CreateCampaign { segment_id } => {
            cli::run_create_campaign(&invocation, segment_id)
        }
        Commands::UpdateCampaign { id, name } => {
            cli::run_update_campaign(&invocation, id, name.as_deref())
        }
        Commands::DeleteSegment { id } => cli::run_delete_segment(&invocation, id),
        Commands::DeleteCampaign { id } => cli::run_delete_campaign(&invocation, id),
        Commands::Configure => cli::run_configure(&invocation),
    }
}
