//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim: settings
//! resolution, client construction, and the body of each subcommand.

use anyhow::{Context, Result};
use clap::parser::ValueSource;
use clap::ArgMatches;
use pinpoint_runner::client::PinpointClient;
use pinpoint_runner::config::{self, ConfigOverrides, FileConfig, Settings};
use pinpoint_runner::model::{CampaignResponse, SegmentResponse};
use pinpoint_runner::{orchestrator, random_name, report, CampaignService};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use super::Cli;

/// Parsed flags together with the matches they came from, so callers can
/// tell a typed flag from one filled in by its environment variable.
pub struct Invocation<'a> {
    cli: &'a Cli,
    matches: &'a ArgMatches,
}

impl<'a> Invocation<'a> {
    pub fn new(cli: &'a Cli, matches: &'a ArgMatches) -> Self {
        Invocation { cli, matches }
    }

    fn source(&self, id: &str) -> Option<ValueSource> {
        self.matches.value_source(id)
    }

    fn typed(&self, id: &str, value: &Option<String>) -> Option<String> {
        match self.source(id) {
            Some(ValueSource::CommandLine) => value.clone(),
            _ => None,
        }
    }

    /// Flag and environment values for this run. The session token is kept
    /// only when it came from the same place as the access key.
    fn overrides(&self) -> ConfigOverrides {
        let cli = self.cli;
        let session_token = if self.source("session_token") == self.source("access_key") {
            cli.session_token.clone()
        } else {
            None
        };
        ConfigOverrides {
            project_id: cli.project_id.clone(),
            access_key: cli.access_key.clone(),
            secret_key: cli.secret_key.clone(),
            session_token,
            region: cli.region.clone(),
            endpoint: cli.endpoint.clone(),
        }
    }

    /// Only the values typed on the command line.
    fn command_line_values(&self) -> FileConfig {
        let cli = self.cli;
        FileConfig {
            project_id: self.typed("project_id", &cli.project_id),
            access_key: self.typed("access_key", &cli.access_key),
            secret_key: self.typed("secret_key", &cli.secret_key),
            session_token: self.typed("session_token", &cli.session_token),
            region: self.typed("region", &cli.region),
            endpoint: self.typed("endpoint", &cli.endpoint),
        }
    }

    fn config_path(&self) -> Result<PathBuf> {
        match &self.cli.config {
            Some(path) => Ok(path.clone()),
            None => config::default_config_path(),
        }
    }

    /// Resolve settings from flags/env over the config file and build a client.
    fn connect(&self) -> Result<PinpointClient> {
        let path = self.config_path()?;
        let file = config::load_file(&path)?;
        let settings = Settings::resolve(&self.overrides(), file.as_ref())?;
        info!(
            project_id = %settings.project_id,
            region = %settings.region,
            endpoint = %settings.endpoint,
            temporary_credentials = settings.credentials.session_token.is_some(),
            "using Pinpoint project"
        );
        PinpointClient::new(&settings).context("Failed to configure Pinpoint client")
    }
}

fn print_segments(segments: &[SegmentResponse]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for segment in segments {
        report::write_segment(&mut out, segment)?;
    }
    out.flush()?;
    Ok(())
}

fn print_campaigns(campaigns: &[CampaignResponse]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for campaign in campaigns {
        report::write_campaign(&mut out, campaign)?;
    }
    out.flush()?;
    Ok(())
}

// ── Full run ────────────────────────────────────────────────────

pub fn run_orchestration(inv: &Invocation) -> Result<()> {
    let client = inv.connect()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    orchestrator::run(&client, &mut out)?;
    Ok(())
}

// ── Single steps ────────────────────────────────────────────────

pub fn run_list_segments(inv: &Invocation) -> Result<()> {
    let client = inv.connect()?;
    print_segments(&client.list_segments().context("list segments")?)
}

pub fn run_list_campaigns(inv: &Invocation) -> Result<()> {
    let client = inv.connect()?;
    print_campaigns(&client.list_campaigns().context("list campaigns")?)
}

pub fn run_create_segment(inv: &Invocation) -> Result<()> {
    let client = inv.connect()?;
    let segment = orchestrator::create_standard_segment(&client)?;
    print_segments(&[segment])
}

pub fn run_create_campaign(inv: &Invocation, segment_id: &str) -> Result<()> {
    let client = inv.connect()?;
    let campaign = orchestrator::create_standard_campaign(&client, segment_id)?;
    print_campaigns(&[campaign])
}

pub fn run_update_campaign(inv: &Invocation, id: &str, name: Option<&str>) -> Result<()> {
    let client = inv.connect()?;
    let name = name.map(str::to_string).unwrap_or_else(random_name);
    let campaign = orchestrator::rename_campaign(&client, id, name)?;
    print_campaigns(&[campaign])
}

pub fn run_delete_segment(inv: &Invocation, id: &str) -> Result<()> {
    let client = inv.connect()?;
    let segment = client
        .delete_segment(id)
        .with_context(|| format!("delete segment {}", id))?;
    print_segments(&[segment])
}

pub fn run_delete_campaign(inv: &Invocation, id: &str) -> Result<()> {
    let client = inv.connect()?;
    let campaign = client
        .delete_campaign(id)
        .with_context(|| format!("delete campaign {}", id))?;
    print_campaigns(&[campaign])
}

// ── Configuration ───────────────────────────────────────────────

/// Merge the flags typed on the command line into the config file and
/// write it back. Environment values are not saved.
pub fn run_configure(inv: &Invocation) -> Result<()> {
    let path = inv.config_path()?;
    let existing = config::load_file(&path)?.unwrap_or_default();
    let merged = inv.command_line_values().merged_over(existing)?;
    // Fail now rather than on the first run.
    Settings::resolve(&ConfigOverrides::default(), Some(&merged))?;
    config::save_file(&path, &merged)?;
    eprintln!("Saved configuration to {}", path.display());
    Ok(())
}
