//! # Orchestrator — One-Shot Segment/Campaign Exercise
//!
//! Runs a fixed sequence against a [`CampaignService`], printing every
//! resource the service hands back:
//!
//! ```text
//! getSegments ─> getCampaigns ─> updateCampaign (each non-COMPLETED)
//!     ─> createSegment ─> createCampaign (on the new segment)
//!     ─> deleteSegment (each listed) ─> deleteCampaign (each listed)
//! ```
//!
//! Only resources from the initial listings are deleted; the segment and
//! campaign created by the run are left in place. The first failing call
//! aborts the run and nothing already done is undone.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::io::Write;
use tracing::{info, warn};

use crate::model::{
    Action, CampaignLimits, CampaignResponse, DimensionType, Frequency, Message,
    MessageConfiguration, Schedule, SegmentDemographics, SegmentDimensions, SegmentResponse,
    SetDimension, WriteCampaignRequest, WriteSegmentRequest,
};
use crate::{random_name, report, CampaignService};

pub const APP_VERSION_FILTER: &str = "0.0.0";
pub const SEGMENT_NAME_PREFIX: &str = "createSegment-";
pub const CAMPAIGN_NAME_PREFIX: &str = "createCampaign-";

/// What one run touched, by resource id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    pub listed_segments: usize,
    pub listed_campaigns: usize,
    pub updated_campaigns: Vec<String>,
    pub created_segment: String,
    pub created_campaign: String,
    pub deleted_segments: Vec<String>,
    pub deleted_campaigns: Vec<String>,
}

// ── Request construction ────────────────────────────────────────

/// Segment restricted to app version `0.0.0`, inclusive.
pub fn segment_request(name: String) -> WriteSegmentRequest {
    WriteSegmentRequest {
        name: Some(name),
        dimensions: Some(SegmentDimensions {
            demographic: Some(SegmentDemographics {
                app_version: Some(SetDimension {
                    dimension_type: DimensionType::Inclusive,
                    values: vec![APP_VERSION_FILTER.to_string()],
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        segment_groups: None,
    }
}

/// One-shot silent push to `segment_id`, starting at `start`.
pub fn campaign_request<Tz>(
    segment_id: &str,
    name: String,
    start: &DateTime<Tz>,
) -> WriteCampaignRequest
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    WriteCampaignRequest {
        name: Some(name),
        is_paused: Some(false),
        message_configuration: Some(MessageConfiguration {
            default_message: Some(Message {
                action: Some(Action::OpenApp),
                silent_push: Some(true),
                json_body: Some(walk_payload()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        segment_id: Some(segment_id.to_string()),
        schedule: Some(Schedule {
            start_time: Some(schedule_start_time(start)),
            is_local_time: Some(false),
            frequency: Some(Frequency::Once),
            ..Default::default()
        }),
        limits: Some(CampaignLimits::default()),
        ..Default::default()
    }
}

/// Partial update that only renames.
pub fn rename_request(name: String) -> WriteCampaignRequest {
    WriteCampaignRequest {
        name: Some(name),
        ..Default::default()
    }
}

/// ISO-8601 wall-clock time with UTC offset, second precision.
pub fn schedule_start_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Silent-push payload delivered to the app.
pub fn walk_payload() -> String {
    serde_json::json!({ "type": "walk" }).to_string()
}

// ── Single operations ───────────────────────────────────────────

pub fn create_standard_segment<S: CampaignService + ?Sized>(
    service: &S,
) -> Result<SegmentResponse> {
    let request = segment_request(format!("{}{}", SEGMENT_NAME_PREFIX, random_name()));
    service.create_segment(&request).context("create segment")
}

pub fn create_standard_campaign<S: CampaignService + ?Sized>(
    service: &S,
    segment_id: &str,
) -> Result<CampaignResponse> {
    let request = campaign_request(
        segment_id,
        format!("{}{}", CAMPAIGN_NAME_PREFIX, random_name()),
        &Local::now(),
    );
    service
        .create_campaign(&request)
        .with_context(|| format!("create campaign on segment {}", segment_id))
}

pub fn rename_campaign<S: CampaignService + ?Sized>(
    service: &S,
    campaign_id: &str,
    name: String,
) -> Result<CampaignResponse> {
    service
        .update_campaign(campaign_id, &rename_request(name))
        .with_context(|| format!("update campaign {}", campaign_id))
}

// ── Full run ────────────────────────────────────────────────────

/// Execute the whole sequence, writing the dump to `out`.
pub fn run<S, W>(service: &S, out: &mut W) -> Result<RunReport>
where
    S: CampaignService + ?Sized,
    W: Write + ?Sized,
{
    let mut summary = RunReport::default();

    info!("listing segments");
    report::write_banner(out, "getSegments")?;
    let segments = service.list_segments().context("list segments")?;
    for segment in &segments {
        report::write_segment(out, segment)?;
    }
    summary.listed_segments = segments.len();

    info!("listing campaigns");
    report::write_banner(out, "getCampaigns")?;
    let campaigns = service.list_campaigns().context("list campaigns")?;
    for campaign in &campaigns {
        report::write_campaign(out, campaign)?;
    }
    summary.listed_campaigns = campaigns.len();

    info!("updating campaigns that have not completed");
    report::write_banner(out, "updateCampaign")?;
    for campaign in campaigns.iter().filter(|c| !c.is_completed()) {
        let Some(id) = campaign.id.as_deref() else {
            warn!(name = ?campaign.name, "listed campaign has no id, not updating");
            continue;
        };
        let updated = rename_campaign(service, id, random_name())?;
        report::write_campaign(out, &updated)?;
        summary.updated_campaigns.push(id.to_string());
    }

    info!("creating segment");
    report::write_banner(out, "createSegment")?;
    let segment = create_standard_segment(service)?;
    report::write_segment(out, &segment)?;
    let segment_id = segment
        .id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("created segment came back without an id"))?;
    summary.created_segment = segment_id.clone();

    info!(segment_id = %segment_id, "creating campaign");
    report::write_banner(out, "createCampaign")?;
    let campaign = create_standard_campaign(service, &segment_id)?;
    report::write_campaign(out, &campaign)?;
    summary.created_campaign = campaign.id.clone().unwrap_or_default();

    info!("deleting listed segments");
    report::write_banner(out, "deleteSegment")?;
    for id in segments.iter().filter_map(|s| s.id.as_deref()) {
        let deleted = service
            .delete_segment(id)
            .with_context(|| format!("delete segment {}", id))?;
        report::write_segment(out, &deleted)?;
        summary.deleted_segments.push(id.to_string());
    }

    info!("deleting listed campaigns");
    report::write_banner(out, "deleteCampaign")?;
    for id in campaigns.iter().filter_map(|c| c.id.as_deref()) {
        let deleted = service
            .delete_campaign(id)
            .with_context(|| format!("delete campaign {}", id))?;
        report::write_campaign(out, &deleted)?;
        summary.deleted_campaigns.push(id.to_string());
    }

    out.flush()?;
    info!(
        listed_segments = summary.listed_segments,
        listed_campaigns = summary.listed_campaigns,
        updated = summary.updated_campaigns.len(),
        deleted_segments = summary.deleted_segments.len(),
        deleted_campaigns = summary.deleted_campaigns.len(),
        "run complete"
    );
    Ok(summary)
}
