//! Plain-text dump of segments and campaigns: one `label: value` line per
//! declared attribute, under a header line naming the resource kind.
//!
//! Missing values print as `null`, enums as their wire names, and nested
//! structures as compact JSON.

use serde::Serialize;
use std::io::{self, Write};

use crate::model::{CampaignResponse, SegmentResponse};

const BANNER_FILL: &str = "--------------------------------------";

/// Phase separator, e.g. `--getSegments----…`.
pub fn write_banner<W: Write + ?Sized>(out: &mut W, phase: &str) -> io::Result<()> {
    writeln!(out, "--{}{}", phase, BANNER_FILL)
}

pub fn segment_fields(segment: &SegmentResponse) -> Vec<(&'static str, String)> {
    vec![
        ("applicationId", render(&segment.application_id)),
        ("arn", render(&segment.arn)),
        ("creationDate", render(&segment.creation_date)),
        ("dimensions", render(&segment.dimensions)),
        ("id", render(&segment.id)),
        ("importDefinition", render(&segment.import_definition)),
        ("lastModifiedDate", render(&segment.last_modified_date)),
        ("name", render(&segment.name)),
        ("segmentGroups", render(&segment.segment_groups)),
        ("segmentType", render(&segment.segment_type)),
        ("version", render(&segment.version)),
    ]
}

pub fn campaign_fields(campaign: &CampaignResponse) -> Vec<(&'static str, String)> {
    vec![
        ("additionalTreatments", render(&campaign.additional_treatments)),
        ("applicationId", render(&campaign.application_id)),
        ("arn", render(&campaign.arn)),
        ("creationDate", render(&campaign.creation_date)),
        ("defaultState", render(&campaign.default_state)),
        ("description", render(&campaign.description)),
        ("holdoutPercent", render(&campaign.holdout_percent)),
        ("id", render(&campaign.id)),
        ("isPaused", render(&campaign.is_paused)),
        ("lastModifiedDate", render(&campaign.last_modified_date)),
        ("limits", render(&campaign.limits)),
        ("messageConfiguration", render(&campaign.message_configuration)),
        ("name", render(&campaign.name)),
        ("schedule", render(&campaign.schedule)),
        ("segmentId", render(&campaign.segment_id)),
        ("segmentVersion", render(&campaign.segment_version)),
        ("state", render(&campaign.state)),
        ("treatmentDescription", render(&campaign.treatment_description)),
        ("treatmentName", render(&campaign.treatment_name)),
        ("version", render(&campaign.version)),
    ]
}

pub fn write_segment<W: Write + ?Sized>(out: &mut W, segment: &SegmentResponse) -> io::Result<()> {
    writeln!(out, "Segment")?;
    write_fields(out, &segment_fields(segment))
}

pub fn write_campaign<W: Write + ?Sized>(
    out: &mut W,
    campaign: &CampaignResponse,
) -> io::Result<()> {
    writeln!(out, "Campaign")?;
    write_fields(out, &campaign_fields(campaign))
}

fn write_fields<W: Write + ?Sized>(out: &mut W, fields: &[(&str, String)]) -> io::Result<()> {
    for (label, value) in fields {
        writeln!(out, "{}: {}", label, value)?;
    }
    Ok(())
}

fn render<T: Serialize>(value: &Option<T>) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Null) => "null".to_string(),
        Ok(serde_json::Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(e) => format!("<unprintable: {}>", e),
    }
}
