//! # Model — Pinpoint Segment and Campaign Wire Types
//!
//! Request and response bodies for the Pinpoint REST API (`/v1/apps/{app}/…`).
//! Field names follow the vendor's published JSON, which uses PascalCase keys.
//! Every response field is optional: the service omits keys freely, and unknown
//! keys are ignored so that schema additions never break decoding.
//!
//! Nested groups the orchestrator never inspects (segment attribute filters,
//! per-channel message overrides, quiet time, …) are kept as raw
//! `serde_json::Value` so they still print and round-trip unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ── Segments ────────────────────────────────────────────────────

/// Segment as returned by list, create, and delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentResponse {
    pub application_id: Option<String>,
    pub arn: Option<String>,
    pub creation_date: Option<String>,
    pub dimensions: Option<SegmentDimensions>,
    pub id: Option<String>,
    pub import_definition: Option<serde_json::Value>,
    pub last_modified_date: Option<String>,
    pub name: Option<String>,
    pub segment_groups: Option<serde_json::Value>,
    pub segment_type: Option<SegmentType>,
    pub version: Option<i64>,
}

/// `GET /v1/apps/{app}/segments` response page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentsResponse {
    #[serde(default)]
    pub item: Vec<SegmentResponse>,
    pub next_token: Option<String>,
}

/// Body of create-segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteSegmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<SegmentDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_groups: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    Dimensional,
    Import,
}

/// Targeting dimensions of a segment. Only the demographic group is typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentDimensions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demographic: Option<SegmentDemographics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentDemographics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<SetDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<SetDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<SetDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<SetDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<SetDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<SetDimension>,
}

/// Set-membership filter: match (or exclude) any of `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetDimension {
    pub dimension_type: DimensionType,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DimensionType {
    Inclusive,
    Exclusive,
}

// ── Campaigns ───────────────────────────────────────────────────

/// Campaign as returned by list, create, update, and delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignResponse {
    pub additional_treatments: Option<serde_json::Value>,
    pub application_id: Option<String>,
    pub arn: Option<String>,
    pub creation_date: Option<String>,
    pub default_state: Option<CampaignState>,
    pub description: Option<String>,
    pub holdout_percent: Option<i64>,
    pub id: Option<String>,
    pub is_paused: Option<bool>,
    pub last_modified_date: Option<String>,
    pub limits: Option<CampaignLimits>,
    pub message_configuration: Option<MessageConfiguration>,
    pub name: Option<String>,
    pub schedule: Option<Schedule>,
    pub segment_id: Option<String>,
    pub segment_version: Option<i64>,
    pub state: Option<CampaignState>,
    pub treatment_description: Option<String>,
    pub treatment_name: Option<String>,
    pub version: Option<i64>,
}

impl CampaignResponse {
    /// A campaign without a reported state counts as not completed.
    pub fn is_completed(&self) -> bool {
        matches!(
            self.state.as_ref().and_then(|s| s.campaign_status.as_ref()),
            Some(CampaignStatus::Completed)
        )
    }
}

/// `GET /v1/apps/{app}/campaigns` response page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignsResponse {
    #[serde(default)]
    pub item: Vec<CampaignResponse>,
    pub next_token: Option<String>,
}

/// Body of create-campaign and update-campaign. Update sends only the fields
/// that are set; the service leaves the rest unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WriteCampaignRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holdout_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_configuration: Option<MessageConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<CampaignLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignState {
    pub campaign_status: Option<CampaignStatus>,
}

/// Campaign lifecycle status. Values this build does not know are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CampaignStatus {
    Scheduled,
    Executing,
    PendingNextRun,
    Completed,
    Paused,
    Deleted,
    Invalid,
    Other(String),
}

impl CampaignStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CampaignStatus::Scheduled => "SCHEDULED",
            CampaignStatus::Executing => "EXECUTING",
            CampaignStatus::PendingNextRun => "PENDING_NEXT_RUN",
            CampaignStatus::Completed => "COMPLETED",
            CampaignStatus::Paused => "PAUSED",
            CampaignStatus::Deleted => "DELETED",
            CampaignStatus::Invalid => "INVALID",
            CampaignStatus::Other(s) => s,
        }
    }
}

impl From<String> for CampaignStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SCHEDULED" => CampaignStatus::Scheduled,
            "EXECUTING" => CampaignStatus::Executing,
            "PENDING_NEXT_RUN" => CampaignStatus::PendingNextRun,
            "COMPLETED" => CampaignStatus::Completed,
            "PAUSED" => CampaignStatus::Paused,
            "DELETED" => CampaignStatus::Deleted,
            "INVALID" => CampaignStatus::Invalid,
            _ => CampaignStatus::Other(s),
        }
    }
}

impl From<CampaignStatus> for String {
    fn from(status: CampaignStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_local_time: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_time: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_filter: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Once,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Event,
    InAppEvent,
}

/// Delivery limits. All fields unset means "service defaults" and serializes
/// as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CampaignLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages_per_second: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<i64>,
}

/// Message content. The default message applies to every channel that has
/// no override in `channel_overrides` (`APNSMessage`, `GCMMessage`, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_message: Option<Message>,
    #[serde(flatten)]
    pub channel_overrides: BTreeMap<String, serde_json::Value>,
}

/// Default push message. Keys not declared here land in `extra` so a
/// decoded message prints and re-encodes without loss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_small_icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent_push: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    OpenApp,
    DeepLink,
    Url,
}

/// Error body the service returns with non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "Message", alias = "message")]
    pub message: Option<String>,
    #[serde(rename = "RequestID", alias = "RequestId")]
    pub request_id: Option<String>,
}
