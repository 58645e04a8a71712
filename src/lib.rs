pub mod client;
pub mod config;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod sigv4;

use rand::distributions::Alphanumeric;
use rand::Rng;

use client::ServiceError;
use model::{CampaignResponse, SegmentResponse, WriteCampaignRequest, WriteSegmentRequest};

/// Operations the orchestrator needs from the campaign service (the HTTP
/// `PinpointClient`, or a recording fake in tests). Every call is scoped to
/// the application id the implementation was configured with.
pub trait CampaignService {
    /// First page of segments, in service order.
    fn list_segments(&self) -> Result<Vec<SegmentResponse>, ServiceError>;
    fn create_segment(&self, request: &WriteSegmentRequest)
        -> Result<SegmentResponse, ServiceError>;
    /// Returns the deleted segment's last representation.
    fn delete_segment(&self, segment_id: &str) -> Result<SegmentResponse, ServiceError>;
    /// First page of campaigns, in service order.
    fn list_campaigns(&self) -> Result<Vec<CampaignResponse>, ServiceError>;
    fn create_campaign(
        &self,
        request: &WriteCampaignRequest,
    ) -> Result<CampaignResponse, ServiceError>;
    fn update_campaign(
        &self,
        campaign_id: &str,
        request: &WriteCampaignRequest,
    ) -> Result<CampaignResponse, ServiceError>;
    /// Returns the deleted campaign's last representation.
    fn delete_campaign(&self, campaign_id: &str) -> Result<CampaignResponse, ServiceError>;
}

/// Length of generated resource names.
pub const RANDOM_NAME_LEN: usize = 5;

/// Random `[a-zA-Z0-9]{5}` name from the thread-local generator.
pub fn random_name() -> String {
    random_name_with(&mut rand::thread_rng())
}

/// Random `[a-zA-Z0-9]{5}` name from `rng`.
pub fn random_name_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(RANDOM_NAME_LEN)
        .map(char::from)
        .collect()
}
