//! # Client — Blocking Pinpoint REST Client
//!
//! Implements [`CampaignService`] over the Pinpoint REST API using a single
//! `ureq::Agent`. Each call is one signed request and one response; there is
//! no retry and no pagination.
//!
//! ```text
//! PinpointClient                        Pinpoint (mobiletargeting)
//! ┌────────────────┐                   ┌──────────────────────────────────┐
//! │ list_segments  │ ──GET──────────>  │ /v1/apps/{app}/segments          │
//! │ create_segment │ ──POST─────────>  │ /v1/apps/{app}/segments          │
//! │ delete_segment │ ──DELETE───────>  │ /v1/apps/{app}/segments/{id}     │
//! │ list_campaigns │ ──GET──────────>  │ /v1/apps/{app}/campaigns         │
//! │ create_campaign│ ──POST─────────>  │ /v1/apps/{app}/campaigns         │
//! │ update_campaign│ ──PUT──────────>  │ /v1/apps/{app}/campaigns/{id}    │
//! │ delete_campaign│ ──DELETE───────>  │ /v1/apps/{app}/campaigns/{id}    │
//! └────────────────┘                   └──────────────────────────────────┘
//! ```
//!
//! Non-2xx responses become [`ServiceError::Status`] carrying the service's
//! `Message` and `RequestID` when the body has them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::model::{
    CampaignResponse, CampaignsResponse, ErrorBody, SegmentResponse, SegmentsResponse,
    WriteCampaignRequest, WriteSegmentRequest,
};
use crate::sigv4::{self, Credentials, SignedHeaders};
use crate::CampaignService;

/// Signing name of the Pinpoint REST API.
pub const SERVICE_NAME: &str = "mobiletargeting";

const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("service returned HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        request_id: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid endpoint {0:?}")]
    Endpoint(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

pub struct PinpointClient {
    agent: ureq::Agent,
    /// Scheme and authority, e.g. `https://pinpoint.us-east-1.amazonaws.com`.
    origin: String,
    /// Authority as signed in the `host` header.
    host: String,
    /// Path prefix of the endpoint, without trailing slash.
    base_path: String,
    application_id: String,
    credentials: Credentials,
    region: String,
}

impl PinpointClient {
    pub fn new(settings: &Settings) -> Result<Self, ServiceError> {
        let endpoint = url::Url::parse(&settings.endpoint)
            .map_err(|_| ServiceError::Endpoint(settings.endpoint.clone()))?;
        let host_name = endpoint
            .host_str()
            .ok_or_else(|| ServiceError::Endpoint(settings.endpoint.clone()))?;
        let host = match endpoint.port() {
            Some(port) => format!("{}:{}", host_name, port),
            None => host_name.to_string(),
        };

        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .http_status_as_error(false)
                .timeout_connect(Some(Duration::from_secs(10)))
                .timeout_global(Some(Duration::from_secs(60)))
                .build(),
        );

        Ok(PinpointClient {
            agent,
            origin: format!("{}://{}", endpoint.scheme(), host),
            host,
            base_path: endpoint.path().trim_end_matches('/').to_string(),
            application_id: settings.project_id.clone(),
            credentials: settings.credentials.clone(),
            region: settings.region.clone(),
        })
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    fn collection_path(&self, collection: &str) -> String {
        format!(
            "{}/v1/apps/{}/{}",
            self.base_path,
            urlencoding::encode(&self.application_id),
            collection
        )
    }

    fn resource_path(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_path(collection),
            urlencoding::encode(id)
        )
    }

    fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T, ServiceError> {
        let payload = match body {
            Some(b) => Some(serde_json::to_vec(b).map_err(ServiceError::Encode)?),
            None => None,
        };
        let signed = sigv4::sign(
            &sigv4::SigningRequest {
                method: method.as_str(),
                host: &self.host,
                path,
                query: &[],
                content_type: payload.as_ref().map(|_| CONTENT_TYPE_JSON),
                body: payload.as_deref().unwrap_or_default(),
            },
            &self.credentials,
            &self.region,
            SERVICE_NAME,
            chrono::Utc::now(),
        );

        let url = format!("{}{}", self.origin, path);
        debug!(method = method.as_str(), path, "sending request");

        let payload = payload.unwrap_or_default();
        let mut response = match method {
            Method::Get => with_signature(self.agent.get(&url), &signed).call()?,
            Method::Delete => with_signature(self.agent.delete(&url), &signed).call()?,
            Method::Post => with_signature(self.agent.post(&url), &signed)
                .header("content-type", CONTENT_TYPE_JSON)
                .send(&payload[..])?,
            Method::Put => with_signature(self.agent.put(&url), &signed)
                .header("content-type", CONTENT_TYPE_JSON)
                .send(&payload[..])?,
        };

        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string()?;
        debug!(status, bytes = text.len(), "received response");

        if !(200..300).contains(&status) {
            return Err(status_error(status, &text));
        }
        serde_json::from_str(&text).map_err(ServiceError::Decode)
    }
}

fn with_signature<B>(
    mut request: ureq::RequestBuilder<B>,
    signed: &SignedHeaders,
) -> ureq::RequestBuilder<B> {
    for (name, value) in signed.iter() {
        request = request.header(name, value);
    }
    request
}

fn status_error(status: u16, text: &str) -> ServiceError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body
        .message
        .or_else(|| Some(text.trim().to_string()).filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "no error message".to_string());
    ServiceError::Status {
        status,
        message,
        request_id: body.request_id,
    }
}

impl CampaignService for PinpointClient {
    fn list_segments(&self) -> Result<Vec<SegmentResponse>, ServiceError> {
        let page: SegmentsResponse =
            self.execute(Method::Get, &self.collection_path("segments"), None::<&()>)?;
        if page.next_token.is_some() {
            warn!(
                returned = page.item.len(),
                "more segments exist than the first page; only the first page is used"
            );
        }
        Ok(page.item)
    }

    fn create_segment(
        &self,
        request: &WriteSegmentRequest,
    ) -> Result<SegmentResponse, ServiceError> {
        self.execute(Method::Post, &self.collection_path("segments"), Some(request))
    }

    fn delete_segment(&self, segment_id: &str) -> Result<SegmentResponse, ServiceError> {
        self.execute(
            Method::Delete,
            &self.resource_path("segments", segment_id),
            None::<&()>,
        )
    }

    fn list_campaigns(&self) -> Result<Vec<CampaignResponse>, ServiceError> {
        let page: CampaignsResponse =
            self.execute(Method::Get, &self.collection_path("campaigns"), None::<&()>)?;
        if page.next_token.is_some() {
            warn!(
                returned = page.item.len(),
                "more campaigns exist than the first page; only the first page is used"
            );
        }
        Ok(page.item)
    }

    fn create_campaign(
        &self,
        request: &WriteCampaignRequest,
    ) -> Result<CampaignResponse, ServiceError> {
        self.execute(Method::Post, &self.collection_path("campaigns"), Some(request))
    }

    fn update_campaign(
        &self,
        campaign_id: &str,
        request: &WriteCampaignRequest,
    ) -> Result<CampaignResponse, ServiceError> {
        self.execute(
            Method::Put,
            &self.resource_path("campaigns", campaign_id),
            Some(request),
        )
    }

    fn delete_campaign(&self, campaign_id: &str) -> Result<CampaignResponse, ServiceError> {
        self.execute(
            Method::Delete,
            &self.resource_path("campaigns", campaign_id),
            None::<&()>,
        )
    }
}
