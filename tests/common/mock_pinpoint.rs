//! # Mock Pinpoint — Simulated Pinpoint REST Server for Tests
//!
//! A lightweight in-process HTTP server that mimics the slice of the Pinpoint
//! REST API the runner uses, so the blocking client and the full orchestration
//! can be exercised over real HTTP without AWS.
//!
//! ## Supported Endpoints
//!
//! | Method | Path                              | Purpose          |
//! |--------|-----------------------------------|------------------|
//! | GET    | `/v1/apps/{app}/segments`         | List segments    |
//! | POST   | `/v1/apps/{app}/segments`         | Create segment   |
//! | DELETE | `/v1/apps/{app}/segments/{id}`    | Delete segment   |
//! | GET    | `/v1/apps/{app}/campaigns`        | List campaigns   |
//! | POST   | `/v1/apps/{app}/campaigns`        | Create campaign  |
//! | PUT    | `/v1/apps/{app}/campaigns/{id}`   | Update campaign  |
//! | DELETE | `/v1/apps/{app}/campaigns/{id}`   | Delete campaign  |
//!
//! ## Behaviour
//!
//! - Requests must carry `Authorization: AWS4-HMAC-SHA256 Credential=<key>/…`
//!   for the configured access key, otherwise 403. The signature itself is
//!   not recomputed.
//! - An unknown application id gives 404, as does an unknown resource id.
//! - Creating a campaign on a segment that does not exist gives 400.
//! - Any operation can be forced to fail with a chosen status.
//!
//! Every request is recorded (method, path, parsed body, auth header) in
//! arrival order for post-test assertions. State lives behind
//! `Arc<Mutex<_>>`; the server is aborted when the handle drops.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const MOCK_APP_ID: &str = "mock-app-0001";
pub const MOCK_ACCESS_KEY: &str = "AKIDMOCK";

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListSegments,
    CreateSegment,
    DeleteSegment,
    ListCampaigns,
    CreateCampaign,
    UpdateCampaign,
    DeleteCampaign,
}

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation: Operation,
    pub method: &'static str,
    pub path: String,
    pub resource_id: Option<String>,
    pub body: Option<Value>,
    pub authorization: Option<String>,
    pub amz_date: Option<String>,
    pub security_token: Option<String>,
}

type MockResponse = (StatusCode, Json<Value>);

#[derive(Debug)]
struct MockState {
    app_id: String,
    access_key: String,
    segments: Vec<Value>,
    campaigns: Vec<Value>,
    next_token: bool,
    failures: HashMap<Operation, u16>,
    id_counter: u64,
    requests: Vec<RecordedRequest>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            app_id: MOCK_APP_ID.to_string(),
            access_key: MOCK_ACCESS_KEY.to_string(),
            segments: Vec::new(),
            campaigns: Vec::new(),
            next_token: false,
            failures: HashMap::new(),
            id_counter: 0,
            requests: Vec::new(),
        }
    }
}

type SharedState = Arc<Mutex<MockState>>;

// ── MockPinpoint ────────────────────────────────────────────────────

pub struct MockPinpoint {
    base_url: String,
    _abort_handle: tokio::task::AbortHandle,
    state: SharedState,
}

impl Drop for MockPinpoint {
    fn drop(&mut self) {
        self._abort_handle.abort();
    }
}

impl MockPinpoint {
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn builder() -> MockPinpointBuilder {
        MockPinpointBuilder {
            state: MockState::default(),
        }
    }

    /// Base URL, e.g. `http://127.0.0.1:54321`.
    pub fn url(&self) -> String {
        self.base_url.clone()
    }

    pub fn app_id(&self) -> String {
        self.state.lock().unwrap().app_id.clone()
    }

    pub fn access_key(&self) -> String {
        self.state.lock().unwrap().access_key.clone()
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_for(&self, operation: Operation) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.operation == operation)
            .collect()
    }

    /// Ids of segments currently stored.
    pub fn segment_ids(&self) -> Vec<String> {
        ids_of(&self.state.lock().unwrap().segments)
    }

    /// Ids of campaigns currently stored.
    pub fn campaign_ids(&self) -> Vec<String> {
        ids_of(&self.state.lock().unwrap().campaigns)
    }

    pub fn campaign(&self, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.campaigns.iter().find(|c| c["Id"] == id).cloned()
    }

    pub fn fail(&self, operation: Operation, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation, status);
    }
}

fn ids_of(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v["Id"].as_str().map(str::to_string))
        .collect()
}

// ── Builder ─────────────────────────────────────────────────────────

pub struct MockPinpointBuilder {
    state: MockState,
}

impl MockPinpointBuilder {
    /// Seed an existing dimensional segment.
    pub fn with_segment(mut self, id: &str) -> Self {
        let app_id = self.state.app_id.clone();
        self.state.segments.push(json!({
            "ApplicationId": app_id,
            "Id": id,
            "Name": format!("seeded {}", id),
            "SegmentType": "DIMENSIONAL",
            "Version": 1,
            "CreationDate": "2026-01-01T00:00:00.000Z",
        }));
        self
    }

    /// Seed an existing campaign with the given `CampaignStatus`.
    pub fn with_campaign(mut self, id: &str, status: &str) -> Self {
        let app_id = self.state.app_id.clone();
        self.state.campaigns.push(json!({
            "ApplicationId": app_id,
            "Id": id,
            "Name": format!("seeded {}", id),
            "IsPaused": false,
            "SegmentId": "seg-seeded",
            "SegmentVersion": 1,
            "State": {"CampaignStatus": status},
            "DefaultState": {"CampaignStatus": status},
            "Version": 1,
        }));
        self
    }

    /// Add a `NextToken` to list responses.
    pub fn with_next_token(mut self) -> Self {
        self.state.next_token = true;
        self
    }

    pub fn with_failure(mut self, operation: Operation, status: u16) -> Self {
        self.state.failures.insert(operation, status);
        self
    }

    pub fn with_access_key(mut self, key: impl Into<String>) -> Self {
        self.state.access_key = key.into();
        self
    }

    /// Bind to `127.0.0.1:0`, spawn the server, and return the handle.
    pub async fn start(self) -> MockPinpoint {
        let shared_state: SharedState = Arc::new(Mutex::new(self.state));

        let app = Router::new()
            .route(
                "/v1/apps/{app}/segments",
                get(handle_list_segments).post(handle_create_segment),
            )
            .route(
                "/v1/apps/{app}/segments/{id}",
                axum::routing::delete(handle_delete_segment),
            )
            .route(
                "/v1/apps/{app}/campaigns",
                get(handle_list_campaigns).post(handle_create_campaign),
            )
            .route(
                "/v1/apps/{app}/campaigns/{id}",
                put(handle_update_campaign).delete(handle_delete_campaign),
            )
            .with_state(Arc::clone(&shared_state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Pinpoint to random port");
        let addr: SocketAddr = listener
            .local_addr()
            .expect("Failed to get mock Pinpoint local address");
        let base_url = format!("http://127.0.0.1:{}", addr.port());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock Pinpoint server failed");
        });

        MockPinpoint {
            base_url,
            _abort_handle: handle.abort_handle(),
            state: shared_state,
        }
    }
}

// ── Request gate ────────────────────────────────────────────────────

fn error(status: StatusCode, message: &str) -> MockResponse {
    (
        status,
        Json(json!({"Message": message, "RequestID": "mock-request-id"})),
    )
}

/// Record the request, then apply auth, app id, and forced-failure checks.
fn admit(
    state: &SharedState,
    operation: Operation,
    method: &'static str,
    app: &str,
    resource_id: Option<&str>,
    headers: &HeaderMap,
    body: &str,
) -> Result<Option<Value>, MockResponse> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header("authorization");
    let parsed_body = if body.trim().is_empty() {
        None
    } else {
        Some(
            serde_json::from_str::<Value>(body)
                .map_err(|_| error(StatusCode::BAD_REQUEST, "Malformed JSON body"))?,
        )
    };

    let mut s = state.lock().unwrap();
    let path = match resource_id {
        Some(id) => format!("/v1/apps/{}/{}/{}", app, collection_of(operation), id),
        None => format!("/v1/apps/{}/{}", app, collection_of(operation)),
    };
    s.requests.push(RecordedRequest {
        operation,
        method,
        path,
        resource_id: resource_id.map(str::to_string),
        body: parsed_body.clone(),
        authorization: authorization.clone(),
        amz_date: header("x-amz-date"),
        security_token: header("x-amz-security-token"),
    });

    let expected_prefix = format!("AWS4-HMAC-SHA256 Credential={}/", s.access_key);
    if !authorization
        .as_deref()
        .is_some_and(|a| a.starts_with(&expected_prefix))
    {
        return Err(error(
            StatusCode::FORBIDDEN,
            "The security token included in the request is invalid.",
        ));
    }
    if app != s.app_id {
        return Err(error(StatusCode::NOT_FOUND, "Resource not found"));
    }
    if let Some(code) = s.failures.get(&operation) {
        let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return Err(error(status, &format!("Mock error {}", code)));
    }
    Ok(parsed_body)
}

fn collection_of(operation: Operation) -> &'static str {
    match operation {
        Operation::ListSegments | Operation::CreateSegment | Operation::DeleteSegment => {
            "segments"
        }
        _ => "campaigns",
    }
}

fn next_id(state: &SharedState, prefix: &str) -> String {
    let mut s = state.lock().unwrap();
    s.id_counter += 1;
    format!("{}-{:04}", prefix, s.id_counter)
}

// ── Route Handlers ──────────────────────────────────────────────────

async fn handle_list_segments(
    State(state): State<SharedState>,
    Path(app): Path<String>,
    headers: HeaderMap,
) -> MockResponse {
    if let Err(e) = admit(&state, Operation::ListSegments, "GET", &app, None, &headers, "") {
        return e;
    }
    let s = state.lock().unwrap();
    let mut page = json!({ "Item": s.segments });
    if s.next_token {
        page["NextToken"] = json!("mock-next-token");
    }
    (StatusCode::OK, Json(page))
}

async fn handle_create_segment(
    State(state): State<SharedState>,
    Path(app): Path<String>,
    headers: HeaderMap,
    body: String,
) -> MockResponse {
    let request = match admit(&state, Operation::CreateSegment, "POST", &app, None, &headers, &body)
    {
        Ok(Some(b)) => b,
        Ok(None) => return error(StatusCode::BAD_REQUEST, "Missing body"),
        Err(e) => return e,
    };
    let id = next_id(&state, "seg");
    let segment = json!({
        "ApplicationId": app,
        "Id": id,
        "Name": request["Name"],
        "Dimensions": request["Dimensions"],
        "SegmentType": "DIMENSIONAL",
        "Version": 1,
        "CreationDate": "2026-10-17T00:00:00.000Z",
    });
    state.lock().unwrap().segments.push(segment.clone());
    (StatusCode::CREATED, Json(segment))
}

async fn handle_delete_segment(
    State(state): State<SharedState>,
    Path((app, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> MockResponse {
    if let Err(e) = admit(
        &state,
        Operation::DeleteSegment,
        "DELETE",
        &app,
        Some(&id),
        &headers,
        "",
    ) {
        return e;
    }
    let mut s = state.lock().unwrap();
    match s.segments.iter().position(|v| v["Id"] == id.as_str()) {
        Some(index) => (StatusCode::OK, Json(s.segments.remove(index))),
        None => error(StatusCode::NOT_FOUND, "Resource not found"),
    }
}

async fn handle_list_campaigns(
    State(state): State<SharedState>,
    Path(app): Path<String>,
    headers: HeaderMap,
) -> MockResponse {
    if let Err(e) = admit(&state, Operation::ListCampaigns, "GET", &app, None, &headers, "") {
        return e;
    }
    let s = state.lock().unwrap();
    let mut page = json!({ "Item": s.campaigns });
    if s.next_token {
        page["NextToken"] = json!("mock-next-token");
    }
    (StatusCode::OK, Json(page))
}

async fn handle_create_campaign(
    State(state): State<SharedState>,
    Path(app): Path<String>,
    headers: HeaderMap,
    body: String,
) -> MockResponse {
    let request = match admit(
        &state,
        Operation::CreateCampaign,
        "POST",
        &app,
        None,
        &headers,
        &body,
    ) {
        Ok(Some(b)) => b,
        Ok(None) => return error(StatusCode::BAD_REQUEST, "Missing body"),
        Err(e) => return e,
    };
    let segment_id = request["SegmentId"].as_str().unwrap_or_default().to_string();
    let segment_exists = state
        .lock()
        .unwrap()
        .segments
        .iter()
        .any(|s| s["Id"] == segment_id.as_str());
    if !segment_exists {
        return error(StatusCode::BAD_REQUEST, "Segment specified does not exist");
    }

    let id = next_id(&state, "camp");
    let campaign = json!({
        "ApplicationId": app,
        "Id": id,
        "Name": request["Name"],
        "IsPaused": request["IsPaused"],
        "SegmentId": segment_id,
        "SegmentVersion": 1,
        "Schedule": request["Schedule"],
        "MessageConfiguration": request["MessageConfiguration"],
        "Limits": request["Limits"],
        "State": {"CampaignStatus": "SCHEDULED"},
        "DefaultState": {"CampaignStatus": "SCHEDULED"},
        "Version": 1,
        "CreationDate": "2026-10-17T00:00:00.000Z",
    });
    state.lock().unwrap().campaigns.push(campaign.clone());
    (StatusCode::CREATED, Json(campaign))
}

async fn handle_update_campaign(
    State(state): State<SharedState>,
    Path((app, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> MockResponse {
    let request = match admit(
        &state,
        Operation::UpdateCampaign,
        "PUT",
        &app,
        Some(&id),
        &headers,
        &body,
    ) {
        Ok(Some(b)) => b,
        Ok(None) => return error(StatusCode::BAD_REQUEST, "Missing body"),
        Err(e) => return e,
    };
    let mut s = state.lock().unwrap();
    let Some(campaign) = s.campaigns.iter_mut().find(|v| v["Id"] == id.as_str()) else {
        return error(StatusCode::NOT_FOUND, "Resource not found");
    };
    // Partial update: only keys present in the body change.
    if let Some(fields) = request.as_object() {
        for (key, value) in fields {
            campaign[key] = value.clone();
        }
    }
    let version = campaign["Version"].as_i64().unwrap_or(0) + 1;
    campaign["Version"] = json!(version);
    (StatusCode::OK, Json(campaign.clone()))
}

async fn handle_delete_campaign(
    State(state): State<SharedState>,
    Path((app, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> MockResponse {
    if let Err(e) = admit(
        &state,
        Operation::DeleteCampaign,
        "DELETE",
        &app,
        Some(&id),
        &headers,
        "",
    ) {
        return e;
    }
    let mut s = state.lock().unwrap();
    match s.campaigns.iter().position(|v| v["Id"] == id.as_str()) {
        Some(index) => (StatusCode::OK, Json(s.campaigns.remove(index))),
        None => error(StatusCode::NOT_FOUND, "Resource not found"),
    }
}
