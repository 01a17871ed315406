use super::websocket::WebSocketConnection;
use crate::application::{CoverageService, TrajectoryService};
use crate::common::{ApplicationError, DomainError};
use crate::domains::coverage::{Obstacle, Plan, PlanRequest, Point, TrajectoryRecord};
use crate::domains::logger::DynLogger;
use crate::domains::playback::PlaybackStreamer;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

const DEFAULT_LIST_LIMIT: usize = 100;
const DEFAULT_RECENT_LIMIT: usize = 50;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub coverage: Arc<CoverageService>,
    pub trajectories: Arc<TrajectoryService>,
    pub streamer: Arc<PlaybackStreamer>,
    pub default_step: f64,
    pub logger: DynLogger,
}

/// Planning request as sent by the web client.
#[derive(Debug, Deserialize)]
pub struct CoverageRequestBody {
    pub wall_width: f64,
    pub wall_height: f64,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub step: Option<f64>,
}

impl CoverageRequestBody {
    pub fn into_plan_request(self, default_step: f64) -> PlanRequest {
        PlanRequest::new(
            self.wall_width,
            self.wall_height,
            self.obstacles,
            self.step.unwrap_or(default_step),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ApplicationError::Domain(DomainError::InvalidParameter { .. })
            | ApplicationError::NoPathGenerated => StatusCode::UNPROCESSABLE_ENTITY,
            ApplicationError::Domain(DomainError::PlanNotFound { .. }) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/coverage", post(plan_coverage))
        .route("/api/coverage/", post(plan_coverage))
        .route("/api/trajectory", get(list_trajectories))
        .route("/api/trajectory/", get(list_trajectories))
        .route("/api/trajectory/recent", get(recent_trajectories))
        .route("/api/trajectory/by_plan/:plan_id", get(plan_trajectory))
        .route("/api/trajectory/:plan_id", get(plan_trajectory))
        .route("/ws/play/:plan_id", get(play))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn log_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = format!("{:.4}", started.elapsed().as_secs_f64());
    if let Ok(value) = HeaderValue::from_str(&elapsed) {
        response.headers_mut().insert(RESPONSE_TIME_HEADER, value);
    }
    state.logger.info(&format!(
        "{} {} - {}s - {}",
        method,
        path,
        elapsed,
        response.status().as_u16()
    ));
    response
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "Backend API is running successfully!" }))
}

async fn plan_coverage(
    State(state): State<AppState>,
    Json(body): Json<CoverageRequestBody>,
) -> Result<Json<Plan>, ApiError> {
    let request = body.into_plan_request(state.default_step);
    let plan = state.coverage.plan(request).await?;
    Ok(Json(plan))
}

async fn list_trajectories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TrajectoryRecord>>, ApiError> {
    let rows = state
        .trajectories
        .recent(query.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await?;
    Ok(Json(rows))
}

async fn recent_trajectories(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TrajectoryRecord>>, ApiError> {
    let rows = state
        .trajectories
        .recent(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
        .await?;
    Ok(Json(rows))
}

async fn plan_trajectory(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<Json<Vec<Point>>, ApiError> {
    let points = state.trajectories.points(&plan_id).await?;
    Ok(Json(points))
}

async fn play(
    ws: WebSocketUpgrade,
    Path(plan_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let mut connection = WebSocketConnection::new(socket);
        let outcome = state.streamer.play(&plan_id, &mut connection).await;
        tracing::debug!(plan_id = %plan_id, ?outcome, "playback finished");
    })
}
