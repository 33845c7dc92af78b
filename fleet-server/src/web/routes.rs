//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::{Place, RouteKind, UnknownRouteKind};
use crate::planner::{ScoreError, TripError, TripPlanningSession};
use crate::simulator::SimulationSnapshot;
use crate::storage::StorageError;

use super::dto::*;
use super::state::{AppState, session_key};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/geocode", get(geocode))
        .route("/api/routes/estimate", post(estimate_routes))
        .route("/api/trips", post(plan_trip))
        .route("/api/trips/:id", get(get_trip))
        .route("/api/trips/:id/select", post(select_route))
        .route(
            "/api/trips/:id/tracking",
            get(get_tracking).delete(stop_tracking),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Resolve one place name.
async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<Place>, AppError> {
    let place = state
        .planner
        .geocoder()
        .resolve(&query.q)
        .await
        .map_err(TripError::from)?;
    Ok(Json(place))
}

/// Score raw points without geocoding.
async fn estimate_routes(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let estimates = state.planner.scorer().score(&req.points)?;
    Ok(Json(EstimateResponse {
        estimates: estimates.iter().map(EstimateResult::from).collect(),
    }))
}

/// Plan a trip and store it.
async fn plan_trip(
    State(state): State<AppState>,
    Json(req): Json<PlanTripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let input = req
        .into_input()
        .map_err(|message| AppError::BadRequest { message })?;

    let session = state.planner.plan(input).await?;
    state.sessions.save(&session_key(&session.id), &session).await?;

    Ok((StatusCode::CREATED, Json(TripResponse::from_session(&session))))
}

/// Fetch a stored trip.
async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, AppError> {
    let session = load_session(&state, &id).await?;
    Ok(Json(TripResponse::from_session(&session)))
}

/// Select a route, fetch its path and start tracking.
///
/// A routing failure is not an error here: the response carries the
/// estimate with no route, and tracking of any earlier selection stops.
async fn select_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectRouteRequest>,
) -> Result<Json<SelectRouteResponse>, AppError> {
    let kind: RouteKind = req.kind.parse().map_err(|e: UnknownRouteKind| {
        AppError::BadRequest {
            message: e.to_string(),
        }
    })?;

    let mut session = load_session(&state, &id).await?;
    let selected = session.select(kind);
    state.sessions.save(&session_key(&id), &session).await?;

    let estimate = session.estimate(kind);
    let mut response = SelectRouteResponse {
        selected,
        estimate: EstimateResult::from(estimate),
        arrives_at: estimate.arrival_at(Utc::now()),
        route: None,
        unavailable_reason: None,
        tracking: false,
    };

    match state.planner.fetch_path(&selected).await {
        Ok(routed) => {
            let tracker = state.tracker(&id).await;
            let previous = tracker.lock().await.take();
            if let Some(previous) = previous {
                previous.stop().await;
            }
            tracker.lock().await.start(routed.path.clone());
            info!(trip = %id, kind = %kind, points = routed.path.len(), "tracking started");

            response.route = Some(RoutedSummary::from_routed(&routed));
            response.tracking = true;
        }
        Err(TripError::RouteUnavailable(e)) => {
            if state.stop_tracking(&id).await.is_some() {
                info!(trip = %id, kind = %kind, "stale tracking stopped");
            }
            response.unavailable_reason = Some(e.to_string());
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Json(response))
}

/// Latest tracking snapshot for a trip.
async fn get_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackingResponse>, AppError> {
    if let Err(e) = load_session(&state, &id).await {
        state.tracking.invalidate(&id).await;
        return Err(e);
    }

    let snapshot = match state.tracking.get(&id).await {
        Some(tracker) => tracker.lock().await.snapshot(),
        None => SimulationSnapshot::idle(),
    };

    Ok(Json(TrackingResponse {
        trip_id: id,
        snapshot,
    }))
}

/// Stop tracking a trip. Returns the last snapshot before stopping.
async fn stop_tracking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackingResponse>, AppError> {
    let last = state.stop_tracking(&id).await;
    load_session(&state, &id).await?;

    let snapshot = last.unwrap_or_else(SimulationSnapshot::idle);

    info!(trip = %id, index = snapshot.current_index, "tracking stopped");
    Ok(Json(TrackingResponse {
        trip_id: id,
        snapshot,
    }))
}

async fn load_session(state: &AppState, id: &str) -> Result<TripPlanningSession, AppError> {
    state
        .sessions
        .get(&session_key(id))
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("trip not found: {id}"),
        })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<TripError> for AppError {
    fn from(e: TripError) -> Self {
        let message = e.to_string();
        match e {
            TripError::InvalidInput(_) | TripError::NoSelection => AppError::BadRequest { message },
            TripError::NotFound { .. } => AppError::NotFound { message },
            TripError::Geocoding(_) | TripError::RouteUnavailable(_) => {
                AppError::BadGateway { message }
            }
        }
    }
}

impl From<ScoreError> for AppError {
    fn from(e: ScoreError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest { message }
            | AppError::NotFound { message }
            | AppError::BadGateway { message }
            | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
