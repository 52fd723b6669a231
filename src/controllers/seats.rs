use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::AllocationError;
use crate::models::{Priority, SeatNumber};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats", get(get_seats))
        .route("/reserve", post(reserve_seats))
}

pub fn reset_route() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reset", post(reset_seats))
}

/* ---------- SEATS ---------- */

// GET /api/seats
async fn get_seats(State(state): State<Arc<AppState>>) -> Result<Response, AllocationError> {
    if let Some(map) = state.cache.get_seat_map().await {
        return Ok(([("X-Cache", "HIT")], Json(map)).into_response());
    }

    let map = state.service.seat_map().await.inspect_err(|e| {
        tracing::error!("get_seats failed: {:?}", e);
    })?;
    state.cache.save_seat_map(&map).await;

    Ok(([("X-Cache", "MISS")], Json(map)).into_response())
}

/* ---------- RESERVATIONS ---------- */

// POST /api/reserve
#[derive(Debug, Deserialize)]
struct ReserveRequest {
    num_seats: i64,
    #[serde(default)]
    priority: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReserveResponse {
    reserved_seats: Vec<SeatNumber>,
    priority: Priority,
}

async fn reserve_seats(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReserveRequest>,
) -> Result<impl IntoResponse, AllocationError> {
    let priority = req.priority.as_deref().unwrap_or(Priority::Default.as_str());
    let timeout = Duration::from_millis(state.config.app.reserve_timeout_ms);

    // dropping the in-flight reservation rolls its transaction back
    let reserved = tokio::time::timeout(timeout, state.service.reserve(req.num_seats, priority))
        .await
        .map_err(|_| {
            tracing::warn!(num_seats = req.num_seats, "Reservation timed out after {:?}", timeout);
            AllocationError::TransientStorageFailure("reservation timed out".to_string())
        })??;

    state.cache.invalidate_seat_map().await;

    Ok((
        StatusCode::OK,
        Json(ReserveResponse { reserved_seats: reserved, priority: Priority::decode(priority) }),
    ))
}

/* ---------- DEMO ---------- */

// POST /api/reset
async fn reset_seats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AllocationError> {
    let ratio = state.config.features.demo_prebook_ratio;
    tracing::warn!("RESET: freeing all seats, pre-booking ratio {}", ratio);

    let prebooked = state.service.reset_demo(ratio).await?;
    state.cache.invalidate_seat_map().await;

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Seats reset. Some seats are now pre-booked.",
            "prebooked": prebooked,
        })),
    ))
}
