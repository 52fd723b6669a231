pub mod seats;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::Arc;

use crate::error::AllocationError;

pub fn routes(state: Arc<crate::AppState>) -> Router<Arc<crate::AppState>> {
    let router = Router::new().merge(seats::routes());

    if state.config.features.enable_demo_reset {
        router.merge(seats::reset_route())
    } else {
        router
    }
}

impl AllocationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AllocationError::InvalidRequest { .. } | AllocationError::InsufficientAvailability { .. } => {
                StatusCode::BAD_REQUEST
            }
            AllocationError::NoMatchingAllocation { .. } => StatusCode::CONFLICT,
            AllocationError::TransientStorageFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AllocationError {
    fn into_response(self) -> Response {
        let message = match &self {
            // storage details stay in the logs
            AllocationError::TransientStorageFailure(_) => "Temporary storage failure, please retry".to_string(),
            other => other.to_string(),
        };
        let body = Json(serde_json::json!({ "error": message, "code": self.code() }));
        (self.status_code(), body).into_response()
    }
}
