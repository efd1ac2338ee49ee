use axum::{
    extract::{Path, State},
    Extension, Json,
};
use donorlink_geocode::{resolve_deferred, ResolveError};

use crate::middleware::RequestId;

use super::super::{ApiError, ApiResponse, AppState, ResponseMeta};
use super::{load_request, map_request_error, parse_request_id, DonationRequestItem};

/// POST /api/v1/blood-requests/:id/resolve
///
/// Re-runs reverse geocoding for a stored request. On failure the stored
/// record is left unchanged.
pub(in crate::api) async fn resolve_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DonationRequestItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_request_id(rid, &id)?;
    let current = load_request(&state.pool, id, rid).await?;

    let location = resolve_deferred(state.geocoder.as_ref(), &current.location())
        .await
        .map_err(|e| {
            tracing::warn!(record_id = %id, error = %e, "deferred resolution failed");
            map_resolve_error(rid, &e)
        })?;

    let row = donorlink_db::update_location(&state.pool, id, &location)
        .await
        .map_err(|e| map_request_error(rid, id, &e))?;

    tracing::info!(record_id = %id, "donation request location resolved");

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_resolve_error(request_id: &str, error: &ResolveError) -> ApiError {
    match error {
        ResolveError::NoCoordinatesAvailable => ApiError::new(
            request_id,
            "no_coordinates",
            "no coordinates available for this request",
        ),
        ResolveError::InvalidCoordinates { .. } => {
            ApiError::new(request_id, "invalid_coordinates", error.to_string())
        }
        ResolveError::ResolutionFailed(_) => ApiError::new(
            request_id,
            "resolution_failed",
            "reverse geocoding failed; try again later",
        ),
    }
}
