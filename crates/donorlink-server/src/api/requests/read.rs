use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::middleware::RequestId;

use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::{load_request, parse_request_id, DonationRequestItem};

/// GET /api/v1/blood-requests
pub(in crate::api) async fn list_requests(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<DonationRequestItem>>>, ApiError> {
    let rows = donorlink_db::list_donation_requests(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(DonationRequestItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/blood-requests/:id
pub(in crate::api) async fn get_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DonationRequestItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_request_id(rid, &id)?;
    let row = load_request(&state.pool, id, rid).await?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
