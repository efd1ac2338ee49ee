//! Create, update, delete and send-to-admin handlers.
//!
//! Location resolution never fails a write: provider errors are absorbed by
//! the resolution policy and the record is stored with whatever it produced.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use donorlink_db::NewDonationRequest;
use donorlink_geocode::{apply_update, resolve_new};

use crate::middleware::{ClientAddress, RequestId};

use super::super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use super::payload::{CreateRequestBody, UpdateRequestBody};
use super::{load_request, map_request_error, parse_request_id, DonationRequestItem};

/// POST /api/v1/blood-requests
///
/// Creates a request, resolving its location from coordinates, the caller's
/// address, or free text.
pub(in crate::api) async fn create_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(client): Extension<ClientAddress>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<ApiResponse<DonationRequestItem>>), ApiError> {
    let rid = &req_id.0;
    let fields = body.validate(rid)?;

    let input = body.location.to_input(client.0);
    let location = resolve_new(state.geocoder.as_ref(), &input).await;
    let resolution = location.state();

    let row = donorlink_db::insert_donation_request(
        &state.pool,
        &NewDonationRequest {
            name: fields.name,
            blood_group: fields.blood_group,
            hospital: fields.hospital,
            contact: fields.contact,
            posted_by: body.posted_by,
            location,
        },
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(record_id = %row.id, ?resolution, "donation request created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row.into(),
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// PUT /api/v1/blood-requests/:id
///
/// Sparse update.
///
/// New coordinates replace the stored point and refresh the address; new free
/// text replaces only the raw text. The caller's address is not consulted.
pub(in crate::api) async fn update_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateRequestBody>,
) -> Result<Json<ApiResponse<DonationRequestItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_request_id(rid, &id)?;
    let changes = body.changes(rid)?;
    let current = load_request(&state.pool, id, rid).await?;

    let input = body.location.to_input(None);
    let location = apply_update(state.geocoder.as_ref(), &current.location(), &input).await;

    let row = donorlink_db::update_donation_request(&state.pool, id, &changes, &location)
        .await
        .map_err(|e| map_request_error(rid, id, &e))?;

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/blood-requests/:id
pub(in crate::api) async fn delete_request(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_request_id(rid, &id)?;

    donorlink_db::delete_donation_request(&state.pool, id)
        .await
        .map_err(|e| map_request_error(rid, id, &e))?;

    tracing::info!(record_id = %id, "donation request deleted");

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "deleted": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/blood-requests/:id/send-to-admin
pub(in crate::api) async fn send_to_admin(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DonationRequestItem>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_request_id(rid, &id)?;

    let row = donorlink_db::mark_sent_to_admin(&state.pool, id)
        .await
        .map_err(|e| map_request_error(rid, id, &e))?;

    tracing::info!(record_id = %id, "donation request sent to admin");

    Ok(Json(ApiResponse {
        data: row.into(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
