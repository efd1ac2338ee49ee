//! Donation request API handlers.
//!
//! - `POST   /api/v1/blood-requests`                   create (public)
//! - `GET    /api/v1/blood-requests`                   list, newest first
//! - `GET    /api/v1/blood-requests/:id`               single request
//! - `PUT    /api/v1/blood-requests/:id`               partial update
//! - `DELETE /api/v1/blood-requests/:id`               delete
//! - `POST   /api/v1/blood-requests/:id/send-to-admin`  flag for review
//! - `POST   /api/v1/blood-requests/:id/resolve`       deferred resolution
//! - `GET    /api/v1/blood-requests/:id/reverse`       alias of `resolve`

mod payload;
mod read;
mod resolve;
mod write;

pub(super) use read::{get_request, list_requests};
pub(super) use resolve::resolve_request;
pub(super) use write::{create_request, delete_request, send_to_admin, update_request};

use chrono::{DateTime, Utc};
use donorlink_db::{DbError, DonationRequestRow};
use serde::Serialize;
use uuid::Uuid;

use super::{map_db_error, ApiError};

/// Public shape of a donation request.
///
/// The stored location columns are collapsed into the single display string
/// `location`; coordinates and the raw/resolved split are never exposed.
#[derive(Debug, Serialize)]
pub(in crate::api) struct DonationRequestItem {
    pub id: Uuid,
    pub name: String,
    pub blood_group: String,
    pub hospital: String,
    pub contact: String,
    pub posted_by: Option<Uuid>,
    pub location: String,
    pub active: bool,
    pub sent_to_admin: bool,
    pub sent_to_admin_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DonationRequestRow> for DonationRequestItem {
    fn from(row: DonationRequestRow) -> Self {
        let location = row.location().display();
        Self {
            id: row.id,
            name: row.name,
            blood_group: row.blood_group,
            hospital: row.hospital,
            contact: row.contact,
            posted_by: row.posted_by,
            location,
            active: row.active,
            sent_to_admin: row.sent_to_admin,
            sent_to_admin_at: row.sent_to_admin_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn parse_request_id(request_id: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("'{raw}' is not a valid request id"),
        )
    })
}

/// Maps [`DbError::NotFound`] to a 404 and everything else to a 500.
fn map_request_error(request_id: &str, id: Uuid, error: &DbError) -> ApiError {
    match error {
        DbError::NotFound => ApiError::new(
            request_id,
            "not_found",
            format!("donation request '{id}' not found"),
        ),
        other => map_db_error(request_id.to_owned(), other),
    }
}

/// Fetch a request by id, returning 404 if not found.
async fn load_request(
    pool: &sqlx::PgPool,
    id: Uuid,
    request_id: &str,
) -> Result<DonationRequestRow, ApiError> {
    donorlink_db::get_donation_request(pool, id)
        .await
        .map_err(|e| map_request_error(request_id, id, &e))
}
