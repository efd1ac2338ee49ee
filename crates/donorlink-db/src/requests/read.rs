//! Read operations for the `donation_requests` table.

use sqlx::PgPool;
use uuid::Uuid;

use super::types::DonationRequestRow;
use super::COLUMNS;
use crate::DbError;

/// Fetches a single request by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_donation_request(pool: &PgPool, id: Uuid) -> Result<DonationRequestRow, DbError> {
    let sql = format!("SELECT {COLUMNS} FROM donation_requests WHERE id = $1");
    let row = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns every request, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_donation_requests(pool: &PgPool) -> Result<Vec<DonationRequestRow>, DbError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM donation_requests \
         ORDER BY created_at DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns up to `limit` requests that have no resolved address but do have
/// coordinates to resolve from: either a stored point or a legacy
/// `"Coordinates: ..."` string. Oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pending_resolution(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<DonationRequestRow>, DbError> {
    let sql = format!(
        "SELECT {COLUMNS} FROM donation_requests \
         WHERE location_text = '' \
           AND (geo_latitude IS NOT NULL OR location_raw ILIKE 'coordinates:%') \
         ORDER BY created_at ASC, id ASC \
         LIMIT $1"
    );
    let rows = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
