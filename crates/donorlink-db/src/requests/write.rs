//! Write operations for the `donation_requests` table.
//!
//! Location columns are always written as a whole from a [`ResolvedLocation`].
//! There is no optimistic locking: concurrent writers to the same row race
//! and the last write wins.

use donorlink_core::{BloodGroup, ResolvedLocation};
use sqlx::PgPool;
use uuid::Uuid;

use super::types::{DonationRequestChanges, DonationRequestRow, NewDonationRequest};
use super::COLUMNS;
use crate::DbError;

/// Inserts a new request with a freshly generated id and returns the row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_donation_request(
    pool: &PgPool,
    request: &NewDonationRequest,
) -> Result<DonationRequestRow, DbError> {
    let geo = request.location.geo;
    let sql = format!(
        "INSERT INTO donation_requests \
             (id, name, blood_group, hospital, contact, posted_by, \
              geo_latitude, geo_longitude, location_text, location_raw) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {COLUMNS}"
    );

    let row = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(request.blood_group.as_str())
        .bind(&request.hospital)
        .bind(&request.contact)
        .bind(request.posted_by)
        .bind(geo.map(|p| p.latitude()))
        .bind(geo.map(|p| p.longitude()))
        .bind(&request.location.text)
        .bind(request.location.raw.as_deref())
        .fetch_one(pool)
        .await?;

    Ok(row)
}

/// Applies scalar `changes` and replaces the location columns with `location`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_donation_request(
    pool: &PgPool,
    id: Uuid,
    changes: &DonationRequestChanges,
    location: &ResolvedLocation,
) -> Result<DonationRequestRow, DbError> {
    let geo = location.geo;
    let sql = format!(
        "UPDATE donation_requests SET \
             name          = COALESCE($2, name), \
             blood_group   = COALESCE($3, blood_group), \
             hospital      = COALESCE($4, hospital), \
             contact       = COALESCE($5, contact), \
             active        = COALESCE($6, active), \
             geo_latitude  = $7, \
             geo_longitude = $8, \
             location_text = $9, \
             location_raw  = $10, \
             updated_at    = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    );

    let row = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.blood_group.map(BloodGroup::as_str))
        .bind(changes.hospital.as_deref())
        .bind(changes.contact.as_deref())
        .bind(changes.active)
        .bind(geo.map(|p| p.latitude()))
        .bind(geo.map(|p| p.longitude()))
        .bind(&location.text)
        .bind(location.raw.as_deref())
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Replaces only the location columns. Used by deferred resolution.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_location(
    pool: &PgPool,
    id: Uuid,
    location: &ResolvedLocation,
) -> Result<DonationRequestRow, DbError> {
    let geo = location.geo;
    let sql = format!(
        "UPDATE donation_requests SET \
             geo_latitude  = $2, \
             geo_longitude = $3, \
             location_text = $4, \
             location_raw  = $5, \
             updated_at    = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    );

    let row = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .bind(id)
        .bind(geo.map(|p| p.latitude()))
        .bind(geo.map(|p| p.longitude()))
        .bind(&location.text)
        .bind(location.raw.as_deref())
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Sets `sent_to_admin = TRUE` and stamps `sent_to_admin_at = NOW()`.
///
/// Calling it again refreshes the timestamp.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn mark_sent_to_admin(pool: &PgPool, id: Uuid) -> Result<DonationRequestRow, DbError> {
    let sql = format!(
        "UPDATE donation_requests SET \
             sent_to_admin    = TRUE, \
             sent_to_admin_at = NOW(), \
             updated_at       = NOW() \
         WHERE id = $1 \
         RETURNING {COLUMNS}"
    );

    let row = sqlx::query_as::<_, DonationRequestRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Deletes a request.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_donation_request(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM donation_requests WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
