//! Row and input types for the `donation_requests` table.

use chrono::{DateTime, Utc};
use donorlink_core::{BloodGroup, GeoPoint, ResolvedLocation};
use uuid::Uuid;

/// Input record for inserting a donation request.
#[derive(Debug, Clone)]
pub struct NewDonationRequest {
    pub name: String,
    pub blood_group: BloodGroup,
    pub hospital: String,
    pub contact: String,
    pub posted_by: Option<Uuid>,
    pub location: ResolvedLocation,
}

/// Scalar fields changed by an update. `None` leaves the column as is.
///
/// The location is not part of this struct: callers compute the full
/// post-update location and pass it alongside.
#[derive(Debug, Clone, Default)]
pub struct DonationRequestChanges {
    pub name: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub hospital: Option<String>,
    pub contact: Option<String>,
    pub active: Option<bool>,
}

/// A row from the `donation_requests` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationRequestRow {
    pub id: Uuid,
    pub name: String,
    /// Always one of the eight canonical groups; enforced by a CHECK constraint.
    pub blood_group: String,
    pub hospital: String,
    pub contact: String,
    pub posted_by: Option<Uuid>,
    pub active: bool,
    pub sent_to_admin: bool,
    pub sent_to_admin_at: Option<DateTime<Utc>>,
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    pub location_text: String,
    pub location_raw: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DonationRequestRow {
    /// The stored location columns as a [`ResolvedLocation`].
    #[must_use]
    pub fn location(&self) -> ResolvedLocation {
        let geo = match (self.geo_latitude, self.geo_longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::from_lat_lon(latitude, longitude)),
            _ => None,
        };
        ResolvedLocation {
            geo,
            text: self.location_text.clone(),
            raw: self.location_raw.clone(),
        }
    }
}
