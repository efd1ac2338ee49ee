//! On-demand re-resolution of a stored record's address.
//!
//! Uses only what the record already holds: the structured point, or failing
//! that, a legacy `"Coordinates: <lat>, <lon>"` rendering captured before
//! points were stored separately.
//!
//! There is no record-level locking. A concurrent update and re-resolution
//! of the same record race at the storage layer and the last write wins.

use donorlink_core::{parse_legacy_coordinates, GeoPoint, ResolvedLocation};

use crate::client::Geocoder;
use crate::error::ResolveError;

/// Coordinates to resolve for `current`.
///
/// # Errors
///
/// - [`ResolveError::NoCoordinatesAvailable`] when there is no point and the
///   rendered location is not a legacy coordinate string.
/// - [`ResolveError::InvalidCoordinates`] when the recovered values are not
///   finite.
pub fn recover_coordinates(current: &ResolvedLocation) -> Result<GeoPoint, ResolveError> {
    let point = match current.geo {
        Some(point) => point,
        None => {
            let (latitude, longitude) = parse_legacy_coordinates(&current.display())
                .ok_or(ResolveError::NoCoordinatesAvailable)?;
            GeoPoint::from_lat_lon(latitude, longitude)
        }
    };

    if !point.is_finite() {
        return Err(ResolveError::InvalidCoordinates {
            latitude: point.latitude(),
            longitude: point.longitude(),
        });
    }
    Ok(point)
}

/// Re-runs reverse geocoding for a stored record.
///
/// On success returns the location to persist: the recovered point (so legacy
/// records gain a structured `geo`) and the fresh address. On failure the
/// caller must leave the stored record untouched.
///
/// # Errors
///
/// Everything [`recover_coordinates`] returns, plus
/// [`ResolveError::ResolutionFailed`] when the provider lookup fails.
pub async fn resolve_deferred<G>(
    geocoder: &G,
    current: &ResolvedLocation,
) -> Result<ResolvedLocation, ResolveError>
where
    G: Geocoder + ?Sized,
{
    let point = recover_coordinates(current)?;

    let text = geocoder
        .reverse_geocode(point)
        .await
        .map_err(ResolveError::ResolutionFailed)?;

    tracing::debug!(
        latitude = point.latitude(),
        longitude = point.longitude(),
        "deferred resolution succeeded"
    );

    Ok(ResolvedLocation {
        geo: Some(point),
        text,
        raw: current.raw.clone(),
    })
}
