//! Decides which location to persist when a donation request is created or
//! updated.
//!
//! Signals are tried in [`LocationInput::signals`] order and the first one
//! that yields something wins:
//!
//! 1. explicit coordinates: always stored; the address is reverse geocoded
//!    and the record falls back to a coordinate display on failure
//! 2. client address chain (create only): IP geolocation, skipped on failure
//! 3. free text: stored verbatim
//! 4. nothing: empty location, rendered as "Not provided"
//!
//! Provider failures are logged and absorbed; neither function can fail.

use donorlink_core::{GeoPoint, LocationInput, LocationSignal, ResolvedLocation};

use crate::client::Geocoder;

/// Location for a brand-new record.
pub async fn resolve_new<G>(geocoder: &G, input: &LocationInput) -> ResolvedLocation
where
    G: Geocoder + ?Sized,
{
    for signal in input.signals() {
        match signal {
            LocationSignal::Coordinates {
                latitude,
                longitude,
            } => {
                let point = GeoPoint::from_lat_lon(latitude, longitude);
                let text = reverse_or_empty(geocoder, point).await;
                return ResolvedLocation {
                    geo: Some(point),
                    text,
                    raw: None,
                };
            }
            LocationSignal::ClientAddress { chain } => {
                match geocoder.locate_by_address_chain(&chain).await {
                    Ok(located) => {
                        return ResolvedLocation {
                            geo: Some(located.point),
                            text: located.text,
                            raw: None,
                        };
                    }
                    Err(e) => {
                        tracing::info!(error = %e, "IP geolocation unavailable, trying next signal");
                    }
                }
            }
            LocationSignal::FreeText { value } => {
                return ResolvedLocation {
                    raw: Some(value),
                    ..ResolvedLocation::default()
                };
            }
            LocationSignal::Absent => break,
        }
    }

    ResolvedLocation::default()
}

/// Location for an existing record after an update.
///
/// Only signals present in the update payload are applied; an update without
/// location fields returns `current` unchanged. The client address chain is
/// never consulted, so a coarse IP guess cannot replace a stored address.
///
/// New coordinates always replace `geo`. A failed reverse lookup keeps the
/// previously resolved `text`, so a resolved record never reverts to empty.
pub async fn apply_update<G>(
    geocoder: &G,
    current: &ResolvedLocation,
    input: &LocationInput,
) -> ResolvedLocation
where
    G: Geocoder + ?Sized,
{
    let mut next = current.clone();

    for signal in input.signals() {
        match signal {
            LocationSignal::Coordinates {
                latitude,
                longitude,
            } => {
                let point = GeoPoint::from_lat_lon(latitude, longitude);
                next.geo = Some(point);
                let text = reverse_or_empty(geocoder, point).await;
                if !text.is_empty() {
                    next.text = text;
                }
                return next;
            }
            LocationSignal::ClientAddress { .. } => {}
            LocationSignal::FreeText { value } => {
                next.raw = Some(value);
                return next;
            }
            LocationSignal::Absent => break,
        }
    }

    next
}

async fn reverse_or_empty<G>(geocoder: &G, point: GeoPoint) -> String
where
    G: Geocoder + ?Sized,
{
    match geocoder.reverse_geocode(point).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                latitude = point.latitude(),
                longitude = point.longitude(),
                error = %e,
                "reverse geocoding failed, keeping coordinate fallback"
            );
            String::new()
        }
    }
}
