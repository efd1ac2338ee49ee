//! Location model embedded in every donation request.
//!
//! A request's location is stored as three independent sources (a GeoJSON
//! style point, the resolved address text, and a raw caller-supplied string)
//! and rendered through [`ResolvedLocation::display`]. The rendered value is
//! never stored.

/// Rendered location when nothing at all is known.
pub const NOT_PROVIDED: &str = "Not provided";

const COORDINATES_PREFIX: &str = "coordinates:";

/// A geographic point in GeoJSON order: `[longitude, latitude]`.
///
/// Fields are private so the axis order can only be chosen through the named
/// constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn from_lat_lon(latitude: f64, longitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Builds a point from a GeoJSON coordinate pair, `[longitude, latitude]`.
    #[must_use]
    pub fn from_coordinates(coordinates: [f64; 2]) -> Self {
        Self {
            longitude: coordinates[0],
            latitude: coordinates[1],
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// GeoJSON coordinate pair, `[longitude, latitude]`.
    #[must_use]
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Coordinate-fallback rendering, e.g. `"Coordinates: 12.345600, 77.654300"`.
#[must_use]
pub fn coordinate_fallback(point: GeoPoint) -> String {
    format!(
        "Coordinates: {:.6}, {:.6}",
        point.latitude(),
        point.longitude()
    )
}

/// Recovers `(latitude, longitude)` from a legacy `"Coordinates: <lat>, <lon>"`
/// string.
///
/// The prefix match is case-insensitive. The values are returned exactly as
/// parsed, so callers must still check them for finiteness.
#[must_use]
pub fn parse_legacy_coordinates(value: &str) -> Option<(f64, f64)> {
    let trimmed = value.trim_start();
    let prefix = trimmed.get(..COORDINATES_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(COORDINATES_PREFIX) {
        return None;
    }

    let rest = &trimmed[COORDINATES_PREFIX.len()..];
    let mut parts = rest.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((lat, lon))
}

/// Where a record sits on the resolution ladder. Only ever moves rightwards:
/// `Unresolved` → `CoordinateFallback` → `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionState {
    Unresolved,
    CoordinateFallback,
    Resolved,
}

/// Persisted location state of a donation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLocation {
    /// Present only when coordinates were ever known, explicit or IP-derived.
    pub geo: Option<GeoPoint>,
    /// Resolved human-readable address; empty until a resolution succeeds.
    pub text: String,
    /// Caller-supplied free text, or a legacy rendered string imported from
    /// before `geo` existed.
    pub raw: Option<String>,
}

impl ResolvedLocation {
    /// The single value shown to callers.
    ///
    /// `text` if non-empty, else the coordinate fallback if `geo` is known,
    /// else the raw free text, else [`NOT_PROVIDED`].
    #[must_use]
    pub fn display(&self) -> String {
        if !self.text.is_empty() {
            return self.text.clone();
        }
        if let Some(point) = self.geo {
            return coordinate_fallback(point);
        }
        match self.raw.as_deref() {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => NOT_PROVIDED.to_string(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ResolutionState {
        if !self.text.is_empty() {
            ResolutionState::Resolved
        } else if self.geo.is_some() {
            ResolutionState::CoordinateFallback
        } else {
            ResolutionState::Unresolved
        }
    }
}

/// A single source of location information, in decreasing order of trust.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSignal {
    /// Explicit coordinates from the caller.
    Coordinates { latitude: f64, longitude: f64 },
    /// Raw forwarded-address chain (e.g. `x-forwarded-for`); only the first
    /// entry is looked up.
    ClientAddress { chain: String },
    /// User-typed location, stored verbatim.
    FreeText { value: String },
    /// Nothing usable was supplied.
    Absent,
}

/// Every location signal a single create/update call carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address_chain: Option<String>,
    pub free_text: Option<String>,
}

impl LocationInput {
    /// Signals to try, highest priority first. Always ends with
    /// [`LocationSignal::Absent`].
    ///
    /// Coordinates count only when both axes are finite. Blank address chains
    /// and blank free text are ignored; non-blank free text is kept verbatim.
    #[must_use]
    pub fn signals(&self) -> Vec<LocationSignal> {
        let mut signals = Vec::with_capacity(4);

        if let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) {
            if latitude.is_finite() && longitude.is_finite() {
                signals.push(LocationSignal::Coordinates {
                    latitude,
                    longitude,
                });
            }
        }

        if let Some(chain) = self.address_chain.as_deref() {
            if !chain.trim().is_empty() {
                signals.push(LocationSignal::ClientAddress {
                    chain: chain.to_string(),
                });
            }
        }

        if let Some(value) = self.free_text.as_deref() {
            if !value.trim().is_empty() {
                signals.push(LocationSignal::FreeText {
                    value: value.to_string(),
                });
            }
        }

        signals.push(LocationSignal::Absent);
        signals
    }

    /// `true` when the call carried no location fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals() == [LocationSignal::Absent]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_keeps_geojson_order() {
        let point = GeoPoint::from_lat_lon(12.3456, 77.6543);
        assert_eq!(point.coordinates(), [77.6543, 12.3456]);
        assert_eq!(GeoPoint::from_coordinates([77.6543, 12.3456]), point);
    }

    #[test]
    fn coordinate_fallback_uses_six_decimals() {
        let point = GeoPoint::from_lat_lon(12.3456, 77.6543);
        assert_eq!(
            coordinate_fallback(point),
            "Coordinates: 12.345600, 77.654300"
        );
    }

    #[test]
    fn display_prefers_resolved_text() {
        let loc = ResolvedLocation {
            geo: Some(GeoPoint::from_lat_lon(1.0, 2.0)),
            text: "MG Road, Bengaluru".to_string(),
            raw: Some("near the station".to_string()),
        };
        assert_eq!(loc.display(), "MG Road, Bengaluru");
        assert_eq!(loc.state(), ResolutionState::Resolved);
    }

    #[test]
    fn display_falls_back_to_coordinates() {
        let loc = ResolvedLocation {
            geo: Some(GeoPoint::from_lat_lon(12.0, 77.0)),
            text: String::new(),
            raw: Some("near the station".to_string()),
        };
        assert_eq!(loc.display(), "Coordinates: 12.000000, 77.000000");
        assert_eq!(loc.state(), ResolutionState::CoordinateFallback);
    }

    #[test]
    fn display_uses_raw_text_without_geo() {
        let loc = ResolvedLocation {
            raw: Some("Ward 5, City Hospital".to_string()),
            ..ResolvedLocation::default()
        };
        assert_eq!(loc.display(), "Ward 5, City Hospital");
        assert_eq!(loc.state(), ResolutionState::Unresolved);
    }

    #[test]
    fn display_not_provided_when_empty() {
        assert_eq!(ResolvedLocation::default().display(), NOT_PROVIDED);
        let blank_raw = ResolvedLocation {
            raw: Some(String::new()),
            ..ResolvedLocation::default()
        };
        assert_eq!(blank_raw.display(), NOT_PROVIDED);
    }

    #[test]
    fn legacy_coordinates_parse() {
        assert_eq!(
            parse_legacy_coordinates("Coordinates: 12.000000, 77.000000"),
            Some((12.0, 77.0))
        );
        assert_eq!(
            parse_legacy_coordinates("coordinates:-33.5,151.25"),
            Some((-33.5, 151.25))
        );
        assert_eq!(
            parse_legacy_coordinates("  COORDINATES: 1, 2"),
            Some((1.0, 2.0))
        );
    }

    #[test]
    fn legacy_coordinates_reject_other_strings() {
        assert_eq!(parse_legacy_coordinates(NOT_PROVIDED), None);
        assert_eq!(parse_legacy_coordinates("Coordinates: 12.0"), None);
        assert_eq!(parse_legacy_coordinates("Coordinates: a, b"), None);
        assert_eq!(parse_legacy_coordinates("Coordinates: 1, 2, 3"), None);
        assert_eq!(parse_legacy_coordinates("Coord"), None);
        assert_eq!(parse_legacy_coordinates(""), None);
    }

    #[test]
    fn legacy_coordinates_pass_through_non_finite_values() {
        let (lat, lon) = parse_legacy_coordinates("Coordinates: NaN, inf").unwrap();
        assert!(lat.is_nan());
        assert!(lon.is_infinite());
    }

    #[test]
    fn signals_are_priority_ordered() {
        let input = LocationInput {
            latitude: Some(12.0),
            longitude: Some(77.0),
            address_chain: Some("203.0.113.9".to_string()),
            free_text: Some(" Ward 5 ".to_string()),
        };
        assert_eq!(
            input.signals(),
            vec![
                LocationSignal::Coordinates {
                    latitude: 12.0,
                    longitude: 77.0
                },
                LocationSignal::ClientAddress {
                    chain: "203.0.113.9".to_string()
                },
                LocationSignal::FreeText {
                    value: " Ward 5 ".to_string()
                },
                LocationSignal::Absent,
            ]
        );
    }

    #[test]
    fn signals_skip_partial_or_non_finite_coordinates() {
        let only_lat = LocationInput {
            latitude: Some(12.0),
            ..LocationInput::default()
        };
        assert_eq!(only_lat.signals(), vec![LocationSignal::Absent]);

        let nan = LocationInput {
            latitude: Some(f64::NAN),
            longitude: Some(77.0),
            ..LocationInput::default()
        };
        assert!(nan.is_empty());
    }

    #[test]
    fn signals_skip_blank_strings() {
        let input = LocationInput {
            address_chain: Some("  ".to_string()),
            free_text: Some(String::new()),
            ..LocationInput::default()
        };
        assert!(input.is_empty());
    }
}
