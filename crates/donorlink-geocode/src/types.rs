//! Provider response types.
//!
//! Only the fields the resolution policy reads are modelled; everything else
//! in the provider payloads is ignored.

use donorlink_core::GeoPoint;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Reverse geocoding (Nominatim `reverse`, `format=jsonv2`)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ReverseResponse {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<ReverseAddress>,
    /// Set instead of an address when the provider cannot geocode the point,
    /// e.g. `"Unable to geocode"`.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReverseAddress {
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ReverseResponse {
    /// Best human-readable address in the payload.
    ///
    /// Prefers `display_name`; otherwise joins the non-empty parts of
    /// `address` (road, suburb, city, state, country) with `", "`.
    #[must_use]
    pub fn address_text(&self) -> Option<String> {
        if let Some(name) = non_empty(self.display_name.as_deref()) {
            return Some(name.to_string());
        }

        let address = self.address.as_ref()?;
        let joined = join_non_empty(&[
            address.road.as_deref(),
            address.suburb.as_deref(),
            address.city.as_deref(),
            address.state.as_deref(),
            address.country.as_deref(),
        ]);
        (!joined.is_empty()).then_some(joined)
    }
}

// ---------------------------------------------------------------------------
// IP geolocation (ip-api `json` endpoint)
// ---------------------------------------------------------------------------

/// Fields requested from the IP provider via its `fields` query parameter.
pub const IP_LOOKUP_FIELDS: &str = "status,message,lat,lon,city,regionName,country";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpLookupResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl IpLookupResponse {
    /// Coarse place description, e.g. `"Pune, Maharashtra, India"`.
    #[must_use]
    pub fn place_text(&self) -> String {
        join_non_empty(&[
            self.city.as_deref(),
            self.region_name.as_deref(),
            self.country.as_deref(),
        ])
    }
}

/// Approximate location derived from a client network address.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub point: GeoPoint,
    /// Coarse `"City, Region, Country"` description. May be empty when the
    /// provider returned coordinates without place names.
    pub text: String,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn join_non_empty(parts: &[Option<&str>]) -> String {
    parts
        .iter()
        .filter_map(|p| non_empty(*p))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_text_prefers_display_name() {
        let resp: ReverseResponse = serde_json::from_value(serde_json::json!({
            "display_name": "Koramangala, Bengaluru, Karnataka, India",
            "address": { "suburb": "Koramangala", "city": "Bengaluru" }
        }))
        .unwrap();
        assert_eq!(
            resp.address_text().as_deref(),
            Some("Koramangala, Bengaluru, Karnataka, India")
        );
    }

    #[test]
    fn address_text_builds_from_parts() {
        let resp: ReverseResponse = serde_json::from_value(serde_json::json!({
            "display_name": "  ",
            "address": { "road": "MG Road", "city": "Bengaluru", "state": "", "country": "India" }
        }))
        .unwrap();
        assert_eq!(
            resp.address_text().as_deref(),
            Some("MG Road, Bengaluru, India")
        );
    }

    #[test]
    fn address_text_none_for_error_payload() {
        let resp: ReverseResponse =
            serde_json::from_value(serde_json::json!({ "error": "Unable to geocode" })).unwrap();
        assert!(resp.address_text().is_none());
    }

    #[test]
    fn address_text_none_for_empty_address_object() {
        let resp: ReverseResponse =
            serde_json::from_value(serde_json::json!({ "address": {} })).unwrap();
        assert!(resp.address_text().is_none());
    }

    #[test]
    fn place_text_skips_missing_components() {
        let resp: IpLookupResponse = serde_json::from_value(serde_json::json!({
            "status": "success",
            "lat": 18.52,
            "lon": 73.85,
            "city": "Pune",
            "country": "India"
        }))
        .unwrap();
        assert_eq!(resp.place_text(), "Pune, India");
    }
}
