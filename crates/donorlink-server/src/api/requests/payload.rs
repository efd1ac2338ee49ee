//! Request bodies for the donation request endpoints.
//!
//! Field names accept both `snake_case` and the `camelCase` spellings used by
//! existing clients. Coordinates may arrive as JSON numbers or numeric
//! strings, under `latitude`/`lat` and `longitude`/`lng`/`lon`.

use donorlink_core::{BloodGroup, LocationInput};
use donorlink_db::DonationRequestChanges;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::super::ApiError;

#[derive(Debug, Default, Deserialize)]
pub(in crate::api) struct LocationFields {
    /// Free-text location typed by the donor.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<Value>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<Value>,
}

impl LocationFields {
    pub(super) fn to_input(&self, address_chain: Option<String>) -> LocationInput {
        LocationInput {
            latitude: coordinate(self.latitude.as_ref()),
            longitude: coordinate(self.longitude.as_ref()),
            address_chain,
            free_text: self.location.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateRequestBody {
    pub name: Option<String>,
    #[serde(alias = "bloodGroup")]
    pub blood_group: Option<String>,
    pub hospital: Option<String>,
    pub contact: Option<String>,
    #[serde(alias = "postedBy")]
    pub posted_by: Option<Uuid>,
    #[serde(flatten)]
    pub location: LocationFields,
}

/// Validated scalar fields of a create request.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct CreateFields {
    pub name: String,
    pub blood_group: BloodGroup,
    pub hospital: String,
    pub contact: String,
}

impl CreateRequestBody {
    pub(super) fn validate(&self, request_id: &str) -> Result<CreateFields, ApiError> {
        let name = required(request_id, "name", self.name.as_deref())?;
        let blood_group = required(request_id, "blood_group", self.blood_group.as_deref())?;
        let contact = required(request_id, "contact", self.contact.as_deref())?;

        Ok(CreateFields {
            name,
            blood_group: parse_blood_group(request_id, &blood_group)?,
            hospital: self
                .hospital
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
            contact,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateRequestBody {
    pub name: Option<String>,
    #[serde(alias = "bloodGroup")]
    pub blood_group: Option<String>,
    pub hospital: Option<String>,
    pub contact: Option<String>,
    pub active: Option<bool>,
    #[serde(flatten)]
    pub location: LocationFields,
}

impl UpdateRequestBody {
    /// Scalar changes; absent fields stay `None` and are left untouched.
    pub(super) fn changes(&self, request_id: &str) -> Result<DonationRequestChanges, ApiError> {
        let name = self
            .name
            .as_deref()
            .map(|v| required(request_id, "name", Some(v)))
            .transpose()?;
        let contact = self
            .contact
            .as_deref()
            .map(|v| required(request_id, "contact", Some(v)))
            .transpose()?;
        let blood_group = self
            .blood_group
            .as_deref()
            .map(|v| parse_blood_group(request_id, v))
            .transpose()?;

        Ok(DonationRequestChanges {
            name,
            blood_group,
            hospital: self.hospital.as_deref().map(|h| h.trim().to_owned()),
            contact,
            active: self.active,
        })
    }
}

fn required(request_id: &str, field: &str, value: Option<&str>) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(ApiError::new(
            request_id,
            "validation_error",
            format!("'{field}' is required"),
        )),
    }
}

fn parse_blood_group(request_id: &str, value: &str) -> Result<BloodGroup, ApiError> {
    value
        .parse::<BloodGroup>()
        .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
}

/// Accepts a JSON number or a numeric string; anything else is absent.
fn coordinate(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use donorlink_core::LocationSignal;

    use super::*;

    fn create_body(json: serde_json::Value) -> CreateRequestBody {
        serde_json::from_value(json).expect("deserialize create body")
    }

    #[test]
    fn create_accepts_camel_case_and_string_coordinates() {
        let body = create_body(serde_json::json!({
            "name": " Asha ",
            "bloodGroup": "o+",
            "contact": "98450 00000",
            "lat": "12.97",
            "lng": 77.59,
        }));

        let fields = body.validate("req").unwrap();
        assert_eq!(fields.name, "Asha");
        assert_eq!(fields.blood_group, BloodGroup::OPositive);
        assert_eq!(fields.hospital, "");

        let input = body.location.to_input(None);
        assert_eq!(input.latitude, Some(12.97));
        assert_eq!(input.longitude, Some(77.59));
    }

    #[test]
    fn create_accepts_lon_alias() {
        let body = create_body(serde_json::json!({ "latitude": 1.5, "lon": "2.5" }));
        let input = body.location.to_input(None);
        assert_eq!(input.latitude, Some(1.5));
        assert_eq!(input.longitude, Some(2.5));
    }

    #[test]
    fn non_numeric_coordinates_are_absent() {
        let body = create_body(serde_json::json!({
            "latitude": "north",
            "longitude": true,
            "location": "Ward 5",
        }));
        let input = body.location.to_input(Some("203.0.113.9".to_string()));

        assert_eq!(input.latitude, None);
        assert_eq!(input.longitude, None);
        assert_eq!(
            input.signals().first(),
            Some(&LocationSignal::ClientAddress {
                chain: "203.0.113.9".to_string()
            })
        );
    }

    #[test]
    fn create_requires_name_blood_group_and_contact() {
        for json in [
            serde_json::json!({ "blood_group": "A+", "contact": "1" }),
            serde_json::json!({ "name": "A", "contact": "1" }),
            serde_json::json!({ "name": "A", "blood_group": "A+", "contact": "   " }),
        ] {
            let err = create_body(json).validate("req").unwrap_err();
            assert_eq!(err.error.code, "validation_error");
        }
    }

    #[test]
    fn create_rejects_unknown_blood_group() {
        let err = create_body(serde_json::json!({
            "name": "A",
            "blood_group": "C+",
            "contact": "1",
        }))
        .validate("req")
        .unwrap_err();

        assert_eq!(err.error.code, "validation_error");
        assert!(err.error.message.contains("C+"));
    }

    #[test]
    fn update_changes_only_present_fields() {
        let body: UpdateRequestBody = serde_json::from_value(serde_json::json!({
            "bloodGroup": "ab-",
            "active": false,
        }))
        .unwrap();

        let changes = body.changes("req").unwrap();
        assert_eq!(changes.blood_group, Some(BloodGroup::AbNegative));
        assert_eq!(changes.active, Some(false));
        assert!(changes.name.is_none());
        assert!(changes.contact.is_none());
        assert!(changes.hospital.is_none());
        assert!(body.location.to_input(None).is_empty());
    }

    #[test]
    fn update_rejects_blank_name() {
        let body: UpdateRequestBody =
            serde_json::from_value(serde_json::json!({ "name": "  " })).unwrap();
        assert!(body.changes("req").is_err());
    }
}
