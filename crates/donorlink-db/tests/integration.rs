//! Offline unit tests for donorlink-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use donorlink_core::{AppConfig, Environment, GeoPoint, ResolutionState};
use donorlink_db::{DonationRequestRow, PoolConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        reverse_geocode_url: "https://nominatim.example.org/reverse".to_string(),
        ip_geolocate_url: "http://ip.example.org/json/".to_string(),
        geocode_user_agent: "ua".to_string(),
        geocode_accept_language: "en".to_string(),
        geocode_contact_email: None,
        reverse_geocode_timeout_secs: 10,
        ip_geolocate_timeout_secs: 5,
        resolve_concurrency: 2,
    }
}

fn row() -> DonationRequestRow {
    DonationRequestRow {
        id: Uuid::new_v4(),
        name: "Asha".to_string(),
        blood_group: "O+".to_string(),
        hospital: String::new(),
        contact: "+91 98450 00000".to_string(),
        posted_by: None,
        active: true,
        sent_to_admin: false,
        sent_to_admin_at: None,
        geo_latitude: None,
        geo_longitude: None,
        location_text: String::new(),
        location_raw: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn row_location_with_point_and_text_is_resolved() {
    let row = DonationRequestRow {
        geo_latitude: Some(12.97),
        geo_longitude: Some(77.59),
        location_text: "MG Road, Bengaluru".to_string(),
        ..row()
    };

    let location = row.location();
    assert_eq!(location.geo, Some(GeoPoint::from_lat_lon(12.97, 77.59)));
    assert_eq!(location.state(), ResolutionState::Resolved);
    assert_eq!(location.display(), "MG Road, Bengaluru");
}

#[test]
fn row_location_with_point_only_renders_coordinates() {
    let row = DonationRequestRow {
        geo_latitude: Some(12.0),
        geo_longitude: Some(77.0),
        ..row()
    };

    assert_eq!(row.location().display(), "Coordinates: 12.000000, 77.000000");
}

#[test]
fn row_location_with_half_a_point_has_no_geo() {
    let row = DonationRequestRow {
        geo_latitude: Some(12.0),
        location_raw: Some("Ward 5".to_string()),
        ..row()
    };

    let location = row.location();
    assert!(location.geo.is_none());
    assert_eq!(location.display(), "Ward 5");
}

#[test]
fn row_location_empty_renders_not_provided() {
    assert_eq!(row().location().display(), "Not provided");
}
