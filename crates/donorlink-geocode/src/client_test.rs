use super::*;

fn test_client(contact_email: Option<&str>) -> GeocodingClient {
    GeocodingClient::new(GeocodeSettings {
        reverse_url: "https://nominatim.example.org/reverse".to_string(),
        ip_url: "http://ip.example.org/json/".to_string(),
        contact_email: contact_email.map(str::to_string),
        ..GeocodeSettings::default()
    })
    .expect("client construction should not fail")
}

#[test]
fn reverse_request_url_has_expected_query() {
    let client = test_client(None);
    let url = client.reverse_request_url(GeoPoint::from_lat_lon(12.3456, 77.6543));
    assert_eq!(
        url.as_str(),
        "https://nominatim.example.org/reverse?format=jsonv2&lat=12.3456&lon=77.6543&addressdetails=1"
    );
}

#[test]
fn reverse_request_url_appends_contact_email() {
    let client = test_client(Some("ops@example.org"));
    let url = client.reverse_request_url(GeoPoint::from_lat_lon(1.0, 2.0));
    assert!(
        url.as_str().ends_with("&email=ops%40example.org"),
        "email should be percent-encoded and last: {url}"
    );
}

#[test]
fn ip_request_url_appends_address_segment() {
    let client = test_client(None);
    let url = client.ip_request_url("203.0.113.9".parse().unwrap());
    assert_eq!(
        url.as_str(),
        "http://ip.example.org/json/203.0.113.9?fields=status%2Cmessage%2Clat%2Clon%2Ccity%2CregionName%2Ccountry"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = GeocodingClient::new(GeocodeSettings {
        reverse_url: "not a url".to_string(),
        ..GeocodeSettings::default()
    });
    assert!(
        matches!(result, Err(GeocodeError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl, got: {result:?}"
    );
}

#[test]
fn first_public_address_takes_first_chain_entry() {
    let ip = first_public_address("203.0.113.9, 10.0.0.1, 172.16.0.2").unwrap();
    assert_eq!(ip.to_string(), "203.0.113.9");
}

#[test]
fn first_public_address_strips_port() {
    let ip = first_public_address("198.51.100.7:51234").unwrap();
    assert_eq!(ip.to_string(), "198.51.100.7");

    let ip = first_public_address("[2001:db8::1]:443").unwrap();
    assert_eq!(ip.to_string(), "2001:db8::1");
}

#[test]
fn first_public_address_rejects_private_and_loopback() {
    for chain in [
        "127.0.0.1",
        "10.1.2.3, 203.0.113.9",
        "192.168.0.10",
        "::1",
        "fd00::1",
        "fe80::1",
        "::ffff:192.168.1.1",
        "0.0.0.0",
    ] {
        assert!(
            matches!(
                first_public_address(chain),
                Err(GeocodeError::UnroutableAddress(_))
            ),
            "expected {chain} to be rejected"
        );
    }
}

#[test]
fn first_public_address_rejects_garbage() {
    assert!(first_public_address("unknown").is_err());
    assert!(first_public_address("").is_err());
    assert!(first_public_address(" , 203.0.113.9").is_err());
}
