//! In-memory [`Geocoder`] for policy tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use donorlink_core::GeoPoint;

use crate::client::Geocoder;
use crate::error::GeocodeError;
use crate::types::IpLocation;

#[derive(Debug, Default)]
pub(crate) struct StubGeocoder {
    pub reverse: Option<String>,
    pub ip: Option<IpLocation>,
    pub reverse_calls: AtomicUsize,
    pub ip_calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn reverse_ok(address: &str) -> Self {
        Self {
            reverse: Some(address.to_string()),
            ..Self::default()
        }
    }

    pub fn with_ip(mut self, lat: f64, lon: f64, text: &str) -> Self {
        self.ip = Some(IpLocation {
            point: GeoPoint::from_lat_lon(lat, lon),
            text: text.to_string(),
        });
        self
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    pub fn ip_calls(&self) -> usize {
        self.ip_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn reverse_geocode(&self, _point: GeoPoint) -> Result<String, GeocodeError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.reverse.clone().ok_or(GeocodeError::NoAddress)
    }

    async fn locate_by_address_chain(&self, _chain: &str) -> Result<IpLocation, GeocodeError> {
        self.ip_calls.fetch_add(1, Ordering::SeqCst);
        self.ip
            .clone()
            .ok_or_else(|| GeocodeError::ProviderFailure("fail".to_string()))
    }
}
