//! HTTP clients for the two geocoding providers.
//!
//! [`GeocodingClient`] wraps `reqwest` with the providers' politeness
//! requirements (descriptive `User-Agent`, `Accept-Language`, optional contact
//! e-mail) and per-provider timeouts. Each call makes exactly one request;
//! retry and fallback decisions belong to [`crate::policy`].

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use donorlink_core::{AppConfig, GeoPoint};
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::{IpLocation, IpLookupResponse, ReverseResponse, IP_LOOKUP_FIELDS};

const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";
const DEFAULT_IP_URL: &str = "http://ip-api.com/json/";
const DEFAULT_USER_AGENT: &str = "donorlink/0.1 (blood-request-backend)";
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Lookup operations the resolution policy depends on.
///
/// Implemented by [`GeocodingClient`] for real providers; tests substitute an
/// in-memory implementation.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a point to a human-readable address.
    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String, GeocodeError>;

    /// Approximates a location from a forwarded-address chain such as an
    /// `x-forwarded-for` value. Only the first entry is looked up.
    async fn locate_by_address_chain(&self, chain: &str) -> Result<IpLocation, GeocodeError>;
}

/// Provider endpoints, identification, and timeouts.
#[derive(Debug, Clone)]
pub struct GeocodeSettings {
    pub reverse_url: String,
    pub ip_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub contact_email: Option<String>,
    pub reverse_timeout: Duration,
    pub ip_timeout: Duration,
}

impl Default for GeocodeSettings {
    fn default() -> Self {
        Self {
            reverse_url: DEFAULT_REVERSE_URL.to_string(),
            ip_url: DEFAULT_IP_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en".to_string(),
            contact_email: None,
            reverse_timeout: Duration::from_secs(10),
            ip_timeout: Duration::from_secs(5),
        }
    }
}

impl GeocodeSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            reverse_url: config.reverse_geocode_url.clone(),
            ip_url: config.ip_geolocate_url.clone(),
            user_agent: config.geocode_user_agent.clone(),
            accept_language: config.geocode_accept_language.clone(),
            contact_email: config.geocode_contact_email.clone(),
            reverse_timeout: Duration::from_secs(config.reverse_geocode_timeout_secs),
            ip_timeout: Duration::from_secs(config.ip_geolocate_timeout_secs),
        }
    }
}

/// Client for the reverse-geocoding and IP-geolocation providers.
///
/// Construct once at startup and share it (behind an `Arc`) with every
/// request handler.
#[derive(Debug)]
pub struct GeocodingClient {
    client: Client,
    reverse_url: Url,
    ip_url: Url,
    accept_language: String,
    contact_email: Option<String>,
    reverse_timeout: Duration,
    ip_timeout: Duration,
}

impl GeocodingClient {
    /// # Errors
    ///
    /// Returns [`GeocodeError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GeocodeError::InvalidBaseUrl`] if either
    /// provider URL does not parse.
    pub fn new(settings: GeocodeSettings) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(GeocodeError::Client)?;

        let reverse_url = parse_base_url(&settings.reverse_url)?;
        let ip_url = parse_base_url(&settings.ip_url)?;

        Ok(Self {
            client,
            reverse_url,
            ip_url,
            accept_language: settings.accept_language,
            contact_email: settings.contact_email,
            reverse_timeout: settings.reverse_timeout,
            ip_timeout: settings.ip_timeout,
        })
    }

    /// Builds the reverse-geocoding URL for a point.
    fn reverse_request_url(&self, point: GeoPoint) -> Url {
        let mut url = self.reverse_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "jsonv2");
            pairs.append_pair("lat", &point.latitude().to_string());
            pairs.append_pair("lon", &point.longitude().to_string());
            pairs.append_pair("addressdetails", "1");
            if let Some(email) = &self.contact_email {
                pairs.append_pair("email", email);
            }
        }
        url
    }

    /// Builds the IP lookup URL: `<base>/<ip>?fields=...`.
    fn ip_request_url(&self, ip: IpAddr) -> Url {
        let mut url = self.ip_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&ip.to_string());
        }
        url.query_pairs_mut().append_pair("fields", IP_LOOKUP_FIELDS);
        url
    }

    /// Sends a GET request with the given timeout, asserts a 2xx status, and
    /// parses the body as `T`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        timeout: Duration,
        accept_language: Option<&str>,
    ) -> Result<T, GeocodeError> {
        let mut request = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(lang) = accept_language {
            request = request.header(reqwest::header::ACCEPT_LANGUAGE, lang);
        }

        let response = request.send().await.map_err(GeocodeError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(GeocodeError::from_transport)?;
        serde_json::from_str(&body).map_err(|source| GeocodeError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn reverse_geocode(&self, point: GeoPoint) -> Result<String, GeocodeError> {
        let url = self.reverse_request_url(point);
        tracing::debug!(%url, "reverse geocoding");

        let body: ReverseResponse = self
            .get_json(url, self.reverse_timeout, Some(&self.accept_language))
            .await?;

        if let Some(reason) = body.error.as_deref() {
            tracing::debug!(reason, "reverse provider returned an error payload");
        }
        body.address_text().ok_or(GeocodeError::NoAddress)
    }

    async fn locate_by_address_chain(&self, chain: &str) -> Result<IpLocation, GeocodeError> {
        let ip = first_public_address(chain)?;
        let url = self.ip_request_url(ip);
        tracing::debug!(%url, "IP geolocation");

        let body: IpLookupResponse = self.get_json(url, self.ip_timeout, None).await?;
        if body.status != "success" {
            let message = body.message.unwrap_or_else(|| body.status.clone());
            return Err(GeocodeError::ProviderFailure(message));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Ok(IpLocation {
                point: GeoPoint::from_lat_lon(lat, lon),
                text: body.place_text(),
            }),
            _ => Err(GeocodeError::ProviderFailure(
                "response did not include coordinates".to_string(),
            )),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, GeocodeError> {
    Url::parse(raw.trim()).map_err(|e| GeocodeError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Extracts the first entry of a comma-separated forwarded-address chain.
///
/// Entries may carry a port (`203.0.113.9:51234`). Private, loopback,
/// link-local, and unspecified addresses are rejected since no provider can
/// place them.
///
/// # Errors
///
/// Returns [`GeocodeError::UnroutableAddress`] when the first entry is empty,
/// unparseable, or not a public address.
pub fn first_public_address(chain: &str) -> Result<IpAddr, GeocodeError> {
    let first = chain.split(',').next().unwrap_or_default().trim();

    let ip = first
        .parse::<IpAddr>()
        .ok()
        .or_else(|| first.parse::<SocketAddr>().ok().map(|s| s.ip()))
        .ok_or_else(|| GeocodeError::UnroutableAddress(first.to_string()))?;

    if is_private_or_local(&ip) {
        return Err(GeocodeError::UnroutableAddress(first.to_string()));
    }
    Ok(ip)
}

fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_private_or_local(&IpAddr::V4(mapped));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7 unique local
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10 link-local
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
