use thiserror::Error;

/// Failure of a single provider lookup.
///
/// These never reach HTTP callers during create/update; the resolution
/// policy degrades to the next signal instead.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The provider did not answer within the configured timeout.
    #[error("geocoding request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("geocoding provider unavailable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not the JSON shape the provider documents.
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered but the payload had no usable address.
    #[error("no address in provider response")]
    NoAddress,

    /// The IP provider reported `status != "success"`.
    #[error("IP geolocation failed: {0}")]
    ProviderFailure(String),

    /// The first entry of the address chain is not a public IP address.
    #[error("address '{0}' cannot be geolocated")]
    UnroutableAddress(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GeocodeError {
    /// Classifies a transport error from `reqwest`.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Unavailable(error)
        }
    }
}

/// Failure of deferred resolution for a stored record.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Neither a stored point nor a legacy coordinate string exists.
    /// The caller cannot retry without supplying new data.
    #[error("no coordinates available")]
    NoCoordinatesAvailable,

    /// Coordinates were recovered but are not finite; the stored data is corrupt.
    #[error("invalid coordinates: latitude={latitude}, longitude={longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// The provider lookup failed. Transient; safe to retry later.
    #[error("reverse geocoding failed: {0}")]
    ResolutionFailed(#[source] GeocodeError),
}
