use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Coordinate-to-address endpoint (Nominatim `reverse` compatible).
    pub reverse_geocode_url: String,
    /// IP-geolocation base URL; the client address is appended as a path segment.
    pub ip_geolocate_url: String,
    pub geocode_user_agent: String,
    pub geocode_accept_language: String,
    /// Sent as the `email` query parameter when set, per the reverse provider's usage policy.
    pub geocode_contact_email: Option<String>,
    pub reverse_geocode_timeout_secs: u64,
    pub ip_geolocate_timeout_secs: u64,
    pub resolve_concurrency: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("reverse_geocode_url", &self.reverse_geocode_url)
            .field("ip_geolocate_url", &self.ip_geolocate_url)
            .field("geocode_user_agent", &self.geocode_user_agent)
            .field("geocode_accept_language", &self.geocode_accept_language)
            .field(
                "geocode_contact_email",
                &self.geocode_contact_email.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "reverse_geocode_timeout_secs",
                &self.reverse_geocode_timeout_secs,
            )
            .field("ip_geolocate_timeout_secs", &self.ip_geolocate_timeout_secs)
            .field("resolve_concurrency", &self.resolve_concurrency)
            .finish()
    }
}
