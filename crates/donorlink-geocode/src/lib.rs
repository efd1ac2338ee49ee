//! Location resolution for donation requests.
//!
//! - [`client`]: HTTP clients for the reverse-geocoding and IP-geolocation
//!   providers, behind the [`Geocoder`] trait.
//! - [`policy`]: decides what location to persist on create and update.
//! - [`deferred`]: re-attempts resolution for an existing record on demand.

pub mod client;
pub mod deferred;
pub mod error;
pub mod policy;
pub mod types;

#[cfg(test)]
mod stub;

pub use client::{GeocodeSettings, Geocoder, GeocodingClient};
pub use deferred::{recover_coordinates, resolve_deferred};
pub use error::{GeocodeError, ResolveError};
pub use policy::{apply_update, resolve_new};
pub use types::IpLocation;
