#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reverse geocoding for incident locations.
//!
//! Turns coordinates into a human-readable address using the providers
//! configured in `services/`, tried in priority order:
//!
//! 1. **Nominatim / `OpenStreetMap`** (priority 1): street-level
//!    addresses, trimmed to the first three components.
//! 2. **Photon** (priority 2): `name, city, country`.
//!
//! When every provider fails the [`chain::GeocoderChain`] falls back to the
//! raw coordinates, so address resolution never fails. Nominatim also
//! backs the nearby [place search](nominatim::NominatimClient::search).

pub mod chain;
pub mod nominatim;
pub mod photon;
pub mod service_registry;

use std::time::Duration;

use strum_macros::Display;
use thiserror::Error;

pub use chain::{GeocoderChain, ResolvedAddress, search_client};
pub use nominatim::{NominatimClient, PlaceSuggestion};
pub use photon::PhotonClient;

/// `User-Agent` sent with every request. Public instances reject
/// anonymous clients.
pub const USER_AGENT: &str = "UrbanShield/1.0";

/// Errors from a single geocoding provider.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("Geocoder returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The provider answered with something other than JSON, typically an
    /// HTML error or rate limit page.
    #[error("Non-JSON response received (content type {content_type:?})")]
    UnexpectedContentType {
        /// The `Content-Type` header, if any.
        content_type: Option<String>,
    },
}

/// How precise a resolved address is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AddressQuality {
    /// Street-level address.
    Precise,
    /// Place or city level.
    Coarse,
    /// No address; the coordinates themselves.
    Coordinates,
}

/// A provider that turns coordinates into an address.
#[async_trait::async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Quality of the addresses this provider returns.
    fn quality(&self) -> AddressQuality;

    /// Looks up the address at the given point. `Ok(None)` means the
    /// provider answered but had no address for it.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request fails or the response cannot
    /// be parsed.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError>;
}

/// Builds the HTTP client shared by the providers.
///
/// # Errors
///
/// Returns [`GeocodeError::Http`] if the client cannot be built.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, GeocodeError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(Into::into)
}

/// Checks a `Content-Type` header value before the body is parsed.
///
/// # Errors
///
/// Returns [`GeocodeError::UnexpectedContentType`] unless the value
/// contains `application/json`.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), GeocodeError> {
    match content_type {
        Some(value) if value.to_ascii_lowercase().contains("application/json") => Ok(()),
        other => Err(GeocodeError::UnexpectedContentType {
            content_type: other.map(ToString::to_string),
        }),
    }
}

/// Reads a provider response as JSON after checking status and content
/// type.
pub(crate) async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, GeocodeError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(GeocodeError::Status {
            status: status.as_u16(),
        });
    }

    check_content_type(
        resp.headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
    )?;

    Ok(resp.json().await?)
}
