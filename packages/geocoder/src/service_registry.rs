//! Compile-time registry of reverse geocoding providers.
//!
//! Each provider is defined in a TOML file under `services/`. The files are
//! embedded at compile time and exposed via [`all_services`] and
//! [`enabled_services`].

use std::time::Duration;

use serde::Deserialize;

/// A geocoding provider configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`, `"photon"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this provider takes part in the fallback chain.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Position in the chain. Lower values are tried first.
    pub priority: u32,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Nominatim / `OpenStreetMap`. Gives street-level addresses and
    /// powers place search.
    Nominatim {
        /// Reverse endpoint (e.g., `"https://nominatim.openstreetmap.org/reverse"`).
        reverse_url: String,
        /// Search endpoint (e.g., `"https://nominatim.openstreetmap.org/search"`).
        search_url: String,
        /// Per-request timeout.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// Photon (Komoot). Coarser `name, city, country` labels.
    Photon {
        /// Reverse endpoint (e.g., `"https://photon.komoot.io/reverse"`).
        reverse_url: String,
        /// Per-request timeout.
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

const fn default_true() -> bool {
    true
}

const fn default_timeout_secs() -> u64 {
    10
}

impl GeocodingService {
    /// Returns the provider's reverse geocoding endpoint.
    #[must_use]
    pub fn reverse_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::Nominatim { reverse_url, .. }
            | ProviderConfig::Photon { reverse_url, .. } => reverse_url,
        }
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        match &self.provider {
            ProviderConfig::Nominatim { timeout_secs, .. }
            | ProviderConfig::Photon { timeout_secs, .. } => Duration::from_secs(*timeout_secs),
        }
    }
}

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("nominatim", include_str!("../services/nominatim.toml")),
    ("photon", include_str!("../services/photon.toml")),
];

/// Returns all provider configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed. The configs are embedded at
/// compile time, so this only fails on a broken build.
#[must_use]
pub fn all_services() -> Vec<GeocodingService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse geocoding service '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled services, sorted by priority (ascending).
#[must_use]
pub fn enabled_services() -> Vec<GeocodingService> {
    let mut services: Vec<GeocodingService> =
        all_services().into_iter().filter(|s| s.enabled).collect();
    services.sort_by_key(|s| s.priority);
    services
}

/// Returns the configuration of the first enabled Nominatim service, used
/// for place search.
#[must_use]
pub fn search_service() -> Option<GeocodingService> {
    enabled_services()
        .into_iter()
        .find(|s| matches!(s.provider, ProviderConfig::Nominatim { .. }))
}
