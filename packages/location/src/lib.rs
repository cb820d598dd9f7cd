#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The reporter's current location.
//!
//! A [`LocationService`] combines a [`PositionSource`] (device GPS, browser
//! geolocation, or a fixed configured point) with an [`AddressResolver`].
//! It holds no state: callers that want to reuse the last known location
//! keep it themselves and pass it where needed.

use thiserror::Error;
use urban_shield_geocoder::{GeocoderChain, ResolvedAddress};
use urban_shield_geography_models::LocationData;

/// Why the current position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused location access.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The platform could not produce a fix.
    #[error("Failed to get location: {message}")]
    PositionUnavailable {
        /// Platform-provided detail.
        message: String,
    },

    /// This platform has no position source.
    #[error("Geolocation not supported on this platform")]
    Unsupported,
}

/// A platform position provider.
#[async_trait::async_trait]
pub trait PositionSource: Send + Sync {
    /// Asks for location access. Returns whether it was granted.
    async fn request_permission(&self) -> bool;

    /// Reads the current position.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] if no fix can be obtained.
    async fn current_position(&self) -> Result<LocationData, LocationError>;
}

/// Turns coordinates into an address. Never fails.
#[async_trait::async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve_address(&self, latitude: f64, longitude: f64) -> ResolvedAddress;
}

#[async_trait::async_trait]
impl AddressResolver for GeocoderChain {
    async fn resolve_address(&self, latitude: f64, longitude: f64) -> ResolvedAddress {
        Self::resolve_address(self, latitude, longitude).await
    }
}

/// A position source that always reports the same point, for hosts
/// without positioning hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPosition {
    location: LocationData,
}

impl FixedPosition {
    #[must_use]
    pub const fn new(location: LocationData) -> Self {
        Self { location }
    }
}

#[async_trait::async_trait]
impl PositionSource for FixedPosition {
    async fn request_permission(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<LocationData, LocationError> {
        if self.location.point().is_finite() {
            Ok(self.location.clone())
        } else {
            Err(LocationError::PositionUnavailable {
                message: format!(
                    "configured position {}, {} is not a valid coordinate",
                    self.location.latitude, self.location.longitude
                ),
            })
        }
    }
}

/// Current location lookups for the reporter.
pub struct LocationService<S, G> {
    source: S,
    resolver: G,
}

impl<S: PositionSource, G: AddressResolver> LocationService<S, G> {
    #[must_use]
    pub const fn new(source: S, resolver: G) -> Self {
        Self { source, resolver }
    }

    /// Requests permission and reads the current position.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::PermissionDenied`] if access is refused, or
    /// the source's error if no fix can be obtained.
    pub async fn current_location(&self) -> Result<LocationData, LocationError> {
        if !self.source.request_permission().await {
            log::warn!("Location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let location = self.source.current_position().await?;
        log::debug!(
            "Location obtained: {:.6}, {:.6} (accuracy {:?})",
            location.latitude,
            location.longitude,
            location.accuracy
        );
        Ok(location)
    }

    /// Like [`Self::current_location`], with the address filled in.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError`] under the same conditions as
    /// [`Self::current_location`]. Address resolution itself cannot fail.
    pub async fn location_with_address(&self) -> Result<LocationData, LocationError> {
        let location = self.current_location().await?;
        let resolved = self
            .resolver
            .resolve_address(location.latitude, location.longitude)
            .await;
        log::debug!("Address ({}): {}", resolved.quality, resolved.address);
        Ok(location.with_address(resolved.address))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use urban_shield_geocoder::AddressQuality;

    use super::*;

    struct DeniedSource {
        read: AtomicBool,
    }

    #[async_trait::async_trait]
    impl PositionSource for DeniedSource {
        async fn request_permission(&self) -> bool {
            false
        }

        async fn current_position(&self) -> Result<LocationData, LocationError> {
            self.read.store(true, Ordering::SeqCst);
            Err(LocationError::Unsupported)
        }
    }

    struct NoFix;

    #[async_trait::async_trait]
    impl PositionSource for NoFix {
        async fn request_permission(&self) -> bool {
            true
        }

        async fn current_position(&self) -> Result<LocationData, LocationError> {
            Err(LocationError::PositionUnavailable {
                message: "timeout expired".to_string(),
            })
        }
    }

    struct StaticResolver;

    #[async_trait::async_trait]
    impl AddressResolver for StaticResolver {
        async fn resolve_address(&self, _: f64, _: f64) -> ResolvedAddress {
            ResolvedAddress {
                address: "Colon Street, Cebu City, Philippines".to_string(),
                quality: AddressQuality::Precise,
            }
        }
    }

    fn cebu() -> LocationData {
        LocationData {
            accuracy: Some(12.5),
            ..LocationData::new(10.2958, 123.9019)
        }
    }

    #[tokio::test]
    async fn fixed_position_is_reported() {
        let service = LocationService::new(FixedPosition::new(cebu()), StaticResolver);
        let location = service.current_location().await.unwrap();
        assert_eq!(location, cebu());
        assert_eq!(location.address, None);
    }

    #[tokio::test]
    async fn address_is_attached_and_accuracy_kept() {
        let service = LocationService::new(FixedPosition::new(cebu()), StaticResolver);
        let location = service.location_with_address().await.unwrap();
        assert_eq!(
            location.address.as_deref(),
            Some("Colon Street, Cebu City, Philippines")
        );
        assert_eq!(location.accuracy, Some(12.5));
    }

    #[tokio::test]
    async fn denied_permission_never_reads_position() {
        let source = DeniedSource {
            read: AtomicBool::new(false),
        };
        let service = LocationService::new(source, StaticResolver);
        assert_eq!(
            service.location_with_address().await,
            Err(LocationError::PermissionDenied)
        );
        assert!(!service.source.read.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn missing_fix_is_reported() {
        let service = LocationService::new(NoFix, StaticResolver);
        let err = service.current_location().await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get location: timeout expired");
    }

    #[tokio::test]
    async fn invalid_fixed_position_is_unavailable() {
        let source = FixedPosition::new(LocationData::new(f64::NAN, 123.9));
        let service = LocationService::new(source, StaticResolver);
        assert!(matches!(
            service.current_location().await,
            Err(LocationError::PositionUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn chain_resolver_falls_back_to_coordinates() {
        let service = LocationService::new(FixedPosition::new(cebu()), GeocoderChain::new(vec![]));
        let location = service.location_with_address().await.unwrap();
        assert_eq!(location.address.as_deref(), Some("10.295800, 123.901900"));
    }
}
