//! Ordered fallback over reverse geocoding providers.

use urban_shield_geography_models::GeoPoint;

use crate::service_registry::{self, GeocodingService, ProviderConfig};
use crate::{AddressQuality, GeocodeError, NominatimClient, PhotonClient, ReverseGeocoder};

/// An address and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub address: String,
    pub quality: AddressQuality,
}

/// Tries each provider in order and falls back to the coordinates.
pub struct GeocoderChain {
    providers: Vec<Box<dyn ReverseGeocoder>>,
}

impl GeocoderChain {
    /// A chain over `providers`, tried in the given order.
    #[must_use]
    pub fn new(providers: Vec<Box<dyn ReverseGeocoder>>) -> Self {
        Self { providers }
    }

    /// A chain over the enabled providers in [`service_registry`], in
    /// priority order.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if an HTTP client cannot be built.
    pub fn from_registry() -> Result<Self, GeocodeError> {
        let providers = service_registry::enabled_services()
            .iter()
            .map(provider_for)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(providers))
    }

    /// Number of providers tried before the coordinate fallback.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolves the address at a point.
    ///
    /// Provider errors and empty answers move on to the next provider.
    /// When none produces an address, or the coordinates are not finite,
    /// the result is the coordinates formatted to six decimals.
    pub async fn resolve_address(&self, latitude: f64, longitude: f64) -> ResolvedAddress {
        let point = GeoPoint::new(latitude, longitude);

        if point.is_finite() {
            for provider in &self.providers {
                match provider.reverse(latitude, longitude).await {
                    Ok(Some(address)) if !address.trim().is_empty() => {
                        log::debug!("Address resolved via {}: {address}", provider.name());
                        return ResolvedAddress {
                            address,
                            quality: provider.quality(),
                        };
                    }
                    Ok(_) => {
                        log::warn!("{} had no address for {latitude}, {longitude}", provider.name());
                    }
                    Err(e) => {
                        log::warn!("{} geocoding failed: {e}", provider.name());
                    }
                }
            }
        } else {
            log::warn!("Not geocoding non-finite coordinates {latitude}, {longitude}");
        }

        log::warn!("All geocoding services failed, using coordinates");
        ResolvedAddress {
            address: point.coordinate_label(),
            quality: AddressQuality::Coordinates,
        }
    }
}

fn provider_for(service: &GeocodingService) -> Result<Box<dyn ReverseGeocoder>, GeocodeError> {
    let client = crate::build_client(service.timeout())?;

    let provider: Box<dyn ReverseGeocoder> = match &service.provider {
        ProviderConfig::Nominatim {
            reverse_url,
            search_url,
            ..
        } => Box::new(NominatimClient::new(client, reverse_url, search_url)),
        ProviderConfig::Photon { reverse_url, .. } => {
            Box::new(PhotonClient::new(client, reverse_url))
        }
    };
    Ok(provider)
}

/// Builds the Nominatim client used for place search from the registry.
///
/// # Errors
///
/// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
pub fn search_client() -> Result<Option<NominatimClient>, GeocodeError> {
    let Some(service) = service_registry::search_service() else {
        return Ok(None);
    };
    let ProviderConfig::Nominatim {
        reverse_url,
        search_url,
        ..
    } = &service.provider
    else {
        return Ok(None);
    };

    Ok(Some(NominatimClient::new(
        crate::build_client(service.timeout())?,
        reverse_url,
        search_url,
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    enum Answer {
        Address(&'static str),
        Nothing,
        Fail,
    }

    struct FakeGeocoder {
        name: &'static str,
        quality: AddressQuality,
        answer: Answer,
        calls: Arc<AtomicUsize>,
    }

    impl FakeGeocoder {
        fn boxed(
            name: &'static str,
            quality: AddressQuality,
            answer: Answer,
            calls: &Arc<AtomicUsize>,
        ) -> Box<dyn ReverseGeocoder> {
            Box::new(Self {
                name,
                quality,
                answer,
                calls: Arc::clone(calls),
            })
        }
    }

    #[async_trait::async_trait]
    impl ReverseGeocoder for FakeGeocoder {
        fn name(&self) -> &str {
            self.name
        }

        fn quality(&self) -> AddressQuality {
            self.quality
        }

        async fn reverse(&self, _: f64, _: f64) -> Result<Option<String>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.answer {
                Answer::Address(a) => Ok(Some(a.to_string())),
                Answer::Nothing => Ok(None),
                Answer::Fail => Err(GeocodeError::UnexpectedContentType {
                    content_type: Some("text/html".to_string()),
                }),
            }
        }
    }

    #[tokio::test]
    async fn primary_answer_wins() {
        let primary = Arc::new(AtomicUsize::new(0));
        let secondary = Arc::new(AtomicUsize::new(0));
        let chain = GeocoderChain::new(vec![
            FakeGeocoder::boxed(
                "primary",
                AddressQuality::Precise,
                Answer::Address("Osmeña Blvd, Capitol Site, Cebu City"),
                &primary,
            ),
            FakeGeocoder::boxed(
                "secondary",
                AddressQuality::Coarse,
                Answer::Address("Cebu City, Philippines"),
                &secondary,
            ),
        ]);

        let resolved = chain.resolve_address(10.3157, 123.8854).await;
        assert_eq!(resolved.address, "Osmeña Blvd, Capitol Site, Cebu City");
        assert_eq!(resolved.quality, AddressQuality::Precise);
        assert_eq!(secondary.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_back_to_secondary_on_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = GeocoderChain::new(vec![
            FakeGeocoder::boxed("primary", AddressQuality::Precise, Answer::Fail, &calls),
            FakeGeocoder::boxed(
                "secondary",
                AddressQuality::Coarse,
                Answer::Address("Cebu City, Philippines"),
                &calls,
            ),
        ]);

        let resolved = chain.resolve_address(10.3157, 123.8854).await;
        assert_eq!(resolved.address, "Cebu City, Philippines");
        assert_eq!(resolved.quality, AddressQuality::Coarse);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn falls_back_to_coordinates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = GeocoderChain::new(vec![
            FakeGeocoder::boxed("primary", AddressQuality::Precise, Answer::Nothing, &calls),
            FakeGeocoder::boxed("secondary", AddressQuality::Coarse, Answer::Fail, &calls),
        ]);

        let resolved = chain.resolve_address(10.3157, 123.8854).await;
        assert_eq!(resolved.address, "10.315700, 123.885400");
        assert_eq!(resolved.quality, AddressQuality::Coordinates);
    }

    #[tokio::test]
    async fn non_finite_input_skips_providers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = GeocoderChain::new(vec![FakeGeocoder::boxed(
            "primary",
            AddressQuality::Precise,
            Answer::Address("somewhere"),
            &calls,
        )]);

        let resolved = chain.resolve_address(f64::NAN, 123.8854).await;
        assert_eq!(resolved.quality, AddressQuality::Coordinates);
        assert_eq!(resolved.address, "NaN, 123.885400");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreachable_providers_still_resolve() {
        let client = reqwest::Client::new();
        let providers: Vec<Box<dyn ReverseGeocoder>> = vec![
            Box::new(NominatimClient::new(
                client.clone(),
                "http://127.0.0.1:9/reverse",
                "http://127.0.0.1:9/search",
            )),
            Box::new(PhotonClient::new(client, "http://127.0.0.1:9/reverse")),
        ];
        let chain = GeocoderChain::new(providers);

        let resolved = chain.resolve_address(10.3157, 123.8854).await;
        assert_eq!(resolved.address, "10.315700, 123.885400");
    }

    #[test]
    fn registry_chain_has_both_providers() {
        let chain = GeocoderChain::from_registry().unwrap();
        assert_eq!(chain.len(), 2);
        assert!(search_client().unwrap().is_some());
    }
}
