//! Nominatim / `OpenStreetMap` client.
//!
//! The public instance allows at most one request per second and requires
//! an identifying `User-Agent`.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/> and
//! <https://nominatim.org/release-docs/develop/api/Search/>

use serde::Serialize;
use urban_shield_geography::{distance_km, search_viewbox};
use urban_shield_geography_models::{GeoPoint, LocationData};

use crate::{AddressQuality, GeocodeError, ReverseGeocoder, read_json};

/// Queries shorter than this are not sent.
pub const MIN_QUERY_CHARS: usize = 3;

/// Maximum number of search results requested.
pub const SEARCH_LIMIT: &str = "5";

/// Number of leading `display_name` components kept for an address.
const ADDRESS_PARTS: usize = 3;

/// A place found by [`NominatimClient::search`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub id: String,
    /// First component of the place's display name.
    pub name: String,
    /// Full display name.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Distance from the search reference, rounded to 0.1 km.
    pub distance_km: f64,
}

impl PlaceSuggestion {
    /// The suggestion as a pickable report location.
    #[must_use]
    pub fn to_location(&self) -> LocationData {
        LocationData::new(self.latitude, self.longitude).with_address(self.address.clone())
    }
}

/// HTTP client for a Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    reverse_url: String,
    search_url: String,
}

impl NominatimClient {
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        reverse_url: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            reverse_url: reverse_url.into(),
            search_url: search_url.into(),
        }
    }

    /// Searches for places near `reference`, limited to the ±0.1° view box
    /// around it and then to `radius_km`.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] return no results without
    /// sending a request.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request or response parsing fails.
    pub async fn search(
        &self,
        query: &str,
        reference: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<PlaceSuggestion>, GeocodeError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let viewbox = search_viewbox(reference).to_viewbox();
        let resp = self
            .client
            .get(&self.search_url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", SEARCH_LIMIT),
                ("addressdetails", "1"),
                ("bounded", "1"),
                ("viewbox", viewbox.as_str()),
            ])
            .send()
            .await?;

        let body = read_json(resp).await?;
        let places = parse_search_response(&body, reference, radius_km)?;
        log::debug!("Nominatim search {query:?}: {} places in range", places.len());
        Ok(places)
    }
}

#[async_trait::async_trait]
impl ReverseGeocoder for NominatimClient {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn quality(&self) -> AddressQuality {
        AddressQuality::Precise
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError> {
        let resp = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("format", "json"),
                ("lat", latitude.to_string().as_str()),
                ("lon", longitude.to_string().as_str()),
                ("zoom", "18"),
                ("addressdetails", "1"),
            ])
            .send()
            .await?;

        let body = read_json(resp).await?;
        Ok(parse_reverse_response(&body))
    }
}

/// Extracts a short address from a reverse response. Accepts the usual
/// object and, from some proxies, a one-element array.
fn parse_reverse_response(body: &serde_json::Value) -> Option<String> {
    let place = body.as_array().map_or(Some(body), |a| a.first())?;
    let display_name = place["display_name"].as_str()?;

    let address = display_name
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(ADDRESS_PARTS)
        .collect::<Vec<_>>()
        .join(", ");

    (!address.is_empty()).then_some(address)
}

fn coordinate(value: &serde_json::Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        other => other.as_f64(),
    };
    parsed.filter(|v| v.is_finite())
}

fn parse_search_response(
    body: &serde_json::Value,
    reference: GeoPoint,
    radius_km: f64,
) -> Result<Vec<PlaceSuggestion>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim search response is not an array".to_string(),
    })?;

    let mut places = Vec::with_capacity(results.len());
    for (index, place) in results.iter().enumerate() {
        let (Some(latitude), Some(longitude)) = (coordinate(&place["lat"]), coordinate(&place["lon"]))
        else {
            log::debug!("Skipping search result {index} without coordinates");
            continue;
        };

        let Ok(distance) = distance_km(reference, GeoPoint::new(latitude, longitude)) else {
            continue;
        };
        let distance = (distance * 10.0).round() / 10.0;
        if distance > radius_km {
            continue;
        }

        let address = place["display_name"].as_str().unwrap_or_default().to_string();
        let name = address
            .split(',')
            .next()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Unknown Place")
            .to_string();
        let id = match &place["place_id"] {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) if !s.is_empty() => s.clone(),
            _ => index.to_string(),
        };

        places.push(PlaceSuggestion {
            id,
            name,
            address,
            latitude,
            longitude,
            distance_km: distance,
        });
    }

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_keeps_first_three_components() {
        let body = serde_json::json!({
            "display_name": "Sikatuna Street, Santo Niño, Cebu City, Central Visayas, 6000, Philippines"
        });
        assert_eq!(
            parse_reverse_response(&body).as_deref(),
            Some("Sikatuna Street, Santo Niño, Cebu City")
        );
    }

    #[test]
    fn reverse_accepts_array_bodies() {
        let body = serde_json::json!([{ "display_name": "Plaza Independencia, Cebu City" }]);
        assert_eq!(
            parse_reverse_response(&body).as_deref(),
            Some("Plaza Independencia, Cebu City")
        );
    }

    #[test]
    fn reverse_without_display_name_is_none() {
        assert!(parse_reverse_response(&serde_json::json!({ "error": "Unable to geocode" })).is_none());
        assert!(parse_reverse_response(&serde_json::json!([])).is_none());
        assert!(parse_reverse_response(&serde_json::json!({ "display_name": " , " })).is_none());
    }

    #[test]
    fn search_results_are_ranged_and_rounded() {
        let reference = GeoPoint::new(10.3157, 123.8854);
        let body = serde_json::json!([
            {
                "place_id": 123_456,
                "lat": "10.3176",
                "lon": "123.8906",
                "display_name": "Ayala Center Cebu, Cebu Business Park, Cebu City"
            },
            {
                "lat": "10.5000",
                "lon": "124.0500",
                "display_name": "Far away place, Cebu"
            },
            {
                "lat": "not a number",
                "lon": "123.9",
                "display_name": "Broken"
            }
        ]);

        let places = parse_search_response(&body, reference, 10.0).unwrap();
        assert_eq!(places.len(), 1);
        let place = &places[0];
        assert_eq!(place.id, "123456");
        assert_eq!(place.name, "Ayala Center Cebu");
        assert!((place.distance_km * 10.0 - (place.distance_km * 10.0).round()).abs() < 1e-9);
        assert!(place.distance_km <= 10.0);

        let location = place.to_location();
        assert_eq!(location.address.as_deref(), Some(place.address.as_str()));
    }

    #[test]
    fn search_result_without_place_id_uses_index() {
        let reference = GeoPoint::new(10.3157, 123.8854);
        let body = serde_json::json!([{ "lat": "10.3157", "lon": "123.8854", "display_name": "" }]);
        let places = parse_search_response(&body, reference, 10.0).unwrap();
        assert_eq!(places[0].id, "0");
        assert_eq!(places[0].name, "Unknown Place");
        assert!(places[0].distance_km.abs() < f64::EPSILON);
    }

    #[test]
    fn search_rejects_non_array_bodies() {
        let err = parse_search_response(
            &serde_json::json!({ "error": "bad" }),
            GeoPoint::default_region(),
            10.0,
        )
        .unwrap_err();
        assert!(matches!(err, GeocodeError::Parse { .. }));
    }

    #[tokio::test]
    async fn short_queries_send_nothing() {
        // Nothing listens on the discard port; a request would fail.
        let client = NominatimClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/reverse",
            "http://127.0.0.1:9/search",
        );
        let places = client
            .search(" ab ", GeoPoint::default_region(), 10.0)
            .await
            .unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn unreachable_instance_is_an_http_error() {
        let client = NominatimClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9/reverse",
            "http://127.0.0.1:9/search",
        );
        let err = client.reverse(10.3157, 123.8854).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Http(_)));
    }
}
