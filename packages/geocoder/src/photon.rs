//! Photon (Komoot) reverse geocoder, used when Nominatim fails.
//!
//! Responses are `GeoJSON` `FeatureCollection`s; only the first feature's
//! `name`, `city` and `country` properties are used.

use crate::{AddressQuality, GeocodeError, ReverseGeocoder, read_json};

/// HTTP client for a Photon instance.
#[derive(Debug, Clone)]
pub struct PhotonClient {
    client: reqwest::Client,
    reverse_url: String,
}

impl PhotonClient {
    #[must_use]
    pub fn new(client: reqwest::Client, reverse_url: impl Into<String>) -> Self {
        Self {
            client,
            reverse_url: reverse_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReverseGeocoder for PhotonClient {
    fn name(&self) -> &str {
        "photon"
    }

    fn quality(&self) -> AddressQuality {
        AddressQuality::Coarse
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError> {
        let resp = self
            .client
            .get(&self.reverse_url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await?;

        let body = read_json(resp).await?;
        parse_response(&body)
    }
}

fn parse_response(body: &serde_json::Value) -> Result<Option<String>, GeocodeError> {
    let features = body["features"]
        .as_array()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Photon response has no features array".to_string(),
        })?;

    let Some(properties) = features.first().map(|f| &f["properties"]) else {
        return Ok(None);
    };

    let parts: Vec<&str> = ["name", "city", "country"]
        .iter()
        .filter_map(|key| properties[*key].as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    Ok((!parts.is_empty()).then(|| parts.join(", ")))
}
