#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate and location types.
//!
//! These types describe where a user is and where an incident happened.
//! They carry no behavior beyond formatting; distance math and parsing of
//! stored geography values live in `urban_shield_geography`.

use serde::{Deserialize, Serialize};

/// Latitude of the default map region (Cebu City).
pub const DEFAULT_REGION_LATITUDE: f64 = 10.3157;

/// Longitude of the default map region (Cebu City).
pub const DEFAULT_REGION_LONGITUDE: f64 = 123.8854;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The center of the default map region.
    #[must_use]
    pub const fn default_region() -> Self {
        Self::new(DEFAULT_REGION_LATITUDE, DEFAULT_REGION_LONGITUDE)
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Formats the point as `"lat, lon"` with six decimal places each.
    #[must_use]
    pub fn coordinate_label(&self) -> String {
        format!("{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A location reading, either from a device position source or from a
/// manual place search selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Human-readable address, when one has been resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Horizontal accuracy in meters, when the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl LocationData {
    /// Creates a location without address or accuracy.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
            accuracy: None,
        }
    }

    /// Returns the coordinate part of this location.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Returns a copy of this location with the given address attached.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// The address if present and non-blank, otherwise the coordinates.
    #[must_use]
    pub fn display_label(&self) -> String {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => self.point().coordinate_label(),
        }
    }
}

impl From<GeoPoint> for LocationData {
    fn from(point: GeoPoint) -> Self {
        Self::new(point.latitude, point.longitude)
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// A box extending `delta_deg` degrees in every direction from `center`.
    #[must_use]
    pub fn around(center: GeoPoint, delta_deg: f64) -> Self {
        Self::new(
            center.longitude - delta_deg,
            center.latitude - delta_deg,
            center.longitude + delta_deg,
            center.latitude + delta_deg,
        )
    }

    /// Whether the point lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.west..=self.east).contains(&point.longitude)
            && (self.south..=self.north).contains(&point.latitude)
    }

    /// Renders the box as `west,south,east,north`, the order place search
    /// APIs expect for a `viewbox` parameter.
    #[must_use]
    pub fn to_viewbox(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_label_uses_six_decimals() {
        let point = GeoPoint::new(10.3157, 123.8854);
        assert_eq!(point.coordinate_label(), "10.315700, 123.885400");
    }

    #[test]
    fn display_label_falls_back_to_coordinates() {
        let location = LocationData::new(10.32, 123.89);
        assert_eq!(location.display_label(), "10.320000, 123.890000");

        let blank = location.clone().with_address("   ");
        assert_eq!(blank.display_label(), "10.320000, 123.890000");

        let named = location.with_address("Colon Street, Cebu City");
        assert_eq!(named.display_label(), "Colon Street, Cebu City");
    }

    #[test]
    fn bounding_box_around_point() {
        let bbox = BoundingBox::around(GeoPoint::new(10.0, 120.0), 0.5);
        assert!((bbox.west - 119.5).abs() < 1e-9);
        assert!((bbox.north - 10.5).abs() < 1e-9);
        assert!(bbox.contains(GeoPoint::new(10.2, 120.3)));
        assert!(!bbox.contains(GeoPoint::new(11.0, 120.0)));
        assert_eq!(bbox.to_viewbox(), "119.5,9.5,120.5,10.5");
    }

    #[test]
    fn location_serializes_camel_case_without_empty_fields() {
        let json = serde_json::to_value(LocationData::new(1.0, 2.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "latitude": 1.0, "longitude": 2.0 }));
    }
}
