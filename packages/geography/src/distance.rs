//! Haversine distance and report radius checks.
//!
//! Reports must be filed close to the reporter's live position. The
//! location search flow compares a picked place against the current
//! position with [`check_bounds`] and refuses anything beyond the radius.

use urban_shield_geography_models::{BoundingBox, GeoPoint};

use crate::GeoError;

/// Mean Earth radius used for all distance math, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default maximum distance between a reporter and the reported location.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Half-width of the view box sent with place search queries, in degrees.
pub const SEARCH_VIEWBOX_DELTA_DEG: f64 = 0.1;

fn ensure_finite(name: &'static str, value: f64) -> Result<f64, GeoError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeoError::InvalidCoordinate { name, value })
    }
}

/// Great-circle distance in kilometers between two coordinates.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] if any argument is NaN or
/// infinite.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, GeoError> {
    let lat1 = ensure_finite("lat1", lat1)?;
    let lon1 = ensure_finite("lon1", lon1)?;
    let lat2 = ensure_finite("lat2", lat2)?;
    let lon2 = ensure_finite("lon2", lon2)?;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

/// [`haversine_km`] for two [`GeoPoint`]s.
///
/// # Errors
///
/// Returns [`GeoError::InvalidCoordinate`] if either point is not finite.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> Result<f64, GeoError> {
    haversine_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

fn ensure_radius(radius_km: f64) -> Result<f64, GeoError> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(GeoError::InvalidRadius { value: radius_km })
    }
}

/// Whether `candidate` lies within `radius_km` of `reference`. The radius is
/// inclusive.
///
/// # Errors
///
/// Returns [`GeoError`] if a coordinate is not finite or the radius is
/// negative or not finite.
pub fn is_within_radius(
    candidate: GeoPoint,
    reference: GeoPoint,
    radius_km: f64,
) -> Result<bool, GeoError> {
    Ok(check_bounds(candidate, reference, radius_km)?.within)
}

/// Outcome of comparing a picked location against the reporter's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCheck {
    /// Distance between the two points in kilometers.
    pub distance_km: f64,
    /// The radius the check was performed against.
    pub radius_km: f64,
    /// Whether the distance is within the radius.
    pub within: bool,
}

impl BoundaryCheck {
    /// Message shown to the user after picking a location.
    #[must_use]
    pub fn message(&self) -> String {
        let radius = self.radius_km;
        if self.within {
            format!("Within {radius}km of your location")
        } else {
            format!(
                "Outside {radius}km radius. Please select a location near you to avoid fake news."
            )
        }
    }
}

/// Measures how far `candidate` is from `reference` and whether that
/// distance is acceptable for a report.
///
/// # Errors
///
/// Returns [`GeoError`] if a coordinate is not finite or the radius is
/// negative or not finite.
pub fn check_bounds(
    candidate: GeoPoint,
    reference: GeoPoint,
    radius_km: f64,
) -> Result<BoundaryCheck, GeoError> {
    let radius_km = ensure_radius(radius_km)?;
    let distance_km = distance_km(reference, candidate)?;

    Ok(BoundaryCheck {
        distance_km,
        radius_km,
        within: distance_km <= radius_km,
    })
}

/// The view box sent alongside place search queries around `reference`.
#[must_use]
pub fn search_viewbox(reference: GeoPoint) -> BoundingBox {
    BoundingBox::around(reference, SEARCH_VIEWBOX_DELTA_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEBU: GeoPoint = GeoPoint::new(10.3157, 123.8854);

    /// A point `km` kilometers due north of `origin`.
    fn north_of(origin: GeoPoint, km: f64) -> GeoPoint {
        GeoPoint::new(origin.latitude + (km / EARTH_RADIUS_KM).to_degrees(), origin.longitude)
    }

    #[test]
    fn identical_points_are_zero_apart() {
        assert!(haversine_km(10.3157, 123.8854, 10.3157, 123.8854).unwrap().abs() < f64::EPSILON);
        assert!(haversine_km(-45.0, -170.0, -45.0, -170.0).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(10.3157, 123.8854);
        let b = GeoPoint::new(14.5995, 120.9842);
        let ab = distance_km(a, b).unwrap();
        let ba = distance_km(b, a).unwrap();
        assert!((ab - ba).abs() < 1e-9, "{ab} != {ba}");
    }

    #[test]
    fn short_hop_across_cebu() {
        let d = haversine_km(10.3157, 123.8854, 10.3200, 123.8900).unwrap();
        assert!((d - 0.7).abs() <= 0.1, "distance was {d}");
    }

    #[test]
    fn cebu_to_manila_is_roughly_570_km() {
        let d = distance_km(CEBU, GeoPoint::new(14.5995, 120.9842)).unwrap();
        assert!((d - 570.0).abs() < 15.0, "distance was {d}");
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let err = haversine_km(f64::NAN, 123.0, 10.0, 123.0).unwrap_err();
        assert!(
            matches!(err, GeoError::InvalidCoordinate { name: "lat1", value } if value.is_nan()),
            "unexpected error {err:?}"
        );
        assert!(is_within_radius(GeoPoint::new(10.0, f64::INFINITY), CEBU, 10.0).is_err());
    }

    #[test]
    fn radius_is_inclusive() {
        let candidate = north_of(CEBU, 10.0);
        let exact = distance_km(CEBU, candidate).unwrap();
        assert!((exact - 10.0).abs() < 1e-6);
        assert!(is_within_radius(candidate, CEBU, exact).unwrap());
        assert!(is_within_radius(CEBU, CEBU, 0.0).unwrap());
    }

    #[test]
    fn radius_boundary_at_ten_km() {
        assert!(is_within_radius(north_of(CEBU, 9.99), CEBU, 10.0).unwrap());
        assert!(!is_within_radius(north_of(CEBU, 10.01), CEBU, 10.0).unwrap());
    }

    #[test]
    fn invalid_radius_is_rejected() {
        assert_eq!(
            is_within_radius(CEBU, CEBU, -1.0),
            Err(GeoError::InvalidRadius { value: -1.0 })
        );
        assert!(is_within_radius(CEBU, CEBU, f64::NAN).is_err());
    }

    #[test]
    fn boundary_messages() {
        let near = check_bounds(north_of(CEBU, 2.0), CEBU, DEFAULT_RADIUS_KM).unwrap();
        assert!(near.within);
        assert_eq!(near.message(), "Within 10km of your location");

        let far = check_bounds(north_of(CEBU, 25.0), CEBU, DEFAULT_RADIUS_KM).unwrap();
        assert!(!far.within);
        assert_eq!(
            far.message(),
            "Outside 10km radius. Please select a location near you to avoid fake news."
        );
    }

    #[test]
    fn viewbox_spans_a_tenth_of_a_degree() {
        let bbox = search_viewbox(CEBU);
        assert!((bbox.east - bbox.west - 0.2).abs() < 1e-9);
        assert!(bbox.contains(CEBU));
    }
}
