#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic computations for incident reports.
//!
//! * [`distance`]: haversine great-circle distance and the report radius
//!   check that keeps users from filing reports far away from where they
//!   actually are.
//! * [`stored_point`]: parsing of geography values as the backend returns
//!   them (WKT, hex EWKB, or `GeoJSON`) and formatting points for inserts.

pub mod distance;
pub mod stored_point;

pub use distance::{
    BoundaryCheck, DEFAULT_RADIUS_KM, EARTH_RADIUS_KM, SEARCH_VIEWBOX_DELTA_DEG, check_bounds,
    distance_km, haversine_km, is_within_radius, search_viewbox,
};
pub use stored_point::{parse_stored_location, parse_stored_point, to_ewkt};

use thiserror::Error;

/// Errors from geographic computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A coordinate was NaN or infinite.
    #[error("Invalid coordinate: {name} = {value}")]
    InvalidCoordinate {
        /// Which argument was invalid (e.g. `"lat1"`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A radius was negative, NaN or infinite.
    #[error("Invalid radius: {value} km")]
    InvalidRadius {
        /// The rejected value.
        value: f64,
    },
}
