//! Map markers and the renderer capability.
//!
//! Front ends pick one [`RenderStrategy`] at startup and drive a single
//! [`MapRenderer`] implementation. [`ListRenderer`] is the fallback used
//! when no map surface is available.

use std::io::Write;

use thiserror::Error;
use urban_shield_geography::{distance_km, parse_stored_location};
use urban_shield_geography_models::GeoPoint;
use urban_shield_incident_models::{Incident, IncidentCategory, IncidentSeverity};
use uuid::Uuid;

/// Errors from drawing markers.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One incident as drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub incident_id: Uuid,
    pub point: GeoPoint,
    pub title: String,
    pub category: IncidentCategory,
    pub severity: IncidentSeverity,
    pub color: &'static str,
    pub icon: &'static str,
    pub is_urgent: bool,
    pub is_verified: bool,
}

/// Builds the marker for an incident, or `None` if its stored location
/// cannot be decoded.
#[must_use]
pub fn marker_for(incident: &Incident) -> Option<MapMarker> {
    let point = incident.location.as_ref().and_then(parse_stored_location)?;

    Some(MapMarker {
        incident_id: incident.id,
        point,
        title: incident.title.clone(),
        category: incident.category,
        severity: incident.severity,
        color: incident.category.color(),
        icon: incident.category.icon(),
        is_urgent: incident.is_urgent,
        is_verified: incident.is_verified,
    })
}

/// Builds markers for every incident with a usable location. Incidents
/// without one are left off the map.
#[must_use]
pub fn markers_for(incidents: &[Incident]) -> Vec<MapMarker> {
    incidents
        .iter()
        .filter_map(|incident| {
            let marker = marker_for(incident);
            if marker.is_none() {
                log::debug!(
                    "Skipping incident {} on the map: no usable location ({:?})",
                    incident.id,
                    incident.location
                );
            }
            marker
        })
        .collect()
}

/// Callback invoked when the user selects a marker.
pub type MarkerSelectHandler = Box<dyn FnMut(&MapMarker) + Send>;

/// A surface that can show incident markers.
pub trait MapRenderer {
    /// Replaces the markers currently shown.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the surface cannot be drawn to.
    fn render_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError>;

    /// Moves the view to `center`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the surface cannot be drawn to.
    fn center_on(&mut self, center: GeoPoint) -> Result<(), MapError>;

    /// Registers the marker selection callback, replacing any previous one.
    fn on_marker_select(&mut self, handler: MarkerSelectHandler);
}

/// What the host platform can display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCapabilities {
    /// A native map view is available.
    pub native_map: bool,
    /// An embedded web view is available for tile maps.
    pub web_view: bool,
}

/// Which [`MapRenderer`] a front end should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RenderStrategy {
    NativeMap,
    WebTiles,
    List,
}

impl RenderStrategy {
    /// Chooses the richest strategy the platform supports.
    #[must_use]
    pub const fn select(capabilities: RenderCapabilities) -> Self {
        if capabilities.native_map {
            Self::NativeMap
        } else if capabilities.web_view {
            Self::WebTiles
        } else {
            Self::List
        }
    }
}

/// Renders markers as a text list, nearest first when a center is set.
pub struct ListRenderer<W: Write> {
    out: W,
    center: Option<GeoPoint>,
    markers: Vec<MapMarker>,
    on_select: Option<MarkerSelectHandler>,
}

impl<W: Write> ListRenderer<W> {
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self {
            out,
            center: None,
            markers: Vec::new(),
            on_select: None,
        }
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Selects the marker for `incident_id`, invoking the selection
    /// callback. Returns `false` if no such marker is shown.
    pub fn select_marker(&mut self, incident_id: Uuid) -> bool {
        let Some(marker) = self.markers.iter().find(|m| m.incident_id == incident_id) else {
            return false;
        };
        if let Some(handler) = self.on_select.as_mut() {
            handler(marker);
        }
        true
    }

    fn distance_from_center(&self, marker: &MapMarker) -> Option<f64> {
        self.center
            .and_then(|center| distance_km(center, marker.point).ok())
    }

    fn write_list(&mut self) -> Result<(), MapError> {
        if self.markers.is_empty() {
            writeln!(self.out, "No incidents to show")?;
            return Ok(());
        }

        if let Some(center) = self.center {
            let mut keyed: Vec<_> = std::mem::take(&mut self.markers)
                .into_iter()
                .map(|m| (distance_km(center, m.point).unwrap_or(f64::INFINITY), m))
                .collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            self.markers = keyed.into_iter().map(|(_, m)| m).collect();
        }

        for marker in &self.markers {
            let urgent = if marker.is_urgent { " URGENT" } else { "" };
            let verified = if marker.is_verified { " (verified)" } else { "" };
            match self.distance_from_center(marker) {
                Some(km) => writeln!(
                    self.out,
                    "[{}] {}{urgent}{verified} - {} - {km:.1} km",
                    marker.severity.label(),
                    marker.title,
                    marker.category.label()
                )?,
                None => writeln!(
                    self.out,
                    "[{}] {}{urgent}{verified} - {} - {}",
                    marker.severity.label(),
                    marker.title,
                    marker.category.label(),
                    marker.point.coordinate_label()
                )?,
            }
        }

        Ok(())
    }
}

impl<W: Write> MapRenderer for ListRenderer<W> {
    fn render_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError> {
        self.markers = markers.to_vec();
        self.write_list()
    }

    fn center_on(&mut self, center: GeoPoint) -> Result<(), MapError> {
        self.center = Some(center);
        Ok(())
    }

    fn on_marker_select(&mut self, handler: MarkerSelectHandler) {
        self.on_select = Some(handler);
    }
}
