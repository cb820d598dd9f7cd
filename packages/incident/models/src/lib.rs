#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident category, severity and record types.
//!
//! An [`IncidentDraft`] is the in-progress state of the create-report
//! flow. On submit it is composed into a [`NewIncident`] insert payload.
//! Persisted rows come back from the backend as [`Incident`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use urban_shield_geography_models::GeoPoint;
use uuid::Uuid;

pub use urban_shield_user_models::ModerationFlags;

/// What kind of incident is being reported.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentCategory {
    /// Theft, assault, vandalism and other criminal activity.
    Crime,
    /// Structure, vehicle or grass fires.
    Fire,
    /// Road and workplace accidents.
    Accident,
    /// Flooding.
    Flood,
    /// Landslides and ground movement.
    Landslide,
    /// Earthquakes.
    Earthquake,
    /// Anything else.
    #[default]
    Other,
}

impl IncidentCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Crime,
            Self::Fire,
            Self::Accident,
            Self::Flood,
            Self::Landslide,
            Self::Earthquake,
            Self::Other,
        ]
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Crime => "Crime",
            Self::Fire => "Fire",
            Self::Accident => "Accident",
            Self::Flood => "Flood",
            Self::Landslide => "Landslide",
            Self::Earthquake => "Earthquake",
            Self::Other => "Other",
        }
    }

    /// Marker color as `#rrggbb`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Crime => "#ef4444",
            Self::Fire => "#ff6b35",
            Self::Accident => "#f59e0b",
            Self::Flood => "#3b82f6",
            Self::Landslide => "#8b5cf6",
            Self::Earthquake => "#dc2626",
            Self::Other => "#737373",
        }
    }

    /// Marker icon name.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Crime => "shield",
            Self::Fire => "flame",
            Self::Accident => "car",
            Self::Flood => "water",
            Self::Landslide => "earth",
            Self::Earthquake => "pulse",
            Self::Other => "ellipsis-horizontal",
        }
    }
}

// Older clients stored categories outside the current set ("general",
// "rescue", ...). Those rows still need to load, so they become `Other`.
impl<'de> Deserialize<'de> for IncidentCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Other))
    }
}

/// How serious an incident is.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IncidentSeverity {
    /// Minor issue, not urgent.
    Low,
    /// Needs attention soon.
    #[default]
    Medium,
    /// Important, requires prompt action.
    High,
    /// Emergency, immediate action needed.
    Critical,
}

impl IncidentSeverity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }

    /// Whether incidents at this severity are always urgent.
    #[must_use]
    pub const fn forces_urgent(self) -> bool {
        matches!(self, Self::Critical)
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Short description shown next to the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Low => "Minor issue, not urgent",
            Self::Medium => "Needs attention soon",
            Self::High => "Important, requires prompt action",
            Self::Critical => "Emergency, immediate action needed",
        }
    }

    /// Indicator color as `#rrggbb`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#22c55e",
            Self::Medium => "#f59e0b",
            Self::High => "#ef4444",
            Self::Critical => "#dc2626",
        }
    }
}

/// Lifecycle state of a persisted incident.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentStatus {
    /// Newly reported.
    #[default]
    Open,
    /// Being looked into by responders.
    Investigating,
    /// Handled.
    Resolved,
    /// Closed without further action.
    Closed,
    /// A status this client does not know about.
    Unknown,
}

impl<'de> Deserialize<'de> for IncidentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::Unknown))
    }
}

/// In-progress state of the create-report flow.
///
/// Created empty when the flow opens, edited field by field, and either
/// discarded or composed into a [`NewIncident`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct IncidentDraft {
    pub category: IncidentCategory,
    pub severity: IncidentSeverity,
    pub title: String,
    pub description: String,
    /// Free-text address typed by the reporter.
    pub address: String,
    /// Nearby landmark, if any.
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_urgent: bool,
    /// The reporter is asking for a rescue.
    #[serde(default)]
    pub is_rescue: bool,
    /// Uploaded photo/video URLs.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl IncidentDraft {
    /// Clears every field back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Insert payload for a new incident row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct NewIncident {
    pub reporter_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: IncidentCategory,
    pub severity: IncidentSeverity,
    pub address: String,
    pub landmark: Option<String>,
    pub is_anonymous: bool,
    pub is_urgent: bool,
    pub is_rescue: bool,
    pub images: Option<Vec<String>>,
    /// EWKT point, e.g. `SRID=4326;POINT(123.8854 10.3157)`.
    pub location: String,
    pub status: IncidentStatus,
    pub is_moderated: bool,
    pub is_approved: bool,
    /// The point `location` was rendered from.
    #[serde(skip)]
    pub point: GeoPoint,
}

impl NewIncident {
    /// The moderation state this incident will be created in.
    #[must_use]
    pub const fn moderation(&self) -> ModerationFlags {
        ModerationFlags {
            is_moderated: self.is_moderated,
            is_approved: self.is_approved,
        }
    }
}

/// A persisted incident row as returned by the backend.
///
/// Row queries and the feed RPC return slightly different column names
/// for the counters; both are accepted. The stored `location` is kept raw
/// and decoded with `urban_shield_geography::parse_stored_location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Incident {
    pub id: Uuid,
    #[serde(default)]
    pub reporter_id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: IncidentCategory,
    #[serde(default)]
    pub severity: IncidentSeverity,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub is_rescue: bool,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[serde(default, alias = "views")]
    pub views_count: u32,
    #[serde(default, alias = "likes")]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_moderated: bool,
    #[serde(default)]
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    /// Reporter display name, present on denormalized feed rows.
    #[serde(default, alias = "reporter_username")]
    pub reporter_name: Option<String>,
}

impl Incident {
    /// Name to show as the author, honoring anonymous posting.
    #[must_use]
    pub fn author_label(&self) -> &str {
        if self.is_anonymous {
            "Anonymous"
        } else {
            self.reporter_name.as_deref().unwrap_or("Community member")
        }
    }
}
