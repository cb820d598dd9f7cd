//! Draft validation and composition of insert payloads.

use thiserror::Error;
use urban_shield_geography::{DEFAULT_RADIUS_KM, GeoError, check_bounds, to_ewkt};
use urban_shield_geography_models::LocationData;
use urban_shield_incident_models::{IncidentDraft, IncidentStatus, NewIncident};
use urban_shield_user_models::{Permission, UserType};
use uuid::Uuid;

/// Reasons a draft cannot be submitted. These are shown to the user as-is
/// and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    /// Title or description is blank.
    #[error("Please provide a title and description")]
    MissingTitleOrDescription,

    /// No location was picked and no current position is known.
    #[error("Please provide a location")]
    MissingLocation,

    /// The picked location is too far from the reporter's position.
    #[error(
        "You can only report incidents within {radius_km}km of your current location to prevent fake news. Please select a nearby location."
    )]
    OutsideRadius {
        /// Distance between the picked location and the reporter.
        distance_km: f64,
        /// Maximum allowed distance.
        radius_km: f64,
    },

    /// The reporter's user type may not create incidents.
    #[error("{user_type} accounts cannot create incident reports")]
    NotPermitted {
        /// The reporter's user type.
        user_type: UserType,
    },

    /// A coordinate or radius was not a usable number.
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Who is submitting and where they are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionContext<'a> {
    /// Account id of the reporter.
    pub reporter_id: Uuid,
    /// The reporter's user type.
    pub user_type: UserType,
    /// Last known live position of the reporter, if any.
    pub current_location: Option<&'a LocationData>,
    /// Location chosen through place search, if any.
    pub picked_location: Option<&'a LocationData>,
    /// Maximum distance between a picked location and the live position.
    /// `None` disables the check.
    pub radius_km: Option<f64>,
}

impl<'a> SubmissionContext<'a> {
    /// A context with no locations and the default report radius.
    #[must_use]
    pub const fn new(reporter_id: Uuid, user_type: UserType) -> Self {
        Self {
            reporter_id,
            user_type,
            current_location: None,
            picked_location: None,
            radius_km: Some(DEFAULT_RADIUS_KM),
        }
    }

    /// Sets the reporter's live position.
    #[must_use]
    pub const fn with_current_location(mut self, location: Option<&'a LocationData>) -> Self {
        self.current_location = location;
        self
    }

    /// Sets the location picked through place search.
    #[must_use]
    pub const fn with_picked_location(mut self, location: Option<&'a LocationData>) -> Self {
        self.picked_location = location;
        self
    }

    /// Sets or disables the report radius.
    #[must_use]
    pub const fn with_radius_km(mut self, radius_km: Option<f64>) -> Self {
        self.radius_km = radius_km;
        self
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Checks the fields the reporter must fill in.
///
/// # Errors
///
/// Returns [`ComposeError::MissingTitleOrDescription`] if the title or the
/// description is blank.
pub fn validate_draft(draft: &IncidentDraft) -> Result<(), ComposeError> {
    if non_blank(&draft.title).is_none() || non_blank(&draft.description).is_none() {
        return Err(ComposeError::MissingTitleOrDescription);
    }
    Ok(())
}

/// Picks the report location: a searched place wins over the live
/// position, and must lie within the radius of it when both are known.
fn resolve_location<'a>(ctx: &SubmissionContext<'a>) -> Result<&'a LocationData, ComposeError> {
    let location = ctx
        .picked_location
        .or(ctx.current_location)
        .ok_or(ComposeError::MissingLocation)?;

    for (name, value) in [
        ("latitude", location.latitude),
        ("longitude", location.longitude),
    ] {
        if !value.is_finite() {
            return Err(GeoError::InvalidCoordinate { name, value }.into());
        }
    }

    if let (Some(picked), Some(current), Some(radius_km)) =
        (ctx.picked_location, ctx.current_location, ctx.radius_km)
    {
        let check = check_bounds(picked.point(), current.point(), radius_km)?;
        if !check.within {
            log::debug!(
                "Rejecting picked location {:.1}km away (limit {radius_km}km)",
                check.distance_km
            );
            return Err(ComposeError::OutsideRadius {
                distance_km: check.distance_km,
                radius_km,
            });
        }
    }

    Ok(location)
}

/// Builds the insert payload for a draft.
///
/// Moderation flags come from the reporter's posting privilege, critical
/// reports are always urgent, and text fields are trimmed. When the draft
/// has no address the location's resolved address is used, and failing
/// that its coordinates.
///
/// # Errors
///
/// Returns [`ComposeError`] if the draft is incomplete, no location is
/// available, the picked location is outside the report radius, or the
/// reporter may not create incidents.
pub fn compose(
    draft: &IncidentDraft,
    ctx: &SubmissionContext<'_>,
) -> Result<NewIncident, ComposeError> {
    if !urban_shield_permissions::has_permission(ctx.user_type, Permission::CanCreateIncidents) {
        return Err(ComposeError::NotPermitted {
            user_type: ctx.user_type,
        });
    }

    validate_draft(draft)?;
    let location = resolve_location(ctx)?;
    let point = location.point();

    let address = non_blank(&draft.address)
        .map_or_else(|| location.display_label(), ToString::to_string);

    let moderation = urban_shield_permissions::moderation_flags(ctx.user_type);
    let is_urgent = draft.is_urgent || draft.severity.forces_urgent();

    log::debug!(
        "Composed {} incident for {} reporter (moderated={}, urgent={is_urgent})",
        draft.severity,
        ctx.user_type,
        moderation.is_moderated
    );

    Ok(NewIncident {
        reporter_id: ctx.reporter_id,
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        category: draft.category,
        severity: draft.severity,
        address,
        landmark: draft
            .landmark
            .as_deref()
            .and_then(non_blank)
            .map(ToString::to_string),
        is_anonymous: draft.is_anonymous,
        is_urgent,
        is_rescue: draft.is_rescue,
        images: (!draft.image_urls.is_empty()).then(|| draft.image_urls.clone()),
        location: to_ewkt(point),
        status: IncidentStatus::Open,
        is_moderated: moderation.is_moderated,
        is_approved: moderation.is_approved,
        point,
    })
}
