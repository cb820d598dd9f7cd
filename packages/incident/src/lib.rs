#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident submission and display.
//!
//! * [`compose`] turns an [`IncidentDraft`](urban_shield_incident_models::IncidentDraft)
//!   into an insert payload: moderation flags from the reporter's posting
//!   privilege, forced urgency for critical reports, and the chosen
//!   location checked against the report radius.
//! * [`store`] is the boundary to the backend that persists incidents.
//! * [`map`] turns persisted incidents into map markers and defines the
//!   renderer capability the front ends implement.

pub mod compose;
pub mod map;
pub mod store;

pub use compose::{ComposeError, SubmissionContext, compose, validate_draft};
pub use store::{IncidentStore, SubmitError, submit};
