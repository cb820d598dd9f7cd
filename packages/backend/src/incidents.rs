//! Incident rows and likes.

use reqwest::Method;
use strum_macros::Display;
use urban_shield_incident::IncidentStore;
use urban_shield_incident_models::{Incident, NewIncident};
use uuid::Uuid;

use crate::client::{expect_success, read_json};
use crate::{BackendError, SupabaseClient};

/// Feed function returning incidents joined with reporter names.
const FEED_RPC: &str = "get_incidents_with_user_info";

/// Columns read when the feed function is unavailable.
const INCIDENT_COLUMNS: &str = "id,reporter_id,title,description,category,severity,status,\
address,landmark,is_anonymous,is_urgent,is_rescue,images,views_count,likes_count,\
comments_count,is_verified,is_moderated,is_approved,created_at,location";

/// What [`SupabaseClient::toggle_like`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LikeAction {
    Liked,
    Unliked,
}

impl SupabaseClient {
    /// Inserts an incident and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns the backend's rejection unchanged (for example a row-level
    /// security violation), or [`BackendError::UnexpectedResponse`] if no
    /// row comes back.
    pub async fn insert_incident(&self, incident: &NewIncident) -> Result<Incident, BackendError> {
        let resp = self
            .rest(Method::POST, "incidents")
            .header("Prefer", "return=representation")
            .json(incident)
            .send()
            .await?;

        let rows: Vec<Incident> = read_json(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::UnexpectedResponse {
                message: "incident insert returned no row".to_string(),
            })
    }

    /// Lists incidents, newest first.
    ///
    /// Uses the feed function, which includes reporter names, and falls
    /// back to reading the table directly if the function fails.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the direct query fails too.
    pub async fn list_incidents(&self) -> Result<Vec<Incident>, BackendError> {
        let feed = match self.call_rpc(FEED_RPC, &serde_json::json!({})).await {
            Ok(value) => serde_json::from_value::<Vec<Incident>>(value).map_err(Into::into),
            Err(e) => Err(e),
        };

        match feed {
            Ok(mut incidents) => {
                incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                return Ok(incidents);
            }
            Err(e) => log::warn!("{FEED_RPC} failed, reading incidents directly: {e}"),
        }

        let resp = self
            .rest(Method::GET, "incidents")
            .query(&[("select", INCIDENT_COLUMNS), ("order", "created_at.desc")])
            .send()
            .await?;
        read_json(resp).await
    }

    /// Likes an incident as the signed-in user, or removes the like if one
    /// exists, then adjusts the incident's like counter.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotSignedIn`] without a session, or the
    /// backend's rejection of the like insert or delete. Counter update
    /// failures are logged only.
    pub async fn toggle_like(&self, incident_id: Uuid) -> Result<LikeAction, BackendError> {
        let user_id = self.require_session()?.user.id;
        let filter = [
            ("incident_id", format!("eq.{incident_id}")),
            ("user_id", format!("eq.{user_id}")),
        ];

        let resp = self
            .rest(Method::GET, "likes")
            .query(&[("select", "id")])
            .query(&filter)
            .send()
            .await?;
        let existing: Vec<serde_json::Value> = read_json(resp).await?;

        let (action, counter_rpc) = if existing.is_empty() {
            let resp = self
                .rest(Method::POST, "likes")
                .json(&serde_json::json!({
                    "incident_id": incident_id,
                    "user_id": user_id,
                }))
                .send()
                .await?;
            expect_success(resp).await?;
            (LikeAction::Liked, "increment_likes_count")
        } else {
            let resp = self
                .rest(Method::DELETE, "likes")
                .query(&filter)
                .send()
                .await?;
            expect_success(resp).await?;
            (LikeAction::Unliked, "decrement_likes_count")
        };

        if let Err(e) = self
            .call_rpc(counter_rpc, &serde_json::json!({ "incident_id": incident_id }))
            .await
        {
            log::warn!("{counter_rpc} failed for {incident_id}: {e}");
        }

        Ok(action)
    }
}

#[async_trait::async_trait]
impl IncidentStore for SupabaseClient {
    type Error = BackendError;

    async fn insert_incident(&self, incident: &NewIncident) -> Result<Incident, Self::Error> {
        Self::insert_incident(self, incident).await
    }

    async fn list_incidents(&self) -> Result<Vec<Incident>, Self::Error> {
        Self::list_incidents(self).await
    }
}
