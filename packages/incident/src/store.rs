//! Boundary to the backend that persists incidents.

use thiserror::Error;
use urban_shield_incident_models::{Incident, IncidentDraft, NewIncident};

use crate::compose::{ComposeError, SubmissionContext, compose};

/// Something that can persist and list incidents.
///
/// Implementations report failures through their own error type; its
/// `Display` text is shown to the user unchanged.
#[async_trait::async_trait]
pub trait IncidentStore: Send + Sync {
    /// Error returned by the backend.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persists a new incident and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the backend rejects the insert.
    async fn insert_incident(&self, incident: &NewIncident) -> Result<Incident, Self::Error>;

    /// Lists incidents, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the query fails.
    async fn list_incidents(&self) -> Result<Vec<Incident>, Self::Error>;
}

/// Why a submission did not go through.
#[derive(Debug, Error)]
pub enum SubmitError<E: std::error::Error + 'static> {
    /// The draft failed validation before anything was sent.
    #[error(transparent)]
    Invalid(#[from] ComposeError),

    /// The backend rejected the insert.
    #[error(transparent)]
    Backend(E),
}

/// Composes `draft` and inserts it, exactly once.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] if composition fails, or
/// [`SubmitError::Backend`] carrying the backend's own error if the insert
/// is rejected.
pub async fn submit<S: IncidentStore + ?Sized>(
    store: &S,
    draft: &IncidentDraft,
    ctx: &SubmissionContext<'_>,
) -> Result<Incident, SubmitError<S::Error>> {
    let new_incident = compose(draft, ctx)?;

    match store.insert_incident(&new_incident).await {
        Ok(stored) => {
            log::info!(
                "Submitted incident {} ({}, {})",
                stored.id,
                stored.category,
                if new_incident.is_approved {
                    "published"
                } else {
                    "queued for moderation"
                }
            );
            Ok(stored)
        }
        Err(e) => {
            log::error!("Incident submission rejected: {e}");
            Err(SubmitError::Backend(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use urban_shield_geography_models::LocationData;
    use urban_shield_incident_models::{IncidentSeverity, IncidentStatus};
    use urban_shield_user_models::UserType;
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct FakeBackendError(String);

    #[derive(Default)]
    struct FakeStore {
        inserted: Mutex<Vec<NewIncident>>,
        reject_with: Option<String>,
    }

    #[async_trait::async_trait]
    impl IncidentStore for FakeStore {
        type Error = FakeBackendError;

        async fn insert_incident(&self, incident: &NewIncident) -> Result<Incident, Self::Error> {
            self.inserted.lock().unwrap().push(incident.clone());
            if let Some(message) = &self.reject_with {
                return Err(FakeBackendError(message.clone()));
            }
            Ok(Incident {
                id: Uuid::new_v4(),
                reporter_id: Some(incident.reporter_id),
                title: incident.title.clone(),
                description: incident.description.clone(),
                category: incident.category,
                severity: incident.severity,
                status: IncidentStatus::Open,
                address: Some(incident.address.clone()),
                landmark: incident.landmark.clone(),
                is_anonymous: incident.is_anonymous,
                is_urgent: incident.is_urgent,
                is_rescue: incident.is_rescue,
                images: incident.images.clone(),
                location: Some(serde_json::Value::String(incident.location.clone())),
                views_count: 0,
                likes_count: 0,
                comments_count: 0,
                is_verified: false,
                is_moderated: incident.is_moderated,
                is_approved: incident.is_approved,
                created_at: Utc::now(),
                reporter_name: None,
            })
        }

        async fn list_incidents(&self) -> Result<Vec<Incident>, Self::Error> {
            Ok(Vec::new())
        }
    }

    fn draft() -> IncidentDraft {
        IncidentDraft {
            severity: IncidentSeverity::Critical,
            title: "Landslide blocking road".to_string(),
            description: "Road to Busay fully blocked".to_string(),
            address: "Busay, Cebu City".to_string(),
            ..IncidentDraft::default()
        }
    }

    #[tokio::test]
    async fn inserts_composed_incident_once() {
        let store = FakeStore::default();
        let here = LocationData::new(10.3157, 123.8854);
        let ctx = SubmissionContext::new(Uuid::new_v4(), UserType::Guest)
            .with_current_location(Some(&here));

        let stored = submit(&store, &draft(), &ctx).await.unwrap();
        assert!(stored.is_urgent);
        assert!(stored.is_moderated);

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].reporter_id, ctx.reporter_id);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_backend() {
        let store = FakeStore::default();
        let ctx = SubmissionContext::new(Uuid::new_v4(), UserType::Guest);

        let err = submit(&store, &draft(), &ctx).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ComposeError::MissingLocation)));
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn backend_rejection_is_surfaced_verbatim_without_retry() {
        let message = "new row violates row-level security policy for table \"incidents\"";
        let store = FakeStore {
            reject_with: Some(message.to_string()),
            ..FakeStore::default()
        };
        let here = LocationData::new(10.3157, 123.8854);
        let ctx = SubmissionContext::new(Uuid::new_v4(), UserType::Resident)
            .with_current_location(Some(&here));

        let err = submit(&store, &draft(), &ctx).await.unwrap_err();
        assert_eq!(err.to_string(), message);
        assert_eq!(store.inserted.lock().unwrap().len(), 1);
    }
}
