//! Accounts, sessions and profiles.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use urban_shield_user_models::UserType;
use uuid::Uuid;

use crate::client::{expect_success, read_json};
use crate::forms::optional;
use crate::{BackendError, SignInForm, SignUpForm, SupabaseClient};

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// An auth account.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// A row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, rename = "user_type")]
    pub raw_user_type: Option<String>,
}

impl Profile {
    /// The profile's user type. Unknown or missing values resolve to the
    /// lowest-privilege type.
    #[must_use]
    pub fn user_type(&self) -> UserType {
        UserType::from_raw(self.raw_user_type.as_deref().unwrap_or_default())
    }
}

/// Fields a user may change on their profile. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Serialize)]
struct ProfilePatch<'a> {
    #[serde(flatten)]
    update: &'a ProfileUpdate,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ProfileInsert<'a> {
    id: Uuid,
    email: &'a str,
    full_name: &'a str,
    username: &'a str,
    phone_number: Option<String>,
    user_type: UserType,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    organization_name: Option<String>,
    organization_type: Option<String>,
    business_license: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> ProfileInsert<'a> {
    fn new(id: Uuid, form: &'a SignUpForm) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: form.email.trim(),
            full_name: form.full_name.trim(),
            username: form.username.trim(),
            phone_number: optional(form.phone_number.as_ref()),
            user_type: form.user_type,
            address: optional(form.address.as_ref()),
            city: optional(form.city.as_ref()),
            state: optional(form.state.as_ref()),
            organization_name: optional(form.organization_name.as_ref()),
            organization_type: optional(form.organization_type.as_ref()),
            business_license: optional(form.business_license.as_ref()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Result of a successful signup. `session` is absent when the project
/// requires email confirmation before the first sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<Session>,
}

/// The signup endpoint answers with a session when confirmation is off,
/// and with the bare user (sometimes wrapped in `user`) when it is on.
fn parse_sign_up(body: serde_json::Value) -> Result<SignUpOutcome, BackendError> {
    if body.get("access_token").is_some() {
        let session: Session = serde_json::from_value(body)?;
        return Ok(SignUpOutcome {
            user: session.user.clone(),
            session: Some(session),
        });
    }

    let user = if let Some(user) = body.get("user").filter(|u| u.is_object()) {
        user.clone()
    } else if body.get("id").is_some() {
        body
    } else {
        return Err(BackendError::UnexpectedResponse {
            message: "Failed to create user".to_string(),
        });
    };

    Ok(SignUpOutcome {
        user: serde_json::from_value(user)?,
        session: None,
    })
}

impl SupabaseClient {
    /// Signs in with email and password.
    ///
    /// A missing profile row is logged but does not fail the sign-in.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Invalid`] if the form is incomplete, or the
    /// backend's rejection (e.g. "Invalid login credentials").
    pub async fn sign_in(&self, form: &SignInForm) -> Result<Session, BackendError> {
        form.validate()?;

        let resp = self
            .auth(Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({
                "email": form.email.trim(),
                "password": form.password,
            }))
            .send()
            .await?;
        let session: Session = read_json(resp).await?;
        log::info!("Signed in as {}", session.user.id);

        let signed_in = self.clone().with_session(session.clone());
        match signed_in.profile(session.user.id).await {
            Ok(Some(_)) => {}
            Ok(None) => log::warn!("Profile not found after sign in for {}", session.user.id),
            Err(e) => log::warn!("Could not verify profile after sign in: {e}"),
        }

        Ok(session)
    }

    /// Creates an account: checks the username is free, creates the auth
    /// user, then inserts the profile row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Invalid`] if the form fails validation,
    /// [`BackendError::UsernameTaken`] if the username is in use,
    /// [`BackendError::ProfileCreation`] if the profile insert fails, or
    /// the backend's rejection of the auth signup.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<SignUpOutcome, BackendError> {
        form.validate()?;

        let username = form.username.trim();
        if self.username_taken(username, None).await? {
            return Err(BackendError::UsernameTaken);
        }

        let resp = self
            .auth(Method::POST, "signup")
            .json(&serde_json::json!({
                "email": form.email.trim(),
                "password": form.password,
                "data": {
                    "full_name": form.full_name.trim(),
                    "username": username,
                },
            }))
            .send()
            .await?;
        let outcome = parse_sign_up(read_json(resp).await?)?;
        log::info!("Created auth user {}", outcome.user.id);

        let writer = outcome
            .session
            .clone()
            .map_or_else(|| self.clone(), |s| self.clone().with_session(s));
        let resp = writer
            .rest(Method::POST, "profiles")
            .json(&ProfileInsert::new(outcome.user.id, form))
            .send()
            .await?;
        if let Err(e) = expect_success(resp).await {
            log::error!("Profile creation failed for {}: {e}", outcome.user.id);
            return Err(BackendError::ProfileCreation {
                message: e.to_string(),
            });
        }

        Ok(outcome)
    }

    /// Ends the current session. Does nothing for an anonymous client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the backend rejects the sign-out.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        if self.session().is_none() {
            return Ok(());
        }
        let resp = self.auth(Method::POST, "logout").send().await?;
        expect_success(resp).await
    }

    /// The signed-in user, or `None` if there is no valid session.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request fails for a reason other
    /// than an invalid or expired session.
    pub async fn current_user(&self) -> Result<Option<AuthUser>, BackendError> {
        if self.session().is_none() {
            return Ok(None);
        }
        let resp = self.auth(Method::GET, "user").send().await?;
        match read_json(resp).await {
            Ok(user) => Ok(Some(user)),
            Err(BackendError::Rejected {
                status: 401 | 403, ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetches a profile by user id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the query fails.
    pub async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>, BackendError> {
        let resp = self
            .rest(Method::GET, "profiles")
            .query(&[
                ("select", "*".to_string()),
                ("id", format!("eq.{user_id}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        let rows: Vec<Profile> = read_json(resp).await?;
        Ok(rows.into_iter().next())
    }

    /// Whether `username` belongs to a profile other than `excluding`.
    async fn username_taken(
        &self,
        username: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, BackendError> {
        let mut query = vec![
            ("select", "username".to_string()),
            ("username", format!("eq.{username}")),
            ("limit", "1".to_string()),
        ];
        if let Some(id) = excluding {
            query.push(("id", format!("neq.{id}")));
        }

        let resp = self.rest(Method::GET, "profiles").query(&query).send().await?;
        let rows: Vec<serde_json::Value> = read_json(resp).await?;
        Ok(!rows.is_empty())
    }

    /// Updates the signed-in user's profile and returns the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotSignedIn`] without a session,
    /// [`BackendError::UsernameTaken`] if a new username is in use, or the
    /// backend's rejection.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, BackendError> {
        let user_id = self.require_session()?.user.id;

        if let Some(username) = update.username.as_deref() {
            if self.username_taken(username.trim(), Some(user_id)).await? {
                return Err(BackendError::UsernameTaken);
            }
        }

        let resp = self
            .rest(Method::PATCH, "profiles")
            .query(&[("id", format!("eq.{user_id}"))])
            .header("Prefer", "return=representation")
            .json(&ProfilePatch {
                update,
                updated_at: Utc::now(),
            })
            .send()
            .await?;
        let rows: Vec<Profile> = read_json(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::UnexpectedResponse {
                message: format!("no profile row for {user_id}"),
            })
    }
}
