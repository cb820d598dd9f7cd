#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the hosted backend (Supabase: `PostgREST` plus `GoTrue`
//! auth).
//!
//! All persistence goes through [`SupabaseClient`]. Rejections from the
//! backend keep the backend's own message so it can be shown to the user
//! unchanged.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |---|---|---|
//! | `SUPABASE_URL` | Yes | Project URL, e.g. `https://abc.supabase.co` |
//! | `SUPABASE_ANON_KEY` | Yes | Public anon API key |

pub mod auth;
pub mod client;
pub mod forms;
pub mod incidents;

use thiserror::Error;

pub use auth::{AuthUser, Profile, ProfileUpdate, Session, SignUpOutcome};
pub use client::SupabaseClient;
pub use forms::{AuthValidationError, SignInForm, SignUpForm};
pub use incidents::LikeAction;

/// Errors from backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Missing required environment variable.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Name of the missing environment variable.
        name: String,
    },

    /// HTTP request failed before the backend answered.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend refused the request.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The backend's own message.
        message: String,
    },

    /// The requested username belongs to another profile.
    #[error("Username already taken. Please choose another one.")]
    UsernameTaken,

    /// The auth account was created but the profile row was not.
    #[error("Failed to create user profile. Please try again.")]
    ProfileCreation {
        /// The backend's message, for logs.
        message: String,
    },

    /// The operation needs a signed-in session.
    #[error("You must be signed in to do that")]
    NotSignedIn,

    /// A response did not have the expected shape.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// What was missing or malformed.
        message: String,
    },

    /// Form input failed validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] AuthValidationError),
}

/// Connection settings for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// Project URL without a trailing slash.
    pub url: String,
    /// Public anon API key.
    pub anon_key: String,
}

impl SupabaseConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingEnv`] if either is unset or empty.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`Self::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingEnv`] if either variable is missing
    /// or empty.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BackendError> {
        let var = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| BackendError::MissingEnv {
                    name: name.to_string(),
                })
        };

        Ok(Self::new(var("SUPABASE_URL")?, var("SUPABASE_ANON_KEY")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_vars() {
        let config = SupabaseConfig::from_vars(|name| match name {
            "SUPABASE_URL" => Some("https://demo.supabase.co/".to_string()),
            "SUPABASE_ANON_KEY" => Some("anon".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.anon_key, "anon");
    }

    #[test]
    fn missing_or_blank_vars_are_reported_by_name() {
        let err = SupabaseConfig::from_vars(|name| {
            (name == "SUPABASE_URL").then(|| "https://demo.supabase.co".to_string())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variable: SUPABASE_ANON_KEY");

        let err = SupabaseConfig::from_vars(|_| Some("  ".to_string())).unwrap_err();
        assert!(matches!(err, BackendError::MissingEnv { name } if name == "SUPABASE_URL"));
    }

    #[test]
    fn rejections_display_the_backend_message_only() {
        let err = BackendError::Rejected {
            status: 400,
            message: "Invalid login credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
