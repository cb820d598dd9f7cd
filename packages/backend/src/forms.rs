//! Sign-in and sign-up form validation.
//!
//! Forms are checked before anything is sent. The messages are the ones
//! shown to the user.

use serde::Deserialize;
use thiserror::Error;
use urban_shield_user_models::UserType;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Why an auth form was not submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthValidationError {
    #[error("Please fill in all fields")]
    MissingSignInFields,

    #[error("Please fill in all required fields")]
    MissingSignUpFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    /// Only the signup user types may be chosen.
    #[error("{user_type} accounts cannot be created at signup")]
    UserTypeNotSelectable { user_type: UserType },
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Email and password sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// # Errors
    ///
    /// Returns [`AuthValidationError::MissingSignInFields`] if the email or
    /// password is empty.
    pub fn validate(&self) -> Result<(), AuthValidationError> {
        if is_blank(&self.email) || self.password.is_empty() {
            return Err(AuthValidationError::MissingSignInFields);
        }
        Ok(())
    }
}

/// Account creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub username: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default = "default_user_type")]
    pub user_type: UserType,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub business_license: Option<String>,
}

const fn default_user_type() -> UserType {
    UserType::LOWEST_PRIVILEGE
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            full_name: String::new(),
            username: String::new(),
            phone_number: None,
            user_type: default_user_type(),
            address: None,
            city: None,
            state: None,
            organization_name: None,
            organization_type: None,
            business_license: None,
        }
    }
}

impl SignUpForm {
    /// Checks required fields first, then password confirmation, then
    /// password length.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuthValidationError`] found.
    pub fn validate(&self) -> Result<(), AuthValidationError> {
        if is_blank(&self.email)
            || self.password.is_empty()
            || is_blank(&self.full_name)
            || is_blank(&self.username)
        {
            return Err(AuthValidationError::MissingSignUpFields);
        }

        if self.password != self.confirm_password {
            return Err(AuthValidationError::PasswordMismatch);
        }

        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthValidationError::PasswordTooShort);
        }

        if !self.user_type.is_signup_selectable() {
            return Err(AuthValidationError::UserTypeNotSelectable {
                user_type: self.user_type,
            });
        }

        Ok(())
    }
}

/// Trims an optional field, treating blank as absent.
pub(crate) fn optional(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up() -> SignUpForm {
        SignUpForm {
            email: "maria@example.ph".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            full_name: "Maria Santos".to_string(),
            username: "msantos".to_string(),
            user_type: UserType::Resident,
            ..SignUpForm::default()
        }
    }

    #[test]
    fn sign_in_requires_both_fields() {
        let form = SignInForm {
            email: "maria@example.ph".to_string(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(AuthValidationError::MissingSignInFields));
        assert_eq!(
            AuthValidationError::MissingSignInFields.to_string(),
            "Please fill in all fields"
        );

        let form = SignInForm {
            password: "x".to_string(),
            ..form
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn valid_sign_up_passes() {
        assert!(sign_up().validate().is_ok());
    }

    #[test]
    fn sign_up_requires_fields() {
        let form = SignUpForm {
            username: "  ".to_string(),
            ..sign_up()
        };
        assert_eq!(form.validate(), Err(AuthValidationError::MissingSignUpFields));
    }

    #[test]
    fn passwords_must_match_before_length_is_checked() {
        let form = SignUpForm {
            password: "abc".to_string(),
            confirm_password: "abd".to_string(),
            ..sign_up()
        };
        assert_eq!(form.validate(), Err(AuthValidationError::PasswordMismatch));

        let form = SignUpForm {
            password: "abcde".to_string(),
            confirm_password: "abcde".to_string(),
            ..sign_up()
        };
        assert_eq!(form.validate(), Err(AuthValidationError::PasswordTooShort));
        assert_eq!(
            AuthValidationError::PasswordTooShort.to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn admin_cannot_sign_up() {
        let form = SignUpForm {
            user_type: UserType::Admin,
            ..sign_up()
        };
        assert_eq!(
            form.validate(),
            Err(AuthValidationError::UserTypeNotSelectable {
                user_type: UserType::Admin
            })
        );
    }

    #[test]
    fn deserializes_with_guest_default() {
        let form: SignUpForm = serde_json::from_value(serde_json::json!({
            "email": "a@b.c",
            "password": "secret1",
            "confirmPassword": "secret1",
            "fullName": "A B",
            "username": "ab"
        }))
        .unwrap();
        assert_eq!(form.user_type, UserType::Guest);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn optional_fields_drop_blanks() {
        assert_eq!(optional(Some(&"  ".to_string())), None);
        assert_eq!(optional(Some(&" Cebu ".to_string())).as_deref(), Some("Cebu"));
        assert_eq!(optional(None), None);
    }
}
