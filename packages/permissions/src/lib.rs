#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User type configuration table and permission resolver.
//!
//! The table is static and every [`UserType`] maps to exactly one entry.
//! Lookups never fail: raw strings that do not name a known type resolve
//! to the guest entry, which carries the lowest privileges.

mod table;

use urban_shield_user_models::{
    ModerationFlags, Permission, PostingPrivilege, UserType, UserTypeConfig,
};

pub use table::USER_TYPE_CONFIGS;

/// Returns the configuration for a user type.
#[must_use]
pub fn get_config(user_type: UserType) -> &'static UserTypeConfig {
    USER_TYPE_CONFIGS
        .iter()
        .find(|config| config.user_type == user_type)
        .unwrap_or(&USER_TYPE_CONFIGS[table::GUEST_INDEX])
}

/// Returns the configuration for a user type stored as a raw string.
///
/// Unknown values resolve to the guest configuration.
#[must_use]
pub fn get_config_raw(raw: &str) -> &'static UserTypeConfig {
    let user_type = UserType::from_raw(raw);
    if user_type == UserType::LOWEST_PRIVILEGE && !raw.trim().eq_ignore_ascii_case("guest") {
        log::debug!("Unknown user type '{raw}', using guest permissions");
    }
    get_config(user_type)
}

/// The lowest-privilege configuration.
#[must_use]
pub fn default_config() -> &'static UserTypeConfig {
    get_config(UserType::LOWEST_PRIVILEGE)
}

/// Reads a single permission flag for a user type.
#[must_use]
pub fn has_permission(user_type: UserType, permission: Permission) -> bool {
    get_config(user_type).permissions.get(permission)
}

/// Reads a permission flag by its camelCase name.
///
/// Returns `None` when the flag name is not recognized.
#[must_use]
pub fn has_permission_named(user_type: UserType, flag_name: &str) -> Option<bool> {
    let permission = flag_name.parse::<Permission>().ok()?;
    Some(has_permission(user_type, permission))
}

/// Whether new incidents from this user type publish immediately.
#[must_use]
pub fn get_posting_privilege(user_type: UserType) -> PostingPrivilege {
    get_config(user_type).posting_privilege
}

/// `true` exactly when [`get_posting_privilege`] is
/// [`PostingPrivilege::Immediate`].
#[must_use]
pub fn can_post_immediately(user_type: UserType) -> bool {
    get_posting_privilege(user_type) == PostingPrivilege::Immediate
}

/// `true` exactly when [`get_posting_privilege`] is
/// [`PostingPrivilege::Moderated`].
#[must_use]
pub fn can_post_with_moderation(user_type: UserType) -> bool {
    get_posting_privilege(user_type) == PostingPrivilege::Moderated
}

/// Whether reports from this user type are limited to its verified area.
#[must_use]
pub fn is_restricted_to_verified_area(user_type: UserType) -> bool {
    get_config(user_type).verified_area_only
}

/// Moderation state a new incident from this user type starts in.
#[must_use]
pub fn moderation_flags(user_type: UserType) -> ModerationFlags {
    get_posting_privilege(user_type).moderation_flags()
}

/// Whether this user type requires account verification.
#[must_use]
pub fn requires_verification(user_type: UserType) -> bool {
    get_config(user_type).verification_required
}

/// What an applicant of this user type must provide to get verified.
#[must_use]
pub fn verification_requirements(user_type: UserType) -> &'static [&'static str] {
    get_config(user_type).verification_requirements
}

/// Accent color for this user type.
#[must_use]
pub fn color(user_type: UserType) -> &'static str {
    get_config(user_type).color
}

/// Icon name for this user type.
#[must_use]
pub fn icon(user_type: UserType) -> &'static str {
    get_config(user_type).icon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_user_type_has_exactly_one_config() {
        for user_type in UserType::all() {
            let matches = USER_TYPE_CONFIGS
                .iter()
                .filter(|c| c.user_type == *user_type)
                .count();
            assert_eq!(matches, 1, "{user_type} has {matches} configs");
            assert_eq!(get_config(*user_type).user_type, *user_type);
        }
        assert_eq!(USER_TYPE_CONFIGS.len(), UserType::all().len());
    }

    #[test]
    fn unknown_raw_values_get_the_lowest_privilege_config() {
        for raw in ["community_member", "", "superuser", "ADMINISTRATOR"] {
            let config = get_config_raw(raw);
            assert_eq!(config.user_type, UserType::Guest, "raw value {raw:?}");
        }
        assert_eq!(get_config_raw("Government").user_type, UserType::Government);
    }

    #[test]
    fn guest_is_the_lowest_privilege() {
        let guest = default_config();
        for config in &USER_TYPE_CONFIGS {
            assert!(config.permissions.priority_level >= guest.permissions.priority_level);
            assert!(config.permissions.granted().len() >= guest.permissions.granted().len());
        }
    }

    #[test]
    fn immediate_posting_agrees_with_privilege() {
        for user_type in UserType::all() {
            assert_eq!(
                can_post_immediately(*user_type),
                get_posting_privilege(*user_type) == PostingPrivilege::Immediate,
                "{user_type}"
            );
            assert_ne!(
                can_post_immediately(*user_type),
                can_post_with_moderation(*user_type)
            );
        }
    }

    #[test]
    fn posting_tiers() {
        assert!(can_post_immediately(UserType::Government));
        assert!(can_post_immediately(UserType::Resident));
        assert!(can_post_immediately(UserType::Admin));
        assert!(!can_post_immediately(UserType::Guest));
        assert!(!can_post_immediately(UserType::Tourist));
        assert!(!can_post_immediately(UserType::Parent));
        assert!(!can_post_immediately(UserType::Business));
        assert!(is_restricted_to_verified_area(UserType::Business));
    }

    #[test]
    fn single_flag_lookups() {
        assert!(has_permission(UserType::Government, Permission::CanModerateIncidents));
        assert!(!has_permission(UserType::Guest, Permission::CanAccessLiveStream));
        assert!(has_permission(UserType::Business, Permission::CanCreateAnnouncements));
        assert_eq!(
            has_permission_named(UserType::Resident, "canMarkResolved"),
            Some(true)
        );
        assert_eq!(has_permission_named(UserType::Resident, "canFly"), None);
    }

    #[test]
    fn moderation_flags_follow_the_tier() {
        let guest = moderation_flags(UserType::Guest);
        assert!(guest.is_moderated && !guest.is_approved);
        let government = moderation_flags(UserType::Government);
        assert!(!government.is_moderated && government.is_approved);
    }

    #[test]
    fn verification_metadata() {
        assert!(requires_verification(UserType::Government));
        assert!(!requires_verification(UserType::Tourist));
        assert_eq!(verification_requirements(UserType::Guest), ["No verification required"]);
        assert_eq!(color(UserType::Admin), "#DC2626");
        assert_eq!(icon(UserType::Guest), "person-outline");
    }
}
