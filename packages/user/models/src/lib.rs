#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! User type, posting privilege and permission flag definitions.
//!
//! Every account has exactly one [`UserType`]. The static configuration
//! for each type (display metadata, permission flags, posting privilege)
//! lives in `urban_shield_permissions`; this crate only defines the shapes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of account a user holds.
///
/// The six signup values are listed in [`UserType::SIGNUP`]. `Admin` is a
/// back-office type that exists in the configuration table but cannot be
/// chosen when signing up.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum UserType {
    /// Parent monitoring child safety.
    Parent,
    /// Local resident with a verified address.
    Resident,
    /// Business owner with verified permits.
    Business,
    /// Government official with official credentials.
    Government,
    /// Visitor to the area.
    Tourist,
    /// Anonymous visitor with limited access.
    Guest,
    /// System administrator (web back office only).
    Admin,
}

impl UserType {
    /// User types selectable on the signup form.
    pub const SIGNUP: &'static [Self] = &[
        Self::Parent,
        Self::Resident,
        Self::Business,
        Self::Government,
        Self::Tourist,
        Self::Guest,
    ];

    /// The type every unrecognized value resolves to.
    pub const LOWEST_PRIVILEGE: Self = Self::Guest;

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Parent,
            Self::Resident,
            Self::Business,
            Self::Government,
            Self::Tourist,
            Self::Guest,
            Self::Admin,
        ]
    }

    /// Parses a stored user type, resolving anything unrecognized to
    /// [`UserType::LOWEST_PRIVILEGE`].
    ///
    /// Profiles created through older signup paths may carry values such
    /// as `community_member` that are not part of the table.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::LOWEST_PRIVILEGE)
    }

    /// Whether this type can be chosen on the signup form.
    #[must_use]
    pub fn is_signup_selectable(self) -> bool {
        Self::SIGNUP.contains(&self)
    }
}

/// Whether a user's new incidents are published right away or queued for
/// moderation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostingPrivilege {
    /// Published immediately (auto-approved).
    Immediate,
    /// Queued for a moderator before becoming visible.
    Moderated,
}

impl PostingPrivilege {
    /// Moderation state a freshly created incident starts in.
    #[must_use]
    pub const fn moderation_flags(self) -> ModerationFlags {
        match self {
            Self::Immediate => ModerationFlags {
                is_moderated: false,
                is_approved: true,
            },
            Self::Moderated => ModerationFlags {
                is_moderated: true,
                is_approved: false,
            },
        }
    }
}

/// Moderation state stored on an incident row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationFlags {
    /// The incident is waiting in the moderation queue.
    pub is_moderated: bool,
    /// The incident is visible to everyone.
    pub is_approved: bool,
}

/// Account verification state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VerificationStatus {
    /// Submitted, not yet reviewed.
    Pending,
    /// Approved by a reviewer.
    Verified,
    /// Rejected by a reviewer.
    Rejected,
    /// Previously verified, now suspended.
    Suspended,
}

/// A single boolean capability flag.
///
/// Parses from and displays as the flag's camelCase name
/// (e.g. `canCreateIncidents`).
#[derive(
    Debug,
    Clone,
    Copy,
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Permission {
    /// May submit incident reports.
    CanCreateIncidents,
    /// May see incidents from all users.
    CanViewAllIncidents,
    /// May approve or reject queued incidents.
    CanModerateIncidents,
    /// May open analytics dashboards.
    CanAccessAnalytics,
    /// May manage other accounts.
    CanManageUsers,
    /// May watch live streams.
    CanAccessLiveStream,
    /// May publish area announcements.
    CanCreateAnnouncements,
    /// May edit reports they authored.
    CanEditOwnReports,
    /// May mark incidents resolved.
    CanMarkResolved,
    /// May vote on and flag posts.
    CanVoteFlag,
    /// May attach external documents to reports.
    CanAttachExternalDocs,
}

impl Permission {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CanCreateIncidents,
            Self::CanViewAllIncidents,
            Self::CanModerateIncidents,
            Self::CanAccessAnalytics,
            Self::CanManageUsers,
            Self::CanAccessLiveStream,
            Self::CanCreateAnnouncements,
            Self::CanEditOwnReports,
            Self::CanMarkResolved,
            Self::CanVoteFlag,
            Self::CanAttachExternalDocs,
        ]
    }
}

/// The permission set attached to a user type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    pub can_create_incidents: bool,
    pub can_view_all_incidents: bool,
    pub can_moderate_incidents: bool,
    pub can_access_analytics: bool,
    pub can_manage_users: bool,
    pub can_access_live_stream: bool,
    pub can_create_announcements: bool,
    pub can_edit_own_reports: bool,
    pub can_mark_resolved: bool,
    pub can_vote_flag: bool,
    pub can_attach_external_docs: bool,
    /// Ordering weight for feeds; higher is more prominent.
    pub priority_level: u8,
}

impl Permissions {
    /// Reads a single flag.
    #[must_use]
    pub const fn get(&self, permission: Permission) -> bool {
        match permission {
            Permission::CanCreateIncidents => self.can_create_incidents,
            Permission::CanViewAllIncidents => self.can_view_all_incidents,
            Permission::CanModerateIncidents => self.can_moderate_incidents,
            Permission::CanAccessAnalytics => self.can_access_analytics,
            Permission::CanManageUsers => self.can_manage_users,
            Permission::CanAccessLiveStream => self.can_access_live_stream,
            Permission::CanCreateAnnouncements => self.can_create_announcements,
            Permission::CanEditOwnReports => self.can_edit_own_reports,
            Permission::CanMarkResolved => self.can_mark_resolved,
            Permission::CanVoteFlag => self.can_vote_flag,
            Permission::CanAttachExternalDocs => self.can_attach_external_docs,
        }
    }

    /// Flags that are set, in declaration order.
    #[must_use]
    pub fn granted(&self) -> Vec<Permission> {
        Permission::all()
            .iter()
            .copied()
            .filter(|p| self.get(*p))
            .collect()
    }
}

/// Static configuration for one user type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeConfig {
    /// The type this configuration belongs to.
    pub user_type: UserType,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// Accent color as `#RRGGBB`.
    pub color: &'static str,
    /// Whether the account must be verified before its privileges apply.
    pub verification_required: bool,
    /// Whether new incidents publish immediately.
    pub posting_privilege: PostingPrivilege,
    /// Reports are only accepted inside the account's verified area.
    pub verified_area_only: bool,
    /// Capability flags.
    pub permissions: Permissions,
    /// Feature bullet points shown on the dashboard.
    pub features: &'static [&'static str],
    /// Dashboard tab titles.
    pub dashboard_tabs: &'static [&'static str],
    /// What an applicant must provide to get verified.
    pub verification_requirements: &'static [&'static str],
}
