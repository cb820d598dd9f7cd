//! The static user type table.

use urban_shield_user_models::{Permissions, PostingPrivilege, UserType, UserTypeConfig};

/// Position of the guest entry in [`USER_TYPE_CONFIGS`].
pub(crate) const GUEST_INDEX: usize = 5;

/// One entry per [`UserType`].
pub static USER_TYPE_CONFIGS: [UserTypeConfig; 7] = [
    UserTypeConfig {
        user_type: UserType::Parent,
        name: "Parent",
        description: "Concerned parent monitoring child safety",
        icon: "people",
        color: "#3B82F6",
        verification_required: true,
        posting_privilege: PostingPrivilege::Moderated,
        verified_area_only: false,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: false,
            can_access_analytics: false,
            can_manage_users: false,
            can_access_live_stream: true,
            can_create_announcements: false,
            can_edit_own_reports: false,
            can_mark_resolved: false,
            can_vote_flag: false,
            can_attach_external_docs: false,
            priority_level: 2,
        },
        features: &[
            "Report safety incidents",
            "View school zone alerts",
            "Track child safety",
            "Receive notifications",
            "View community updates",
        ],
        dashboard_tabs: &["Safety Alerts", "School Zones", "My Reports", "Community"],
        verification_requirements: &[
            "Location verification required",
            "Neighbors verification needed",
        ],
    },
    UserTypeConfig {
        user_type: UserType::Resident,
        name: "Verified Resident",
        description: "Local resident with verified address",
        icon: "home",
        color: "#10B981",
        verification_required: true,
        posting_privilege: PostingPrivilege::Immediate,
        verified_area_only: false,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: false,
            can_access_analytics: false,
            can_manage_users: false,
            can_access_live_stream: true,
            can_create_announcements: false,
            can_edit_own_reports: true,
            can_mark_resolved: true,
            can_vote_flag: true,
            can_attach_external_docs: false,
            priority_level: 3,
        },
        features: &[
            "Posts go live immediately",
            "Edit own reports",
            "Mark incidents resolved",
            "Vote and flag posts",
            "Priority in community",
        ],
        dashboard_tabs: &["Community", "My Reports", "Resolved Issues", "Voting"],
        verification_requirements: &["Local address verification", "Neighbors verification"],
    },
    // Business posts are limited to the verified area and go through
    // moderation like any other non-immediate tier.
    UserTypeConfig {
        user_type: UserType::Business,
        name: "Business Owner",
        description: "Local business owner with verified permits",
        icon: "business",
        color: "#F59E0B",
        verification_required: true,
        posting_privilege: PostingPrivilege::Moderated,
        verified_area_only: true,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: false,
            can_access_analytics: true,
            can_manage_users: false,
            can_access_live_stream: true,
            can_create_announcements: true,
            can_edit_own_reports: true,
            can_mark_resolved: false,
            can_vote_flag: true,
            can_attach_external_docs: false,
            priority_level: 4,
        },
        features: &[
            "Post hazards in verified area only",
            "Posts may be prioritized",
            "Cannot post outside verified zone",
            "Access business analytics",
            "Create area announcements",
        ],
        dashboard_tabs: &[
            "Business Safety",
            "Area Statistics",
            "My Reports",
            "Announcements",
        ],
        verification_requirements: &[
            "DTI permit required",
            "BIR permit required",
            "Business license verification",
        ],
    },
    UserTypeConfig {
        user_type: UserType::Government,
        name: "Government Official",
        description: "Verified government official with official credentials",
        icon: "shield",
        color: "#8B5CF6",
        verification_required: true,
        posting_privilege: PostingPrivilege::Immediate,
        verified_area_only: false,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: true,
            can_access_analytics: true,
            can_manage_users: true,
            can_access_live_stream: true,
            can_create_announcements: true,
            can_edit_own_reports: true,
            can_mark_resolved: true,
            can_vote_flag: true,
            can_attach_external_docs: true,
            priority_level: 5,
        },
        features: &[
            "Posts go live immediately",
            "Can attach external documents",
            "Posts may be prioritized",
            "Full incident management",
            "Access to all analytics",
            "Create official announcements",
        ],
        dashboard_tabs: &[
            "Incident Management",
            "Analytics",
            "Official Updates",
            "Emergency Center",
        ],
        verification_requirements: &[
            "Official ID verification (barangay captain/secretary)",
            "OR .gov.ph email domain",
            "Manual approval via admin dashboard",
        ],
    },
    UserTypeConfig {
        user_type: UserType::Tourist,
        name: "Tourist",
        description: "Visitor to the area",
        icon: "airplane",
        color: "#06B6D4",
        verification_required: false,
        posting_privilege: PostingPrivilege::Moderated,
        verified_area_only: false,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: false,
            can_access_analytics: false,
            can_manage_users: false,
            can_access_live_stream: true,
            can_create_announcements: false,
            can_edit_own_reports: false,
            can_mark_resolved: false,
            can_vote_flag: false,
            can_attach_external_docs: false,
            priority_level: 1,
        },
        features: &[
            "Report incidents for moderation",
            "View local safety information",
            "Access tourist safety tips",
            "Receive area notifications",
        ],
        dashboard_tabs: &["Safety Info", "My Reports", "Tourist Tips", "Area Alerts"],
        verification_requirements: &["Email verification only"],
    },
    UserTypeConfig {
        user_type: UserType::Guest,
        name: "Guest",
        description: "Anonymous visitor with limited access",
        icon: "person-outline",
        color: "#6B7280",
        verification_required: false,
        posting_privilege: PostingPrivilege::Moderated,
        verified_area_only: false,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: false,
            can_access_analytics: false,
            can_manage_users: false,
            can_access_live_stream: false,
            can_create_announcements: false,
            can_edit_own_reports: false,
            can_mark_resolved: false,
            can_vote_flag: false,
            can_attach_external_docs: false,
            priority_level: 0,
        },
        features: &[
            "View map only",
            "Submit posts for moderation",
            "Cannot comment or vote",
            "Limited access to features",
        ],
        dashboard_tabs: &["Map View", "Submit Report"],
        verification_requirements: &["No verification required"],
    },
    UserTypeConfig {
        user_type: UserType::Admin,
        name: "System Administrator",
        description: "System administrator with full verification and management capabilities",
        icon: "shield",
        color: "#DC2626",
        verification_required: true,
        posting_privilege: PostingPrivilege::Immediate,
        verified_area_only: false,
        permissions: Permissions {
            can_create_incidents: true,
            can_view_all_incidents: true,
            can_moderate_incidents: true,
            can_access_analytics: true,
            can_manage_users: true,
            can_access_live_stream: true,
            can_create_announcements: true,
            can_edit_own_reports: true,
            can_mark_resolved: true,
            can_vote_flag: true,
            can_attach_external_docs: true,
            priority_level: 10,
        },
        features: &[
            "Verify all incidents",
            "Full system management",
            "User management",
            "Analytics access",
            "Content moderation",
        ],
        dashboard_tabs: &[
            "Incident Management",
            "User Management",
            "Analytics",
            "System Settings",
        ],
        verification_requirements: &[
            "Manual admin approval required",
            "System administrator credentials",
        ],
    },
];
