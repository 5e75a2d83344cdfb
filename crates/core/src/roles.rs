//! Well-known role name constants.
//!
//! Roles are stored as plain strings on the user record, so values outside
//! this list are tolerated; these are the ones the client knows how to route.

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_GATEKEEPER: &str = "gatekeeper";

/// All roles the client understands.
pub const KNOWN_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_MODERATOR, ROLE_GATEKEEPER];

/// Whether `role` is one of [`KNOWN_ROLES`].
pub fn is_known_role(role: &str) -> bool {
    KNOWN_ROLES.contains(&role)
}
