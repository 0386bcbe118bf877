use crate::user::models::User;

/// Outcome of an authorization check. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Ownership-or-admin rule.
///
/// The single policy gating every operation on per-user data: a requester
/// may act on a target iff they are the target or hold the admin bit.
/// There is no richer role model. Deny maps to 403, never 401.
pub fn authorize(requester: &User, target_username: &str) -> Decision {
    if requester.is_admin || requester.username.as_str() == target_username {
        Decision::Allow
    } else {
        Decision::Deny
    }
}
