//! Capability checks for protected actions.
//!
//! Pure functions of the session: no session denies everything, a superuser
//! is allowed everything, otherwise the capability code must be held.

use crate::error::Denied;
use crate::model::Session;

/// Well-known capability codes used by the console.
pub mod codes {
    pub const USER_VIEW: &str = "user.view";
    pub const USER_CHANGE: &str = "user.change";
    pub const USER_DELETE: &str = "user.delete";
    pub const ROLE_VIEW: &str = "role.view";
    pub const ROLE_CHANGE: &str = "role.change";
    pub const ROLE_DELETE: &str = "role.delete";
    pub const PERMISSION_VIEW: &str = "permission.view";
    pub const AUDIT_VIEW: &str = "audit.view";
}

pub struct CapabilityGate;

impl CapabilityGate {
    pub fn has(session: Option<&Session>, required: &str) -> bool {
        match session {
            None => false,
            Some(s) if s.superuser => true,
            Some(s) => s.capabilities.contains(required),
        }
    }

    /// True if any of `codes` is held. An empty list allows nothing, except
    /// for superusers.
    pub fn has_any<S: AsRef<str>>(session: Option<&Session>, codes: &[S]) -> bool {
        match session {
            None => false,
            Some(s) if s.superuser => true,
            Some(s) => codes.iter().any(|c| s.capabilities.contains(c.as_ref())),
        }
    }

    pub fn has_all<S: AsRef<str>>(session: Option<&Session>, codes: &[S]) -> bool {
        match session {
            None => false,
            Some(s) if s.superuser => true,
            Some(s) => codes.iter().all(|c| s.capabilities.contains(c.as_ref())),
        }
    }

    /// Route-guard form of [`CapabilityGate::has`].
    pub fn require(session: Option<&Session>, required: &str) -> Result<(), Denied> {
        if Self::has(session, required) {
            Ok(())
        } else {
            Err(Denied {
                code: required.to_string(),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/gate_tests.rs"]
mod tests;
