//! Route guard
//!
//! One guard parameterized by the role it requires. The decision order is
//! fixed: a missing token means "who are you" and goes to the login page; a
//! token with any role other than the required one means "you can't be here"
//! and goes to the forbidden page.

use serde::Serialize;

use super::Role;
use crate::session::Session;

/// Where anonymous visitors are sent
pub const LOGIN_PATH: &str = "/auth/login";

/// Where sessions holding the wrong role are sent
pub const FORBIDDEN_PATH: &str = "/unauthorized";

/// Result of running a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardOutcome {
    /// No token in the session
    Unauthenticated,
    /// Token present, role missing or different from the required one
    Forbidden,
    /// Token present and role matches
    Allow,
}

impl GuardOutcome {
    /// Redirect target for a denied outcome
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            GuardOutcome::Unauthenticated => Some(LOGIN_PATH),
            GuardOutcome::Forbidden => Some(FORBIDDEN_PATH),
            GuardOutcome::Allow => None,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allow)
    }
}

/// Decide whether `session` may enter a branch requiring `required`
pub fn authorize(required: Role, session: &Session) -> GuardOutcome {
    if session.token().is_none() {
        return GuardOutcome::Unauthenticated;
    }

    match session.role().map(str::parse::<Role>) {
        Some(Ok(role)) if role == required => GuardOutcome::Allow,
        _ => GuardOutcome::Forbidden,
    }
}

/// Guard attached to a protected branch of the route tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pub required: Role,
}

impl Guard {
    pub const fn new(required: Role) -> Self {
        Self { required }
    }

    pub fn check(&self, session: &Session) -> GuardOutcome {
        authorize(self.required, session)
    }
}
