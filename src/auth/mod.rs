//! Authorization
//!
//! Roles and the route guard. A guard is a pure decision over a
//! [`Session`](crate::session::Session) snapshot; it never contacts the
//! backend, so a present-but-expired token is only caught by the next API call.

mod guard;
mod role;

pub use guard::{authorize, Guard, GuardOutcome, FORBIDDEN_PATH, LOGIN_PATH};
pub use role::{Role, UnknownRole};
