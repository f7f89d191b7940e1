//! Session Store
//!
//! The authentication session is two independent string slots, `token` and
//! `role`. Stores only persist those slots; [`SessionService`] is the explicit
//! context object handed to the controller and binaries.
//!
//! - [`MemoryStore`]: process-local slots
//! - [`FileStore`]: durable JSON file, survives restarts
//! - cookie helpers: the gateway keeps each browser's slots in cookies

mod cookie;
mod error;
mod store;

pub use cookie::{expire_cookie, set_cookie};
pub use error::{SessionError, SessionResult};
pub use store::{FileStore, MemoryStore, SessionStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A named session slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Token,
    Role,
}

impl Slot {
    /// Storage key for this slot
    pub fn key(&self) -> &'static str {
        match self {
            Slot::Token => "token",
            Slot::Role => "role",
        }
    }

    pub const ALL: [Slot; 2] = [Slot::Token, Slot::Role];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Point-in-time view of both session slots
///
/// Either slot may be missing independently of the other. Empty strings are
/// normalized to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Session {
    /// Session with both slots populated
    pub fn new(token: impl Into<String>, role: impl Into<String>) -> Self {
        Self::from_parts(Some(token.into()), Some(role.into()))
    }

    /// Session with no slots populated
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_parts(token: Option<String>, role: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            role: role.filter(|r| !r.is_empty()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Parse the `token` and `role` cookies out of a `Cookie` request header
    pub fn from_cookie_header(header: &str) -> Self {
        cookie::parse(header)
    }
}

/// Session context constructed once at startup
///
/// Wraps whichever [`SessionStore`] backs this process and exposes the
/// session lifecycle: established at login, read on every navigation,
/// cleared at logout or when the backend rejects the token.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Service over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read both slots
    pub fn snapshot(&self) -> Session {
        Session::from_parts(self.store.read(Slot::Token), self.store.read(Slot::Role))
    }

    /// Record a successful login
    ///
    /// The token is written before the role. The two writes are not atomic:
    /// if the second one fails the session is left holding a token only.
    pub fn establish(&self, token: &str, role: &str) -> SessionResult<()> {
        self.store.write(Slot::Token, token)?;
        self.store.write(Slot::Role, role)?;
        tracing::debug!(role = %role, "Session established");
        Ok(())
    }

    /// Remove both slots
    pub fn clear(&self) -> SessionResult<()> {
        for slot in Slot::ALL {
            self.store.remove(slot)?;
        }
        tracing::debug!("Session cleared");
        Ok(())
    }

    /// When the backing store last changed, if it keeps track
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.store.updated_at()
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("authenticated", &self.snapshot().is_authenticated())
            .finish()
    }
}
