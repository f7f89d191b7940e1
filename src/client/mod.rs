//! Hotel Backend Client
//!
//! Access to the REST backend the dashboards are built on.
//!
//! - [`Backend`]: the two calls the front desk needs (login, fetch JSON)
//! - [`HttpBackend`]: reqwest implementation with bearer auth
//! - [`RequestCache`]: shared in-flight deduplication and short-lived reuse
//! - [`PageLoad`]: a page's fetch, aborted when the page goes away

mod cache;
mod error;
mod http;
mod load;

pub use cache::{CacheStats, RequestCache};
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use load::PageLoad;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations the front desk performs against the backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for a session token and role
    async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse>;

    /// GET a JSON document, authenticated when `token` is present
    async fn fetch(&self, endpoint: &str, token: Option<&str>) -> ClientResult<serde_json::Value>;
}

/// Login form body
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login response
///
/// `role` is kept as the raw string the backend sent; the guards decide
/// whether it names a known role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("desk@hotel.test", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("desk@hotel.test"));
        assert!(!debug.contains("hunter2"));
    }
}
