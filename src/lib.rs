//! # Frontdesk
//!
//! Hotel front desk: the public site, the admin dashboard and the receptionist
//! dashboard as one route tree, with role-based guards in front of every staff
//! page and a session shared by all of them.
//!
//! ## Modules
//!
//! - [`session`]: Token and role slots, in-memory and file-backed stores, cookies
//! - [`auth`]: Roles and the parameterized route guard
//! - [`routing`]: Page catalogue and the route tree resolver
//! - [`client`]: Backend access with request deduplication and cancellable loads
//! - [`app`]: Front desk controller (navigation, login, logout, 401 handling)
//! - [`gateway`]: HTTP server with Axum, sessions carried in cookies
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frontdesk::app::{FrontDesk, Opened};
//! use frontdesk::client::{Credentials, HttpBackend};
//! use frontdesk::config::BackendConfig;
//! use frontdesk::session::SessionService;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(HttpBackend::new(&BackendConfig::default())?);
//!     let desk = FrontDesk::hotel(SessionService::in_memory(), backend, Duration::from_secs(5));
//!
//!     // Staff pages redirect until someone logs in
//!     let outcome = desk
//!         .login(&Credentials::new("reception@hotel.test", "secret"))
//!         .await?;
//!
//!     match desk.open(outcome.redirect_to).await? {
//!         Opened::Page(view) => println!("{}: {:?}", view.title, view.data),
//!         Opened::Redirect { to, .. } => println!("Redirected to {}", to),
//!         Opened::NotFound { path } => println!("No page at {}", path),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod routing;
pub mod session;

// Re-export top-level types for convenience
pub use session::{
    FileStore, MemoryStore, Session, SessionError, SessionService, SessionStore, Slot,
};

pub use auth::{authorize, Guard, GuardOutcome, Role};

pub use routing::{Layout, Navigation, Page, RouteMatch, RouteTable};

pub use client::{
    Backend, CacheStats, ClientError, Credentials, HttpBackend, LoginResponse, PageLoad,
    RequestCache,
};

pub use app::{FrontDesk, FrontDeskError, LoginOutcome, Navigator, Opened, PageView, Visit};

pub use gateway::{build_router, serve, AppState, GatewayError};

pub use config::{BackendConfig, Config, ConfigError, GatewayConfig, LoggingConfig, SessionConfig};
