//! Front Desk Controller
//!
//! Composition root tying the session, the route table and the backend
//! together. Navigation runs the guards synchronously against a session
//! snapshot; only a page that was allowed to mount starts its data fetch.
//!
//! A 401 from the backend on a page fetch is handled here, once, for every
//! page: if the rejected token is still the current one the session is
//! cleared and the visitor is sent to the login page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::{GuardOutcome, Role, FORBIDDEN_PATH, LOGIN_PATH};
use crate::client::{Backend, ClientError, ClientResult, Credentials, PageLoad, RequestCache};
use crate::routing::{Layout, Navigation, Page, Params, Redirect, RouteMatch, RouteTable};
use crate::session::{SessionError, SessionService};

/// Where logout lands
pub const HOME_PATH: &str = "/";

/// Redirects a single navigation may follow before giving up
const MAX_REDIRECTS: usize = 4;

/// Errors surfaced by front desk operations
#[derive(Error, Debug)]
pub enum FrontDeskError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Why a visitor was sent elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// No token in the session
    Unauthenticated,
    /// Token present, wrong role
    Forbidden,
    /// The backend rejected the token during a page fetch
    SessionExpired,
}

impl From<GuardOutcome> for RedirectReason {
    fn from(outcome: GuardOutcome) -> Self {
        match outcome {
            GuardOutcome::Forbidden => RedirectReason::Forbidden,
            _ => RedirectReason::Unauthenticated,
        }
    }
}

/// A rendered page and the data it loaded
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: &'static str,
    pub path: String,
    pub params: Params,
    pub layouts: Vec<Layout>,
    /// `None` for pages that load nothing, or when the load failed
    pub data: Option<Value>,
    /// Set when the page's fetch failed; the page is only partially loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub rendered_at: DateTime<Utc>,
}

impl PageView {
    pub fn new(route: RouteMatch, data: Option<Value>, error: Option<String>) -> Self {
        Self {
            page: route.page,
            title: route.page.title(),
            path: route.path,
            params: route.params,
            layouts: route.layouts,
            data,
            error,
            rendered_at: Utc::now(),
        }
    }
}

/// Navigation with the page's data fetch started
#[derive(Debug)]
pub enum Visit {
    Render { route: RouteMatch, load: PageLoad },
    Redirect(Redirect),
    NotFound { path: String },
}

/// Navigation with the page's data fetch completed
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Opened {
    Page(PageView),
    Redirect {
        to: &'static str,
        reason: RedirectReason,
    },
    NotFound {
        path: String,
    },
}

/// What a finished page fetch means for the visitor
#[derive(Debug)]
pub enum Settled {
    /// Render the page; partially loaded when `error` is set
    Page(PageView),
    /// The backend refused the token the fetch carried
    TokenRejected { route: RouteMatch, token: String },
}

/// Map a page's fetch result to what the visitor gets
///
/// A 401 only means an expired session when the request carried a token;
/// for an anonymous request it is an ordinary load failure.
pub fn settle(
    route: RouteMatch,
    sent_token: Option<&str>,
    result: ClientResult<Option<Arc<Value>>>,
) -> Settled {
    match (result, sent_token) {
        (Ok(data), _) => {
            let data = data.map(|d| d.as_ref().clone());
            Settled::Page(PageView::new(route, data, None))
        }
        (Err(ClientError::Unauthorized), Some(token)) => Settled::TokenRejected {
            route,
            token: token.to_string(),
        },
        (Err(e), _) => {
            tracing::warn!(page = %route.page.slug(), "Page data failed to load: {}", e);
            Settled::Page(PageView::new(route, None, Some(e.to_string())))
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    /// Role string as the backend sent it
    pub role: String,
    /// Where the role lands after login
    pub redirect_to: &'static str,
}

/// Landing page for a freshly logged-in role string
pub fn landing_path(role: &str) -> &'static str {
    role.parse::<Role>()
        .map(|r| r.home_path())
        .unwrap_or(FORBIDDEN_PATH)
}

/// Application controller
pub struct FrontDesk {
    session: SessionService,
    routes: Arc<RouteTable>,
    cache: Arc<RequestCache>,
}

impl FrontDesk {
    pub fn new(session: SessionService, routes: RouteTable, cache: RequestCache) -> Self {
        Self {
            session,
            routes: Arc::new(routes),
            cache: Arc::new(cache),
        }
    }

    /// Controller over the hotel route table
    pub fn hotel(session: SessionService, backend: Arc<dyn Backend>, cache_ttl: Duration) -> Self {
        Self::new(session, RouteTable::hotel(), RequestCache::new(backend, cache_ttl))
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn cache(&self) -> &Arc<RequestCache> {
        &self.cache
    }

    /// Resolve `path` for the current session without touching the backend
    pub fn navigate(&self, path: &str) -> Navigation {
        self.routes.resolve(path, &self.session.snapshot())
    }

    /// Resolve `path` and start the matched page's data fetch
    ///
    /// Must be called from within a Tokio runtime.
    pub fn visit(&self, path: &str) -> Visit {
        let session = self.session.snapshot();
        match self.routes.resolve(path, &session) {
            Navigation::Render(route) => {
                let endpoint = route.page.data_endpoint(&route.params);
                let load = PageLoad::spawn(
                    Arc::clone(&self.cache),
                    route.page,
                    endpoint,
                    session.token,
                );
                Visit::Render { route, load }
            }
            Navigation::Redirect(redirect) => Visit::Redirect(redirect),
            Navigation::NotFound { path } => Visit::NotFound { path },
        }
    }

    /// Visit `path` and wait for its data
    pub async fn open(&self, path: &str) -> Result<Opened, FrontDeskError> {
        let (route, load) = match self.visit(path) {
            Visit::Render { route, load } => (route, load),
            Visit::Redirect(redirect) => {
                return Ok(Opened::Redirect {
                    to: redirect.to,
                    reason: redirect.reason.into(),
                })
            }
            Visit::NotFound { path } => return Ok(Opened::NotFound { path }),
        };

        let sent = load.token().map(str::to_string);
        match settle(route, sent.as_deref(), load.finish().await) {
            Settled::Page(view) => Ok(Opened::Page(view)),
            Settled::TokenRejected { route, token } => {
                if self.expire_session(&token)? {
                    Ok(Opened::Redirect {
                        to: LOGIN_PATH,
                        reason: RedirectReason::SessionExpired,
                    })
                } else {
                    // A newer login replaced the rejected token; keep it
                    Ok(Opened::Page(PageView::new(
                        route,
                        None,
                        Some(ClientError::Unauthorized.to_string()),
                    )))
                }
            }
        }
    }

    /// Exchange credentials for a session
    ///
    /// Backend errors surface unchanged so their message reaches the user.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, FrontDeskError> {
        let response = self.cache.backend().login(credentials).await?;

        self.cache.invalidate();
        self.session.establish(&response.token, &response.role)?;

        let redirect_to = landing_path(&response.role);
        tracing::info!(email = %credentials.email, role = %response.role, "Logged in");

        Ok(LoginOutcome {
            role: response.role,
            redirect_to,
        })
    }

    /// Clear the session and every cached response
    pub fn logout(&self) -> Result<&'static str, FrontDeskError> {
        self.session.clear()?;
        self.cache.invalidate();
        tracing::info!("Logged out");
        Ok(HOME_PATH)
    }

    /// Drop the session holding `rejected`, if it is still the current one
    ///
    /// Returns whether the session was cleared.
    fn expire_session(&self, rejected: &str) -> Result<bool, FrontDeskError> {
        if self.session.snapshot().token() != Some(rejected) {
            tracing::debug!("Rejected token was already replaced, keeping session");
            return Ok(false);
        }

        tracing::info!("Backend rejected session token, clearing session");
        self.session.clear()?;
        self.cache.invalidate();
        Ok(true)
    }
}

/// Tracks the currently mounted page
///
/// Moving to another page drops the previous page's load, aborting its fetch
/// if it is still running. Guard redirects are followed like a browser would.
pub struct Navigator {
    desk: Arc<FrontDesk>,
    location: String,
    current: Option<PageLoad>,
}

impl Navigator {
    pub fn new(desk: Arc<FrontDesk>) -> Self {
        Self {
            desk,
            location: HOME_PATH.to_string(),
            current: None,
        }
    }

    /// Path of the page currently shown
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Load of the mounted page, if it has not been taken
    pub fn current_load(&self) -> Option<&PageLoad> {
        self.current.as_ref()
    }

    /// Take ownership of the mounted page's load, e.g. to await it
    pub fn take_load(&mut self) -> Option<PageLoad> {
        self.current.take()
    }

    /// Navigate to `path`, returning the page that ends up mounted
    pub fn go(&mut self, path: &str) -> Option<Page> {
        self.current = None;

        let mut target = path.to_string();
        for _ in 0..MAX_REDIRECTS {
            match self.desk.visit(&target) {
                Visit::Render { route, load } => {
                    self.location = route.path.clone();
                    self.current = Some(load);
                    return Some(route.page);
                }
                Visit::Redirect(redirect) => target = redirect.to.to_string(),
                Visit::NotFound { path } => {
                    self.location = path;
                    return None;
                }
            }
        }

        tracing::warn!(path = %path, "Too many redirects");
        None
    }
}
