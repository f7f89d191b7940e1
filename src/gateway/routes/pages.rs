//! Page Rendering
//!
//! Every GET the gateway does not handle elsewhere is a navigation. The
//! browser's cookies are the session; the route tree and its guards decide
//! between rendering, redirecting and 404.

use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap, Method, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use super::auth::clear_session_and_redirect;
use crate::app::{settle, Settled};
use crate::auth::LOGIN_PATH;
use crate::gateway::error::{GatewayError, GatewayResult};
use crate::gateway::state::AppState;
use crate::routing::Navigation;
use crate::session::Session;

/// Session carried by the request's cookies
///
/// HTTP/2 clients may split cookies over several headers.
fn cookie_session(headers: &HeaderMap) -> Session {
    let joined = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    Session::from_cookie_header(&joined)
}

/// GET /{any}
///
/// A rejected token expires the cookies unconditionally. A response to an
/// older request can therefore log out a browser that has since logged in
/// again; the browser holds the only copy of the session, so there is no
/// current token to compare against.
pub async fn render(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> GatewayResult<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err(GatewayError::MethodNotAllowed(method.to_string()));
    }

    let session = cookie_session(&headers);
    let route = match state.routes.resolve(uri.path(), &session) {
        Navigation::Render(route) => route,
        Navigation::Redirect(redirect) => return Ok(Redirect::to(redirect.to).into_response()),
        Navigation::NotFound { path } => return Err(GatewayError::NotFound(path)),
    };

    let result = match route.page.data_endpoint(&route.params) {
        None => Ok(None),
        Some(endpoint) => state.cache.fetch(&endpoint, session.token()).await.map(Some),
    };

    match settle(route, session.token(), result) {
        Settled::Page(view) => Ok(Json(view).into_response()),
        Settled::TokenRejected { route, .. } => {
            tracing::info!(path = %route.path, "Backend rejected session token, expiring cookies");
            Ok(clear_session_and_redirect(LOGIN_PATH))
        }
    }
}
