//! Login and Logout
//!
//! - POST /auth/login - Exchange credentials for session cookies
//! - GET|POST /auth/logout - Expire session cookies and go home

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

use crate::app::{landing_path, LoginOutcome, HOME_PATH};
use crate::client::Credentials;
use crate::gateway::error::GatewayResult;
use crate::gateway::state::AppState;
use crate::session::{expire_cookie, set_cookie, Slot};

/// POST /auth/login
///
/// On success both session cookies are set and the body names the role's
/// landing page. Backend failures keep the backend's status and message.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> GatewayResult<Response> {
    let response = state.cache.backend().login(&credentials).await?;

    let secure = state.config.secure_cookies;
    let cookies = AppendHeaders([
        (SET_COOKIE, set_cookie(Slot::Token, &response.token, secure)),
        (SET_COOKIE, set_cookie(Slot::Role, &response.role, secure)),
    ]);

    tracing::info!(email = %credentials.email, role = %response.role, "Logged in");

    let body = LoginOutcome {
        redirect_to: landing_path(&response.role),
        role: response.role,
    };
    Ok((cookies, Json(body)).into_response())
}

/// GET|POST /auth/logout
pub async fn logout() -> Response {
    tracing::info!("Logged out");
    clear_session_and_redirect(HOME_PATH)
}

/// Expire both session cookies and redirect to `to`
pub(crate) fn clear_session_and_redirect(to: &str) -> Response {
    (
        AppendHeaders([
            (SET_COOKIE, expire_cookie(Slot::Token)),
            (SET_COOKIE, expire_cookie(Slot::Role)),
        ]),
        Redirect::to(to),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::LOCATION, StatusCode};

    #[tokio::test]
    async fn test_logout_expires_both_cookies() {
        let response = logout().await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");

        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }
}
