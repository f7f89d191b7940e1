//! Frontdesk Gateway
//!
//! HTTP front end for the hotel site and staff dashboards, built with Axum.
//!
//! # Endpoints
//!
//! ## Session
//! - `POST /auth/login` - Log in, sets the `token` and `role` cookies
//! - `GET|POST /auth/logout` - Expire both cookies, redirect to `/`
//!
//! ## Pages
//! - `GET /{path}` - Resolve through the route tree; renders a page view,
//!   redirects (303) when a guard refuses, 404 for unknown paths
//!
//! ## Health
//! - `GET /health/live` - Liveness check
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use frontdesk::client::{HttpBackend, RequestCache};
//! use frontdesk::config::Config;
//! use frontdesk::gateway::{serve, AppState};
//! use frontdesk::routing::RouteTable;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let backend = Arc::new(HttpBackend::new(&config.backend)?);
//!     let cache = Arc::new(RequestCache::new(backend, Duration::from_secs(5)));
//!
//!     let state = AppState::new(RouteTable::hotel(), cache, config.gateway.clone());
//!     serve(state, &config.gateway).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{GatewayError, GatewayResult};
pub use state::AppState;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;

/// Build the gateway router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config);
    let shared_state = Arc::new(state);

    Router::new()
        .route(
            "/auth/login",
            get(routes::pages::render).post(routes::auth::login),
        )
        .route(
            "/auth/logout",
            get(routes::auth::logout).post(routes::auth::logout),
        )
        .nest("/health", health_routes)
        .fallback(routes::pages::render)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// CORS for the configured origins; cookies require an explicit list
fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Start the gateway server
pub async fn serve(state: AppState, config: &GatewayConfig) -> Result<(), GatewayError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Frontdesk gateway listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Frontdesk gateway shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{
        Backend, ClientError, ClientResult, Credentials, LoginResponse, RequestCache,
    };
    use crate::routing::RouteTable;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{
            header::{COOKIE, LOCATION, SET_COOKIE},
            Request, StatusCode,
        },
        response::Response,
    };
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::util::ServiceExt;

    /// Backend accepting token "xyz" (admin) and "abc" (receptionist)
    ///
    /// Offers refuse anonymous visitors.
    #[derive(Default)]
    struct FakeBackend {
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
            if credentials.password == "secret" {
                Ok(LoginResponse {
                    token: "xyz".to_string(),
                    role: "admin".to_string(),
                })
            } else {
                Err(ClientError::Api {
                    status: 401,
                    message: "Invalid email or password".to_string(),
                })
            }
        }

        async fn fetch(&self, endpoint: &str, token: Option<&str>) -> ClientResult<Value> {
            self.fetched.lock().unwrap().push(endpoint.to_string());
            match (endpoint, token) {
                // Member pricing needs a token
                ("/offers", None) => Err(ClientError::Unauthorized),
                (_, Some("xyz") | Some("abc") | None) => Ok(json!({ "endpoint": endpoint })),
                (_, Some(_)) => Err(ClientError::Unauthorized),
            }
        }
    }

    fn create_test_app() -> (Router, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::default());
        let cache = Arc::new(RequestCache::new(backend.clone(), Duration::ZERO));
        let state = AppState::new(RouteTable::hotel(), cache, GatewayConfig::default());
        (build_router(state), backend)
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get_with_cookie("/health/live", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get_with_cookie("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["routes"], 37);
    }

    #[tokio::test]
    async fn test_anonymous_protected_redirects_to_login() {
        let (app, backend) = create_test_app();
        let response = app
            .oneshot(get_with_cookie("/receptionist/dashboard", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/auth/login");
        assert!(backend.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_role_redirects_to_unauthorized() {
        let (app, backend) = create_test_app();
        let response = app
            .oneshot(get_with_cookie(
                "/admin/rooms",
                Some("token=abc; role=receptionist"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/unauthorized");
        assert!(backend.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_index_renders_overview() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(get_with_cookie("/admin", Some("token=xyz; role=admin")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["page"], "admin-overview");
        assert_eq!(body["layouts"], json!(["admin"]));
        assert_eq!(body["data"]["endpoint"], "/admin/overview");
    }

    #[tokio::test]
    async fn test_public_page_with_param() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(get_with_cookie("/attractions/12", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["page"], "attraction-detail");
        assert_eq!(body["params"]["id"], "12");
        assert_eq!(body["data"]["endpoint"], "/attractions/12");
    }

    #[tokio::test]
    async fn test_login_page_renders_on_get() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get_with_cookie("/auth/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["page"], "login");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get_with_cookie("/nowhere", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_post_to_page_is_rejected() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rooms")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_login_sets_cookies() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"email": "gm@hotel.test", "password": "secret"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("token=xyz;"));
        assert!(cookies[1].starts_with("role=admin;"));

        let body = json_body(response).await;
        assert_eq!(body, json!({ "role": "admin", "redirect_to": "/admin" }));
    }

    #[tokio::test]
    async fn test_login_failure_is_verbatim() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"email": "gm@hotel.test", "password": "guess"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookies(&response).is_empty());
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Invalid email or password"
        );
    }

    #[tokio::test]
    async fn test_login_invalid_json() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_clears_cookies() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/logout")
                    .header(COOKIE, "token=xyz; role=admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/");
        let cookies = set_cookies(&response);
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_rejected_token_expires_cookies() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(get_with_cookie(
                "/admin/bookings",
                Some("token=stale; role=admin"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/auth/login");
        assert!(set_cookies(&response).iter().all(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_anonymous_rejection_renders_partial_page() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get_with_cookie("/offers", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookies(&response).is_empty());
        let body = json_body(response).await;
        assert_eq!(body["page"], "offers");
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["error"], "Session is no longer valid");
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/rooms")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_preflight_for_configured_origins() {
        let backend = Arc::new(FakeBackend::default());
        let cache = Arc::new(RequestCache::new(backend, Duration::ZERO));
        let config = GatewayConfig {
            cors_origins: vec!["http://ok.test".to_string(), "bad\norigin".to_string()],
            ..GatewayConfig::default()
        };
        let app = build_router(AppState::new(RouteTable::hotel(), cache, config));

        let response = app.clone().oneshot(preflight("http://ok.test")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://ok.test"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );

        let response = app.oneshot(preflight("http://evil.test")).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
