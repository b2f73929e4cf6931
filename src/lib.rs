pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::SecurityConfig;
pub use crate::state::AppState;

/// Full HTTP surface. Protected handlers authenticate through their
/// extractors, so the route table below is the only wiring needed.
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    use handlers::protected::{folder, request, user};
    use handlers::public;

    Router::new()
        // Public
        .route("/ping", get(public::ping))
        .route("/health", get(public::health))
        .route("/login", post(public::session_login))
        // Registration is public; reading and renaming need a credential
        .route(
            "/user",
            post(public::user_register).get(user::show).patch(user::rename),
        )
        .route(
            "/request",
            get(request::show)
                .post(request::create)
                .patch(request::update)
                .delete(request::delete),
        )
        .route("/request/rename", patch(request::rename))
        .route("/request/transfer", patch(request::transfer))
        .route(
            "/folder",
            get(folder::show)
                .post(folder::create)
                .patch(folder::rename)
                .delete(folder::delete),
        )
        // Global middleware
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let mirror = security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*");
    let origins = if mirror {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            security
                .cors_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::PUT, Method::PATCH, Method::POST, Method::GET, Method::DELETE])
        .allow_headers([header::ORIGIN, header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(24 * 60 * 60))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::CredentialVerifier;
    use crate::database::MemoryStore;

    fn router(origins: &[&str]) -> Router {
        let verifier = CredentialVerifier::new("router-test-secret").unwrap();
        let state = AppState::new(Arc::new(MemoryStore::new()), verifier);
        let security = SecurityConfig {
            cors_origins: origins.iter().map(|o| o.to_string()).collect(),
            ..Default::default()
        };
        app(state, &security)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn protected_route_without_credential() {
        let resp = router(&[])
            .oneshot(Request::builder().uri("/user").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn preflight_mirrors_origin() {
        let resp = router(&["*"])
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/folder")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let headers = resp.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }

    #[tokio::test]
    async fn unlisted_origin_gets_no_cors_headers() {
        let resp = router(&["https://app.example.com"])
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header(header::ORIGIN, "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
