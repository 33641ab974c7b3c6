//! Top-level router: mounts every HTTP adapter and applies the shared layers.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::course::{course_routes, CourseHandlers};
use super::health::health;
use super::middleware::{auth_middleware, AuthState};
use super::session::{session_routes, SessionHandlers};

/// Builds the application router.
///
/// # Routes
/// - `GET /health` - unauthenticated liveness check
/// - `/api/sessions/...` - session lifecycle
/// - `/api/courses/...` - course operations
///
/// An empty `cors_origins` list allows any origin.
pub fn app_router(
    sessions: SessionHandlers,
    courses: CourseHandlers,
    auth: AuthState,
    cors_origins: Vec<String>,
    request_timeout: Duration,
) -> Router {
    let api = Router::new()
        .nest("/sessions", session_routes(sessions))
        .nest("/courses", course_routes(courses))
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&cors_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parsed)
    }
}
