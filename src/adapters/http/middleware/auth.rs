//! Bearer authentication.
//!
//! `auth_middleware` resolves the `Authorization: Bearer` header through the
//! `TokenValidator` port and stores the actor in request extensions.
//! Handlers that need an actor take `RequireAuth`, which answers 401 when
//! none was stored. Requests without a token pass the middleware untouched.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedActor};
use crate::ports::TokenValidator;

pub type AuthState = Arc<dyn TokenValidator>;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves a Bearer token into an [`AuthenticatedActor`].
///
/// A token the validator rejects ends the request with 401; a validator
/// outage ends it with 503.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(actor) => {
            tracing::debug!(actor = %actor.id, "bearer token accepted");
            request.extensions_mut().insert(actor);
            next.run(request).await
        }
        Err(AuthError::ServiceUnavailable(reason)) => {
            tracing::error!(%reason, "token validation unavailable");
            ErrorResponse::new("AUTH_UNAVAILABLE", "token validation is unavailable")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(e) => ErrorResponse::new("UNAUTHENTICATED", e.to_string())
            .into_response_with(StatusCode::UNAUTHORIZED),
    }
}

/// The authenticated actor of the current request.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedActor);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedActor>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection)
    }
}

/// No actor was attached to the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        ErrorResponse::new("UNAUTHENTICATED", "a bearer token is required")
            .into_response_with(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockTokenValidator;
    use crate::domain::foundation::UserId;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn test_actor() -> AuthenticatedActor {
        AuthenticatedActor::new(UserId::new("staff-1").unwrap(), Some("Robin".to_string()))
    }

    fn app(validator: MockTokenValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route(
                "/whoami",
                get(|RequireAuth(actor): RequireAuth| async move { actor.id.to_string() }),
            )
            .layer(axum::middleware::from_fn_with_state(state, auth_middleware))
    }

    fn request(authorization: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let app = app(MockTokenValidator::new().with_actor("good", test_actor()));

        let response = app.oneshot(request(Some("Bearer good"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_before_handler() {
        let app = app(MockTokenValidator::new());

        let response = app.oneshot(request(Some("Bearer bad"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_token_fails_in_extractor() {
        let app = app(MockTokenValidator::new());

        let response = app.oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn validator_outage_is_503() {
        let app = app(
            MockTokenValidator::new().with_error(AuthError::service_unavailable("down")),
        );

        let response = app.oneshot(request(Some("Bearer any"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn basic_auth_header_is_ignored() {
        let app = app(MockTokenValidator::new().with_actor("good", test_actor()));

        let response = app
            .oneshot(request(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_extracts_actor_from_extensions() {
        let mut request: HttpRequest<()> = HttpRequest::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(test_actor());
        let (mut parts, _body) = request.into_parts();

        let RequireAuth(actor) = RequireAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(actor.display_name.as_deref(), Some("Robin"));
    }

    #[test]
    fn auth_rejection_returns_401() {
        let response = AuthRejection.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejection_body_carries_code() {
        let response = AuthRejection.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "UNAUTHENTICATED");
    }
}
