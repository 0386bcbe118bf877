use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::User;
use crate::user::models::Username;

/// The one body every authentication failure gets. Missing token, bad
/// signature, expired token, and dead subject must be indistinguishable
/// to the caller; the detail goes to the log only.
const GENERIC_AUTH_FAILURE: &str = "Invalid or missing authentication token";

/// Extension type carrying the authenticated user through the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware gating every protected route.
///
/// Verifies the bearer token's signature and expiry, then re-resolves the
/// subject to a live user record rather than trusting embedded claims. A
/// subject deleted after issuance fails here.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.verify(token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        unauthorized()
    })?;

    let username = Username::new(claims.sub.clone()).map_err(|e| {
        tracing::warn!("Token subject is not a valid username: {}", e);
        unauthorized()
    })?;

    let user = state
        .user_service
        .get_user(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(subject = %username, "Token subject no longer exists");
                unauthorized()
            }
            other => {
                tracing::error!("Failed to resolve token subject: {}", other);
                ApiError::InternalServerError("Internal server error".to_string()).into_response()
            }
        })?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

fn unauthorized() -> Response {
    ApiError::Unauthorized(GENERIC_AUTH_FAILURE.to_string()).into_response()
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::warn!("Authorization header is not valid UTF-8");
        unauthorized()
    })?;

    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Authorization header is not a bearer token");
        unauthorized()
    })?;

    Ok(token)
}
