use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::domain::access;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::models::Username;

/// `DELETE /api/users/:username`
///
/// Any token already issued for the deleted subject stops verifying at
/// its next use; there is no revocation list to update.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(requester)): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !access::authorize(&requester, &username).is_allowed() {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let username =
        Username::new(username).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .user_service
        .delete_user(&username)
        .await
        .map_err(ApiError::from)?;

    // 204 carries no body, so the usual envelope does not apply
    Ok(StatusCode::NO_CONTENT)
}
