use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::access;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::models::Username;

/// `GET /api/users/:username`
pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(requester)): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    if !access::authorize(&requester, &username).is_allowed() {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let username =
        Username::new(username).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .user_service
        .get_user(&username)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
