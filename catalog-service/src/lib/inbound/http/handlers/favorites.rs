use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MovieData;
use super::UserData;
use crate::domain::access;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::movie::models::MovieId;
use crate::user::models::Username;

/// `GET /api/users/:username/favorites`
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(CurrentUser(requester)): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Result<ApiSuccess<Vec<MovieData>>, ApiError> {
    if !access::authorize(&requester, &username).is_allowed() {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let username =
        Username::new(username).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    let movies = state
        .user_service
        .list_favorites(&username)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        movies.iter().map(MovieData::from).collect(),
    ))
}

/// `POST /api/users/:username/favorites/:movie_id`
///
/// Idempotent: adding an id that is already present returns the same
/// user state.
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(CurrentUser(requester)): Extension<CurrentUser>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    if !access::authorize(&requester, &username).is_allowed() {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let username =
        Username::new(username).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
    let movie_id = MovieId::from_string(&movie_id)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .user_service
        .add_favorite(&username, &movie_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// `DELETE /api/users/:username/favorites/:movie_id`
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(CurrentUser(requester)): Extension<CurrentUser>,
    Path((username, movie_id)): Path<(String, String)>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    if !access::authorize(&requester, &username).is_allowed() {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let username =
        Username::new(username).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
    let movie_id = MovieId::from_string(&movie_id)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;

    state
        .user_service
        .remove_favorite(&username, &movie_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
