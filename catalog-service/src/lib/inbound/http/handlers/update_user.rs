use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::access;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::models::UpdateUserCommand;
use crate::user::models::Username;

/// HTTP request body for updating a user (raw JSON)
///
/// All fields optional; only provided fields change. A username change
/// invalidates outstanding tokens at their next verification, since the
/// old subject no longer resolves.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        let username = self.username.map(Username::new).transpose()?;
        let email = self.email.map(EmailAddress::new).transpose()?;

        Ok(UpdateUserCommand {
            username,
            email,
            password: self.password,
            birthday: self.birthday,
        })
    }
}

/// `PATCH /api/users/:username`
pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(requester)): Extension<CurrentUser>,
    Path(username): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    if !access::authorize(&requester, &username).is_allowed() {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    let username =
        Username::new(username).map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&username, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
