//! Reading and editing the user's profile.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error,
    extract::ApiJson,
    user::{ProfileView, User, UserId, UserState, UserSummary, get_user_by_id, save_user},
};

/// Changes to the user's names.
///
/// The first and last name only take effect when both are given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateProfileRequest {
    fn apply(self, user: &mut User) {
        if let Some(display_name) = self.display_name {
            user.name = display_name.clone();
            user.full_name = Some(display_name);
        }

        if let (Some(first_name), Some(last_name)) = (self.first_name, self.last_name) {
            user.full_name = Some(format!("{first_name} {last_name}").trim().to_owned());
        }
    }
}

/// A route handler for the user's profile and settings, used to pick the display currency.
pub async fn get_user_profile(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(json!({
        "success": true,
        "profile": UserSummary::from(&user),
    })))
}

/// A route handler for the profile page.
pub async fn get_profile(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(json!({ "data": ProfileView::from(&user) })))
}

/// A route handler for changing the display name and full name.
pub async fn update_profile(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut user = get_user_by_id(user_id, &connection)?;
    request.apply(&mut user);
    let user = save_user(&user, &connection)?;

    Ok(Json(json!({
        "message": "Profile updated!",
        "data": ProfileView::from(&user),
    })))
}
