use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    extract::ApiJson,
    goal::{Goal, GoalRequest, GoalState, create_goal},
    user::UserId,
};

/// A route handler for creating a goal, responds with the stored goal.
pub async fn create_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<GoalRequest>,
) -> Result<Json<Goal>, Error> {
    let new_goal = request.into_new_goal(user_id)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_goal(new_goal, &connection).map(Json)
}
