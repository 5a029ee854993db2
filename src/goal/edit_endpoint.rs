use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    database_id::GoalId,
    extract::{ApiJson, ApiPath},
    goal::{Goal, GoalRequest, GoalState, get_goal_for_user, update_goal},
    user::UserId,
    validation::{require, validate_positive},
};

/// A route handler for editing a goal. Only the fields in the body are changed.
pub async fn edit_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(goal_id): ApiPath<GoalId>,
    ApiJson(request): ApiJson<GoalRequest>,
) -> Result<Json<Goal>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut goal = get_goal_for_user(goal_id, user_id, &connection)?;
    request.apply(&mut goal)?;

    update_goal(&goal, &connection).map(Json)
}

/// The JSON body for adding money to a goal.
#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    pub amount: Option<f64>,
}

/// A route handler for adding money to a goal, responds with the updated goal.
pub async fn contribute_to_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(goal_id): ApiPath<GoalId>,
    ApiJson(request): ApiJson<ContributionRequest>,
) -> Result<Json<Goal>, Error> {
    let amount = validate_positive(require(request.amount, "amount")?, "amount")?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut goal = get_goal_for_user(goal_id, user_id, &connection)?;
    goal.contribute(amount);

    update_goal(&goal, &connection).map(Json)
}
