use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::GoalId,
    extract::ApiPath,
    goal::{GoalState, delete_goal, get_goal_for_user},
    user::UserId,
};

/// A route handler for deleting a goal owned by the user.
pub async fn delete_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(goal_id): ApiPath<GoalId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_goal_for_user(goal_id, user_id, &connection)?;
    delete_goal(goal_id, &connection)?;

    Ok(Json(json!({ "message": "Goal deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, sign_up_test_user},
    };

    #[tokio::test]
    async fn delete_goal_only_for_owner() {
        let server = get_test_server();
        let (alice, _) = sign_up_test_user(&server, "alice@example.com").await;
        let (bob, _) = sign_up_test_user(&server, "bob@example.com").await;
        let goal = server
            .post(endpoints::GOALS)
            .authorization_bearer(&alice)
            .json(&json!({ "name": "Car", "targetAmount": 10 }))
            .await
            .json::<Value>();
        let path = format_endpoint(endpoints::GOAL, goal["id"].as_i64().unwrap());

        server
            .delete(&path)
            .authorization_bearer(&bob)
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&path)
            .authorization_bearer(&alice)
            .await
            .assert_json(&json!({ "message": "Goal deleted successfully" }));
        server
            .get(&path)
            .authorization_bearer(&alice)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
