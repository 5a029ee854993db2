use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    database_id::GoalId,
    extract::{ApiPath, ApiQuery},
    goal::{Goal, GoalProgress, GoalState, GoalStatus, get_goal_for_user, get_goals},
    user::UserId,
};

/// The query string for listing goals.
#[derive(Debug, Default, Deserialize)]
pub struct ListGoalsQuery {
    pub status: Option<GoalStatus>,
}

/// A route handler for listing the user's goals, newest first.
pub async fn list_goals_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiQuery(query): ApiQuery<ListGoalsQuery>,
) -> Result<Json<Vec<Goal>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_goals(user_id, query.status, &connection).map(Json)
}

/// A route handler for reading a single goal.
pub async fn get_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(goal_id): ApiPath<GoalId>,
) -> Result<Json<Goal>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_goal_for_user(goal_id, user_id, &connection).map(Json)
}

/// A route handler for how far a goal is from its target.
pub async fn goal_progress_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(goal_id): ApiPath<GoalId>,
) -> Result<Json<GoalProgress>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = get_goal_for_user(goal_id, user_id, &connection)?;

    Ok(Json(goal.progress()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{get_test_server, sign_up_test_user},
    };

    async fn create_goal(server: &TestServer, token: &str, body: Value) -> Value {
        let response = server
            .post(endpoints::GOALS)
            .authorization_bearer(token)
            .json(&body)
            .await;
        response.assert_status_ok();

        response.json::<Value>()
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;
        let car = create_goal(&server, &token, json!({ "name": "Car", "targetAmount": 100 })).await;
        let boat =
            create_goal(&server, &token, json!({ "name": "Boat", "targetAmount": 100 })).await;
        server
            .put(&format_endpoint(endpoints::GOAL, boat["id"].as_i64().unwrap()))
            .authorization_bearer(&token)
            .json(&json!({ "status": "CANCELLED" }))
            .await
            .assert_status_ok();

        let all = server
            .get(endpoints::GOALS)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        let active = server
            .get(endpoints::GOALS)
            .add_query_param("status", "ACTIVE")
            .authorization_bearer(&token)
            .await
            .json::<Value>();

        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["name"], "Boat");
        assert_eq!(active, json!([car]));
    }

    #[tokio::test]
    async fn unknown_status_filter_is_rejected() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        server
            .get(endpoints::GOALS)
            .add_query_param("status", "PAUSED")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn progress_reports_percentage_and_remaining() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;
        let goal = create_goal(
            &server,
            &token,
            json!({ "name": "Car", "targetAmount": 400, "currentAmount": 100 }),
        )
        .await;

        let response = server
            .get(&format_endpoint(
                endpoints::GOAL_PROGRESS,
                goal["id"].as_i64().unwrap(),
            ))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "goal": goal,
            "progress": 25.0,
            "remaining": 300.0,
        }));
    }

    #[tokio::test]
    async fn other_users_cannot_read_goal_or_progress() {
        let server = get_test_server();
        let (alice, _) = sign_up_test_user(&server, "alice@example.com").await;
        let (bob, _) = sign_up_test_user(&server, "bob@example.com").await;
        let goal = create_goal(&server, &alice, json!({ "name": "Car", "targetAmount": 1 })).await;
        let id = goal["id"].as_i64().unwrap();

        for path in [
            format_endpoint(endpoints::GOAL, id),
            format_endpoint(endpoints::GOAL_PROGRESS, id),
        ] {
            server
                .get(&path)
                .authorization_bearer(&bob)
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }
    }
}
