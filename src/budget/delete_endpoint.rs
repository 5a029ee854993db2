use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    budget::{BudgetState, delete_budget, get_budget_for_user},
    database_id::BudgetId,
    extract::ApiPath,
    user::UserId,
};

/// A route handler for deleting a budget owned by the user.
pub async fn delete_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(budget_id): ApiPath<BudgetId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_budget_for_user(budget_id, user_id, &connection)?;
    delete_budget(budget_id, &connection)?;

    Ok(Json(json!({ "message": "Budget deleted successfully" })))
}
