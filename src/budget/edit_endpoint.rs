use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    budget::{Budget, BudgetState, get_budget_for_user, update_budget},
    database_id::BudgetId,
    extract::{ApiJson, ApiPath},
    user::UserId,
    validation::{validate_not_blank, validate_positive},
};

/// The JSON body for editing a budget. The month of a budget cannot be changed.
#[derive(Debug, Default, Deserialize)]
pub struct EditBudgetRequest {
    pub category: Option<String>,
    pub limit: Option<f64>,
}

/// A route handler for changing the category or limit of a budget.
pub async fn edit_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(budget_id): ApiPath<BudgetId>,
    ApiJson(request): ApiJson<EditBudgetRequest>,
) -> Result<Json<Budget>, Error> {
    let category = request
        .category
        .map(|category| validate_not_blank(&category, "category"))
        .transpose()?;
    let limit = request
        .limit
        .map(|limit| validate_positive(limit, "limit"))
        .transpose()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut budget = get_budget_for_user(budget_id, user_id, &connection)?;
    if let Some(category) = category {
        budget.category = category;
    }
    if let Some(limit) = limit {
        budget.limit = limit;
    }

    update_budget(&budget, &connection).map(Json)
}
