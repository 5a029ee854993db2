use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    budget::{Budget, BudgetState, get_budget_for_user, get_budgets},
    database_id::BudgetId,
    extract::{ApiPath, ApiQuery},
    timezone::local_today,
    user::UserId,
};

/// The query string for listing budgets. Both fields are needed to filter.
#[derive(Debug, Default, Deserialize)]
pub struct ListBudgetsQuery {
    pub month: Option<u8>,
    pub year: Option<i32>,
}

/// The (month, year) pair for `date`.
pub(super) fn month_of(date: Date) -> (u8, i32) {
    (u8::from(date.month()), date.year())
}

/// A route handler for listing the user's budgets, optionally for a single month.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    ApiQuery(query): ApiQuery<ListBudgetsQuery>,
) -> Result<Json<Vec<Budget>>, Error> {
    let month = query.month.zip(query.year);

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets(user_id, month, &connection).map(Json)
}

/// A route handler for listing the budgets for the current month in the server's timezone.
pub async fn current_budgets_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<Vec<Budget>>, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets(user_id, Some(month_of(today)), &connection).map(Json)
}

/// A route handler for reading a single budget.
pub async fn get_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(budget_id): ApiPath<BudgetId>,
) -> Result<Json<Budget>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_budget_for_user(budget_id, user_id, &connection).map(Json)
}
