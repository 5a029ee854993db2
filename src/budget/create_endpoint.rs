use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    budget::{Budget, BudgetState, NewBudget, create_budget, list_endpoint::month_of},
    extract::ApiJson,
    timezone::local_today,
    user::UserId,
    validation::{require, validate_not_blank, validate_positive},
};

/// The JSON body for creating a budget.
///
/// The budget is for the current month unless both `month` and `year` are given.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBudgetRequest {
    pub category: Option<String>,
    pub limit: Option<f64>,
    pub month: Option<u8>,
    pub year: Option<i32>,
}

fn validate_month(month: u8) -> Result<u8, Error> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(Error::Validation("month must be between 1 and 12".to_owned()))
    }
}

/// A route handler for creating a budget, responds with the stored budget.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<CreateBudgetRequest>,
) -> Result<Json<Budget>, Error> {
    let category = validate_not_blank(&require(request.category, "category")?, "category")?;
    let limit = validate_positive(require(request.limit, "limit")?, "limit")?;
    let (month, year) = match request.month.zip(request.year) {
        Some((month, year)) => (validate_month(month)?, year),
        None => month_of(local_today(&state.local_timezone)?),
    };

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_budget(
        NewBudget {
            user_id,
            category,
            limit,
            month,
            year,
        },
        &connection,
    )
    .map(Json)
}
