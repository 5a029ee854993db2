use axum::{Extension, Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error,
    extract::ApiJson,
    user::{User, UserId, UserState, UserSummary, get_user_by_id, save_user},
    validation::validate_non_negative,
};

/// Changes to the user's income settings. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSettingsRequest {
    pub monthly_income: Option<f64>,
    pub pocket_money: Option<f64>,
    pub income_frequency: Option<String>,
}

impl FinancialSettingsRequest {
    fn apply(self, user: &mut User) -> Result<(), Error> {
        if let Some(income) = self.monthly_income {
            user.monthly_income = Some(validate_non_negative(income, "monthlyIncome")?);
        }
        if let Some(money) = self.pocket_money {
            user.pocket_money = Some(validate_non_negative(money, "pocketMoney")?);
        }
        if self.income_frequency.is_some() {
            user.income_frequency = self.income_frequency;
        }

        Ok(())
    }
}

/// A route handler for updating the monthly income, pocket money and income frequency.
pub async fn update_financial_settings(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<FinancialSettingsRequest>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut user = get_user_by_id(user_id, &connection)?;
    request.apply(&mut user)?;
    let user = save_user(&user, &connection)?;

    Ok(Json(json!({
        "message": "Financial settings updated!",
        "data": UserSummary::from(&user),
    })))
}
