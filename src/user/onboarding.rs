//! The one-time profile questions a new user answers before using the app.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    Error,
    extract::ApiJson,
    user::{User, UserId, UserState, UserSummary, get_user_by_id, save_user},
    validation::validate_non_negative,
};

/// Whether the user still has to complete onboarding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub needs_onboarding: bool,
    pub is_onboarded: bool,
}

/// The answers to the onboarding questions. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    /// Also becomes the display name.
    pub full_name: Option<String>,
    pub country: Option<String>,
    pub flag: Option<String>,
    pub currency: Option<String>,
    pub occupation: Option<String>,
    pub monthly_income: Option<f64>,
    pub pocket_money: Option<f64>,
    pub income_frequency: Option<String>,
    pub financial_goals: Option<Vec<String>>,
}

impl OnboardingRequest {
    /// Copy the answers onto `user` and mark them as onboarded.
    ///
    /// # Errors
    /// Returns [Error::Validation] if an amount is negative. `user` is not modified in that case.
    pub fn apply(self, user: &mut User) -> Result<(), Error> {
        let monthly_income = self
            .monthly_income
            .map(|income| validate_non_negative(income, "monthlyIncome"))
            .transpose()?;
        let pocket_money = self
            .pocket_money
            .map(|money| validate_non_negative(money, "pocketMoney"))
            .transpose()?;

        if let Some(full_name) = self.full_name {
            user.name = full_name.clone();
            user.full_name = Some(full_name);
        }
        if self.country.is_some() {
            user.country = self.country;
        }
        if self.flag.is_some() {
            user.flag = self.flag;
        }
        if self.currency.is_some() {
            user.currency = self.currency;
        }
        if self.occupation.is_some() {
            user.occupation = self.occupation;
        }
        if monthly_income.is_some() {
            user.monthly_income = monthly_income;
        }
        if pocket_money.is_some() {
            user.pocket_money = pocket_money;
        }
        if self.income_frequency.is_some() {
            user.income_frequency = self.income_frequency;
        }
        if let Some(financial_goals) = self.financial_goals {
            user.financial_goals = financial_goals;
        }

        user.is_onboarded = true;

        Ok(())
    }
}

/// A route handler for checking whether the user needs to complete onboarding.
pub async fn get_onboarding_status(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<OnboardingStatus>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(OnboardingStatus {
        needs_onboarding: !user.is_onboarded,
        is_onboarded: user.is_onboarded,
    }))
}

/// A route handler for saving the onboarding answers.
pub async fn complete_onboarding(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<OnboardingRequest>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut user = get_user_by_id(user_id, &connection)?;
    request.apply(&mut user)?;
    let user = save_user(&user, &connection)?;

    Ok(Json(json!({
        "message": "Onboarding completed successfully!",
        "user": UserSummary::from(&user),
    })))
}
