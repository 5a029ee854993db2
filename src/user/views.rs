//! JSON representations of a user. Neither exposes the password hash.

use serde::Serialize;

use crate::user::{AuthProvider, User, UserId};

/// The user's profile and financial settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub full_name: Option<String>,
    pub country: Option<String>,
    pub flag: Option<String>,
    pub currency: Option<String>,
    pub occupation: Option<String>,
    pub monthly_income: Option<f64>,
    pub pocket_money: Option<f64>,
    pub income_frequency: Option<String>,
    pub financial_goals: Vec<String>,
    pub is_onboarded: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            full_name: user.full_name.clone(),
            country: user.country.clone(),
            flag: user.flag.clone(),
            currency: user.currency.clone(),
            occupation: user.occupation.clone(),
            monthly_income: user.monthly_income,
            pocket_money: user.pocket_money,
            income_frequency: user.income_frequency.clone(),
            financial_goals: user.financial_goals.clone(),
            is_onboarded: user.is_onboarded,
        }
    }
}

/// The profile page data: [UserSummary] plus display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub summary: UserSummary,
    pub display_name: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_pic_url: Option<String>,
    /// `"local"` or `"google"`.
    pub auth_provider: String,
    pub has_set_password: bool,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        // The first name is everything before the first space, the rest is the last name.
        let (first_name, last_name) = match user
            .full_name
            .as_deref()
            .and_then(|full_name| full_name.split_once(' '))
        {
            Some((first, last)) => (first.to_owned(), last.to_owned()),
            None => (user.name.clone(), String::new()),
        };

        let auth_provider = match user.auth_provider {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
        };

        Self {
            summary: UserSummary::from(user),
            display_name: user.name.clone(),
            first_name,
            last_name,
            profile_pic_url: user.profile_picture.clone(),
            auth_provider: auth_provider.to_owned(),
            has_set_password: user.is_password_set,
        }
    }
}
