//! User accounts, onboarding and profile settings.

mod core;
mod email;
mod financial_settings;
mod onboarding;
mod password_endpoint;
mod profile;
mod views;

pub use core::{
    AuthProvider, NewUser, User, UserId, UserState, create_user, create_user_table, email_exists,
    get_user_by_email, get_user_by_id, save_user, set_user_password, user_exists,
};
pub use email::Email;
pub use financial_settings::update_financial_settings;
pub use onboarding::{complete_onboarding, get_onboarding_status};
pub use password_endpoint::{change_password, set_password};
pub use profile::{get_profile, get_user_profile, update_profile};
pub use views::{ProfileView, UserSummary};
