//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/goals/{goal_id}', use [format_endpoint].

/// The route for registering a new user with an email and password.
pub const SIGN_UP: &str = "/api/auth/signup";
/// The route for logging in with an email and password.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for signing in with a Google ID token.
pub const GOOGLE_SIGN_IN: &str = "/auth/google";

/// The route for checking whether the user still needs to complete onboarding.
pub const ONBOARDING_STATUS: &str = "/api/user/onboarding/status";
/// The route for completing onboarding.
pub const ONBOARDING: &str = "/api/user/onboarding";
/// The route for updating income settings.
pub const FINANCIAL_SETTINGS: &str = "/api/user/financial-settings";
/// The route for the user's profile and currency settings.
pub const USER_PROFILE: &str = "/api/user/profile";
/// The route for reading and updating the profile page.
pub const PROFILE: &str = "/api/profile";
/// The route for changing the password.
pub const PROFILE_PASSWORD: &str = "/api/profile/password";
/// The route for setting a password on an account that has none.
pub const SET_PASSWORD: &str = "/api/profile/set-password";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to list the budgets for the current month.
pub const CURRENT_BUDGETS: &str = "/api/budgets/current";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";

/// The route to list and create goals.
pub const GOALS: &str = "/api/goals";
/// The route to access a single goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route for a goal's progress towards its target.
pub const GOAL_PROGRESS: &str = "/api/goals/{goal_id}/progress";
/// The route for adding money to a goal.
pub const GOAL_CONTRIBUTE: &str = "/api/goals/{goal_id}/contribute";

/// The route for income and expense totals over a period.
pub const ANALYTICS_OVERVIEW: &str = "/api/analytics/overview";
/// The route for monthly income and expense totals.
pub const SPENDING_TRENDS: &str = "/api/analytics/spending-trends";
/// The route for expenses grouped by category.
pub const CATEGORY_INSIGHTS: &str = "/api/analytics/category-insights";

/// The route for asking the assistant to analyse an area of the user's finances.
pub const AGENT_ANALYZE: &str = "/api/agent/analyze";
/// The route for chatting with the assistant.
pub const AGENT_CHAT: &str = "/api/agent/chat";
/// The route for the assistant's insights.
pub const AGENT_INSIGHTS: &str = "/api/agent/insights";
/// The route for the assistant's recommendations.
pub const AGENT_RECOMMENDATIONS: &str = "/api/agent/recommendations";

/// The route for the list of supported countries and currencies.
pub const COUNTRIES: &str = "/api/countries/all";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a right brace.
/// For example, in the endpoint path '/api/goals/{goal_id}', '{goal_id}' is the parameter.
///
/// Only the first parameter is replaced. If no parameter is found in
/// `endpoint_path`, the function returns the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
