//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, Error, agent,
    analytics::{get_category_insights, get_overview, get_spending_trends},
    auth::{auth_guard, log_in, sign_in_with_google, sign_up},
    budget::{
        create_budget_endpoint, current_budgets_endpoint, delete_budget_endpoint,
        edit_budget_endpoint, get_budget_endpoint, list_budgets_endpoint,
    },
    country::get_countries,
    endpoints,
    goal::{
        contribute_to_goal_endpoint, create_goal_endpoint, delete_goal_endpoint,
        edit_goal_endpoint, get_goal_endpoint, goal_progress_endpoint, list_goals_endpoint,
    },
    logging::logging_middleware,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
    user::{
        change_password, complete_onboarding, get_onboarding_status, get_profile,
        get_user_profile, set_password, update_financial_settings, update_profile,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except sign-up, log-in, Google sign-in and the country list
/// requires an `Authorization: Bearer <token>` header.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::SIGN_UP, post(sign_up))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::GOOGLE_SIGN_IN, post(sign_in_with_google))
        .route(endpoints::COUNTRIES, get(get_countries));

    let protected_routes = Router::new()
        .route(endpoints::ONBOARDING_STATUS, get(get_onboarding_status))
        .route(endpoints::ONBOARDING, post(complete_onboarding))
        .route(endpoints::FINANCIAL_SETTINGS, put(update_financial_settings))
        .route(endpoints::USER_PROFILE, get(get_user_profile))
        .route(endpoints::PROFILE, get(get_profile).put(update_profile))
        .route(endpoints::PROFILE_PASSWORD, put(change_password))
        .route(endpoints::SET_PASSWORD, post(set_password))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(endpoints::CURRENT_BUDGETS, get(current_budgets_endpoint))
        .route(
            endpoints::BUDGET,
            get(get_budget_endpoint)
                .put(edit_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(
            endpoints::GOALS,
            get(list_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            get(get_goal_endpoint)
                .put(edit_goal_endpoint)
                .delete(delete_goal_endpoint),
        )
        .route(endpoints::GOAL_PROGRESS, get(goal_progress_endpoint))
        .route(endpoints::GOAL_CONTRIBUTE, post(contribute_to_goal_endpoint))
        .route(endpoints::ANALYTICS_OVERVIEW, get(get_overview))
        .route(endpoints::SPENDING_TRENDS, get(get_spending_trends))
        .route(endpoints::CATEGORY_INSIGHTS, get(get_category_insights))
        .route(endpoints::AGENT_ANALYZE, post(agent::analyze))
        .route(endpoints::AGENT_CHAT, post(agent::chat))
        .route(endpoints::AGENT_INSIGHTS, get(agent::get_insights))
        .route(
            endpoints::AGENT_RECOMMENDATIONS,
            get(agent::get_recommendations),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
