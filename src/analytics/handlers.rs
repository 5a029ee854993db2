//! Analytics route handlers.
//!
//! Every window ends today, where today is taken in the server's local timezone.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    analytics::{
        aggregation::{
            CategoryInsight, MonthlyTrend, Overview, category_insights, monthly_trends, overview,
        },
        period::{Period, last_months, month_end},
    },
    extract::ApiQuery,
    timezone::local_today,
    transaction::{Transaction, TransactionFilter, get_transactions},
    user::UserId,
};

/// The number of months in the spending trends when none is given.
const DEFAULT_TREND_MONTHS: u32 = 6;
/// The most months the spending trends can cover.
const MAX_TREND_MONTHS: u32 = 120;

/// The state needed by the analytics endpoints.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for endpoints that summarise a period.
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// One of "week", "month" or "year".
    pub period: Option<String>,
}

/// The query string for the spending trends.
#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub months: Option<u32>,
}

fn get_transactions_between(
    state: &AnalyticsState,
    user_id: UserId,
    date_range: (time::Date, time::Date),
) -> Result<Vec<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(
        user_id,
        &TransactionFilter {
            date_range: Some(date_range),
            ..Default::default()
        },
        &connection,
    )
}

/// A route handler for the income and expense totals over a period.
pub async fn get_overview(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> Result<Json<Overview>, Error> {
    let today = local_today(&state.local_timezone)?;
    let date_range = Period::from_query(query.period.as_deref()).date_range(today);

    let transactions = get_transactions_between(&state, user_id, date_range)?;

    Ok(Json(overview(&transactions)))
}

/// A route handler for the monthly income and expenses, oldest month first.
pub async fn get_spending_trends(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
    ApiQuery(query): ApiQuery<TrendsQuery>,
) -> Result<Json<Vec<MonthlyTrend>>, Error> {
    let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    if months > MAX_TREND_MONTHS {
        return Err(Error::Validation(format!(
            "months must be at most {MAX_TREND_MONTHS}"
        )));
    }

    let today = local_today(&state.local_timezone)?;
    let months = last_months(today, months);
    let Some(&first_month) = months.first() else {
        return Ok(Json(Vec::new()));
    };

    // The current month is included in full.
    let transactions = get_transactions_between(&state, user_id, (first_month, month_end(today)))?;

    Ok(Json(monthly_trends(&transactions, &months)))
}

/// A route handler for the expenses in a period grouped by category.
pub async fn get_category_insights(
    State(state): State<AnalyticsState>,
    Extension(user_id): Extension<UserId>,
    ApiQuery(query): ApiQuery<PeriodQuery>,
) -> Result<Json<Vec<CategoryInsight>>, Error> {
    let today = local_today(&state.local_timezone)?;
    let date_range = Period::from_query(query.period.as_deref()).date_range(today);

    let transactions = get_transactions_between(&state, user_id, date_range)?;

    Ok(Json(category_insights(&transactions)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::{Date, Duration, OffsetDateTime};

    use crate::{
        analytics::period::month_start,
        endpoints,
        test_utils::{get_test_server, sign_up_test_user},
    };

    async fn add(
        server: &TestServer,
        token: &str,
        transaction_type: &str,
        amount: f64,
        category: &str,
        date: Date,
    ) {
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(token)
            .json(&json!({
                "type": transaction_type,
                "amount": amount,
                "category": category,
                "merchant": "Somewhere",
                "date": date.to_string(),
            }))
            .await
            .assert_status_ok();
    }

    fn today() -> Date {
        OffsetDateTime::now_utc().date()
    }

    #[tokio::test]
    async fn overview_for_current_month() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;
        let first = month_start(today());
        add(&server, &token, "income", 1000.0, "Salary", first).await;
        add(&server, &token, "expense", 300.0, "Food", first).await;
        add(&server, &token, "expense", 999.0, "Old", first - Duration::days(1)).await;

        let response = server
            .get(endpoints::ANALYTICS_OVERVIEW)
            .add_query_param("period", "month")
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "totalIncome": 1000.0,
            "totalExpenses": 300.0,
            "netSavings": 700.0,
            "savingsRate": 70,
            "transactionCount": 2,
        }));
    }

    #[tokio::test]
    async fn overview_only_counts_own_transactions() {
        let server = get_test_server();
        let (alice, _) = sign_up_test_user(&server, "alice@example.com").await;
        let (bob, _) = sign_up_test_user(&server, "bob@example.com").await;
        add(&server, &alice, "income", 50.0, "Salary", today()).await;

        let body = server
            .get(endpoints::ANALYTICS_OVERVIEW)
            .authorization_bearer(&bob)
            .await
            .json::<Value>();

        assert_eq!(body["transactionCount"], 0);
        assert_eq!(body["savingsRate"], 0);
    }

    #[tokio::test]
    async fn year_overview_includes_older_transactions() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;
        add(&server, &token, "expense", 10.0, "Food", today() - Duration::days(100)).await;
        add(&server, &token, "expense", 10.0, "Food", today() - Duration::days(400)).await;

        let body = server
            .get(endpoints::ANALYTICS_OVERVIEW)
            .add_query_param("period", "year")
            .authorization_bearer(&token)
            .await
            .json::<Value>();

        assert_eq!(body["transactionCount"], 1);
    }

    #[tokio::test]
    async fn spending_trends_default_to_six_months() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;
        add(&server, &token, "income", 100.0, "Salary", today()).await;

        let body = server
            .get(endpoints::SPENDING_TRENDS)
            .authorization_bearer(&token)
            .await
            .json::<Value>();

        let trends = body.as_array().unwrap();
        assert_eq!(trends.len(), 6);
        let current = &trends[5];
        assert_eq!(
            current["month"],
            today().month().to_string().to_uppercase()
        );
        assert_eq!(current["income"], 100.0);
        assert_eq!(current["savings"], 100.0);
        assert_eq!(trends[0]["income"], 0.0);
    }

    #[tokio::test]
    async fn spending_trends_reject_too_many_months() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        server
            .get(endpoints::SPENDING_TRENDS)
            .add_query_param("months", 121)
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get(endpoints::SPENDING_TRENDS)
            .add_query_param("months", "many")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get(endpoints::SPENDING_TRENDS)
            .add_query_param("months", 0)
            .authorization_bearer(&token)
            .await
            .assert_json(&json!([]));
    }

    #[tokio::test]
    async fn category_insights_for_current_month() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;
        add(&server, &token, "expense", 75.0, "Food", today()).await;
        add(&server, &token, "expense", 25.0, "Transport", today()).await;
        add(&server, &token, "income", 500.0, "Salary", today()).await;

        let response = server
            .get(endpoints::CATEGORY_INSIGHTS)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([
            { "category": "Food", "amount": 75.0, "percentage": 75 },
            { "category": "Transport", "amount": 25.0, "percentage": 25 },
        ]));
    }

    #[tokio::test]
    async fn analytics_require_token() {
        let server = get_test_server();

        server
            .get(endpoints::ANALYTICS_OVERVIEW)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
