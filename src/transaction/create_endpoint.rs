use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    extract::ApiJson,
    transaction::{Transaction, TransactionRequest, TransactionState, create_transaction},
    user::UserId,
};

/// A route handler for recording a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    ApiJson(request): ApiJson<TransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let new_transaction = request.into_new_transaction(user_id)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    create_transaction(new_transaction, &connection)
        .inspect_err(|error| tracing::error!("Could not create transaction: {error}"))
        .map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, sign_up_test_user},
    };

    #[tokio::test]
    async fn create_returns_stored_transaction() {
        let server = get_test_server();
        let (token, user_id) = sign_up_test_user(&server, "alice@example.com").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "type": "income",
                "amount": 1500.25,
                "category": "Salary",
                "merchant": "Acme Ltd",
                "description": "March pay",
                "date": "2025-03-31",
                "isRecurring": true,
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert!(body["id"].is_i64());
        assert_eq!(body["userId"], user_id.as_i64());
        assert_eq!(body["type"], "income");
        assert_eq!(body["amount"], 1500.25);
        assert_eq!(body["category"], "Salary");
        assert_eq!(body["merchant"], "Acme Ltd");
        assert_eq!(body["description"], "March pay");
        assert_eq!(body["date"], "2025-03-31");
        assert_eq!(body["isRecurring"], true);
        assert_eq!(body["createdAt"], body["updatedAt"]);
    }

    #[tokio::test]
    async fn create_rejects_non_positive_amount() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        let response = server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "type": "expense",
                "amount": -5,
                "category": "Food",
                "merchant": "Cafe",
                "date": "2025-03-31",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let listed = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Value>();
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn create_rejects_unknown_type() {
        let server = get_test_server();
        let (token, _) = sign_up_test_user(&server, "alice@example.com").await;

        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "type": "transfer",
                "amount": 5,
                "category": "Food",
                "merchant": "Cafe",
                "date": "2025-03-31",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_requires_token() {
        let server = get_test_server();

        server
            .post(endpoints::TRANSACTIONS)
            .json(&json!({}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
