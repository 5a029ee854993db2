use axum::{Extension, Json, extract::State};
use serde_json::{Value, json};

use crate::{
    Error,
    database_id::TransactionId,
    extract::ApiPath,
    transaction::{TransactionState, delete_transaction, get_transaction_for_user},
    user::UserId,
};

/// A route handler for deleting a transaction owned by the user.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction_for_user(transaction_id, user_id, &connection)?;
    delete_transaction(transaction_id, &connection)?;

    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}
