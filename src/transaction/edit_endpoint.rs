use axum::{Extension, Json, extract::State};

use crate::{
    Error,
    database_id::TransactionId,
    extract::{ApiJson, ApiPath},
    transaction::{
        Transaction, TransactionRequest, TransactionState, get_transaction_for_user,
        update_transaction,
    },
    user::UserId,
};

/// A route handler for editing a transaction. Only the fields in the body are changed.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(request): ApiJson<TransactionRequest>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let mut transaction = get_transaction_for_user(transaction_id, user_id, &connection)?;
    request.apply(&mut transaction)?;

    update_transaction(&transaction, &connection).map(Json)
}
