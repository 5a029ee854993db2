//! Listing and reading a user's transactions.

use axum::{Extension, Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    database_id::TransactionId,
    extract::{ApiPath, ApiQuery},
    transaction::{
        Transaction, TransactionFilter, TransactionState, TransactionType,
        get_transaction_for_user, get_transactions,
    },
    user::UserId,
    validation::parse_optional_date,
};

/// The query string for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// The first date to include, must be given with `end`.
    pub start: Option<String>,
    /// The last date to include, must be given with `start`.
    pub end: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
}

impl ListTransactionsQuery {
    fn into_filter(self) -> Result<TransactionFilter, Error> {
        let start = parse_optional_date(self.start.as_deref(), "start")?;
        let end = parse_optional_date(self.end.as_deref(), "end")?;

        let date_range = match (start, end) {
            (Some(start), Some(end)) if start > end => {
                return Err(Error::Validation(
                    "start must not be after end".to_owned(),
                ));
            }
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(Error::Validation(
                    "start and end must be given together".to_owned(),
                ));
            }
        };

        Ok(TransactionFilter {
            date_range,
            transaction_type: self.transaction_type,
            category: self
                .category
                .map(|category| category.trim().to_owned())
                .filter(|category| !category.is_empty()),
        })
    }
}

/// A route handler for listing the user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    ApiQuery(query): ApiQuery<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = query.into_filter()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(user_id, &filter, &connection).map(Json)
}

/// A route handler for reading a single transaction.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserId>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transaction_for_user(transaction_id, user_id, &connection).map(Json)
}
