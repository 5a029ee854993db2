//! Defines the core data models and database queries for transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{AppState, Error, database_id::TransactionId, user::UserId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type {other}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Always positive, the type gives the direction.
    pub amount: f64,
    pub category: String,
    /// Who was paid, or who paid the user.
    pub merchant: String,
    pub description: Option<String>,
    /// When the transaction happened.
    pub date: Date,
    pub is_recurring: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub category: String,
    pub merchant: String,
    pub description: Option<String>,
    pub date: Date,
    pub is_recurring: bool,
}

/// Filters for listing a user's transactions. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// An inclusive date range.
    pub date_range: Option<(Date, Date)>,
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
}

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, user_id, type, amount, category, merchant, description, \
     date, is_recurring, created_at, updated_at";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                merchant TEXT NOT NULL,
                description TEXT,
                date TEXT NOT NULL,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the transaction list and the analytics date windows.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, type, amount, category, merchant, description, \
             date, is_recurring, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                new_transaction.user_id,
                new_transaction.transaction_type,
                new_transaction.amount,
                new_transaction.category,
                new_transaction.merchant,
                new_transaction.description,
                new_transaction.date,
                new_transaction.is_recurring,
                now,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Retrieve a transaction and check that it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - [Error::NotOwner] if the transaction belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction_for_user(
    id: TransactionId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = get_transaction(id, connection)?;

    if transaction.user_id != user_id {
        tracing::warn!("User {user_id} tried to access transaction {id} of another user");
        return Err(Error::NotOwner);
    }

    Ok(transaction)
}

/// Get a user's transactions that match `filter`, newest first.
///
/// Transactions on the same date are ordered by ID so the order is stable.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    user_id: UserId,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (start, end) = filter.date_range.unzip();

    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             AND (:start IS NULL OR date BETWEEN :start AND :end)
             AND (:type IS NULL OR type = :type)
             AND (:category IS NULL OR category = :category)
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id,
                ":start": start,
                ":end": end,
                ":type": filter.transaction_type,
                ":category": filter.category,
            },
            map_transaction_row,
        )?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Write the editable fields of `transaction` back to the database and advance `updated_at`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if the transaction no longer exists,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET
                type = ?1,
                amount = ?2,
                category = ?3,
                merchant = ?4,
                description = ?5,
                date = ?6,
                is_recurring = ?7,
                updated_at = ?8
            WHERE id = ?9
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                transaction.transaction_type,
                transaction.amount,
                transaction.category,
                transaction.merchant,
                transaction.description,
                transaction.date,
                transaction.is_recurring,
                OffsetDateTime::now_utc(),
                transaction.id,
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::TransactionNotFound,
            error => error.into(),
        })
}

/// Delete the transaction with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::TransactionNotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        return Err(Error::TransactionNotFound);
    }

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        transaction_type: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        merchant: row.get(5)?,
        description: row.get(6)?,
        date: row.get(7)?,
        is_recurring: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
