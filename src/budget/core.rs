//! Defines the budget model and the database queries for budgets.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{AppState, Error, database_id::BudgetId, user::UserId};

/// A spending limit for one category in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category: String,
    /// The most the user wants to spend in the category this month.
    pub limit: f64,
    /// Starts at zero, nothing updates it yet.
    pub spent: f64,
    /// 1 to 12.
    pub month: u8,
    pub year: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A budget that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub user_id: UserId,
    pub category: String,
    pub limit: f64,
    pub month: u8,
    pub year: i32,
}

/// The state needed by the budget endpoints.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Used to work out the current month.
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

const BUDGET_COLUMNS: &str =
    "id, user_id, category, spending_limit, spent, month, year, created_at, updated_at";

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // Several budgets may share a category and month.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                spending_limit REAL NOT NULL,
                spent REAL NOT NULL DEFAULT 0,
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                year INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_user_month ON budget(user_id, year, month);",
        (),
    )?;

    Ok(())
}

/// Store a new budget with nothing spent.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_budget(new_budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let now = OffsetDateTime::now_utc();

    let budget = connection
        .prepare(&format!(
            "INSERT INTO budget (user_id, category, spending_limit, spent, month, year, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?6)
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                new_budget.user_id,
                new_budget.category,
                new_budget.limit,
                new_budget.month,
                new_budget.year,
                now,
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Retrieve a budget by its `id` and check that it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a valid budget,
/// - [Error::NotOwner] if the budget belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget_for_user(
    id: BudgetId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!("SELECT {BUDGET_COLUMNS} FROM budget WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_budget_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BudgetNotFound,
            error => error.into(),
        })?;

    if budget.user_id != user_id {
        tracing::warn!("User {user_id} tried to access budget {id} of another user");
        return Err(Error::NotOwner);
    }

    Ok(budget)
}

/// Get a user's budgets, optionally only those for one month of one year.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_budgets(
    user_id: UserId,
    month: Option<(u8, i32)>,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    let (month, year) = month.unzip();

    connection
        .prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budget
             WHERE user_id = :user_id
             AND (:month IS NULL OR (month = :month AND year = :year))
             ORDER BY year DESC, month DESC, id ASC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id,
                ":month": month,
                ":year": year,
            },
            map_budget_row,
        )?
        .map(|budget_result| budget_result.map_err(Error::SqlError))
        .collect()
}

/// Write the category and limit of `budget` back to the database.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if the budget no longer exists,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_budget(budget: &Budget, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "UPDATE budget SET category = ?1, spending_limit = ?2, updated_at = ?3
             WHERE id = ?4
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                &budget.category,
                budget.limit,
                OffsetDateTime::now_utc(),
                budget.id,
            ),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::BudgetNotFound,
            error => error.into(),
        })
}

/// Delete the budget with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::BudgetNotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::BudgetNotFound);
    }

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        limit: row.get(3)?,
        spent: row.get(4)?,
        month: row.get(5)?,
        year: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        budget::{NewBudget, create_budget, delete_budget, get_budget_for_user, get_budgets, update_budget},
        test_utils::get_test_connection,
        user::{AuthProvider, Email, NewUser, UserId, create_user},
    };

    fn create_test_user(email: &str, conn: &Connection) -> UserId {
        create_user(
            NewUser {
                email: Email::new(email).unwrap(),
                password_hash: None,
                name: "Test".to_owned(),
                profile_picture: None,
                auth_provider: AuthProvider::Local,
            },
            conn,
        )
        .unwrap()
        .id
    }

    fn new_budget(user_id: UserId, category: &str, month: u8, year: i32) -> NewBudget {
        NewBudget {
            user_id,
            category: category.to_owned(),
            limit: 200.0,
            month,
            year,
        }
    }

    #[test]
    fn create_budget_starts_with_nothing_spent() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);

        let budget = create_budget(new_budget(user_id, "Food", 3, 2025), &conn).unwrap();

        assert_eq!(budget.spent, 0.0);
        assert_eq!(budget.limit, 200.0);
        assert_eq!(budget.created_at, budget.updated_at);
        assert_eq!(get_budget_for_user(budget.id, user_id, &conn), Ok(budget));
    }

    #[test]
    fn duplicate_category_and_month_is_allowed() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);

        create_budget(new_budget(user_id, "Food", 3, 2025), &conn).unwrap();
        create_budget(new_budget(user_id, "Food", 3, 2025), &conn).unwrap();

        assert_eq!(get_budgets(user_id, Some((3, 2025)), &conn).unwrap().len(), 2);
    }

    #[test]
    fn get_budgets_filters_by_month_and_owner() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);
        let other = create_test_user("b@example.com", &conn);
        let march = create_budget(new_budget(user_id, "Food", 3, 2025), &conn).unwrap();
        let april = create_budget(new_budget(user_id, "Food", 4, 2025), &conn).unwrap();
        create_budget(new_budget(user_id, "Food", 3, 2024), &conn).unwrap();
        create_budget(new_budget(other, "Food", 3, 2025), &conn).unwrap();

        assert_eq!(
            get_budgets(user_id, Some((3, 2025)), &conn).unwrap(),
            vec![march.clone()]
        );
        let all = get_budgets(user_id, None, &conn).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], april);
    }

    #[test]
    fn get_budget_checks_owner() {
        let conn = get_test_connection();
        let owner = create_test_user("a@example.com", &conn);
        let other = create_test_user("b@example.com", &conn);
        let budget = create_budget(new_budget(owner, "Food", 3, 2025), &conn).unwrap();

        assert_eq!(
            get_budget_for_user(budget.id, other, &conn),
            Err(Error::NotOwner)
        );
        assert_eq!(
            get_budget_for_user(budget.id + 1, owner, &conn),
            Err(Error::BudgetNotFound)
        );
    }

    #[test]
    fn update_budget_changes_category_and_limit_only() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);
        let mut budget = create_budget(new_budget(user_id, "Food", 3, 2025), &conn).unwrap();
        budget.category = "Groceries".to_owned();
        budget.limit = 350.0;
        budget.month = 9;

        let updated = update_budget(&budget, &conn).unwrap();

        assert_eq!(updated.category, "Groceries");
        assert_eq!(updated.limit, 350.0);
        assert_eq!(updated.month, 3);
        assert_eq!(updated.created_at, budget.created_at);
    }

    #[test]
    fn delete_budget_removes_row() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);
        let budget = create_budget(new_budget(user_id, "Food", 3, 2025), &conn).unwrap();

        delete_budget(budget.id, &conn).unwrap();

        assert_eq!(
            get_budget_for_user(budget.id, user_id, &conn),
            Err(Error::BudgetNotFound)
        );
        assert_eq!(delete_budget(budget.id, &conn), Err(Error::BudgetNotFound));
    }
}
