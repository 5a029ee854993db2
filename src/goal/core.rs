//! Defines the savings goal model, its progress rules and the database queries for goals.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{AppState, Error, database_id::GoalId, user::UserId};

// ============================================================================
// MODELS
// ============================================================================

/// Where a goal is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoalStatus {
    Active,
    Achieved,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "ACTIVE",
            GoalStatus::Achieved => "ACHIEVED",
            GoalStatus::Cancelled => "CANCELLED",
        }
    }
}

impl ToSql for GoalStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GoalStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "ACTIVE" => Ok(GoalStatus::Active),
            "ACHIEVED" => Ok(GoalStatus::Achieved),
            "CANCELLED" => Ok(GoalStatus::Cancelled),
            other => Err(FromSqlError::Other(
                format!("unknown goal status {other}").into(),
            )),
        }
    }
}

/// An amount of money the user is saving towards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub category: Option<String>,
    pub status: GoalStatus,
    pub deadline: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Goal {
    /// Mark the goal as achieved once the saved amount reaches the target.
    ///
    /// A goal that has fallen below its target keeps its status.
    pub fn apply_auto_achieve(&mut self) {
        if self.current_amount >= self.target_amount {
            self.status = GoalStatus::Achieved;
        }
    }

    /// Add `amount` to the saved amount and re-check whether the goal is achieved.
    pub fn contribute(&mut self, amount: f64) {
        self.current_amount += amount;
        self.apply_auto_achieve();
    }

    /// How far along the goal is.
    pub fn progress(&self) -> GoalProgress {
        let progress = if self.target_amount > 0.0 {
            (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        GoalProgress {
            goal: self.clone(),
            progress,
            remaining: (self.target_amount - self.current_amount).max(0.0),
        }
    }
}

/// A goal with its percentage complete and the amount left to save.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    /// A percentage between 0 and 100.
    pub progress: f64,
    /// Never negative.
    pub remaining: f64,
}

/// A goal that has not been stored yet. New goals are always active.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub category: Option<String>,
    pub deadline: Option<Date>,
}

/// The state needed by the goal endpoints.
#[derive(Debug, Clone)]
pub struct GoalState {
    /// The database connection for managing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const GOAL_COLUMNS: &str = "id, user_id, name, description, target_amount, current_amount, \
     category, status, deadline, created_at, updated_at";

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL DEFAULT 0,
                category TEXT,
                status TEXT NOT NULL,
                deadline TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

/// Store a new active goal.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_goal(new_goal: NewGoal, connection: &Connection) -> Result<Goal, Error> {
    let now = OffsetDateTime::now_utc();

    let goal = connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, name, description, target_amount, current_amount, \
             category, status, deadline, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                new_goal.user_id,
                new_goal.name,
                new_goal.description,
                new_goal.target_amount,
                new_goal.current_amount,
                new_goal.category,
                GoalStatus::Active,
                new_goal.deadline,
                now,
            ),
            map_goal_row,
        )?;

    Ok(goal)
}

/// Retrieve a goal by its `id` and check that it belongs to `user_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::GoalNotFound] if `id` does not refer to a valid goal,
/// - [Error::NotOwner] if the goal belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_goal_for_user(
    id: GoalId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Goal, Error> {
    let goal = connection
        .prepare(&format!("SELECT {GOAL_COLUMNS} FROM goal WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_goal_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::GoalNotFound,
            error => error.into(),
        })?;

    if goal.user_id != user_id {
        tracing::warn!("User {user_id} tried to access goal {id} of another user");
        return Err(Error::NotOwner);
    }

    Ok(goal)
}

/// Get a user's goals, newest first, optionally only those with `status`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_goals(
    user_id: UserId,
    status: Option<GoalStatus>,
    connection: &Connection,
) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal
             WHERE user_id = :user_id AND (:status IS NULL OR status = :status)
             ORDER BY created_at DESC, id DESC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id,
                ":status": status,
            },
            map_goal_row,
        )?
        .map(|goal_result| goal_result.map_err(Error::SqlError))
        .collect()
}

/// Write the editable fields of `goal` back to the database and advance `updated_at`.
///
/// # Errors
/// This function will return a:
/// - [Error::GoalNotFound] if the goal no longer exists,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_goal(goal: &Goal, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "UPDATE goal SET
                name = ?1,
                description = ?2,
                target_amount = ?3,
                current_amount = ?4,
                category = ?5,
                status = ?6,
                deadline = ?7,
                updated_at = ?8
            WHERE id = ?9
            RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                goal.name,
                goal.description,
                goal.target_amount,
                goal.current_amount,
                goal.category,
                goal.status,
                goal.deadline,
                OffsetDateTime::now_utc(),
                goal.id,
            ],
            map_goal_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::GoalNotFound,
            error => error.into(),
        })
}

/// Delete the goal with `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::GoalNotFound] if `id` does not refer to a valid goal,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_goal(id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM goal WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::GoalNotFound);
    }

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        target_amount: row.get(4)?,
        current_amount: row.get(5)?,
        category: row.get(6)?,
        status: row.get(7)?,
        deadline: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod goal_tests {
    use time::OffsetDateTime;

    use crate::{
        goal::{Goal, GoalStatus},
        user::UserId,
    };

    fn goal(target_amount: f64, current_amount: f64) -> Goal {
        let now = OffsetDateTime::now_utc();

        Goal {
            id: 1,
            user_id: UserId::new(1),
            name: "Holiday".to_owned(),
            description: None,
            target_amount,
            current_amount,
            category: None,
            status: GoalStatus::Active,
            deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn contribution_reaching_target_achieves_goal() {
        let mut goal = goal(100.0, 60.0);

        goal.contribute(40.0);

        assert_eq!(goal.current_amount, 100.0);
        assert_eq!(goal.status, GoalStatus::Achieved);
    }

    #[test]
    fn contribution_below_target_stays_active() {
        let mut goal = goal(100.0, 10.0);

        goal.contribute(20.0);

        assert_eq!(goal.current_amount, 30.0);
        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn progress_is_clamped_and_remaining_never_negative() {
        let over = goal(100.0, 150.0).progress();
        assert_eq!(over.progress, 100.0);
        assert_eq!(over.remaining, 0.0);

        let partway = goal(200.0, 50.0).progress();
        assert_eq!(partway.progress, 25.0);
        assert_eq!(partway.remaining, 150.0);
    }

    #[test]
    fn progress_is_zero_without_target() {
        let progress = goal(0.0, 10.0).progress();

        assert_eq!(progress.progress, 0.0);
        assert_eq!(progress.remaining, 0.0);
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(GoalStatus::Cancelled).unwrap(),
            serde_json::json!("CANCELLED")
        );
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        goal::{
            GoalStatus, NewGoal, create_goal, delete_goal, get_goal_for_user, get_goals,
            update_goal,
        },
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

    fn new_goal(user_id: UserId, name: &str) -> NewGoal {
        NewGoal {
            user_id,
            name: name.to_owned(),
            description: Some("Save up".to_owned()),
            target_amount: 1000.0,
            current_amount: 0.0,
            category: Some("Travel".to_owned()),
            deadline: Some(date!(2026 - 12 - 31)),
        }
    }

    #[test]
    fn create_goal_is_active() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);

        let goal = create_goal(new_goal(user_id, "Holiday"), &conn).unwrap();

        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.deadline, Some(date!(2026 - 12 - 31)));
        assert_eq!(get_goal_for_user(goal.id, user_id, &conn), Ok(goal));
    }

    #[test]
    fn create_goal_at_target_is_still_active() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);

        let goal = create_goal(
            NewGoal {
                current_amount: 5000.0,
                ..new_goal(user_id, "Holiday")
            },
            &conn,
        )
        .unwrap();

        assert_eq!(goal.status, GoalStatus::Active);
    }

    #[test]
    fn get_goals_newest_first_with_status_filter() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);
        let other = create_test_user("b@example.com", &conn);
        let first = create_goal(new_goal(user_id, "First"), &conn).unwrap();
        let mut second = create_goal(new_goal(user_id, "Second"), &conn).unwrap();
        create_goal(new_goal(other, "Not mine"), &conn).unwrap();
        second.status = GoalStatus::Cancelled;
        let second = update_goal(&second, &conn).unwrap();

        assert_eq!(
            get_goals(user_id, None, &conn).unwrap(),
            vec![second.clone(), first.clone()]
        );
        assert_eq!(
            get_goals(user_id, Some(GoalStatus::Active), &conn).unwrap(),
            vec![first]
        );
        assert_eq!(
            get_goals(user_id, Some(GoalStatus::Cancelled), &conn).unwrap(),
            vec![second]
        );
    }

    #[test]
    fn get_goal_checks_owner() {
        let conn = get_test_connection();
        let owner = create_test_user("a@example.com", &conn);
        let other = create_test_user("b@example.com", &conn);
        let goal = create_goal(new_goal(owner, "Holiday"), &conn).unwrap();

        assert_eq!(get_goal_for_user(goal.id, other, &conn), Err(Error::NotOwner));
        assert_eq!(
            get_goal_for_user(goal.id + 1, owner, &conn),
            Err(Error::GoalNotFound)
        );
    }

    #[test]
    fn delete_goal_removes_row() {
        let conn = get_test_connection();
        let user_id = create_test_user("a@example.com", &conn);
        let goal = create_goal(new_goal(user_id, "Holiday"), &conn).unwrap();

        delete_goal(goal.id, &conn).unwrap();

        assert_eq!(delete_goal(goal.id, &conn), Err(Error::GoalNotFound));
    }
}
