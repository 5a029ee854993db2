//! Defines the user model and its database queries.

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::{
    Connection, OptionalExtension, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{AppState, Error, password::PasswordHash, user::Email};

// ============================================================================
// MODELS
// ============================================================================

/// The ID of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw database ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw database ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// How the user proved their identity when the account was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProvider {
    /// Email and password.
    Local,
    /// A Google account.
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "LOCAL",
            AuthProvider::Google => "GOOGLE",
        }
    }
}

impl ToSql for AuthProvider {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AuthProvider {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "LOCAL" => Ok(AuthProvider::Local),
            "GOOGLE" => Ok(AuthProvider::Google),
            other => Err(FromSqlError::Other(
                format!("unknown auth provider {other}").into(),
            )),
        }
    }
}

/// A registered user and their profile.
///
/// The password hash is deliberately not serializable, use
/// [crate::user::UserSummary] or [crate::user::ProfileView] for responses.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    /// Lower-cased, unique across providers.
    pub email: String,
    /// `None` for accounts created through Google that never set a password.
    pub password_hash: Option<PasswordHash>,
    /// The display name.
    pub name: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub auth_provider: AuthProvider,
    pub is_onboarded: bool,
    pub is_password_set: bool,
    pub country: Option<String>,
    pub flag: Option<String>,
    pub currency: Option<String>,
    pub occupation: Option<String>,
    pub monthly_income: Option<f64>,
    pub pocket_money: Option<f64>,
    pub income_frequency: Option<String>,
    pub financial_goals: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// The data needed to register a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: Option<PasswordHash>,
    pub name: String,
    pub profile_picture: Option<String>,
    pub auth_provider: AuthProvider,
}

/// The state needed by the user and profile endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost used when a user changes their password.
    pub password_cost: u32,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_cost: state.password_cost,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const USER_COLUMNS: &str = "id, email, password, name, full_name, profile_picture, auth_provider, \
     is_onboarded, is_password_set, country, flag, currency, occupation, monthly_income, \
     pocket_money, income_frequency, financial_goals, created_at, updated_at";

/// Create the user table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password TEXT,
                name TEXT NOT NULL,
                full_name TEXT,
                profile_picture TEXT,
                auth_provider TEXT NOT NULL,
                is_onboarded INTEGER NOT NULL DEFAULT 0,
                is_password_set INTEGER NOT NULL DEFAULT 0,
                country TEXT,
                flag TEXT,
                currency TEXT,
                occupation TEXT,
                monthly_income REAL,
                pocket_money REAL,
                income_frequency TEXT,
                financial_goals TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// New users start without onboarding and with `full_name` equal to `name`.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateEmail] if the email is already registered,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let now = OffsetDateTime::now_utc();
    let is_password_set = new_user.password_hash.is_some();

    let user = connection
        .prepare(&format!(
            "INSERT INTO user (email, password, name, full_name, profile_picture, auth_provider, \
             is_onboarded, is_password_set, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3, ?4, ?5, 0, ?6, ?7, ?7)
             RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                new_user.email.as_str(),
                new_user.password_hash.as_ref().map(PasswordHash::as_str),
                &new_user.name,
                &new_user.profile_picture,
                new_user.auth_provider,
                is_password_set,
                now,
            ),
            map_user_row,
        )?;

    Ok(user)
}

/// Retrieve a user by their `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if `id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_user_by_id(id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_user_row)
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
            error => error.into(),
        })
}

/// Retrieve a user by their email address, or `None` if it is not registered.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_user_by_email(email: &Email, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email.as_str())], map_user_row)
        .optional()
        .map_err(Error::from)
}

/// Check whether `email` is already registered.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn email_exists(email: &Email, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM user WHERE email = :email)",
            &[(":email", &email.as_str())],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Check whether a user with `id` exists.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn user_exists(id: UserId, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM user WHERE id = :id)",
            &[(":id", &id)],
            |row| row.get(0),
        )
        .map_err(Error::from)
}

/// Write every mutable profile field of `user` back to the database and
/// advance `updated_at`.
///
/// The ID, email, provider and `created_at` are never changed.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if the user no longer exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn save_user(user: &User, connection: &Connection) -> Result<User, Error> {
    let financial_goals = serde_json::to_string(&user.financial_goals)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    connection
        .prepare(&format!(
            "UPDATE user SET
                password = ?1,
                name = ?2,
                full_name = ?3,
                profile_picture = ?4,
                is_onboarded = ?5,
                is_password_set = ?6,
                country = ?7,
                flag = ?8,
                currency = ?9,
                occupation = ?10,
                monthly_income = ?11,
                pocket_money = ?12,
                income_frequency = ?13,
                financial_goals = ?14,
                updated_at = ?15
            WHERE id = ?16
            RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            rusqlite::params![
                user.password_hash.as_ref().map(PasswordHash::as_str),
                user.name,
                user.full_name,
                user.profile_picture,
                user.is_onboarded,
                user.is_password_set,
                user.country,
                user.flag,
                user.currency,
                user.occupation,
                user.monthly_income,
                user.pocket_money,
                user.income_frequency,
                financial_goals,
                OffsetDateTime::now_utc(),
                user.id,
            ],
            map_user_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
            error => error.into(),
        })
}

/// Replace the user's password hash and mark their password as set.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if the user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn set_user_password(
    id: UserId,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1, is_password_set = 1, updated_at = ?2 WHERE id = ?3",
        (password_hash.as_str(), OffsetDateTime::now_utc(), id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UserNotFound);
    }

    Ok(())
}

/// Map a database row to a User.
pub fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let password: Option<String> = row.get(2)?;
    let raw_goals: String = row.get(16)?;
    let financial_goals = serde_json::from_str(&raw_goals).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(16, Type::Text, Box::new(error))
    })?;

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: password.as_deref().map(PasswordHash::from_stored),
        name: row.get(3)?,
        full_name: row.get(4)?,
        profile_picture: row.get(5)?,
        auth_provider: row.get(6)?,
        is_onboarded: row.get(7)?,
        is_password_set: row.get(8)?,
        country: row.get(9)?,
        flag: row.get(10)?,
        currency: row.get(11)?,
        occupation: row.get(12)?,
        monthly_income: row.get(13)?,
        pocket_money: row.get(14)?,
        income_frequency: row.get(15)?,
        financial_goals,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}
