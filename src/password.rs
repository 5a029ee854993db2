//! Password strength checks and bcrypt hashing.
//!
//! Hashing and verifying are slow at the production cost, so both run on
//! tokio's blocking thread pool instead of the async workers.

use std::fmt::Display;

use bcrypt::BcryptError;
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A plain text password that zxcvbn scores at least three out of four.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] with zxcvbn's suggestions if the password is
    /// easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let estimate = zxcvbn(raw_password, &[]);

        if matches!(estimate.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        let suggestions = estimate
            .feedback()
            .map(ToString::to_string)
            .unwrap_or_default();

        Err(Error::TooWeak(suggestions))
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A bcrypt hash as stored in the `password` column of the user table.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// bcrypt's recommended cost. Tests use the minimum of 4.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with a fresh salt.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if `cost` is outside bcrypt's range or the
    /// blocking task fails.
    pub async fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        run_blocking(move || bcrypt::hash(password.0, cost))
            .await
            .map(Self)
    }

    /// Check the strength of `raw_password` and hash it.
    ///
    /// # Errors
    /// Returns [Error::TooWeak] before any hashing if the password is weak.
    pub async fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        Self::new(ValidatedPassword::new(raw_password)?, cost).await
    }

    /// Wrap a hash read from the database.
    ///
    /// The hash is only parsed when [PasswordHash::verify] is called.
    pub fn from_stored(hash: &str) -> Self {
        Self(hash.to_owned())
    }

    /// Check whether `raw_password` matches this hash.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub async fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        let hash = self.0.clone();
        let raw_password = raw_password.to_owned();

        run_blocking(move || bcrypt::verify(raw_password, &hash)).await
    }

    /// The hash string as stored in the database.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, BcryptError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|error| Error::HashingError(error.to_string()))?
        .map_err(|error| Error::HashingError(error.to_string()))
}
