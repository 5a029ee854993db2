use std::fmt::Display;

use email_address::EmailAddress;

use crate::Error;

/// A validated email address, trimmed and lower-cased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Parse and normalise `raw`.
    ///
    /// # Errors
    /// Returns [Error::InvalidEmail] if `raw` is not a valid email address.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let normalised = raw.trim().to_lowercase();

        if EmailAddress::is_valid(&normalised) {
            Ok(Self(normalised))
        } else {
            Err(Error::InvalidEmail(raw.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, user::Email};

    #[test]
    fn lowercases_and_trims() {
        let email = Email::new("  Alice@Example.COM ").unwrap();

        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn rejects_missing_at() {
        assert_eq!(
            Email::new("alice.example.com"),
            Err(Error::InvalidEmail("alice.example.com".to_owned()))
        );
    }

    #[test]
    fn rejects_empty() {
        assert!(Email::new("").is_err());
    }
}
