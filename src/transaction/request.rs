use serde::Deserialize;

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionType},
    user::UserId,
    validation::{parse_optional_date, require, validate_not_blank, validate_positive},
};

/// The JSON body for creating or editing a transaction.
///
/// Every field is optional here so that edits can send only what changed.
/// Creating a transaction requires the type, amount, category, merchant and date.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub description: Option<String>,
    /// A date like "2025-01-31".
    pub date: Option<String>,
    pub is_recurring: Option<bool>,
}

impl TransactionRequest {
    /// Validate the request as a new transaction for `user_id`.
    ///
    /// # Errors
    /// Returns [Error::Validation] naming the first missing or invalid field.
    pub fn into_new_transaction(self, user_id: UserId) -> Result<NewTransaction, Error> {
        let transaction_type = require(self.transaction_type, "type")?;
        let amount = validate_positive(require(self.amount, "amount")?, "amount")?;
        let category = validate_not_blank(&require(self.category, "category")?, "category")?;
        let merchant = validate_not_blank(&require(self.merchant, "merchant")?, "merchant")?;
        let date = require(parse_optional_date(self.date.as_deref(), "date")?, "date")?;

        Ok(NewTransaction {
            user_id,
            transaction_type,
            amount,
            category,
            merchant,
            description: self.description,
            date,
            is_recurring: self.is_recurring.unwrap_or(false),
        })
    }

    /// Overwrite the fields of `transaction` that are present in the request.
    ///
    /// # Errors
    /// Returns [Error::Validation] if a supplied field is invalid, in which case
    /// `transaction` is left unchanged.
    pub fn apply(self, transaction: &mut Transaction) -> Result<(), Error> {
        let amount = self
            .amount
            .map(|amount| validate_positive(amount, "amount"))
            .transpose()?;
        let category = self
            .category
            .map(|category| validate_not_blank(&category, "category"))
            .transpose()?;
        let merchant = self
            .merchant
            .map(|merchant| validate_not_blank(&merchant, "merchant"))
            .transpose()?;
        let date = parse_optional_date(self.date.as_deref(), "date")?;

        if let Some(transaction_type) = self.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        if let Some(amount) = amount {
            transaction.amount = amount;
        }
        if let Some(category) = category {
            transaction.category = category;
        }
        if let Some(merchant) = merchant {
            transaction.merchant = merchant;
        }
        if self.description.is_some() {
            transaction.description = self.description;
        }
        if let Some(date) = date {
            transaction.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            transaction.is_recurring = is_recurring;
        }

        Ok(())
    }
}
